//! 由设置文件提供的固定身份

use crate::kernel::services::ports::{IdentityProvider, IdentitySettings, User};

const DEFAULT_ROLE: &str = "student";

pub struct StaticIdentity {
    user: Option<User>,
    role: String,
}

impl StaticIdentity {
    pub fn new(user: Option<User>, role: impl Into<String>) -> Self {
        Self {
            user,
            role: role.into(),
        }
    }

    pub fn anonymous() -> Self {
        Self::new(None, DEFAULT_ROLE)
    }

    pub fn from_settings(settings: &IdentitySettings) -> Self {
        let user = settings.user_id.as_ref().map(|id| User {
            id: id.clone(),
            name: settings.name.clone().unwrap_or_else(|| id.clone()),
            email: settings.email.clone(),
        });
        let role = settings
            .role
            .clone()
            .unwrap_or_else(|| DEFAULT_ROLE.to_string());
        Self::new(user, role)
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<User> {
        self.user.clone()
    }

    fn resolve_role(&self, user: &User) -> String {
        match &self.user {
            Some(current) if current.id == user.id => self.role.clone(),
            _ => DEFAULT_ROLE.to_string(),
        }
    }
}
