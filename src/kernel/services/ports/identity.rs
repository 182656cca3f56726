//! 身份服务端口：只暴露当前用户与角色两个查询

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
}

pub trait IdentityProvider: Send + Sync {
    fn current_user(&self) -> Option<User>;

    fn resolve_role(&self, user: &User) -> String;
}
