//! 通知中心
//!
//! 每个会话构造一个实例并注入到 `AppState`；过期由调用方用 `tick(now)` 驱动。

use std::time::{Duration, Instant};

pub const DEFAULT_NOTIFICATION_DURATION: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(u64);

impl NotificationId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

impl NotificationKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

/// 通知上的操作按钮；`command` 由前端解释
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationAction {
    pub label: String,
    pub command: String,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: Option<String>,
    pub duration: Option<Duration>,
    pub action: Option<NotificationAction>,
    pub created_at: Instant,
    /// `None` 表示只能手动关闭
    pub expires_at: Option<Instant>,
}

#[derive(Debug)]
pub struct NotificationCenter {
    items: Vec<Notification>,
    next_id: u64,
    default_duration: Duration,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_DURATION)
    }
}

impl NotificationCenter {
    pub fn new(default_duration: Duration) -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
            default_duration,
        }
    }

    pub fn default_duration(&self) -> Duration {
        self.default_duration
    }

    /// 最新的通知在最前面
    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn emit(
        &mut self,
        kind: NotificationKind,
        title: impl Into<String>,
        message: Option<String>,
        duration: Option<Duration>,
        action: Option<NotificationAction>,
    ) -> NotificationId {
        self.push(Instant::now(), kind, title, message, duration, action)
    }

    /// `duration` 为零表示不自动消失
    pub fn push(
        &mut self,
        now: Instant,
        kind: NotificationKind,
        title: impl Into<String>,
        message: Option<String>,
        duration: Option<Duration>,
        action: Option<NotificationAction>,
    ) -> NotificationId {
        let id = NotificationId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);

        let duration = duration.filter(|d| !d.is_zero());
        let notification = Notification {
            id,
            kind,
            title: title.into(),
            message,
            duration,
            action,
            created_at: now,
            expires_at: duration.and_then(|d| now.checked_add(d)),
        };
        tracing::debug!(id = id.0, kind = kind.label(), title = %notification.title, "notify");
        self.items.insert(0, notification);
        id
    }

    fn with_default(
        &mut self,
        kind: NotificationKind,
        title: impl Into<String>,
        message: Option<String>,
    ) -> NotificationId {
        let duration = Some(self.default_duration);
        self.emit(kind, title, message, duration, None)
    }

    pub fn success(&mut self, title: impl Into<String>, message: Option<String>) -> NotificationId {
        self.with_default(NotificationKind::Success, title, message)
    }

    pub fn error(&mut self, title: impl Into<String>, message: Option<String>) -> NotificationId {
        self.with_default(NotificationKind::Error, title, message)
    }

    pub fn warning(&mut self, title: impl Into<String>, message: Option<String>) -> NotificationId {
        self.with_default(NotificationKind::Warning, title, message)
    }

    pub fn info(&mut self, title: impl Into<String>, message: Option<String>) -> NotificationId {
        self.with_default(NotificationKind::Info, title, message)
    }

    pub fn get(&self, id: NotificationId) -> Option<&Notification> {
        self.items.iter().find(|n| n.id == id)
    }

    /// 重复关闭同一个 id 不做任何事
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        before != self.items.len()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// 移除已到期的通知，返回是否有变化
    pub fn tick(&mut self, now: Instant) -> bool {
        let before = self.items.len();
        self.items
            .retain(|n| n.expires_at.map_or(true, |expires| now < expires));
        before != self.items.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/notifications.rs"]
mod tests;
