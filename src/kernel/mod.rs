//! 无界面的应用核心（state/action/effect）

pub mod action;
pub mod detect;
pub mod diagnostics;
pub mod effect;
pub mod language;
pub mod notifications;
pub mod search;
pub mod services;
pub mod session;
pub mod state;
pub mod store;

pub use action::Action;
pub use diagnostics::{CodeError, DiagnosticSeverity};
pub use effect::Effect;
pub use language::LanguageId;
pub use notifications::{Notification, NotificationCenter, NotificationId, NotificationKind};
pub use search::{Match, SearchOptions};
pub use session::{SessionStore, Tab, TabId, TabOrigin, TabPatch};
pub use state::{AppState, ExplorerState, OutputState, SearchState};
pub use store::{DispatchResult, Store, CAPABILITY_GUIDANCE};
