//! 服务端口：trait 与数据契约

pub mod config;
pub mod execution;
pub mod identity;
pub mod picker;
pub mod settings;

pub use config::{ExecutionConfig, InterpreterSpec, PlaygroundConfig};
pub use execution::{CodeExecutor, ExecutionError, ExecutionOutput, ExecutionRequest};
pub use identity::{IdentityProvider, User};
pub use picker::{
    BridgeError, BridgeOutcome, Capabilities, FilePicker, OpenedFile, PickError,
};
pub use settings::{
    AutosaveSettings, ExecutionSettings, IdentitySettings, InterpreterRule, NotificationSettings,
    Settings,
};
