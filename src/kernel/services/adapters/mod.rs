//! 服务适配器：与操作系统/运行时相关的实现（IO/异步）

pub mod bridge;
pub mod execution;
pub mod identity;
pub mod lines;
pub mod paths;
pub mod picker;
pub mod progress;
pub mod runtime;
pub mod settings;

pub use execution::ProcessExecutor;
pub use identity::StaticIdentity;
pub use lines::{LineRead, LineSource};
pub use paths::{
    ensure_log_dir, get_download_dir, get_log_dir, get_progress_path, resolve_download_dir,
};
pub use picker::{PromptPicker, StaticPicker};
pub use progress::{ProgressError, ProgressStore};
pub use runtime::{AppMessage, AsyncRuntime};
pub use settings::{ensure_settings_file, get_settings_path, load_settings};
