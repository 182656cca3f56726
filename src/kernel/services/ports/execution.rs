//! 代码执行服务端口

use crate::kernel::language::LanguageId;
use std::fmt;
use std::io;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    pub source: String,
    pub language: LanguageId,
    pub stdin: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecutionOutput {
    pub stdout: String,
    pub stderr: String,
    /// 被信号终止时为 `None`
    pub exit_status: Option<i32>,
}

impl ExecutionOutput {
    pub fn success(&self) -> bool {
        self.exit_status == Some(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    Unavailable,
    Unsupported(LanguageId),
    Spawn(String),
    Io(String),
    TimedOut(Duration),
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionError::Unavailable => write!(f, "no execution service configured"),
            ExecutionError::Unsupported(lang) => {
                write!(f, "no interpreter configured for {}", lang.display_name())
            }
            ExecutionError::Spawn(msg) => write!(f, "failed to start interpreter: {}", msg),
            ExecutionError::Io(msg) => write!(f, "{}", msg),
            ExecutionError::TimedOut(limit) => {
                write!(f, "execution timed out after {} ms", limit.as_millis())
            }
        }
    }
}

impl std::error::Error for ExecutionError {}

impl From<io::Error> for ExecutionError {
    fn from(e: io::Error) -> Self {
        ExecutionError::Io(e.to_string())
    }
}

pub trait CodeExecutor: Send + Sync {
    fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionOutput, ExecutionError>;
}
