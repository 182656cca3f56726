//! 文件选择器端口与桥接层的结果类型

use crate::models::{DirHandle, FileHandle};
use std::fmt;
use std::io;

/// 选择器错误：取消与失败必须可区分
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickError {
    Cancelled,
    Failed(String),
}

impl fmt::Display for PickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickError::Cancelled => write!(f, "selection cancelled"),
            PickError::Failed(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for PickError {}

pub trait FilePicker: Send + Sync {
    /// `accept` 为允许的扩展名（不含点）
    fn pick_files(&self, accept: &[&str], multiple: bool) -> Result<Vec<FileHandle>, PickError>;

    fn pick_directory(&self) -> Result<DirHandle, PickError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    CapabilityMissing,
    NoHandle,
    Io(String),
    Picker(String),
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::CapabilityMissing => write!(f, "file system access is not available"),
            BridgeError::NoHandle => write!(f, "tab has no file handle"),
            BridgeError::Io(msg) => write!(f, "{}", msg),
            BridgeError::Picker(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for BridgeError {}

impl From<io::Error> for BridgeError {
    fn from(e: io::Error) -> Self {
        BridgeError::Io(e.to_string())
    }
}

#[derive(Debug, Clone)]
pub enum BridgeOutcome<T> {
    Done(T),
    Cancelled,
    Failed(BridgeError),
}

impl<T> BridgeOutcome<T> {
    pub fn from_pick(result: Result<T, PickError>) -> Self {
        match result {
            Ok(value) => BridgeOutcome::Done(value),
            Err(PickError::Cancelled) => BridgeOutcome::Cancelled,
            Err(PickError::Failed(msg)) => BridgeOutcome::Failed(BridgeError::Picker(msg)),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, BridgeOutcome::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub file_system_access: bool,
}

impl Capabilities {
    pub fn detect(picker: Option<&dyn FilePicker>) -> Self {
        Self {
            file_system_access: picker.is_some(),
        }
    }
}

/// 单个文件的读取结果；读取失败不影响同批其它文件
#[derive(Debug, Clone)]
pub struct OpenedFile {
    pub handle: FileHandle,
    pub content: Result<String, BridgeError>,
}
