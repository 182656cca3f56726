//! 句柄：会话保留的磁盘位置
//!
//! 文件句柄由 Tab 独占持有，桥接层只借用它完成读写。

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileHandle {
    path: PathBuf,
}

impl FileHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 规范化路径，同一文件的两次选择得到相等的句柄
    pub fn resolve(path: &Path) -> Self {
        let path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> String {
        display_name(&self.path)
    }

    pub fn extension(&self) -> Option<&str> {
        self.path.extension().and_then(|s| s.to_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirHandle {
    path: PathBuf,
}

impl DirHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn resolve(path: &Path) -> Self {
        let path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> String {
        display_name(&self.path)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .or_else(|| path.iter().next_back())
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}
