//! 文件选择器适配器
//!
//! - `StaticPicker`: 预先排队的选择结果，队列为空即视为取消
//! - `PromptPicker`: 从行输入源读取路径，先消费预置队列

use crate::kernel::services::ports::{FilePicker, PickError};
use crate::models::{DirHandle, FileHandle};
use std::collections::VecDeque;
use super::lines::LineSource;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

fn accepts(path: &Path, accept: &[&str]) -> bool {
    if accept.is_empty() {
        return true;
    }
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            accept.iter().any(|a| a.eq_ignore_ascii_case(&ext))
        })
        .unwrap_or(false)
}

fn to_file_handles(
    paths: Vec<PathBuf>,
    accept: &[&str],
    multiple: bool,
) -> Result<Vec<FileHandle>, PickError> {
    let mut handles: Vec<FileHandle> = paths
        .iter()
        .filter(|p| accepts(p, accept))
        .map(|p| FileHandle::resolve(p))
        .collect();
    if !multiple {
        handles.truncate(1);
    }
    if handles.is_empty() {
        return Err(PickError::Cancelled);
    }
    Ok(handles)
}

#[derive(Default)]
pub struct StaticPicker {
    files: Mutex<VecDeque<Result<Vec<PathBuf>, PickError>>>,
    dirs: Mutex<VecDeque<Result<PathBuf, PickError>>>,
}

impl StaticPicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_files<I, P>(&self, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let paths = paths.into_iter().map(Into::into).collect();
        self.push_files_result(Ok(paths));
    }

    pub fn push_files_result(&self, result: Result<Vec<PathBuf>, PickError>) {
        self.files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(result);
    }

    pub fn push_directory(&self, path: impl Into<PathBuf>) {
        self.push_directory_result(Ok(path.into()));
    }

    pub fn push_directory_result(&self, result: Result<PathBuf, PickError>) {
        self.dirs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(result);
    }

    pub fn has_pending_files(&self) -> bool {
        !self
            .files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_empty()
    }

    pub fn has_pending_directory(&self) -> bool {
        !self
            .dirs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_empty()
    }
}

impl FilePicker for StaticPicker {
    fn pick_files(&self, accept: &[&str], multiple: bool) -> Result<Vec<FileHandle>, PickError> {
        let next = self
            .files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        match next {
            Some(result) => to_file_handles(result?, accept, multiple),
            None => Err(PickError::Cancelled),
        }
    }

    fn pick_directory(&self) -> Result<DirHandle, PickError> {
        let next = self
            .dirs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        match next {
            Some(result) => {
                let path = result?;
                if !path.is_dir() {
                    return Err(PickError::Failed(format!(
                        "{} is not a directory",
                        path.display()
                    )));
                }
                Ok(DirHandle::resolve(&path))
            }
            None => Err(PickError::Cancelled),
        }
    }
}

pub struct PromptPicker {
    preset: StaticPicker,
    lines: LineSource,
}

impl PromptPicker {
    pub fn new(lines: LineSource) -> Self {
        Self {
            preset: StaticPicker::new(),
            lines,
        }
    }

    pub fn preset(&self) -> &StaticPicker {
        &self.preset
    }

    /// 空行或 EOF 视为取消
    fn prompt(&self, message: &str) -> Result<String, PickError> {
        let mut stdout = io::stdout();
        let _ = write!(stdout, "{}: ", message);
        let _ = stdout.flush();

        let line = self.lines.recv().ok_or(PickError::Cancelled)?;
        let line = line.trim();
        if line.is_empty() {
            return Err(PickError::Cancelled);
        }
        Ok(line.to_string())
    }
}

impl FilePicker for PromptPicker {
    fn pick_files(&self, accept: &[&str], multiple: bool) -> Result<Vec<FileHandle>, PickError> {
        if self.preset.has_pending_files() {
            return self.preset.pick_files(accept, multiple);
        }

        let line = self.prompt("Pilih file (pisahkan dengan spasi, kosong = batal)")?;
        let paths: Vec<PathBuf> = line.split_whitespace().map(PathBuf::from).collect();
        if let Some(missing) = paths.iter().find(|p| !p.is_file()) {
            return Err(PickError::Failed(format!(
                "{} tidak ditemukan",
                missing.display()
            )));
        }
        to_file_handles(paths, accept, multiple)
    }

    fn pick_directory(&self) -> Result<DirHandle, PickError> {
        if self.preset.has_pending_directory() {
            return self.preset.pick_directory();
        }

        let line = self.prompt("Pilih folder (kosong = batal)")?;
        let path = PathBuf::from(line);
        if !path.is_dir() {
            return Err(PickError::Failed(format!(
                "{} bukan folder",
                path.display()
            )));
        }
        Ok(DirHandle::resolve(&path))
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/picker.rs"]
mod tests;
