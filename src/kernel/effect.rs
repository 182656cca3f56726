use crate::kernel::services::ports::ExecutionRequest;
use crate::kernel::session::TabId;
use crate::models::{DirHandle, FileHandle};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    PickFiles {
        accept: Vec<String>,
        multiple: bool,
    },
    ReadFiles(Vec<FileHandle>),
    PickDirectory,
    LoadDirectory {
        handle: DirHandle,
        refresh: bool,
    },
    WriteFile {
        tab: TabId,
        handle: FileHandle,
        content: String,
        version: u64,
        silent: bool,
    },
    Download {
        dir: PathBuf,
        file_name: String,
        content: String,
    },
    Execute(ExecutionRequest),
}
