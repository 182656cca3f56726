use crate::kernel::services::ports::{
    BridgeError, BridgeOutcome, ExecutionError, ExecutionOutput, OpenedFile,
};
use crate::kernel::session::TabId;
use crate::models::{DirHandle, FileHandle, FileTree};
use std::path::PathBuf;

#[derive(Debug)]
pub enum AppMessage {
    FilesPicked(BridgeOutcome<Vec<FileHandle>>),
    FilesRead(Vec<OpenedFile>),
    DirectoryPicked(BridgeOutcome<DirHandle>),
    DirectoryLoaded {
        handle: DirHandle,
        result: Result<FileTree, BridgeError>,
        refresh: bool,
    },
    FileWritten {
        tab: TabId,
        version: u64,
        silent: bool,
        result: Result<(), BridgeError>,
    },
    Downloaded {
        name: String,
        result: Result<PathBuf, BridgeError>,
    },
    ExecutionFinished(Result<ExecutionOutput, ExecutionError>),
    AutosaveTick,
}
