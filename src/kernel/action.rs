use std::path::PathBuf;
use std::time::Instant;

use crate::kernel::notifications::NotificationId;
use crate::kernel::search::SearchOptions;
use crate::kernel::services::ports::{
    BridgeError, BridgeOutcome, ExecutionError, ExecutionOutput, OpenedFile,
};
use crate::kernel::session::{TabId, TabPatch};
use crate::models::{DirHandle, FileHandle, FileTree, NodeId};

#[derive(Debug, Clone)]
pub enum Action {
    NewTab {
        content: String,
        name: Option<String>,
    },
    CloseTab(TabId),
    ActivateTab(TabId),
    UpdateTab {
        id: TabId,
        patch: TabPatch,
    },
    OpenFiles,
    OpenFolder,
    RefreshTree,
    OpenTreeNode(NodeId),
    /// 保存活动标签；内存标签走下载
    Save,
    SaveTab {
        id: TabId,
        silent: bool,
    },
    AutosaveTick,
    Find {
        term: String,
    },
    ReplaceAll {
        term: String,
        replacement: String,
    },
    SetSearchOptions(SearchOptions),
    Run {
        stdin: Option<String>,
    },
    DismissNotification(NotificationId),
    ClearNotifications,
    Tick {
        now: Instant,
    },
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
}
