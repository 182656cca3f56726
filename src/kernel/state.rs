use super::diagnostics::CodeError;
use super::language::LanguageId;
use super::notifications::NotificationCenter;
use super::search::{Match, SearchOptions};
use super::services::ports::{Capabilities, ExecutionOutput, PlaygroundConfig};
use super::session::{SessionStore, TabId};
use crate::models::{DirHandle, FileTree};
use rustc_hash::FxHashMap;

#[derive(Debug, Default)]
pub struct ExplorerState {
    pub root: Option<DirHandle>,
    pub root_name: Option<String>,
    pub tree: Option<FileTree>,
    /// 加载期间忽略重复的"打开文件夹"
    pub loading: bool,
}

#[derive(Debug, Default)]
pub struct SearchState {
    pub options: SearchOptions,
    pub last_query: Option<String>,
    pub matches: Vec<Match>,
}

#[derive(Debug, Default)]
pub struct OutputState {
    pub running: bool,
    pub last: Option<ExecutionOutput>,
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct AppState {
    pub session: SessionStore,
    pub notifications: NotificationCenter,
    pub diagnostics: Vec<CodeError>,
    /// 诊断对应的 (标签, 版本, 语言)，相同时不重算
    pub(crate) diagnostics_key: Option<(TabId, u64, LanguageId)>,
    pub explorer: ExplorerState,
    pub search: SearchState,
    pub output: OutputState,
    pub capabilities: Capabilities,
    pub config: PlaygroundConfig,
    /// 正在写回的标签及其未完成的写入数
    pub pending_writes: FxHashMap<TabId, usize>,
}

impl AppState {
    pub fn new(config: PlaygroundConfig, capabilities: Capabilities) -> Self {
        Self {
            session: SessionStore::new(),
            notifications: NotificationCenter::new(config.notification_duration()),
            diagnostics: Vec::new(),
            diagnostics_key: None,
            explorer: ExplorerState::default(),
            search: SearchState::default(),
            output: OutputState::default(),
            capabilities,
            config,
            pending_writes: FxHashMap::default(),
        }
    }

    pub fn is_write_pending(&self, tab: TabId) -> bool {
        self.pending_writes.get(&tab).is_some_and(|n| *n > 0)
    }

    pub(crate) fn begin_write(&mut self, tab: TabId) {
        *self.pending_writes.entry(tab).or_insert(0) += 1;
    }

    pub(crate) fn finish_write(&mut self, tab: TabId) {
        if let Some(n) = self.pending_writes.get_mut(&tab) {
            *n = n.saturating_sub(1);
            if *n == 0 {
                self.pending_writes.remove(&tab);
            }
        }
    }
}
