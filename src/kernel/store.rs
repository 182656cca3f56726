//! 同步 reducer：修改状态、重算启发式、发通知，并把 IO 交给 `Effect`

use std::path::{Path, PathBuf};

use super::detect::detect_language;
use super::diagnostics;
use super::language::ALLOWED_EXTENSIONS;
use super::search::{self, SearchError};
use super::services::ports::{
    BridgeError, BridgeOutcome, ExecutionError, ExecutionOutput, ExecutionRequest, OpenedFile,
};
use super::session::{rename_for_language, CloseOutcome, TabId, TabOrigin, TabPatch};
use super::{Action, AppState, Effect};
use crate::models::{DirHandle, FileHandle, FileTree, NodeId, TreeHandle};

pub const CAPABILITY_GUIDANCE: &str = "Browser Anda tidak mendukung File System Access API. \
Gunakan Chrome 86+, Edge 86+, atau Opera 72+ untuk membuka dan menyimpan file lokal.";

pub struct DispatchResult {
    pub effects: Vec<Effect>,
    pub state_changed: bool,
}

impl DispatchResult {
    fn none() -> Self {
        Self {
            effects: Vec::new(),
            state_changed: false,
        }
    }

    fn changed(state_changed: bool) -> Self {
        Self {
            effects: Vec::new(),
            state_changed,
        }
    }

    fn effects(effects: Vec<Effect>, state_changed: bool) -> Self {
        Self {
            effects,
            state_changed,
        }
    }
}

pub struct Store {
    state: AppState,
}

impl Store {
    pub fn new(state: AppState) -> Self {
        let mut store = Self { state };
        store.refresh_diagnostics();
        store
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) -> DispatchResult {
        let result = self.reduce(action);
        if result.state_changed {
            self.refresh_diagnostics();
        }
        result
    }

    fn reduce(&mut self, action: Action) -> DispatchResult {
        match action {
            Action::NewTab { content, name } => {
                let id = self.state.session.create_tab(content, name);
                tracing::debug!(tab = id.raw(), "tab created");
                let name = self.state.session.tab(id).map(|t| t.name.clone());
                self.state.notifications.info("Tab baru dibuat", name);
                DispatchResult::changed(true)
            }
            Action::CloseTab(id) => self.close_tab(id),
            Action::ActivateTab(id) => {
                let before = self.state.session.active_id();
                let ok = self.state.session.set_active(id);
                DispatchResult::changed(ok && before != id)
            }
            Action::UpdateTab { id, patch } => DispatchResult::changed(self.apply_update(id, patch)),
            Action::OpenFiles => {
                if !self.require_file_system() {
                    return DispatchResult::changed(true);
                }
                DispatchResult::effects(
                    vec![Effect::PickFiles {
                        accept: ALLOWED_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
                        multiple: true,
                    }],
                    false,
                )
            }
            Action::OpenFolder => {
                if !self.require_file_system() {
                    return DispatchResult::changed(true);
                }
                if self.state.explorer.loading {
                    return DispatchResult::none();
                }
                self.state.explorer.loading = true;
                DispatchResult::effects(vec![Effect::PickDirectory], true)
            }
            Action::RefreshTree => self.refresh_tree(),
            Action::OpenTreeNode(node) => self.open_tree_node(node),
            Action::Save => {
                let id = self.state.session.active_id();
                self.save_tab(id, false)
            }
            Action::SaveTab { id, silent } => self.save_tab(id, silent),
            Action::AutosaveTick => self.autosave(),
            Action::Find { term } => self.find(term),
            Action::ReplaceAll { term, replacement } => self.replace_all(term, replacement),
            Action::SetSearchOptions(options) => {
                let changed = self.state.search.options != options;
                self.state.search.options = options;
                DispatchResult::changed(changed)
            }
            Action::Run { stdin } => self.run(stdin),
            Action::DismissNotification(id) => {
                DispatchResult::changed(self.state.notifications.dismiss(id))
            }
            Action::ClearNotifications => {
                let changed = !self.state.notifications.is_empty();
                self.state.notifications.clear();
                DispatchResult::changed(changed)
            }
            Action::Tick { now } => DispatchResult::changed(self.state.notifications.tick(now)),
            Action::FilesPicked(outcome) => self.files_picked(outcome),
            Action::FilesRead(files) => self.files_read(files),
            Action::DirectoryPicked(outcome) => self.directory_picked(outcome),
            Action::DirectoryLoaded {
                handle,
                result,
                refresh,
            } => self.directory_loaded(handle, result, refresh),
            Action::FileWritten {
                tab,
                version,
                silent,
                result,
            } => self.file_written(tab, version, silent, result),
            Action::Downloaded { name, result } => self.downloaded(name, result),
            Action::ExecutionFinished(result) => self.execution_finished(result),
        }
    }

    fn require_file_system(&mut self) -> bool {
        if self.state.capabilities.file_system_access {
            return true;
        }
        self.state.notifications.error(
            "Akses file tidak didukung",
            Some(CAPABILITY_GUIDANCE.to_string()),
        );
        false
    }

    fn refresh_diagnostics(&mut self) {
        let Some(tab) = self.state.session.active_tab() else {
            self.state.diagnostics.clear();
            self.state.diagnostics_key = None;
            return;
        };
        let key = (tab.id, tab.edit_version, tab.language);
        if self.state.diagnostics_key == Some(key) {
            return;
        }
        self.state.diagnostics = diagnostics::check(&tab.content, tab.language);
        self.state.diagnostics_key = Some(key);
    }

    /// 内存标签在内容变化时重新识别语言并同步扩展名。
    /// 文件标签的名字必须与磁盘上的文件名一致，语言只随扩展名走，这里不做识别。
    fn apply_update(&mut self, id: TabId, mut patch: TabPatch) -> bool {
        let Some(tab) = self.state.session.tab(id) else {
            return false;
        };
        if tab.origin == TabOrigin::Memory && patch.language.is_none() {
            if let Some(content) = patch.content.as_deref() {
                if let Some(language) = detect_language(content) {
                    if language != tab.language {
                        patch.language = Some(language);
                        if patch.name.is_none() {
                            patch.name = Some(rename_for_language(&tab.name, language));
                        }
                    }
                }
            }
        }
        self.state.session.update_tab(id, patch)
    }

    fn close_tab(&mut self, id: TabId) -> DispatchResult {
        let name = self.state.session.tab(id).map(|t| t.name.clone());
        match self.state.session.close_tab(id) {
            CloseOutcome::Closed { activated } => {
                tracing::debug!(
                    tab = id.raw(),
                    activated = activated.map(TabId::raw),
                    "tab closed"
                );
                self.state.notifications.info("Tab ditutup", name);
                DispatchResult::changed(true)
            }
            CloseOutcome::LastTab => {
                self.state.notifications.info(
                    "Tidak dapat menutup tab terakhir",
                    Some("Minimal harus ada satu tab yang terbuka".to_string()),
                );
                DispatchResult::changed(true)
            }
            CloseOutcome::NotFound => DispatchResult::none(),
        }
    }

    fn notify_already_open(&mut self, id: TabId, handle: &FileHandle) {
        self.state.session.set_active(id);
        self.state.notifications.info(
            "File sudah dibuka",
            Some(format!("{} sudah dibuka", handle.name())),
        );
    }

    /// 打开的文件位于当前文件夹内时，在树中选中它
    fn reveal_in_tree(&mut self, path: &Path) {
        if let Some(tree) = self.state.explorer.tree.as_mut() {
            if let Some(node) = tree.find_node_by_path(path) {
                tree.set_selected(Some(node));
            }
        }
    }

    fn files_picked(&mut self, outcome: BridgeOutcome<Vec<FileHandle>>) -> DispatchResult {
        let handles = match outcome {
            BridgeOutcome::Done(handles) => handles,
            BridgeOutcome::Cancelled => return DispatchResult::none(),
            BridgeOutcome::Failed(e) => {
                self.state
                    .notifications
                    .error("Gagal membuka file", Some(e.to_string()));
                return DispatchResult::changed(true);
            }
        };

        let mut changed = false;
        let mut to_read: Vec<FileHandle> = Vec::new();
        for handle in handles {
            if let Some(id) = self.state.session.find_by_handle(&handle) {
                self.notify_already_open(id, &handle);
                changed = true;
            } else if !to_read.contains(&handle) {
                to_read.push(handle);
            }
        }

        if to_read.is_empty() {
            return DispatchResult::changed(changed);
        }
        DispatchResult::effects(vec![Effect::ReadFiles(to_read)], changed)
    }

    fn files_read(&mut self, files: Vec<OpenedFile>) -> DispatchResult {
        let mut changed = false;
        for file in files {
            let name = file.handle.name();
            match file.content {
                Ok(content) => {
                    self.reveal_in_tree(file.handle.path());
                    if let Some(id) = self.state.session.find_by_handle(&file.handle) {
                        self.notify_already_open(id, &file.handle);
                    } else {
                        let id = self.state.session.open_file_tab(file.handle, content);
                        tracing::info!(tab = id.raw(), file = %name, "file opened");
                        self.state.notifications.success("File dibuka", Some(name));
                    }
                }
                Err(e) => {
                    tracing::warn!(file = %name, error = %e, "read failed");
                    self.state
                        .notifications
                        .error("Gagal membaca file", Some(format!("{}: {}", name, e)));
                }
            }
            changed = true;
        }
        DispatchResult::changed(changed)
    }

    fn directory_picked(&mut self, outcome: BridgeOutcome<DirHandle>) -> DispatchResult {
        match outcome {
            BridgeOutcome::Done(handle) => DispatchResult::effects(
                vec![Effect::LoadDirectory {
                    handle,
                    refresh: false,
                }],
                false,
            ),
            BridgeOutcome::Cancelled => {
                self.state.explorer.loading = false;
                DispatchResult::changed(true)
            }
            BridgeOutcome::Failed(e) => {
                self.state.explorer.loading = false;
                self.state
                    .notifications
                    .error("Gagal membuka folder", Some(e.to_string()));
                DispatchResult::changed(true)
            }
        }
    }

    fn directory_loaded(
        &mut self,
        handle: DirHandle,
        result: Result<FileTree, BridgeError>,
        refresh: bool,
    ) -> DispatchResult {
        self.state.explorer.loading = false;
        let name = handle.name();
        match result {
            Ok(tree) => {
                tracing::info!(root = %name, nodes = tree.len(), refresh, "directory loaded");
                self.state.explorer.root = Some(handle);
                self.state.explorer.root_name = Some(name.clone());
                self.state.explorer.tree = Some(tree);
                let title = if refresh {
                    "Folder diperbarui"
                } else {
                    "Folder dibuka"
                };
                self.state.notifications.success(title, Some(name));
            }
            Err(e) => {
                tracing::warn!(root = %name, error = %e, "directory load failed");
                self.state
                    .notifications
                    .error("Gagal memuat folder", Some(e.to_string()));
            }
        }
        DispatchResult::changed(true)
    }

    fn refresh_tree(&mut self) -> DispatchResult {
        if !self.require_file_system() {
            return DispatchResult::changed(true);
        }
        if self.state.explorer.loading {
            return DispatchResult::none();
        }
        let Some(handle) = self.state.explorer.root.clone() else {
            self.state
                .notifications
                .info("Belum ada folder yang dibuka", None);
            return DispatchResult::changed(true);
        };
        self.state.explorer.loading = true;
        DispatchResult::effects(
            vec![Effect::LoadDirectory {
                handle,
                refresh: true,
            }],
            true,
        )
    }

    fn open_tree_node(&mut self, node: NodeId) -> DispatchResult {
        let Some(tree) = self.state.explorer.tree.as_mut() else {
            return DispatchResult::none();
        };
        match tree.handle(node) {
            Some(TreeHandle::Dir(_)) => {
                tree.toggle_expand(node);
                DispatchResult::changed(true)
            }
            Some(TreeHandle::File(handle)) => {
                tree.set_selected(Some(node));
                if let Some(id) = self.state.session.find_by_handle(&handle) {
                    self.notify_already_open(id, &handle);
                    return DispatchResult::changed(true);
                }
                DispatchResult::effects(vec![Effect::ReadFiles(vec![handle])], true)
            }
            None => DispatchResult::none(),
        }
    }

    fn save_tab(&mut self, id: TabId, silent: bool) -> DispatchResult {
        let Some(tab) = self.state.session.tab(id) else {
            return DispatchResult::none();
        };

        if let Some(handle) = tab.handle() {
            let effect = Effect::WriteFile {
                tab: id,
                handle: handle.clone(),
                content: tab.content.clone(),
                version: tab.edit_version,
                silent,
            };
            self.state.begin_write(id);
            return DispatchResult::effects(vec![effect], true);
        }

        if silent {
            return DispatchResult::none();
        }

        let file_name = rename_for_language(&tab.name, tab.language);
        let content = tab.content.clone();
        let Some(dir) = self.state.config.download_dir.clone() else {
            self.state.notifications.error(
                "Gagal mengunduh file",
                Some("Folder unduhan tidak tersedia".to_string()),
            );
            return DispatchResult::changed(true);
        };
        DispatchResult::effects(
            vec![Effect::Download {
                dir,
                file_name,
                content,
            }],
            false,
        )
    }

    fn autosave(&mut self) -> DispatchResult {
        if !self.state.config.autosave_enabled {
            return DispatchResult::none();
        }

        let candidates: Vec<TabId> = if self.state.config.autosave_all_tabs {
            self.state.session.dirty_file_tabs()
        } else {
            self.state
                .session
                .active_tab()
                .filter(|t| !t.saved && t.is_from_file_system())
                .map(|t| vec![t.id])
                .unwrap_or_default()
        };

        let mut effects = Vec::new();
        for id in candidates {
            if self.state.is_write_pending(id) {
                continue;
            }
            effects.extend(self.save_tab(id, true).effects);
        }
        if !effects.is_empty() {
            tracing::debug!(count = effects.len(), "autosave");
        }
        let changed = !effects.is_empty();
        DispatchResult::effects(effects, changed)
    }

    fn file_written(
        &mut self,
        tab: TabId,
        version: u64,
        silent: bool,
        result: Result<(), BridgeError>,
    ) -> DispatchResult {
        self.state.finish_write(tab);
        let name = self
            .state
            .session
            .tab(tab)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| "file".to_string());

        match result {
            Ok(()) => {
                let current = self.state.session.mark_saved(tab, version);
                tracing::info!(tab = tab.raw(), version, current, silent, "file written");
                if !silent {
                    self.state.notifications.success("File disimpan", Some(name));
                }
            }
            Err(e) => {
                tracing::warn!(tab = tab.raw(), error = %e, "write failed");
                self.state
                    .notifications
                    .error("Gagal menyimpan file", Some(format!("{}: {}", name, e)));
            }
        }
        DispatchResult::changed(true)
    }

    fn downloaded(&mut self, name: String, result: Result<PathBuf, BridgeError>) -> DispatchResult {
        match result {
            Ok(path) => {
                tracing::info!(path = %path.display(), "downloaded");
                self.state
                    .notifications
                    .success("File diunduh", Some(path.display().to_string()));
            }
            Err(e) => {
                self.state
                    .notifications
                    .error("Gagal mengunduh file", Some(format!("{}: {}", name, e)));
            }
        }
        DispatchResult::changed(true)
    }

    fn search_error(&mut self, e: SearchError) -> DispatchResult {
        match e {
            SearchError::EmptyPattern => self
                .state
                .notifications
                .error("Kata pencarian kosong", None),
            SearchError::InvalidRegex(e) => self
                .state
                .notifications
                .error("Pola pencarian tidak valid", Some(e.to_string())),
        };
        DispatchResult::changed(true)
    }

    fn find(&mut self, term: String) -> DispatchResult {
        let options = self.state.search.options;
        let Some(tab) = self.state.session.active_tab() else {
            return DispatchResult::none();
        };
        let matches = match search::find_matches(&tab.content, &term, options) {
            Ok(matches) => matches,
            Err(e) => return self.search_error(e),
        };

        if matches.is_empty() {
            self.state
                .notifications
                .info(format!("\"{}\" tidak ditemukan", term), None);
        } else {
            self.state.notifications.info(
                format!("Ditemukan {} kecocokan", matches.len()),
                Some(term.clone()),
            );
        }
        self.state.search.matches = matches;
        self.state.search.last_query = Some(term);
        DispatchResult::changed(true)
    }

    fn replace_all(&mut self, term: String, replacement: String) -> DispatchResult {
        let options = self.state.search.options;
        let Some(tab) = self.state.session.active_tab() else {
            return DispatchResult::none();
        };
        let id = tab.id;
        let (content, count) =
            match search::replace_all(&tab.content, &term, &replacement, options) {
                Ok(result) => result,
                Err(e) => return self.search_error(e),
            };

        if count == 0 {
            self.state
                .notifications
                .info(format!("\"{}\" tidak ditemukan", term), None);
            return DispatchResult::changed(true);
        }

        self.apply_update(id, TabPatch::content(content));
        self.state.search.matches.clear();
        self.state.search.last_query = Some(term);
        self.state
            .notifications
            .success(format!("{} kecocokan diganti", count), None);
        DispatchResult::changed(true)
    }

    fn run(&mut self, stdin: Option<String>) -> DispatchResult {
        if self.state.output.running {
            self.state.notifications.info("Kode sedang berjalan", None);
            return DispatchResult::changed(true);
        }
        let Some(tab) = self.state.session.active_tab() else {
            return DispatchResult::none();
        };
        let request = ExecutionRequest {
            source: tab.content.clone(),
            language: tab.language,
            stdin,
        };
        self.state.output.running = true;
        self.state.output.error = None;
        DispatchResult::effects(vec![Effect::Execute(request)], true)
    }

    fn execution_finished(
        &mut self,
        result: Result<ExecutionOutput, ExecutionError>,
    ) -> DispatchResult {
        self.state.output.running = false;
        match result {
            Ok(output) => {
                if output.success() {
                    self.state
                        .notifications
                        .success("Kode selesai dijalankan", None);
                } else {
                    let code = output
                        .exit_status
                        .map(|c| c.to_string())
                        .unwrap_or_else(|| "-".to_string());
                    self.state
                        .notifications
                        .warning(format!("Program keluar dengan kode {}", code), None);
                }
                self.state.output.error = None;
                self.state.output.last = Some(output);
            }
            Err(e) => {
                tracing::warn!(error = %e, "execution failed");
                self.state.output.error = Some(e.to_string());
                self.state
                    .notifications
                    .error("Gagal menjalankan kode", Some(e.to_string()));
            }
        }
        DispatchResult::changed(true)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/store.rs"]
mod tests;
