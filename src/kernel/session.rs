//! 标签页会话
//!
//! 所有标签页状态只能通过 `SessionStore` 修改；列表永远不为空。

use super::language::LanguageId;
use crate::models::FileHandle;
use std::path::Path;

pub const DEFAULT_TAB_CONTENT: &str =
    "// Selamat datang di playground!\nconsole.log(\"Halo, dunia!\");\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabId(u64);

impl TabId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabOrigin {
    Memory,
    FileSystem(FileHandle),
}

#[derive(Debug, Clone)]
pub struct Tab {
    pub id: TabId,
    pub name: String,
    pub content: String,
    pub language: LanguageId,
    pub saved: bool,
    pub origin: TabOrigin,
    /// 每次修改递增；写回完成时用来判断内容是否已变
    pub edit_version: u64,
}

impl Tab {
    pub fn handle(&self) -> Option<&FileHandle> {
        match &self.origin {
            TabOrigin::FileSystem(handle) => Some(handle),
            TabOrigin::Memory => None,
        }
    }

    pub fn is_from_file_system(&self) -> bool {
        matches!(self.origin, TabOrigin::FileSystem(_))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabPatch {
    pub name: Option<String>,
    pub content: Option<String>,
    pub language: Option<LanguageId>,
}

impl TabPatch {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.content.is_none() && self.language.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// `activated` 是关闭活动标签后新激活的标签
    Closed { activated: Option<TabId> },
    LastTab,
    NotFound,
}

#[derive(Debug)]
pub struct SessionStore {
    tabs: Vec<Tab>,
    active: TabId,
    next_id: u64,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        let id = TabId(1);
        let name = "untitled1.js".to_string();
        Self {
            tabs: vec![Tab {
                id,
                language: LanguageId::from_name(&name),
                name,
                content: DEFAULT_TAB_CONTENT.to_string(),
                saved: true,
                origin: TabOrigin::Memory,
                edit_version: 0,
            }],
            active: id,
            next_id: 2,
        }
    }

    fn alloc_id(&mut self) -> TabId {
        let id = TabId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn tab(&self, id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    fn tab_mut(&mut self, id: TabId) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.id == id)
    }

    /// 名称缺省为 `untitled{N}.js`
    pub fn create_tab(&mut self, content: impl Into<String>, name: Option<String>) -> TabId {
        let id = self.alloc_id();
        let name = name.unwrap_or_else(|| format!("untitled{}.js", id.0));
        self.tabs.push(Tab {
            id,
            language: LanguageId::from_name(&name),
            name,
            content: content.into(),
            saved: true,
            origin: TabOrigin::Memory,
            edit_version: 0,
        });
        self.active = id;
        id
    }

    /// 内容与磁盘一致，所以直接是已保存状态
    pub fn open_file_tab(&mut self, handle: FileHandle, content: impl Into<String>) -> TabId {
        let id = self.alloc_id();
        let name = handle.name();
        let language = LanguageId::from_path(handle.path()).unwrap_or(LanguageId::PlainText);
        self.tabs.push(Tab {
            id,
            name,
            content: content.into(),
            language,
            saved: true,
            origin: TabOrigin::FileSystem(handle),
            edit_version: 0,
        });
        self.active = id;
        id
    }

    /// 未知 id 静默忽略并返回 false
    pub fn update_tab(&mut self, id: TabId, patch: TabPatch) -> bool {
        let Some(tab) = self.tab_mut(id) else {
            return false;
        };
        if let Some(name) = patch.name {
            tab.name = name;
        }
        if let Some(content) = patch.content {
            tab.content = content;
        }
        if let Some(language) = patch.language {
            tab.language = language;
        }
        tab.saved = false;
        tab.edit_version = tab.edit_version.wrapping_add(1);
        true
    }

    pub fn close_tab(&mut self, id: TabId) -> CloseOutcome {
        let Some(index) = self.tabs.iter().position(|t| t.id == id) else {
            return CloseOutcome::NotFound;
        };
        if self.tabs.len() <= 1 {
            return CloseOutcome::LastTab;
        }

        self.tabs.remove(index);
        if self.active != id {
            return CloseOutcome::Closed { activated: None };
        }

        // 滑入同一位置的标签优先，超出末尾时取最后一个
        let next = index.min(self.tabs.len() - 1);
        let activated = self.tabs[next].id;
        self.active = activated;
        CloseOutcome::Closed {
            activated: Some(activated),
        }
    }

    /// 活动 id 失效时退回第一个标签
    pub fn active_tab(&self) -> Option<&Tab> {
        self.tab(self.active).or_else(|| self.tabs.first())
    }

    pub fn active_id(&self) -> TabId {
        self.active_tab().map(|t| t.id).unwrap_or(self.active)
    }

    pub fn set_active(&mut self, id: TabId) -> bool {
        if self.tab(id).is_none() {
            return false;
        }
        self.active = id;
        true
    }

    pub fn find_by_handle(&self, handle: &FileHandle) -> Option<TabId> {
        self.tabs
            .iter()
            .find(|t| t.handle() == Some(handle))
            .map(|t| t.id)
    }

    /// 写回完成后调用；期间又有修改则保持未保存
    pub fn mark_saved(&mut self, id: TabId, version: u64) -> bool {
        match self.tab_mut(id) {
            Some(tab) if tab.edit_version == version => {
                tab.saved = true;
                true
            }
            _ => false,
        }
    }

    pub fn dirty_file_tabs(&self) -> Vec<TabId> {
        self.tabs
            .iter()
            .filter(|t| !t.saved && t.is_from_file_system())
            .map(|t| t.id)
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn force_active_for_test(&mut self, id: TabId) {
        self.active = id;
    }
}

/// 去掉可识别的扩展名后追加目标语言的规范扩展名
pub fn rename_for_language(name: &str, language: LanguageId) -> String {
    let path = Path::new(name);
    let stem = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if LanguageId::from_extension(ext).is_some() => {
            &name[..name.len() - ext.len() - 1]
        }
        _ => name,
    };
    format!("{}.{}", stem, language.canonical_extension())
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/session.rs"]
mod tests;
