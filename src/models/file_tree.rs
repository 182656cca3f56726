//! 文件树数据模型
//!
//! 打开目录或刷新时整棵重建；展开状态只是本地视图状态。

use super::handle::{DirHandle, FileHandle};
use rustc_hash::FxHashSet;
use slotmap::{new_key_type, SlotMap};
use std::{
    collections::BTreeMap,
    ffi::OsString,
    fmt, io,
    path::{Path, PathBuf},
};

new_key_type! { pub struct NodeId; }

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Dir,
}

#[derive(Debug)]
pub enum FileTreeError {
    ParentNotDirectory,
    NameExists,
    InvalidNodeId,
}

impl fmt::Display for FileTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileTreeError::ParentNotDirectory => write!(f, "parent is not a directory"),
            FileTreeError::NameExists => write!(f, "name already exists in parent"),
            FileTreeError::InvalidNodeId => write!(f, "invalid node id"),
        }
    }
}

impl std::error::Error for FileTreeError {}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    name: OsString,
    parent: Option<NodeId>,
    children: Option<BTreeMap<OsString, NodeId>>,
}

impl Node {
    fn new_file(name: OsString, parent: Option<NodeId>) -> Self {
        Self {
            kind: NodeKind::File,
            name,
            parent,
            children: None,
        }
    }

    fn new_dir(name: OsString, parent: Option<NodeId>) -> Self {
        Self {
            kind: NodeKind::Dir,
            name,
            parent,
            children: Some(BTreeMap::new()),
        }
    }
}

/// 节点对应的平台句柄：文件节点的句柄与"打开文件"使用的句柄同类
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeHandle {
    File(FileHandle),
    Dir(DirHandle),
}

/// 嵌套快照；只有目录有 children 和 expanded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTreeItem {
    pub name: String,
    pub kind: NodeKind,
    pub handle: TreeHandle,
    pub children: Option<Vec<FileTreeItem>>,
    pub expanded: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct FileTree {
    arena: SlotMap<NodeId, Node>,
    root: NodeId,
    expanded: FxHashSet<NodeId>,
    selected: Option<NodeId>,
    absolute_root: PathBuf,
}

impl FileTree {
    fn new_with_root(root_name: OsString, absolute_root: PathBuf) -> Self {
        let mut arena = SlotMap::with_key();
        let root = arena.insert(Node::new_dir(root_name, None));

        let mut expanded = FxHashSet::default();
        expanded.insert(root);

        Self {
            arena,
            root,
            expanded,
            selected: None,
            absolute_root,
        }
    }

    #[cfg(test)]
    pub fn new_with_root_for_test(root_name: OsString, absolute_root: PathBuf) -> Self {
        Self::new_with_root(root_name, absolute_root)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_name(&self) -> String {
        self.arena
            .get(self.root)
            .map(|n| n.name.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    pub fn absolute_root(&self) -> &Path {
        &self.absolute_root
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn set_selected(&mut self, id: Option<NodeId>) {
        self.selected = id;
    }

    pub fn len(&self) -> usize {
        self.arena.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn insert_child(
        &mut self,
        parent: NodeId,
        name: OsString,
        kind: NodeKind,
    ) -> Result<NodeId, FileTreeError> {
        {
            let parent_ro = self.arena.get(parent).ok_or(FileTreeError::InvalidNodeId)?;
            let children_ro = parent_ro
                .children
                .as_ref()
                .ok_or(FileTreeError::ParentNotDirectory)?;
            if children_ro.contains_key(&name) {
                return Err(FileTreeError::NameExists);
            }
        }

        let node = match kind {
            NodeKind::File => Node::new_file(name.clone(), Some(parent)),
            NodeKind::Dir => Node::new_dir(name.clone(), Some(parent)),
        };
        let id = self.arena.insert(node);

        let parent_node = self
            .arena
            .get_mut(parent)
            .ok_or(FileTreeError::InvalidNodeId)?;
        let children = parent_node
            .children
            .as_mut()
            .ok_or(FileTreeError::ParentNotDirectory)?;
        children.insert(name, id);

        Ok(id)
    }

    pub fn full_path(&self, id: NodeId) -> PathBuf {
        let mut path = self.absolute_root.clone();
        let mut current = id;
        let mut components = vec![];

        while let Some(node) = self.arena.get(current) {
            if let Some(parent) = node.parent {
                components.push(node.name.as_os_str());
                current = parent;
            } else {
                break;
            }
        }

        for comp in components.iter().rev() {
            path.push(comp);
        }

        path
    }

    pub fn handle(&self, id: NodeId) -> Option<TreeHandle> {
        let node = self.arena.get(id)?;
        let path = self.full_path(id);
        Some(match node.kind {
            NodeKind::File => TreeHandle::File(FileHandle::new(path)),
            NodeKind::Dir => TreeHandle::Dir(DirHandle::new(path)),
        })
    }

    pub fn toggle_expand(&mut self, id: NodeId) {
        if self.is_dir(id) {
            if self.expanded.contains(&id) {
                self.expanded.remove(&id);
            } else {
                self.expanded.insert(id);
            }
        }
    }

    pub fn is_dir(&self, id: NodeId) -> bool {
        self.arena
            .get(id)
            .map(|n| n.kind == NodeKind::Dir)
            .unwrap_or(false)
    }

    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.expanded.contains(&id)
    }

    /// 目录在前、文件在后，各自按名称排序
    fn ordered_children(&self, id: NodeId) -> Vec<NodeId> {
        let Some(children) = self.arena.get(id).and_then(|n| n.children.as_ref()) else {
            return Vec::new();
        };

        let mut dirs = Vec::new();
        let mut files = Vec::new();
        for &child_id in children.values() {
            match self.arena.get(child_id).map(|c| c.kind) {
                Some(NodeKind::Dir) => dirs.push(child_id),
                Some(NodeKind::File) => files.push(child_id),
                None => {}
            }
        }
        dirs.extend(files);
        dirs
    }

    pub fn items(&self) -> Vec<FileTreeItem> {
        self.ordered_children(self.root)
            .into_iter()
            .filter_map(|id| self.item(id))
            .collect()
    }

    fn item(&self, id: NodeId) -> Option<FileTreeItem> {
        let node = self.arena.get(id)?;
        let handle = self.handle(id)?;
        let (children, expanded) = match node.kind {
            NodeKind::Dir => (
                Some(
                    self.ordered_children(id)
                        .into_iter()
                        .filter_map(|child| self.item(child))
                        .collect(),
                ),
                Some(self.is_expanded(id)),
            ),
            NodeKind::File => (None, None),
        };

        Some(FileTreeItem {
            name: node.name.to_string_lossy().to_string(),
            kind: node.kind,
            handle,
            children,
            expanded,
        })
    }
}

#[derive(Debug, Clone)]
pub struct FileTreeRow {
    pub id: NodeId,
    pub depth: u16,
    pub name: OsString,
    pub is_dir: bool,
    pub is_expanded: bool,
}

impl FileTree {
    pub fn flatten_for_view(&self) -> Vec<FileTreeRow> {
        let mut result = Vec::new();
        let mut stack: Vec<(NodeId, u16)> = vec![(self.root, 0)];

        while let Some((id, depth)) = stack.pop() {
            if id != self.root {
                if let Some(node) = self.arena.get(id) {
                    result.push(FileTreeRow {
                        id,
                        depth,
                        name: node.name.clone(),
                        is_dir: self.is_dir(id),
                        is_expanded: self.is_expanded(id),
                    });
                }
            }

            if self.is_expanded(id) {
                for child_id in self.ordered_children(id).into_iter().rev() {
                    stack.push((child_id, depth + 1));
                }
            }
        }

        result
    }

    pub fn find_node_by_path(&self, path: &Path) -> Option<NodeId> {
        if path == self.absolute_root {
            return Some(self.root);
        }

        let relative = path.strip_prefix(&self.absolute_root).ok()?;
        let mut current = self.root;

        for component in relative.components() {
            let name = component.as_os_str();
            let children = self.arena.get(current)?.children.as_ref()?;
            current = *children.get(name)?;
        }

        Some(current)
    }
}

pub fn should_ignore(name: &str) -> bool {
    matches!(
        name,
        ".DS_Store"
            | ".Spotlight-V100"
            | ".Trashes"
            | ".fseventsd"
            | ".TemporaryItems"
            | "Thumbs.db"
            | "desktop.ini"
            | ".git"
            | "node_modules"
    )
}

fn load_dir_entries(path: &Path) -> io::Result<Vec<(OsString, bool)>> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        let name = entry.file_name();
        if should_ignore(&name.to_string_lossy()) {
            continue;
        }
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        entries.push((name, is_dir));
    }
    Ok(entries)
}

type ListDir<'a> = &'a dyn Fn(&Path) -> io::Result<Vec<(OsString, bool)>>;

fn populate(
    tree: &mut FileTree,
    parent: NodeId,
    dir: &Path,
    accept_file: &dyn Fn(&Path) -> bool,
    list_dir: ListDir<'_>,
) -> io::Result<()> {
    let entries = list_dir(dir)
        .map_err(|e| io::Error::new(e.kind(), format!("{}: {}", dir.display(), e)))?;
    for (name, is_dir) in entries {
        let path = dir.join(&name);
        if is_dir {
            // 目录总是保留，即使其中没有可打开的文件
            let Ok(id) = tree.insert_child(parent, name, NodeKind::Dir) else {
                continue;
            };
            populate(tree, id, &path, accept_file, list_dir)?;
        } else if accept_file(&path) {
            let _ = tree.insert_child(parent, name, NodeKind::File);
        }
    }
    Ok(())
}

/// 递归构建整棵树；任一层目录读取失败都让整次加载失败，错误里带上出错的路径
pub fn build_file_tree(
    root_path: &Path,
    accept_file: &dyn Fn(&Path) -> bool,
) -> io::Result<FileTree> {
    build_file_tree_with(root_path, accept_file, &load_dir_entries)
}

fn build_file_tree_with(
    root_path: &Path,
    accept_file: &dyn Fn(&Path) -> bool,
    list_dir: ListDir<'_>,
) -> io::Result<FileTree> {
    let absolute_root = root_path
        .canonicalize()
        .unwrap_or_else(|_| root_path.to_path_buf());

    let root_name = root_path
        .file_name()
        .or_else(|| root_path.iter().next_back())
        .unwrap_or(root_path.as_os_str())
        .to_os_string();

    let mut tree = FileTree::new_with_root(root_name, absolute_root.clone());
    let root = tree.root;
    populate(&mut tree, root, &absolute_root, accept_file, list_dir)?;

    Ok(tree)
}

#[cfg(test)]
#[path = "../../tests/unit/models/file_tree.rs"]
mod tests;
