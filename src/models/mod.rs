//! 数据模型层

pub mod file_tree;
pub mod handle;

pub use file_tree::{
    build_file_tree, should_ignore, FileTree, FileTreeError, FileTreeItem, FileTreeRow, NodeId,
    NodeKind, TreeHandle,
};
pub use handle::{DirHandle, FileHandle};
