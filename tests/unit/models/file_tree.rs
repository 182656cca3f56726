use super::*;
use std::fs;
use tempfile::tempdir;

fn accept_all(_: &Path) -> bool {
    true
}

fn accept_js(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("js")
}

#[test]
fn test_new_tree() {
    let tree = FileTree::new_with_root_for_test("test".into(), PathBuf::from("/test"));
    assert!(tree.is_dir(tree.root()));
    assert!(tree.is_expanded(tree.root()));
    assert!(tree.is_empty());
}

#[test]
fn test_insert_child() {
    let mut tree = FileTree::new_with_root_for_test("root".into(), PathBuf::from("/root"));
    let root = tree.root();

    let file_id = tree
        .insert_child(root, "file.txt".into(), NodeKind::File)
        .unwrap();
    let dir_id = tree
        .insert_child(root, "subdir".into(), NodeKind::Dir)
        .unwrap();

    assert!(!tree.is_dir(file_id));
    assert!(tree.is_dir(dir_id));
    assert_eq!(tree.len(), 2);
}

#[test]
fn test_insert_duplicate_name_fails() {
    let mut tree = FileTree::new_with_root_for_test("root".into(), PathBuf::from("/root"));
    let root = tree.root();
    tree.insert_child(root, "a.js".into(), NodeKind::File)
        .unwrap();
    let err = tree
        .insert_child(root, "a.js".into(), NodeKind::File)
        .unwrap_err();
    assert!(matches!(err, FileTreeError::NameExists));
}

#[test]
fn test_insert_under_file_fails() {
    let mut tree = FileTree::new_with_root_for_test("root".into(), PathBuf::from("/root"));
    let root = tree.root();
    let file = tree
        .insert_child(root, "a.js".into(), NodeKind::File)
        .unwrap();
    let err = tree
        .insert_child(file, "b.js".into(), NodeKind::File)
        .unwrap_err();
    assert!(matches!(err, FileTreeError::ParentNotDirectory));
}

#[test]
fn test_full_path_and_handle() {
    let mut tree = FileTree::new_with_root_for_test("root".into(), PathBuf::from("/root"));
    let root = tree.root();
    let dir = tree
        .insert_child(root, "src".into(), NodeKind::Dir)
        .unwrap();
    let file = tree
        .insert_child(dir, "main.js".into(), NodeKind::File)
        .unwrap();

    assert_eq!(tree.full_path(file), PathBuf::from("/root/src/main.js"));
    assert_eq!(
        tree.handle(file),
        Some(TreeHandle::File(FileHandle::new("/root/src/main.js")))
    );
    assert_eq!(
        tree.handle(dir),
        Some(TreeHandle::Dir(DirHandle::new("/root/src")))
    );
    assert_eq!(tree.find_node_by_path(Path::new("/root/src/main.js")), Some(file));
    assert_eq!(tree.find_node_by_path(Path::new("/other/main.js")), None);
}

#[test]
fn test_items_directories_first() {
    let mut tree = FileTree::new_with_root_for_test("root".into(), PathBuf::from("/root"));
    let root = tree.root();
    tree.insert_child(root, "a.js".into(), NodeKind::File)
        .unwrap();
    let lib = tree
        .insert_child(root, "lib".into(), NodeKind::Dir)
        .unwrap();
    tree.insert_child(lib, "util.js".into(), NodeKind::File)
        .unwrap();

    let items = tree.items();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].name, "lib");
    assert_eq!(items[0].kind, NodeKind::Dir);
    assert_eq!(items[0].expanded, Some(false));
    assert_eq!(items[0].children.as_ref().map(|c| c.len()), Some(1));
    assert_eq!(items[1].name, "a.js");
    assert_eq!(items[1].children, None);
    assert_eq!(items[1].expanded, None);
}

#[test]
fn test_toggle_expand_only_for_dirs() {
    let mut tree = FileTree::new_with_root_for_test("root".into(), PathBuf::from("/root"));
    let root = tree.root();
    let dir = tree
        .insert_child(root, "lib".into(), NodeKind::Dir)
        .unwrap();
    let file = tree
        .insert_child(root, "a.js".into(), NodeKind::File)
        .unwrap();

    tree.toggle_expand(dir);
    assert!(tree.is_expanded(dir));
    tree.toggle_expand(dir);
    assert!(!tree.is_expanded(dir));

    tree.toggle_expand(file);
    assert!(!tree.is_expanded(file));
}

#[test]
fn test_flatten_for_view_respects_expansion() {
    let mut tree = FileTree::new_with_root_for_test("root".into(), PathBuf::from("/root"));
    let root = tree.root();
    let dir = tree
        .insert_child(root, "lib".into(), NodeKind::Dir)
        .unwrap();
    tree.insert_child(dir, "util.js".into(), NodeKind::File)
        .unwrap();
    tree.insert_child(root, "a.js".into(), NodeKind::File)
        .unwrap();

    let rows = tree.flatten_for_view();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].name, OsString::from("lib"));

    tree.toggle_expand(dir);
    let rows = tree.flatten_for_view();
    let names: Vec<_> = rows.iter().map(|r| r.name.clone()).collect();
    assert_eq!(
        names,
        vec![
            OsString::from("lib"),
            OsString::from("util.js"),
            OsString::from("a.js")
        ]
    );
    assert_eq!(rows[1].depth, 2);
}

#[test]
fn test_should_ignore() {
    assert!(should_ignore(".DS_Store"));
    assert!(should_ignore(".git"));
    assert!(should_ignore("node_modules"));
    assert!(!should_ignore("src"));
}

#[test]
fn test_build_file_tree_filters_files_keeps_dirs() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("main.js"), "x").unwrap();
    fs::write(dir.path().join("notes.bin"), "x").unwrap();
    fs::create_dir(dir.path().join("empty")).unwrap();
    fs::create_dir(dir.path().join("node_modules")).unwrap();
    fs::create_dir(dir.path().join("lib")).unwrap();
    fs::write(dir.path().join("lib").join("util.js"), "x").unwrap();

    let tree = build_file_tree(dir.path(), &accept_js).unwrap();
    let items = tree.items();
    let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["empty", "lib", "main.js"]);

    let lib = &items[1];
    assert_eq!(lib.expanded, Some(false));
    let children = lib.children.as_ref().unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].name, "util.js");
}

#[test]
fn test_build_file_tree_missing_root_errors() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope");
    assert!(build_file_tree(&missing, &accept_all).is_err());
}

#[test]
fn test_build_file_tree_root_name() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("project");
    fs::create_dir(&root).unwrap();
    let tree = build_file_tree(&root, &accept_all).unwrap();
    assert_eq!(tree.root_name(), "project");
    assert!(tree.is_empty());
}

#[test]
fn test_build_file_tree_fails_when_subdirectory_unreadable() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("locked")).unwrap();
    fs::write(dir.path().join("main.js"), "x").unwrap();
    let locked = dir.path().canonicalize().unwrap().join("locked");

    let list_dir = |path: &Path| {
        if path == locked {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        }
        load_dir_entries(path)
    };
    let err = build_file_tree_with(dir.path(), &accept_all, &list_dir).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    assert!(err.to_string().contains("locked"));
}
