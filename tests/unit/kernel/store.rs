use super::*;
use crate::kernel::diagnostics::{DiagnosticSeverity, MISSING_PHP_TAG, MISSING_SEMICOLON};
use crate::kernel::language::LanguageId;
use crate::kernel::notifications::NotificationKind;
use crate::kernel::search::SearchOptions;
use crate::kernel::services::ports::{Capabilities, PlaygroundConfig};
use crate::models::NodeKind;
use std::ffi::OsString;
use std::time::{Duration, Instant};

fn config() -> PlaygroundConfig {
    PlaygroundConfig {
        download_dir: Some(PathBuf::from("/tmp/codeplay-downloads")),
        ..PlaygroundConfig::default()
    }
}

fn store_with(file_system_access: bool, config: PlaygroundConfig) -> Store {
    Store::new(AppState::new(
        config,
        Capabilities { file_system_access },
    ))
}

fn store() -> Store {
    store_with(true, config())
}

fn open_file(store: &mut Store, path: &str, content: &str) -> TabId {
    let result = store.dispatch(Action::FilesRead(vec![OpenedFile {
        handle: FileHandle::new(path),
        content: Ok(content.to_string()),
    }]));
    assert!(result.state_changed);
    store.state().session.active_id()
}

fn edit(store: &mut Store, id: TabId, content: &str) {
    store.dispatch(Action::UpdateTab {
        id,
        patch: TabPatch::content(content),
    });
}

fn active_content(store: &Store) -> String {
    store
        .state()
        .session
        .active_tab()
        .map(|t| t.content.clone())
        .unwrap_or_default()
}

#[test]
fn test_closing_last_tab_is_refused_with_one_info() {
    let mut store = store();
    let only = store.state().session.active_id();

    let result = store.dispatch(Action::CloseTab(only));

    assert!(result.effects.is_empty());
    assert_eq!(store.state().session.len(), 1);
    let items = store.state().notifications.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].kind, NotificationKind::Info);
}

#[test]
fn test_creating_and_closing_tabs_notify() {
    let mut store = store();
    store.dispatch(Action::NewTab {
        content: String::new(),
        name: Some("halo.py".to_string()),
    });
    let created = &store.state().notifications.items()[0];
    assert_eq!(created.kind, NotificationKind::Info);
    assert_eq!(created.title, "Tab baru dibuat");
    assert_eq!(created.message.as_deref(), Some("halo.py"));

    let id = store.state().session.active_id();
    store.dispatch(Action::CloseTab(id));
    let closed = &store.state().notifications.items()[0];
    assert_eq!(closed.title, "Tab ditutup");
    assert_eq!(closed.message.as_deref(), Some("halo.py"));
    assert_eq!(store.state().notifications.len(), 2);
}

#[test]
fn test_closing_non_active_tab_keeps_active() {
    let mut store = store();
    let first = store.state().session.active_id();
    store.dispatch(Action::NewTab {
        content: String::new(),
        name: None,
    });
    store.dispatch(Action::NewTab {
        content: String::new(),
        name: None,
    });
    let active = store.state().session.active_id();

    store.dispatch(Action::CloseTab(first));

    assert_eq!(store.state().session.len(), 2);
    assert_eq!(store.state().session.active_id(), active);
}

#[test]
fn test_closing_active_tab_activates_neighbor() {
    let mut store = store();
    let first = store.state().session.active_id();
    store.dispatch(Action::NewTab {
        content: String::new(),
        name: None,
    });
    let second = store.state().session.active_id();
    store.dispatch(Action::NewTab {
        content: String::new(),
        name: None,
    });
    let third = store.state().session.active_id();
    store.dispatch(Action::ActivateTab(second));

    store.dispatch(Action::CloseTab(second));

    assert_eq!(store.state().session.active_id(), third);
    store.dispatch(Action::CloseTab(third));
    assert_eq!(store.state().session.active_id(), first);
}

#[test]
fn test_open_files_requests_picker() {
    let mut store = store();
    let result = store.dispatch(Action::OpenFiles);

    assert_eq!(result.effects.len(), 1);
    match &result.effects[0] {
        Effect::PickFiles { accept, multiple } => {
            assert!(*multiple);
            assert!(accept.iter().any(|e| e == "js"));
            assert!(accept.iter().any(|e| e == "php"));
        }
        other => panic!("unexpected effect: {other:?}"),
    }
}

#[test]
fn test_missing_capability_emits_guidance_without_effects() {
    let mut store = store_with(false, config());

    for action in [Action::OpenFiles, Action::OpenFolder, Action::RefreshTree] {
        let result = store.dispatch(action);
        assert!(result.effects.is_empty());
    }

    let items = store.state().notifications.items();
    assert_eq!(items.len(), 3);
    assert!(items.iter().all(|n| n.kind == NotificationKind::Error
        && n.message.as_deref() == Some(CAPABILITY_GUIDANCE)));
    assert!(!store.state().explorer.loading);
}

#[test]
fn test_opening_same_file_twice_activates_existing_tab() {
    let mut store = store();
    let handle = FileHandle::new("/work/app.js");

    let result = store.dispatch(Action::FilesPicked(BridgeOutcome::Done(vec![
        handle.clone(),
    ])));
    assert_eq!(result.effects, vec![Effect::ReadFiles(vec![handle.clone()])]);
    let file_tab = open_file(&mut store, "/work/app.js", "let a = 1;\n");
    assert_eq!(store.state().session.len(), 2);

    store.dispatch(Action::NewTab {
        content: String::new(),
        name: None,
    });
    let before = store.state().notifications.len();

    let result = store.dispatch(Action::FilesPicked(BridgeOutcome::Done(vec![handle])));

    assert!(result.effects.is_empty());
    assert_eq!(store.state().session.len(), 3);
    assert_eq!(store.state().session.active_id(), file_tab);
    let items = store.state().notifications.items();
    assert_eq!(items.len(), before + 1);
    assert_eq!(items[0].kind, NotificationKind::Info);
    assert!(items[0]
        .message
        .as_deref()
        .is_some_and(|m| m.contains("sudah dibuka")));
}

#[test]
fn test_opened_file_tab_is_saved_with_extension_language() {
    let mut store = store();
    let id = open_file(&mut store, "/work/main.py", "print(1)\n");

    let tab = store.state().session.tab(id).unwrap();
    assert!(tab.saved);
    assert!(tab.is_from_file_system());
    assert_eq!(tab.language, LanguageId::Python);
    assert_eq!(tab.name, "main.py");
}

#[test]
fn test_pick_cancel_is_silent() {
    let mut store = store();
    let result = store.dispatch(Action::FilesPicked(BridgeOutcome::Cancelled));

    assert!(!result.state_changed);
    assert!(result.effects.is_empty());
    assert!(store.state().notifications.is_empty());
}

#[test]
fn test_pick_and_read_failures_notify_errors() {
    let mut store = store();
    store.dispatch(Action::FilesPicked(BridgeOutcome::Failed(
        BridgeError::Picker("boom".to_string()),
    )));
    store.dispatch(Action::FilesRead(vec![OpenedFile {
        handle: FileHandle::new("/work/missing.js"),
        content: Err(BridgeError::Io("not found".to_string())),
    }]));

    assert_eq!(store.state().session.len(), 1);
    let items = store.state().notifications.items();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|n| n.kind == NotificationKind::Error));
    assert!(items[0]
        .message
        .as_deref()
        .is_some_and(|m| m.contains("missing.js")));
}

#[test]
fn test_missing_semicolon_reported_for_active_tab() {
    let mut store = store();
    let id = store.state().session.active_id();

    edit(&mut store, id, "console.log('hi')");

    let diagnostics = &store.state().diagnostics;
    assert!(diagnostics.iter().any(|d| d.line == 1
        && d.message == MISSING_SEMICOLON
        && d.severity == DiagnosticSeverity::Warning));
}

#[test]
fn test_php_without_opening_tag_reports_one_error() {
    let mut store = store();
    store.dispatch(Action::NewTab {
        content: "echo 1;".to_string(),
        name: Some("index.php".to_string()),
    });

    let tag_errors: Vec<_> = store
        .state()
        .diagnostics
        .iter()
        .filter(|d| d.message == MISSING_PHP_TAG)
        .collect();
    assert_eq!(tag_errors.len(), 1);
    assert_eq!(tag_errors[0].line, 1);
    assert_eq!(tag_errors[0].severity, DiagnosticSeverity::Error);
}

#[test]
fn test_diagnostics_follow_active_tab() {
    let mut store = store();
    let first = store.state().session.active_id();
    edit(&mut store, first, "console.log('hi')");
    assert!(!store.state().diagnostics.is_empty());

    store.dispatch(Action::NewTab {
        content: String::new(),
        name: None,
    });
    assert!(store.state().diagnostics.is_empty());

    store.dispatch(Action::ActivateTab(first));
    assert!(!store.state().diagnostics.is_empty());
}

#[test]
fn test_memory_tab_language_follows_content() {
    let mut store = store();
    let id = store.state().session.active_id();

    edit(&mut store, id, "def main():\n    print('hi')\n");

    let tab = store.state().session.tab(id).unwrap();
    assert_eq!(tab.language, LanguageId::Python);
    assert_eq!(tab.name, "untitled1.py");
}

#[test]
fn test_file_tab_keeps_language_and_name() {
    let mut store = store();
    let id = open_file(&mut store, "/work/notes.txt", "hello");

    edit(&mut store, id, "def main():\n    print('hi')\n");

    let tab = store.state().session.tab(id).unwrap();
    assert_eq!(tab.language, LanguageId::PlainText);
    assert_eq!(tab.name, "notes.txt");
    assert!(!tab.saved);
}

#[test]
fn test_save_file_tab_writes_and_marks_saved() {
    let mut store = store();
    let id = open_file(&mut store, "/work/app.js", "let a = 1;\n");
    edit(&mut store, id, "let a = 2;\n");
    let version = store.state().session.tab(id).unwrap().edit_version;

    let result = store.dispatch(Action::Save);

    assert_eq!(
        result.effects,
        vec![Effect::WriteFile {
            tab: id,
            handle: FileHandle::new("/work/app.js"),
            content: "let a = 2;\n".to_string(),
            version,
            silent: false,
        }]
    );
    assert!(store.state().is_write_pending(id));

    store.dispatch(Action::FileWritten {
        tab: id,
        version,
        silent: false,
        result: Ok(()),
    });

    assert!(store.state().session.tab(id).unwrap().saved);
    assert!(!store.state().is_write_pending(id));
    let latest = &store.state().notifications.items()[0];
    assert_eq!(latest.kind, NotificationKind::Success);
    assert_eq!(latest.message.as_deref(), Some("app.js"));
}

#[test]
fn test_stale_write_keeps_tab_dirty() {
    let mut store = store();
    let id = open_file(&mut store, "/work/app.js", "let a = 1;\n");
    edit(&mut store, id, "let a = 2;\n");
    let version = store.state().session.tab(id).unwrap().edit_version;
    store.dispatch(Action::Save);

    edit(&mut store, id, "let a = 3;\n");
    store.dispatch(Action::FileWritten {
        tab: id,
        version,
        silent: false,
        result: Ok(()),
    });

    assert!(!store.state().session.tab(id).unwrap().saved);
}

#[test]
fn test_write_failure_notifies_and_stays_dirty() {
    let mut store = store();
    let id = open_file(&mut store, "/work/app.js", "let a = 1;\n");
    edit(&mut store, id, "let a = 2;\n");
    let version = store.state().session.tab(id).unwrap().edit_version;
    store.dispatch(Action::SaveTab { id, silent: true });

    store.dispatch(Action::FileWritten {
        tab: id,
        version,
        silent: true,
        result: Err(BridgeError::Io("permission denied".to_string())),
    });

    assert!(!store.state().session.tab(id).unwrap().saved);
    assert_eq!(
        store.state().notifications.items()[0].kind,
        NotificationKind::Error
    );
}

#[test]
fn test_save_memory_tab_downloads_with_corrected_name() {
    let mut store = store();
    let id = store.state().session.active_id();
    edit(&mut store, id, "def main():\n    print('hi')\n");

    let result = store.dispatch(Action::Save);

    assert_eq!(
        result.effects,
        vec![Effect::Download {
            dir: PathBuf::from("/tmp/codeplay-downloads"),
            file_name: "untitled1.py".to_string(),
            content: "def main():\n    print('hi')\n".to_string(),
        }]
    );

    store.dispatch(Action::Downloaded {
        name: "untitled1.py".to_string(),
        result: Ok(PathBuf::from("/tmp/codeplay-downloads/untitled1.py")),
    });
    assert!(!store.state().session.tab(id).unwrap().saved);
    assert_eq!(
        store.state().notifications.items()[0].kind,
        NotificationKind::Success
    );
}

#[test]
fn test_download_without_dir_is_error() {
    let mut store = store_with(
        true,
        PlaygroundConfig {
            download_dir: None,
            ..PlaygroundConfig::default()
        },
    );

    let result = store.dispatch(Action::Save);

    assert!(result.effects.is_empty());
    assert_eq!(
        store.state().notifications.items()[0].kind,
        NotificationKind::Error
    );
}

#[test]
fn test_autosave_writes_every_dirty_file_tab_silently() {
    let mut store = store();
    let a = open_file(&mut store, "/work/a.js", "1;\n");
    let b = open_file(&mut store, "/work/b.js", "2;\n");
    let _clean = open_file(&mut store, "/work/c.js", "3;\n");
    edit(&mut store, a, "10;\n");
    edit(&mut store, b, "20;\n");
    let memory = store.state().session.tabs()[0].id;
    edit(&mut store, memory, "let x = 1;\n");

    let result = store.dispatch(Action::AutosaveTick);

    let written: Vec<TabId> = result
        .effects
        .iter()
        .map(|e| match e {
            Effect::WriteFile { tab, silent, .. } => {
                assert!(*silent);
                *tab
            }
            other => panic!("unexpected effect: {other:?}"),
        })
        .collect();
    assert_eq!(written, vec![a, b]);

    let again = store.dispatch(Action::AutosaveTick);
    assert!(again.effects.is_empty());

    let before = store.state().notifications.len();
    let version = store.state().session.tab(a).unwrap().edit_version;
    store.dispatch(Action::FileWritten {
        tab: a,
        version,
        silent: true,
        result: Ok(()),
    });
    assert!(store.state().session.tab(a).unwrap().saved);
    assert_eq!(store.state().notifications.len(), before);
}

#[test]
fn test_autosave_active_only_mode() {
    let mut store = store_with(
        true,
        PlaygroundConfig {
            autosave_all_tabs: false,
            ..config()
        },
    );
    let a = open_file(&mut store, "/work/a.js", "1;\n");
    let b = open_file(&mut store, "/work/b.js", "2;\n");
    edit(&mut store, a, "10;\n");
    edit(&mut store, b, "20;\n");

    let result = store.dispatch(Action::AutosaveTick);

    assert_eq!(result.effects.len(), 1);
    assert!(matches!(result.effects[0], Effect::WriteFile { tab, .. } if tab == b));
}

#[test]
fn test_autosave_disabled_does_nothing() {
    let mut store = store_with(
        true,
        PlaygroundConfig {
            autosave_enabled: false,
            ..config()
        },
    );
    let a = open_file(&mut store, "/work/a.js", "1;\n");
    edit(&mut store, a, "10;\n");

    let result = store.dispatch(Action::AutosaveTick);
    assert!(result.effects.is_empty());
}

#[test]
fn test_replace_all_absent_term_leaves_content() {
    let mut store = store();
    let before = active_content(&store);

    let result = store.dispatch(Action::ReplaceAll {
        term: "tidakada".to_string(),
        replacement: "x".to_string(),
    });

    assert!(result.effects.is_empty());
    assert_eq!(active_content(&store), before);
    assert!(store.state().session.active_tab().unwrap().saved);
    let latest = &store.state().notifications.items()[0];
    assert_eq!(latest.kind, NotificationKind::Info);
    assert!(latest.title.contains("tidakada"));
}

#[test]
fn test_replace_all_updates_content_and_counts() {
    let mut store = store();
    let id = store.state().session.active_id();
    edit(&mut store, id, "let a = 1;\nlet b = a + a;\n");

    store.dispatch(Action::ReplaceAll {
        term: "a".to_string(),
        replacement: "z".to_string(),
    });

    assert_eq!(active_content(&store), "let z = 1;\nlet b = z + z;\n");
    assert!(!store.state().session.tab(id).unwrap().saved);
    let latest = &store.state().notifications.items()[0];
    assert_eq!(latest.kind, NotificationKind::Success);
    assert!(latest.title.starts_with('3'));
}

#[test]
fn test_find_reports_counts_and_errors() {
    let mut store = store();
    let id = store.state().session.active_id();
    edit(&mut store, id, "let a = 1;\nlet b = 2;\n");

    store.dispatch(Action::Find {
        term: String::new(),
    });
    assert_eq!(
        store.state().notifications.items()[0].kind,
        NotificationKind::Error
    );

    store.dispatch(Action::Find {
        term: "let".to_string(),
    });
    assert_eq!(store.state().search.matches.len(), 2);
    assert_eq!(store.state().search.matches[1].line, 2);
    assert!(store.state().notifications.items()[0].title.contains('2'));

    store.dispatch(Action::SetSearchOptions(SearchOptions {
        case_sensitive: true,
        use_regex: true,
    }));
    store.dispatch(Action::Find {
        term: "(".to_string(),
    });
    assert_eq!(
        store.state().notifications.items()[0].kind,
        NotificationKind::Error
    );
}

#[test]
fn test_open_folder_lifecycle() {
    let mut store = store();

    let result = store.dispatch(Action::OpenFolder);
    assert_eq!(result.effects, vec![Effect::PickDirectory]);
    assert!(store.state().explorer.loading);

    let again = store.dispatch(Action::OpenFolder);
    assert!(again.effects.is_empty());
    assert!(!again.state_changed);

    let handle = DirHandle::new("/proj");
    let result = store.dispatch(Action::DirectoryPicked(BridgeOutcome::Done(handle.clone())));
    assert_eq!(
        result.effects,
        vec![Effect::LoadDirectory {
            handle: handle.clone(),
            refresh: false,
        }]
    );

    let mut tree = FileTree::new_with_root_for_test(OsString::from("proj"), PathBuf::from("/proj"));
    let root = tree.root();
    let src = tree
        .insert_child(root, OsString::from("src"), NodeKind::Dir)
        .unwrap();
    let main = tree
        .insert_child(src, OsString::from("main.js"), NodeKind::File)
        .unwrap();
    store.dispatch(Action::DirectoryLoaded {
        handle: handle.clone(),
        result: Ok(tree),
        refresh: false,
    });

    let explorer = &store.state().explorer;
    assert!(!explorer.loading);
    assert_eq!(explorer.root.as_ref(), Some(&handle));
    assert_eq!(explorer.root_name.as_deref(), Some("proj"));

    store.dispatch(Action::OpenTreeNode(src));
    assert!(store.state().explorer.tree.as_ref().unwrap().is_expanded(src));
    store.dispatch(Action::OpenTreeNode(src));
    assert!(!store.state().explorer.tree.as_ref().unwrap().is_expanded(src));

    let result = store.dispatch(Action::OpenTreeNode(main));
    assert_eq!(
        result.effects,
        vec![Effect::ReadFiles(vec![FileHandle::new("/proj/src/main.js")])]
    );
}

#[test]
fn test_opened_file_inside_folder_is_selected_in_tree() {
    let mut store = store();
    let mut tree = FileTree::new_with_root_for_test(OsString::from("proj"), PathBuf::from("/proj"));
    let root = tree.root();
    let main = tree
        .insert_child(root, OsString::from("main.js"), NodeKind::File)
        .unwrap();
    store.dispatch(Action::DirectoryLoaded {
        handle: DirHandle::new("/proj"),
        result: Ok(tree),
        refresh: false,
    });

    open_file(&mut store, "/elsewhere/other.js", "");
    assert_eq!(store.state().explorer.tree.as_ref().unwrap().selected(), None);

    open_file(&mut store, "/proj/main.js", "");
    assert_eq!(
        store.state().explorer.tree.as_ref().unwrap().selected(),
        Some(main)
    );
}

#[test]
fn test_open_folder_cancel_clears_loading() {
    let mut store = store();
    store.dispatch(Action::OpenFolder);

    store.dispatch(Action::DirectoryPicked(BridgeOutcome::Cancelled));

    assert!(!store.state().explorer.loading);
    assert!(store.state().notifications.is_empty());
}

#[test]
fn test_refresh_tree_requires_loaded_folder() {
    let mut store = store();

    let result = store.dispatch(Action::RefreshTree);
    assert!(result.effects.is_empty());
    assert_eq!(
        store.state().notifications.items()[0].kind,
        NotificationKind::Info
    );

    let handle = DirHandle::new("/proj");
    let tree = FileTree::new_with_root_for_test(OsString::from("proj"), PathBuf::from("/proj"));
    store.dispatch(Action::DirectoryLoaded {
        handle: handle.clone(),
        result: Ok(tree),
        refresh: false,
    });

    let result = store.dispatch(Action::RefreshTree);
    assert_eq!(
        result.effects,
        vec![Effect::LoadDirectory {
            handle,
            refresh: true,
        }]
    );
}

#[test]
fn test_failed_directory_load_keeps_previous_tree() {
    let mut store = store();
    let handle = DirHandle::new("/proj");
    let tree = FileTree::new_with_root_for_test(OsString::from("proj"), PathBuf::from("/proj"));
    store.dispatch(Action::DirectoryLoaded {
        handle: handle.clone(),
        result: Ok(tree),
        refresh: false,
    });

    store.dispatch(Action::RefreshTree);
    store.dispatch(Action::DirectoryLoaded {
        handle,
        result: Err(BridgeError::Io("gone".to_string())),
        refresh: true,
    });

    assert!(store.state().explorer.tree.is_some());
    assert!(!store.state().explorer.loading);
    assert_eq!(
        store.state().notifications.items()[0].kind,
        NotificationKind::Error
    );
}

#[test]
fn test_unreadable_subdirectory_reports_error_not_success() {
    let mut store = store();
    store.dispatch(Action::OpenFolder);
    store.dispatch(Action::DirectoryPicked(BridgeOutcome::Done(DirHandle::new("/proj"))));

    store.dispatch(Action::DirectoryLoaded {
        handle: DirHandle::new("/proj"),
        result: Err(BridgeError::Io("/proj/locked: permission denied".to_string())),
        refresh: false,
    });

    let state = store.state();
    assert!(state.explorer.tree.is_none());
    assert!(state.explorer.root.is_none());
    assert!(!state.explorer.loading);
    assert!(state
        .notifications
        .items()
        .iter()
        .all(|n| n.kind != NotificationKind::Success));
    let latest = &state.notifications.items()[0];
    assert_eq!(latest.kind, NotificationKind::Error);
    assert_eq!(latest.title, "Gagal memuat folder");
    assert!(latest.message.as_deref().unwrap().contains("locked"));
}

#[test]
fn test_run_and_finish() {
    let mut store = store();

    let result = store.dispatch(Action::Run { stdin: None });
    assert_eq!(result.effects.len(), 1);
    assert!(matches!(
        &result.effects[0],
        Effect::Execute(req) if req.language == LanguageId::JavaScript
    ));
    assert!(store.state().output.running);

    let again = store.dispatch(Action::Run { stdin: None });
    assert!(again.effects.is_empty());

    store.dispatch(Action::ExecutionFinished(Ok(ExecutionOutput {
        stdout: "Halo, dunia!\n".to_string(),
        stderr: String::new(),
        exit_status: Some(0),
    })));
    let output = &store.state().output;
    assert!(!output.running);
    assert_eq!(
        output.last.as_ref().map(|o| o.stdout.as_str()),
        Some("Halo, dunia!\n")
    );
}

#[test]
fn test_execution_error_is_reported() {
    let mut store = store();
    store.dispatch(Action::Run { stdin: None });

    store.dispatch(Action::ExecutionFinished(Err(ExecutionError::TimedOut(
        Duration::from_secs(5),
    ))));

    assert!(!store.state().output.running);
    assert!(store.state().output.error.is_some());
    assert_eq!(
        store.state().notifications.items()[0].kind,
        NotificationKind::Error
    );
}

#[test]
fn test_tick_expires_notifications() {
    let mut store = store();
    let id = store.state().session.active_id();
    store.dispatch(Action::CloseTab(id));
    assert_eq!(store.state().notifications.len(), 1);

    let unchanged = store.dispatch(Action::Tick {
        now: Instant::now(),
    });
    assert!(!unchanged.state_changed);

    let expired = store.dispatch(Action::Tick {
        now: Instant::now() + Duration::from_secs(60),
    });
    assert!(expired.state_changed);
    assert!(store.state().notifications.is_empty());
}

#[test]
fn test_dismiss_and_clear_notifications() {
    let mut store = store();
    let id = store.state().session.active_id();
    store.dispatch(Action::CloseTab(id));
    store.dispatch(Action::CloseTab(id));
    let first = store.state().notifications.items()[0].id;

    assert!(store.dispatch(Action::DismissNotification(first)).state_changed);
    assert!(!store.dispatch(Action::DismissNotification(first)).state_changed);
    assert_eq!(store.state().notifications.len(), 1);

    assert!(store.dispatch(Action::ClearNotifications).state_changed);
    assert!(!store.dispatch(Action::ClearNotifications).state_changed);
}

#[test]
fn test_update_unknown_tab_is_noop() {
    let mut store = store();
    let result = store.dispatch(Action::UpdateTab {
        id: TabId::new(999),
        patch: TabPatch::content("x"),
    });
    assert!(!result.state_changed);
}
