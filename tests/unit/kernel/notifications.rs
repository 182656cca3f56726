use super::*;

#[test]
fn test_emit_inserts_at_front() {
    let mut center = NotificationCenter::default();
    let first = center.info("first", None);
    let second = center.success("second", Some("body".to_string()));

    let ids: Vec<_> = center.items().iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![second, first]);
    assert_eq!(center.items()[0].kind, NotificationKind::Success);
    assert_eq!(center.items()[0].message.as_deref(), Some("body"));
}

#[test]
fn test_ids_are_unique() {
    let mut center = NotificationCenter::default();
    let a = center.info("a", None);
    let b = center.info("a", None);
    assert_ne!(a, b);
}

#[test]
fn test_default_duration_is_five_seconds() {
    let mut center = NotificationCenter::default();
    let id = center.error("boom", None);
    let n = center.get(id).unwrap();
    assert_eq!(n.duration, Some(Duration::from_millis(5000)));
    assert_eq!(n.expires_at, Some(n.created_at + Duration::from_millis(5000)));
}

#[test]
fn test_tick_removes_expired() {
    let mut center = NotificationCenter::default();
    let now = Instant::now();
    center.push(
        now,
        NotificationKind::Info,
        "short",
        None,
        Some(Duration::from_millis(100)),
        None,
    );
    let long = center.push(
        now,
        NotificationKind::Info,
        "long",
        None,
        Some(Duration::from_secs(10)),
        None,
    );

    assert!(!center.tick(now + Duration::from_millis(50)));
    assert_eq!(center.len(), 2);

    assert!(center.tick(now + Duration::from_millis(100)));
    assert_eq!(center.len(), 1);
    assert_eq!(center.items()[0].id, long);
}

#[test]
fn test_zero_or_missing_duration_is_manual_only() {
    let mut center = NotificationCenter::default();
    let now = Instant::now();
    let zero = center.push(
        now,
        NotificationKind::Warning,
        "zero",
        None,
        Some(Duration::ZERO),
        None,
    );
    let none = center.push(now, NotificationKind::Warning, "none", None, None, None);

    assert!(!center.tick(now + Duration::from_secs(3600)));
    assert_eq!(center.len(), 2);
    assert_eq!(center.get(zero).unwrap().expires_at, None);
    assert_eq!(center.get(none).unwrap().expires_at, None);
}

#[test]
fn test_dismiss_is_idempotent() {
    let mut center = NotificationCenter::default();
    let id = center.info("x", None);
    assert!(center.dismiss(id));
    assert!(!center.dismiss(id));
    assert!(center.is_empty());
}

#[test]
fn test_clear_empties_list() {
    let mut center = NotificationCenter::default();
    center.info("a", None);
    center.error("b", None);
    center.clear();
    assert!(center.is_empty());
}

#[test]
fn test_action_is_kept_as_data() {
    let mut center = NotificationCenter::default();
    let id = center.emit(
        NotificationKind::Info,
        "update",
        None,
        None,
        Some(NotificationAction {
            label: "Buka".to_string(),
            command: "open".to_string(),
        }),
    );
    let action = center.get(id).unwrap().action.clone().unwrap();
    assert_eq!(action.command, "open");
}

#[test]
fn test_independent_instances() {
    let mut a = NotificationCenter::default();
    let b = NotificationCenter::default();
    a.info("only in a", None);
    assert_eq!(a.len(), 1);
    assert!(b.is_empty());
}
