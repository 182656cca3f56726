use super::*;

#[test]
fn test_empty_object_uses_defaults() {
    let settings: Settings = serde_json::from_str("{}").unwrap();
    assert!(settings.autosave.enabled);
    assert_eq!(settings.autosave.interval_ms, 3000);
    assert!(settings.autosave.all_tabs);
    assert_eq!(settings.notifications.duration_ms, 5000);
    assert_eq!(settings.execution.timeout_ms, 5000);
    assert!(settings.download_dir.is_none());
    assert!(settings.identity.user_id.is_none());
}

#[test]
fn test_partial_sections_keep_remaining_defaults() {
    let json = r#"{
        "autosave": { "all_tabs": false },
        "execution": {
            "interpreters": [{ "language": "python", "program": "python3.12" }]
        },
        "identity": { "user_id": "u1", "role": "mentor" }
    }"#;
    let settings: Settings = serde_json::from_str(json).unwrap();

    assert!(settings.autosave.enabled);
    assert!(!settings.autosave.all_tabs);
    assert_eq!(settings.execution.timeout_ms, 5000);
    assert_eq!(settings.execution.interpreters.len(), 1);
    let rule = &settings.execution.interpreters[0];
    assert_eq!(rule.language, LanguageId::Python);
    assert_eq!(rule.program, "python3.12");
    assert!(rule.args.is_empty());
    assert_eq!(settings.identity.role.as_deref(), Some("mentor"));
}

#[test]
fn test_unknown_language_is_rejected() {
    let json = r#"{ "execution": { "interpreters": [{ "language": "cobol", "program": "x" }] } }"#;
    assert!(serde_json::from_str::<Settings>(json).is_err());
}

#[test]
fn test_serialized_defaults_skip_empty_fields() {
    let json = serde_json::to_string(&Settings::default()).unwrap();
    assert!(!json.contains("download_dir"));
    assert!(!json.contains("interpreters"));
    assert!(!json.contains("user_id"));
}
