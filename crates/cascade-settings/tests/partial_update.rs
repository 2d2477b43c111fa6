//! Partial update behaviour over the built-in settings table.

use assert_matches::assert_matches;
use cascade_core::CascadeError;
use cascade_settings::{GuildSettings, SettingsRegistry};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

const BOOL_FIELDS: [&str; 6] = [
    "admins_have_all_perms",
    "delete_command",
    "mention_prefix",
    "show_module_errors",
    "show_permission_errors",
    "use_embed_for_messages",
];

fn base() -> GuildSettings {
    GuildSettings::new(";").unwrap()
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[test]
fn test_read_only_fields_never_written() {
    let registry = SettingsRegistry::builtin();
    for field in ["prefix", "enabled_modules", "tags"] {
        let mut updates = Map::new();
        updates.insert("locale".to_string(), json!("de_DE"));
        updates.insert(field.to_string(), json!("anything"));

        let result = registry.apply(&base(), &updates);
        assert_matches!(
            result,
            Err(CascadeError::FieldNotEditable { field: rejected }) if rejected == field
        );
    }
}

#[test]
fn test_disjoint_updates_compose() {
    let registry = SettingsRegistry::builtin();
    let first = registry
        .apply(&base(), &object(json!({"delete_command": true})))
        .unwrap();
    let second = registry
        .apply(&first.settings, &object(json!({"locale": "fr_FR"})))
        .unwrap();

    assert!(second.settings.delete_command());
    assert_eq!(second.settings.locale().code(), "fr_FR");
}

#[test]
fn test_first_failing_name_reported() {
    let registry = SettingsRegistry::builtin();
    let result = registry.apply(
        &base(),
        &object(json!({"tags": {}, "delete_command": 1, "prefix": "!"})),
    );
    assert_matches!(result, Err(CascadeError::TypeMismatch { field, .. }) if field == "delete_command");
}

proptest! {
    #[test]
    fn test_boolean_updates_reflected(values in proptest::collection::vec(any::<bool>(), 6)) {
        let registry = SettingsRegistry::builtin();
        let updates: Map<String, Value> = BOOL_FIELDS
            .iter()
            .zip(&values)
            .map(|(name, value)| (name.to_string(), Value::Bool(*value)))
            .collect();

        let report = registry.apply(&base(), &updates).unwrap();
        let current = registry.values(&report.settings);
        for (name, value) in BOOL_FIELDS.iter().zip(&values) {
            prop_assert_eq!(&current[name], &Value::Bool(*value));
        }
        prop_assert_eq!(report.applied.len(), 6);
    }

    #[test]
    fn test_unknown_names_never_change_settings(name in "[a-z]{1,12}_x", value in any::<i64>()) {
        let registry = SettingsRegistry::builtin();
        let mut updates = Map::new();
        updates.insert(name.clone(), json!(value));

        let report = registry.apply(&base(), &updates).unwrap();
        prop_assert!(report.is_noop());
        prop_assert_eq!(report.ignored, vec![name]);
        prop_assert_eq!(report.settings, base());
    }
}
