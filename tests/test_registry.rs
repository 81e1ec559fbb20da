mod common;

use common::{Marker, entry, marker_table};
use modai::models::{Dependency, ModuleEntry};
use modai::registry::ModuleRegistry;

#[test]
fn test_register_keeps_unsatisfied_modules() {
    let table = marker_table();
    let mut registry = ModuleRegistry::new();

    // GIVEN a module whose dependency does not exist anywhere
    let report = registry.register(
        &table,
        &[
            entry("base", "Base", &[]),
            entry("orphan", "Orphan", &["module:missing", "flag:never"]),
        ],
    );

    // THEN it is still registered; activation decides later
    assert_eq!(report.registered, vec!["base", "orphan"]);
    assert_eq!(registry.len(), 2);
    let orphan = registry.get("orphan").unwrap();
    assert_eq!(
        orphan.dependencies,
        vec![
            Dependency::Module("missing".into()),
            Dependency::Flag("never".into())
        ]
    );
}

#[test]
fn test_register_drops_unresolvable_paths() {
    let table = marker_table();
    let mut registry = ModuleRegistry::new();

    let unknown = ModuleEntry::new("ghost", "Route", "does/not/exist", &[]);
    let broken = ModuleEntry::new("broken", "Route", "test/broken", &[]);

    let report = registry.register(&table, &[entry("ok", "Route", &[]), unknown, broken]);

    assert_eq!(report.registered, vec!["ok"]);
    assert_eq!(
        report.unresolved_paths,
        vec![
            ("ghost".to_string(), "does/not/exist".to_string()),
            ("broken".to_string(), "test/broken".to_string())
        ]
    );
    assert!(!registry.contains("ghost"));
    assert!(!registry.contains("broken"));
}

#[test]
fn test_register_skips_disabled_entries() {
    let table = marker_table();
    let mut disabled = entry("legacy", "Route", &[]);
    disabled.enabled = false;

    let (registry, report) =
        ModuleRegistry::from_entries(&table, &[disabled, entry("chat", "Route", &[])]);

    assert_eq!(report.skipped_disabled, vec!["legacy"]);
    assert_eq!(report.registered, vec!["chat"]);
    assert!(registry.get("legacy").is_none());
}

#[test]
fn test_duplicate_id_overwrites_in_place() {
    let table = marker_table();
    let mut second = entry("chat", "Page", &["module:base"]);
    second
        .config
        .insert("name".into(), serde_json::Value::String("chat-v2".into()));

    let (registry, report) = ModuleRegistry::from_entries(
        &table,
        &[
            entry("chat", "Route", &[]),
            entry("base", "Base", &[]),
            second,
        ],
    );

    // THEN one record survives, at its original position, with the later data
    assert_eq!(report.registered, vec!["chat", "base"]);
    let ids: Vec<&str> = registry.get_all().iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["chat", "base"]);

    let chat = registry.get("chat").unwrap();
    assert_eq!(chat.module_type, "Page");
    assert_eq!(
        chat.component.downcast_ref::<Marker>(),
        Some(&Marker("chat-v2".into()))
    );
}

#[test]
fn test_register_reports_unrecognized_tokens() {
    let table = marker_table();
    let (registry, report) =
        ModuleRegistry::from_entries(&table, &[entry("odd", "Route", &["feature:beta"])]);

    assert!(registry.contains("odd"));
    assert_eq!(
        report.unrecognized_tokens,
        vec![("odd".to_string(), "feature:beta".to_string())]
    );
}

#[test]
fn test_factory_receives_entry_config() {
    let table = marker_table();
    let (registry, _) = ModuleRegistry::from_entries(&table, &[entry("settings", "Route", &[])]);

    let module = registry.get("settings").unwrap();
    assert_eq!(
        module.component.downcast_ref::<Marker>(),
        Some(&Marker("settings".into()))
    );
    assert_eq!(module.path, "test/marker");
}

#[test]
fn test_later_disabled_duplicate_removes_earlier_module() {
    let table = marker_table();
    let mut disabled = entry("chat", "Route", &[]);
    disabled.enabled = false;

    let (registry, report) = ModuleRegistry::from_entries(
        &table,
        &[
            entry("chat", "Route", &[]),
            entry("base", "Base", &[]),
            disabled,
        ],
    );

    // THEN the last entry for "chat" wins and nothing named "chat" is left
    assert!(!registry.contains("chat"));
    assert_eq!(report.skipped_disabled, vec!["chat"]);
    assert_eq!(report.registered, vec!["base"]);
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("base").unwrap().id, "base");
}

#[test]
fn test_later_unresolvable_duplicate_removes_earlier_module() {
    let table = marker_table();
    let broken = ModuleEntry::new("chat", "Route", "test/broken", &[]);

    let (registry, report) = ModuleRegistry::from_entries(
        &table,
        &[
            entry("chat", "Route", &[]),
            entry("base", "Base", &[]),
            broken,
            entry("settings", "Route", &["module:base"]),
        ],
    );

    assert!(!registry.contains("chat"));
    assert_eq!(
        report.unresolved_paths,
        vec![("chat".to_string(), "test/broken".to_string())]
    );
    assert_eq!(report.registered, vec!["base", "settings"]);

    // lookups by id stay consistent after the removal
    let ids: Vec<&str> = registry.get_all().iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["base", "settings"]);
    assert_eq!(registry.get("settings").unwrap().id, "settings");
    assert_eq!(registry.get("base").unwrap().id, "base");
}

#[test]
fn test_disabled_then_enabled_duplicate_registers() {
    let table = marker_table();
    let mut disabled = entry("chat", "Route", &[]);
    disabled.enabled = false;

    let (registry, report) =
        ModuleRegistry::from_entries(&table, &[disabled, entry("chat", "Route", &[])]);

    assert!(registry.contains("chat"));
    assert_eq!(report.registered, vec!["chat"]);
    assert_eq!(report.skipped_disabled, vec!["chat"]);
}
