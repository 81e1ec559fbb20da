use modai::components::ComponentTable;
use modai::models::{Component, Dependency, LoadedModule, ModuleEntry};
use std::sync::Arc;

/// Test component: carries the id of the module that built it.
#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)]
pub struct Marker(pub String);

#[allow(dead_code)]
pub fn module(id: &str, module_type: &str, deps: &[&str]) -> LoadedModule {
    let component: Component = Arc::new(Marker(id.to_string()));
    LoadedModule {
        id: id.to_string(),
        module_type: module_type.to_string(),
        path: format!("test/{}", id),
        component,
        dependencies: deps.iter().map(|d| Dependency::parse(d)).collect(),
    }
}

#[allow(dead_code)]
pub fn flags(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[allow(dead_code)]
pub fn sorted_ids(modules: &[LoadedModule]) -> Vec<String> {
    let mut ids: Vec<String> = modules.iter().map(|m| m.id.clone()).collect();
    ids.sort();
    ids
}

/// Table resolving `test/marker` to a [`Marker`] named after `config.name`
/// and `test/broken` to a factory error.
#[allow(dead_code)]
pub fn marker_table() -> ComponentTable {
    ComponentTable::new()
        .with("test/marker", |config| {
            let name = config
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or("marker")
                .to_string();
            Ok(Arc::new(Marker(name)))
        })
        .with("test/broken", |_| {
            Err(modai::ModaiError::Component("factory failed".into()))
        })
}

#[allow(dead_code)]
pub fn entry(id: &str, module_type: &str, deps: &[&str]) -> ModuleEntry {
    let mut entry = ModuleEntry::new(id, module_type, "test/marker", deps);
    entry
        .config
        .insert("name".into(), serde_json::Value::String(id.to_string()));
    entry
}
