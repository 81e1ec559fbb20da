use crate::components::ComponentTable;
use crate::models::{Dependency, LoadedModule, ModuleEntry, RegistrationReport};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Every module named by the manifest whose path resolved, activated or not.
///
/// Registration order is preserved so that activation (and therefore every
/// query over the active set) is deterministic.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    modules: Vec<LoadedModule>,
    positions: HashMap<String, usize>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a fresh registry from a manifest's entries.
    pub fn from_entries(
        table: &ComponentTable,
        entries: &[ModuleEntry],
    ) -> (Self, RegistrationReport) {
        let mut registry = Self::new();
        let report = registry.register(table, entries);
        (registry, report)
    }

    /// Resolves and records each entry. Disabled entries and entries whose
    /// path does not resolve are dropped; a repeated id replaces the earlier
    /// module in place. The last entry for an id always wins, so a later
    /// disabled or unresolvable entry also removes the earlier module.
    pub fn register(
        &mut self,
        table: &ComponentTable,
        entries: &[ModuleEntry],
    ) -> RegistrationReport {
        let mut report = RegistrationReport::default();

        for entry in entries {
            if !entry.enabled {
                info!(module = %entry.id, "Module '{}' is disabled, skipping", entry.id);
                self.remove_superseded(&entry.id, &mut report);
                report.skipped_disabled.push(entry.id.clone());
                continue;
            }

            let component = match table.resolve(&entry.path, &entry.config) {
                Ok(component) => component,
                Err(e) => {
                    warn!(
                        module = %entry.id,
                        path = %entry.path,
                        "Dropping module '{}': {}",
                        entry.id,
                        e
                    );
                    self.remove_superseded(&entry.id, &mut report);
                    report
                        .unresolved_paths
                        .push((entry.id.clone(), entry.path.clone()));
                    continue;
                }
            };

            let dependencies: Vec<Dependency> = entry
                .dependencies
                .iter()
                .map(|token| Dependency::parse(token))
                .collect();

            for token in dependencies.iter().filter(|d| !d.is_recognized()) {
                warn!(
                    module = %entry.id,
                    token = %token,
                    "Module '{}' declares unrecognized dependency '{}'; it can never activate",
                    entry.id,
                    token
                );
                report
                    .unrecognized_tokens
                    .push((entry.id.clone(), token.to_string()));
            }

            let module = LoadedModule {
                id: entry.id.clone(),
                module_type: entry.module_type.clone(),
                path: entry.path.clone(),
                component,
                dependencies,
            };

            match self.positions.get(&entry.id) {
                Some(&pos) => {
                    warn!(
                        module = %entry.id,
                        "Duplicate module id '{}', replacing earlier entry",
                        entry.id
                    );
                    self.modules[pos] = module;
                }
                None => {
                    self.positions.insert(entry.id.clone(), self.modules.len());
                    self.modules.push(module);
                    report.registered.push(entry.id.clone());
                }
            }
            debug!(module = %entry.id, path = %entry.path, "Registered module");
        }

        report
    }

    pub fn get_all(&self) -> &[LoadedModule] {
        &self.modules
    }

    pub fn get(&self, id: &str) -> Option<&LoadedModule> {
        self.positions.get(id).map(|&pos| &self.modules[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Drops an earlier module whose id is taken over by a later entry that
    /// will not be registered.
    fn remove_superseded(&mut self, id: &str, report: &mut RegistrationReport) {
        let Some(pos) = self.positions.remove(id) else {
            return;
        };

        warn!(
            module = %id,
            "Duplicate module id '{}': the later entry is not registered, removing the earlier one",
            id
        );
        self.modules.remove(pos);
        for later in self.positions.values_mut().filter(|p| **p > pos) {
            *later -= 1;
        }
        report.registered.retain(|registered| registered != id);
    }
}
