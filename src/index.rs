use crate::models::{ActivationReport, Component, LoadedModule, UnresolvedModule};
use std::any::Any;
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::warn;

/// Read-only view over one completed activation pass.
#[derive(Debug, Clone)]
pub struct ActiveModuleIndex {
    modules: Vec<LoadedModule>,
    unresolved: Vec<UnresolvedModule>,
    flags: Vec<String>,
    activated_at: OffsetDateTime,
}

impl Default for ActiveModuleIndex {
    fn default() -> Self {
        Self::empty()
    }
}

impl ActiveModuleIndex {
    pub fn empty() -> Self {
        Self {
            modules: Vec::new(),
            unresolved: Vec::new(),
            flags: Vec::new(),
            activated_at: OffsetDateTime::now_utc(),
        }
    }

    pub fn new(report: ActivationReport, flags: &[String]) -> Self {
        Self {
            modules: report.active,
            unresolved: report.unresolved,
            flags: flags.to_vec(),
            activated_at: OffsetDateTime::now_utc(),
        }
    }

    /// Every active component of `module_type`, in activation order.
    ///
    /// Handles that are not a `T` are skipped with a warning.
    pub fn get_all<T: Any + Send + Sync>(&self, module_type: &str) -> Vec<Arc<T>> {
        self.of_type(module_type)
            .filter_map(|m| downcast::<T>(m))
            .collect()
    }

    /// The single active component of `module_type`.
    ///
    /// Returns `None` when there is no match, when the match is not a `T`, or
    /// when more than one module carries the type. An ambiguous lookup never
    /// picks one of the candidates.
    pub fn get_one<T: Any + Send + Sync>(&self, module_type: &str) -> Option<Arc<T>> {
        self.single(module_type).and_then(downcast::<T>)
    }

    /// The only active module of `module_type`, under the same rules as
    /// [`get_one`](Self::get_one) minus the downcast.
    pub fn single(&self, module_type: &str) -> Option<&LoadedModule> {
        let mut matches = self.of_type(module_type);
        let first = matches.next()?;

        if matches.next().is_some() {
            let ids: Vec<&str> = self.of_type(module_type).map(|m| m.id.as_str()).collect();
            warn!(
                module_type = %module_type,
                modules = ?ids,
                "Multiple active modules of type '{}' ({}); no single component available",
                module_type,
                ids.join(", ")
            );
            return None;
        }

        Some(first)
    }

    /// Untyped handles of every active module of `module_type`.
    pub fn handles(&self, module_type: &str) -> Vec<Component> {
        self.of_type(module_type)
            .map(|m| Arc::clone(&m.component))
            .collect()
    }

    pub fn modules(&self) -> &[LoadedModule] {
        &self.modules
    }

    pub fn modules_of_type(&self, module_type: &str) -> Vec<&LoadedModule> {
        self.of_type(module_type).collect()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.id.as_str()).collect()
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.modules.iter().any(|m| m.id == id)
    }

    pub fn unresolved(&self) -> &[UnresolvedModule] {
        &self.unresolved
    }

    pub fn flags(&self) -> &[String] {
        &self.flags
    }

    pub fn activated_at(&self) -> OffsetDateTime {
        self.activated_at
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    fn of_type<'a>(&'a self, module_type: &str) -> impl Iterator<Item = &'a LoadedModule> {
        self.modules
            .iter()
            .filter(move |m| m.module_type == module_type)
    }
}

fn downcast<T: Any + Send + Sync>(module: &LoadedModule) -> Option<Arc<T>> {
    match Arc::clone(&module.component).downcast::<T>() {
        Ok(component) => Some(component),
        Err(_) => {
            warn!(
                module = %module.id,
                module_type = %module.module_type,
                "Module '{}' does not provide a {}",
                module.id,
                std::any::type_name::<T>()
            );
            None
        }
    }
}
