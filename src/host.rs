use crate::activator::activate;
use crate::components::ComponentTable;
use crate::config::{ShellConfig, normalize_flags};
use crate::exceptions::ModaiError;
use crate::index::ActiveModuleIndex;
use crate::manifest::fetch_manifest;
use crate::models::{Manifest, RegistrationReport};
use crate::registry::ModuleRegistry;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{error, info};

#[derive(Debug, Default)]
struct HostState {
    registry: ModuleRegistry,
    flags: Vec<String>,
    registration: RegistrationReport,
}

/// Owns the module lifecycle for one application instance.
///
/// Each load or flag change computes a complete [`ActiveModuleIndex`] before
/// swapping it in, so a reader always sees one finished pass. Snapshots handed
/// out earlier stay valid and unchanged.
#[derive(Debug)]
pub struct ModuleHost {
    table: ComponentTable,
    state: RwLock<HostState>,
    published: RwLock<Arc<ActiveModuleIndex>>,
}

impl ModuleHost {
    pub fn new(table: ComponentTable) -> Self {
        Self {
            table,
            state: RwLock::new(HostState::default()),
            published: RwLock::new(Arc::new(ActiveModuleIndex::empty())),
        }
    }

    /// Fetches the manifest and rebuilds everything from it. On failure the
    /// previously published index is left in place.
    pub async fn load(&self, config: &ShellConfig) -> Result<Arc<ActiveModuleIndex>, ModaiError> {
        let manifest = fetch_manifest(&config.manifest, config.fetch_timeout)
            .await
            .inspect_err(|e| {
                error!(
                    source = %config.manifest,
                    "Manifest load failed, keeping current modules: {}",
                    e
                )
            })?;
        Ok(self.load_manifest(&manifest, &config.flags))
    }

    /// Replaces the registered set with the manifest's modules and activates
    /// them against `flags`.
    pub fn load_manifest<S: AsRef<str>>(
        &self,
        manifest: &Manifest,
        flags: &[S],
    ) -> Arc<ActiveModuleIndex> {
        let flags = normalize_flags(flags.iter().map(|f| f.as_ref()));
        let (registry, registration) = ModuleRegistry::from_entries(&self.table, &manifest.modules);

        let mut state = write_lock(&self.state);
        let report = activate(registry.get_all(), &flags);
        info!(
            version = %manifest.version,
            registered = registry.len(),
            active = report.active.len(),
            excluded = report.unresolved.len(),
            "Loaded module manifest"
        );

        let index = Arc::new(ActiveModuleIndex::new(report, &flags));
        *state = HostState {
            registry,
            flags,
            registration,
        };
        self.publish(Arc::clone(&index));
        index
    }

    /// Re-runs activation over the registered set with a new flag set.
    pub fn set_flags<S: AsRef<str>>(&self, flags: &[S]) -> Arc<ActiveModuleIndex> {
        let flags = normalize_flags(flags.iter().map(|f| f.as_ref()));

        let mut state = write_lock(&self.state);
        let report = activate(state.registry.get_all(), &flags);
        info!(
            flags = ?flags,
            active = report.active.len(),
            excluded = report.unresolved.len(),
            "Re-activated modules"
        );

        let index = Arc::new(ActiveModuleIndex::new(report, &flags));
        state.flags = flags;
        self.publish(Arc::clone(&index));
        index
    }

    /// Latest completed activation pass.
    pub fn index(&self) -> Arc<ActiveModuleIndex> {
        Arc::clone(&read_lock(&self.published))
    }

    pub fn flags(&self) -> Vec<String> {
        read_lock(&self.state).flags.clone()
    }

    pub fn registration(&self) -> RegistrationReport {
        read_lock(&self.state).registration.clone()
    }

    pub fn registered_count(&self) -> usize {
        read_lock(&self.state).registry.len()
    }

    pub fn table(&self) -> &ComponentTable {
        &self.table
    }

    fn publish(&self, index: Arc<ActiveModuleIndex>) {
        *write_lock(&self.published) = index;
    }
}

fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
