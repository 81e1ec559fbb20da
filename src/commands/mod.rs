pub mod activate;
pub mod check;
pub mod components;
pub mod compose;
pub mod query;

use crate::components::ComponentTable;
use crate::config::ShellConfig;
use crate::exceptions::ModaiError;
use crate::host::ModuleHost;
use crate::index::ActiveModuleIndex;
use std::sync::Arc;

/// Builds a host over the built-in components and runs one load.
pub async fn load_host(
    config: &ShellConfig,
) -> Result<(ModuleHost, Arc<ActiveModuleIndex>), ModaiError> {
    let host = ModuleHost::new(ComponentTable::builtin());
    let index = host.load(config).await?;
    Ok((host, index))
}
