pub const DEFAULT_MANIFEST_FILE: &str = "modules.json";
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

// --- Environment (CLI host only) ---

pub const ENV_MANIFEST: &str = "MODAI_MANIFEST";
pub const ENV_FLAGS: &str = "MODAI_FLAGS";
pub const ENV_FETCH_TIMEOUT: &str = "MODAI_FETCH_TIMEOUT_SECS";
pub const ENV_CONFIG: &str = "MODAI_CONFIG";
pub const ENV_COLUMNS: &str = "MODAI_COLUMNS";

// --- Module type tags used by the composition root ---

pub const ROUTE_TYPE: &str = "Route";
pub const SIDEBAR_ITEM_TYPE: &str = "SidebarItem";
pub const CONTEXT_PROVIDER_TYPE: &str = "ContextProvider";
pub const LAYOUT_TYPE: &str = "Layout";

// --- Dependency token prefixes ---

pub const MODULE_TOKEN_PREFIX: &str = "module:";
pub const FLAG_TOKEN_PREFIX: &str = "flag:";
