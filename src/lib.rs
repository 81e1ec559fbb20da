pub mod activator;
pub mod commands;
pub mod components;
pub mod composition;
pub mod config;
pub mod console;
pub mod consts;
pub mod exceptions;
pub mod host;
pub mod index;
pub mod manifest;
pub mod models;
pub mod registry;
pub mod utils;

pub use activator::activate;
pub use components::ComponentTable;
pub use exceptions::ModaiError;
pub use host::ModuleHost;
pub use index::ActiveModuleIndex;
pub use registry::ModuleRegistry;
