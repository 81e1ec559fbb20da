use crate::consts::{FLAG_TOKEN_PREFIX, MODULE_TOKEN_PREFIX};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Opaque implementation handle handed to the composition root.
pub type Component = Arc<dyn Any + Send + Sync>;

/// Per-entry settings forwarded to the component factory.
pub type ComponentConfig = serde_json::Map<String, serde_json::Value>;

// --- Manifest (modules.json) ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: String,
    #[serde(default)]
    pub modules: Vec<ModuleEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub module_type: String,
    pub path: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub dependencies: Vec<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub config: ComponentConfig,
}

fn default_enabled() -> bool {
    true
}

/// `"dependencies": null` reads the same as an absent list.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl ModuleEntry {
    pub fn new(id: &str, module_type: &str, path: &str, dependencies: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            module_type: module_type.to_string(),
            path: path.to_string(),
            dependencies: dependencies.iter().map(|d| d.to_string()).collect(),
            enabled: true,
            config: ComponentConfig::new(),
        }
    }
}

// --- Dependency tokens ---

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Dependency {
    /// `module:<id>`
    Module(String),
    /// `flag:<name>`
    Flag(String),
    /// `flag:!<name>`
    NotFlag(String),
    /// Anything else. Never satisfiable.
    Unrecognized(String),
}

impl Dependency {
    pub fn parse(token: &str) -> Self {
        if token.is_empty() || token.chars().any(char::is_whitespace) {
            return Dependency::Unrecognized(token.to_string());
        }

        if let Some(id) = token.strip_prefix(MODULE_TOKEN_PREFIX)
            && !id.is_empty()
        {
            return Dependency::Module(id.to_string());
        }

        if let Some(name) = token.strip_prefix(FLAG_TOKEN_PREFIX) {
            match name.strip_prefix('!') {
                Some(negated) if !negated.is_empty() && !negated.starts_with('!') => {
                    return Dependency::NotFlag(negated.to_string());
                }
                None if !name.is_empty() => return Dependency::Flag(name.to_string()),
                _ => {}
            }
        }

        Dependency::Unrecognized(token.to_string())
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Dependency::Unrecognized(_))
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dependency::Module(id) => write!(f, "{}{}", MODULE_TOKEN_PREFIX, id),
            Dependency::Flag(name) => write!(f, "{}{}", FLAG_TOKEN_PREFIX, name),
            Dependency::NotFlag(name) => write!(f, "{}!{}", FLAG_TOKEN_PREFIX, name),
            Dependency::Unrecognized(raw) => write!(f, "{}", raw),
        }
    }
}

impl Serialize for Dependency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Renders tokens the way they were written in the manifest.
pub fn format_tokens(tokens: &[Dependency]) -> String {
    tokens
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// --- Registered / active modules ---

#[derive(Debug, Clone)]
pub struct LoadedModule {
    pub id: String,
    pub module_type: String,
    pub path: String,
    pub component: Component,
    pub dependencies: Vec<Dependency>,
}

/// A module left pending once activation stopped making progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnresolvedModule {
    pub id: String,
    pub dependencies: Vec<Dependency>,
    pub unmet: Vec<Dependency>,
}

impl fmt::Display for UnresolvedModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (declares [{}], unmet [{}])",
            self.id,
            format_tokens(&self.dependencies),
            format_tokens(&self.unmet)
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct ActivationReport {
    pub active: Vec<LoadedModule>,
    pub unresolved: Vec<UnresolvedModule>,
    /// Rounds that activated at least one module.
    pub rounds: usize,
}

impl ActivationReport {
    pub fn active_ids(&self) -> Vec<&str> {
        self.active.iter().map(|m| m.id.as_str()).collect()
    }

    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RegistrationReport {
    pub registered: Vec<String>,
    pub skipped_disabled: Vec<String>,
    pub unresolved_paths: Vec<(String, String)>,
    pub unrecognized_tokens: Vec<(String, String)>,
}

// --- Chat shell component descriptors ---

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePage {
    pub route: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SidebarItem {
    pub label: String,
    pub route: String,
    pub order: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextProvider {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppLayout {
    pub name: String,
    pub home_route: String,
}

impl Default for AppLayout {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            home_route: "/".to_string(),
        }
    }
}
