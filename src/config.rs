use crate::consts::{
    CONFIG_FILE_NAME, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_MANIFEST_FILE, ENV_CONFIG,
    ENV_FETCH_TIMEOUT, ENV_FLAGS, ENV_MANIFEST,
};
use crate::exceptions::ModaiError;
use serde::Deserialize;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestSource {
    Url(String),
    File(PathBuf),
}

impl ManifestSource {
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            ManifestSource::Url(location.to_string())
        } else {
            let path = location.strip_prefix("file://").unwrap_or(location);
            ManifestSource::File(PathBuf::from(path))
        }
    }
}

impl fmt::Display for ManifestSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestSource::Url(url) => write!(f, "{}", url),
            ManifestSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Settings given on the command line; they win over everything else.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub manifest: Option<String>,
    pub flags: Vec<String>,
    pub fetch_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub manifest: Option<String>,
    pub flags: Option<Vec<String>>,
    pub fetch_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShellConfig {
    pub manifest: ManifestSource,
    pub flags: Vec<String>,
    pub fetch_timeout: Duration,
}

impl ShellConfig {
    pub fn new(manifest: ManifestSource) -> Self {
        Self {
            manifest,
            flags: Vec::new(),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }

    pub fn with_flags<S: AsRef<str>>(mut self, flags: &[S]) -> Self {
        self.flags = normalize_flags(flags.iter().map(|f| f.as_ref()));
        self
    }

    /// Resolves the configuration from CLI overrides, the process
    /// environment and the config file.
    pub fn resolve(overrides: &ConfigOverrides) -> Result<Self, ModaiError> {
        let file = load_config_file(&config_file_path())?;
        Self::resolve_with(overrides, |key| env::var(key).ok(), file)
    }

    pub fn resolve_with<F>(
        overrides: &ConfigOverrides,
        env_lookup: F,
        file: Option<ConfigFile>,
    ) -> Result<Self, ModaiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = file.unwrap_or_default();

        let manifest = overrides
            .manifest
            .clone()
            .or_else(|| env_lookup(ENV_MANIFEST).filter(|v| !v.trim().is_empty()))
            .or(file.manifest)
            .unwrap_or_else(|| DEFAULT_MANIFEST_FILE.to_string());

        let flags = if !overrides.flags.is_empty() {
            normalize_flags(overrides.flags.iter().map(String::as_str))
        } else if let Some(raw) = env_lookup(ENV_FLAGS) {
            normalize_flags(raw.split(','))
        } else {
            normalize_flags(file.flags.unwrap_or_default().iter().map(String::as_str))
        };

        let timeout_secs = match overrides.fetch_timeout_secs {
            Some(secs) => secs,
            None => match env_lookup(ENV_FETCH_TIMEOUT) {
                Some(raw) => raw.trim().parse().map_err(|_| {
                    ModaiError::Configuration(format!(
                        "{} must be a whole number of seconds, got '{}'",
                        ENV_FETCH_TIMEOUT, raw
                    ))
                })?,
                None => file.fetch_timeout_secs.unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS),
            },
        };

        if timeout_secs == 0 {
            return Err(ModaiError::Configuration(
                "Fetch timeout must be at least one second".to_string(),
            ));
        }

        Ok(Self {
            manifest: ManifestSource::parse(&manifest),
            flags,
            fetch_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

pub fn config_file_path() -> PathBuf {
    match env::var_os(ENV_CONFIG) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => crate::utils::get_app_config_dir().join(CONFIG_FILE_NAME),
    }
}

/// A missing file is not an error; a malformed one is.
pub fn load_config_file(path: &Path) -> Result<Option<ConfigFile>, ModaiError> {
    if !path.exists() {
        return Ok(None);
    }

    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text).map(Some).map_err(|e| {
        ModaiError::Configuration(format!("Invalid config file {}: {}", path.display(), e))
    })
}

/// Trims, drops empties and removes duplicates while keeping first-seen order.
pub fn normalize_flags<'a, I>(flags: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out: Vec<String> = Vec::new();
    for flag in flags.into_iter().map(str::trim).filter(|f| !f.is_empty()) {
        if !out.iter().any(|existing| existing == flag) {
            out.push(flag.to_string());
        }
    }
    out
}
