use crate::config::ManifestSource;
use crate::exceptions::ModaiError;
use crate::models::Manifest;
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, info, warn};

static ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\S+$").unwrap());

/// Loads the manifest once. Failures are returned, never retried.
pub async fn fetch_manifest(
    source: &ManifestSource,
    timeout: Duration,
) -> Result<Manifest, ModaiError> {
    match source {
        ManifestSource::Url(url) => fetch_remote(url, timeout).await,
        ManifestSource::File(path) => read_manifest_file(path),
    }
}

async fn fetch_remote(url: &str, timeout: Duration) -> Result<Manifest, ModaiError> {
    crate::utils::setup_crypto_provider();

    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ModaiError::ManifestLoad(e.to_string()))?;

    info!(url = %url, "Fetching module manifest");
    let response = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|e| ModaiError::ManifestLoad(format!("GET {}: {}", url, e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ModaiError::ManifestStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| ModaiError::ManifestLoad(format!("GET {}: {}", url, e)))?;

    parse_manifest(&body)
}

pub fn read_manifest_file(path: &Path) -> Result<Manifest, ModaiError> {
    info!(path = %path.display(), "Reading module manifest");
    let text = fs::read_to_string(path)
        .map_err(|e| ModaiError::ManifestLoad(format!("{}: {}", path.display(), e)))?;
    parse_manifest(&text)
}

pub fn parse_manifest(text: &str) -> Result<Manifest, ModaiError> {
    let manifest: Manifest =
        serde_json::from_str(text).map_err(|e| ModaiError::ManifestParse(e.to_string()))?;
    validate_manifest(&manifest)?;
    debug!(
        version = %manifest.version,
        modules = manifest.modules.len(),
        "Parsed module manifest"
    );
    Ok(manifest)
}

fn validate_manifest(manifest: &Manifest) -> Result<(), ModaiError> {
    if manifest.version.trim().is_empty() {
        return Err(ModaiError::ManifestParse(
            "Manifest version cannot be empty".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for (i, entry) in manifest.modules.iter().enumerate() {
        if !ID_PATTERN.is_match(&entry.id) {
            return Err(ModaiError::ManifestParse(format!(
                "Module #{} has an empty or malformed id '{}'",
                i, entry.id
            )));
        }
        if entry.module_type.trim().is_empty() {
            return Err(ModaiError::ManifestParse(format!("Module '{}' has no type", entry.id)));
        }
        if entry.path.trim().is_empty() {
            return Err(ModaiError::ManifestParse(format!("Module '{}' has no path", entry.id)));
        }
        if !seen.insert(entry.id.as_str()) {
            warn!(
                module = %entry.id,
                "Manifest lists module '{}' more than once; the last entry wins",
                entry.id
            );
        }
    }

    Ok(())
}
