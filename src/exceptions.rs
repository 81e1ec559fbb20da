use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModaiError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Manifest load failed: {0}")]
    ManifestLoad(String),

    #[error("Manifest request to {url} failed with status {status}")]
    ManifestStatus { status: u16, url: String },

    #[error("Invalid manifest: {0}")]
    ManifestParse(String),

    #[error("Component error: {0}")]
    Component(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ModaiError {
    /// True for failures that abort a manifest load.
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            ModaiError::ManifestLoad(_)
                | ModaiError::ManifestStatus { .. }
                | ModaiError::ManifestParse(_)
        )
    }
}
