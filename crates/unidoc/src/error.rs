//! CLI error types.

use unidoc_config::ConfigError;
use unidoc_site::{GenerateError, ManifestError};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Generate(#[from] GenerateError),

    #[error("{0}")]
    Manifest(#[from] ManifestError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// Invalid arguments; reported with usage and exit code 2.
    #[error("{0}")]
    Usage(String),
}

impl CliError {
    /// Process exit code for this error.
    pub(crate) fn exit_code(&self) -> u8 {
        match self {
            Self::Usage(_) => 2,
            _ => 1,
        }
    }
}
