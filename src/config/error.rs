//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::validate::ValidationError;

/// Configuration-related errors
///
/// Raised before any page is registered; no partially configured site is
/// ever handed out.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("site domain rejected: {0}")]
    Domain(#[source] ValidationError),

    #[error("base path '{base_path}' rejected: {source}")]
    BasePath {
        base_path: String,
        source: ValidationError,
    },

    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("config file parsing error")]
    Toml(#[from] toml::de::Error),
}

impl ConfigError {
    /// The validation failure behind a rejected domain or base path, if any.
    pub fn validation(&self) -> Option<ValidationError> {
        match self {
            Self::Domain(err) | Self::BasePath { source: err, .. } => Some(*err),
            _ => None,
        }
    }
}
