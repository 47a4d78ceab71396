//! Errors raised while loading or validating Scout settings.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A TOML file or environment variable could not be read into [`crate::ScoutConfig`].
    #[error("failed to load scout settings: {0}")]
    Figment(#[from] figment::Error),

    /// A section needed by the requested command has no credentials.
    #[error("'{section}' settings are missing (set them in the environment or .scout/config.toml)")]
    NotConfigured { section: String },

    #[error("'{field}' is invalid: {reason}")]
    InvalidValue { field: String, reason: String },
}
