//! Drive error types.

use thiserror::Error;

/// Errors from a single Drive API call.
#[derive(Debug, Error)]
pub enum StorageError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Drive returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by Drive.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// Failed to parse a Drive response.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Errors from persisting a research run.
#[derive(Debug, Error)]
pub enum PersistError {
    /// A folder could not be found or created. Aborts persistence.
    #[error("could not resolve folder '{folder}': {reason}")]
    FolderResolutionFailed { folder: String, reason: String },

    /// One file could not be written. Reported, never returned from `persist`.
    #[error("could not upload '{file}': {reason}")]
    UploadFailed { file: String, reason: String },
}
