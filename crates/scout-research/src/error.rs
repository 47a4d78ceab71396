//! Research error types.

use thiserror::Error;

/// Errors from a single language-model call.
#[derive(Debug, Error)]
pub enum ModelError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Model API returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the API.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// The model answered without any text (blocked prompt, no candidates).
    #[error("model returned no text")]
    EmptyResponse,

    /// Failed to parse a model response.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Why a research outcome is not a clean profile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResearchError {
    /// A model query failed; the profile is the unavailable placeholder.
    #[error("language model unavailable: {0}")]
    ModelUnavailable(String),

    /// The model answered but some of the answer could not be used.
    #[error("research answer only partially usable: {0}")]
    ParseDegraded(String),
}

impl ResearchError {
    /// Whether the accompanying profile must not be used downstream.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::ModelUnavailable(_))
    }
}
