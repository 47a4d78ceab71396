//! Extraction error types.

use thiserror::Error;

/// Why one URL could not be fetched.
///
/// Always scoped to a single URL; extraction as a whole never fails.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP transport error (DNS, connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server returned HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The response body was empty or whitespace.
    #[error("empty response body")]
    EmptyBody,

    /// The response is not an HTML document (PDF, image, JSON).
    #[error("not an HTML page ({content_type})")]
    NotHtml {
        /// The `Content-Type` header as sent.
        content_type: String,
    },
}

/// Why one URL produced no article. Rendered into the skip diagnostic.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The URL (or the URL the fetch ended at) does not parse.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// The page parsed but no content block survived scoring.
    #[error("no readable content found")]
    NoContent,
}
