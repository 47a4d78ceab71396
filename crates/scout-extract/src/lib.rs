//! # scout-extract
//!
//! Turns article URLs into readable Markdown.
//!
//! [`ContentExtractor`] fetches each URL through a [`PageFetcher`]
//! ([`HttpFetcher`] in production), parses the HTML with the tree-sitter HTML
//! grammar (via `ast-grep`), picks the main content block, and renders it as
//! Markdown with links resolved against the page URL. Failures are per URL and
//! never abort the batch.

pub mod dom;
pub mod error;
pub mod extractor;
pub mod fetch;
pub mod markdown;
pub mod readability;

pub use error::{ExtractError, FetchError};
pub use extractor::ContentExtractor;
pub use fetch::{FetchedPage, HttpFetcher, PageFetcher};
pub use readability::{Readable, extract_readable};
