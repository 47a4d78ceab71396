//! # scout-research
//!
//! Company research through a language model.
//!
//! [`ResearchPipeline`] sends three prompts (overview, competitors, articles)
//! through a [`LanguageModel`] and parses the free-text answers into a
//! [`scout_core::CompanyProfile`]. [`GeminiClient`] is the production model.

pub mod error;
pub mod gemini;
pub mod model;
pub mod parse;
pub mod pipeline;
pub mod prompts;

pub use error::{ModelError, ResearchError};
pub use gemini::GeminiClient;
pub use model::LanguageModel;
pub use parse::{parse_articles, parse_competitors};
pub use pipeline::{ResearchOutcome, ResearchPipeline};
