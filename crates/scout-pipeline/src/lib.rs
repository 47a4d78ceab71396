//! # scout-pipeline
//!
//! The [`Orchestrator`] sequences one research request:
//!
//! 1. obtain a valid token from the caller's [`scout_auth::AuthSession`]
//! 2. research the company ([`scout_research::ResearchPipeline`])
//! 3. extract the suggested articles ([`scout_extract::ContentExtractor`])
//! 4. refresh the token if needed and save to Drive
//!    ([`scout_drive::PersistenceLayer`])
//!
//! Non-fatal failures along the way are collected into the
//! [`scout_core::PipelineReport`] as diagnostics.

pub mod error;
pub mod orchestrator;

pub use error::PipelineError;
pub use orchestrator::Orchestrator;
