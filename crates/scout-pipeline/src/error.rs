//! Orchestrator error types.

use scout_auth::AuthError;
use scout_drive::PersistError;
use scout_research::ResearchError;
use thiserror::Error;

/// Failures that end a run. Per-item failures are diagnostics instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("company name is empty")]
    EmptyCompanyName,

    #[error("authorization: {0}")]
    Auth(#[from] AuthError),

    #[error("research: {0}")]
    Research(ResearchError),

    #[error("persistence: {0}")]
    Persist(#[from] PersistError),
}
