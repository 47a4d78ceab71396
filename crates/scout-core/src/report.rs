//! Orchestrator output returned to the external driver.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CompanyProfile, Diagnostic, StorageRecord};

/// Outcome of a complete research run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub company_name: String,
    pub profile: CompanyProfile,
    /// Number of article URLs that yielded readable content.
    pub extracted_count: usize,
    pub record: StorageRecord,
    /// Every non-fatal failure observed during the run, in order.
    pub diagnostics: Vec<Diagnostic>,
    pub completed_at: DateTime<Utc>,
}

impl PipelineReport {
    /// Whether any item was skipped or degraded along the way.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}
