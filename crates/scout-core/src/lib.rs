//! # scout-core
//!
//! Core types shared by every Scout crate.
//!
//! - Research records: [`CompanyProfile`], [`ArticleRef`], [`ExtractedArticle`]
//! - Storage output: [`StorageRecord`]
//! - Progress reporting: [`ProgressSink`], [`ProgressEvent`], [`Diagnostic`]
//! - The orchestrator's success value: [`PipelineReport`]

pub mod profile;
pub mod progress;
pub mod report;
pub mod storage;

pub use profile::{ArticleRef, CompanyProfile, ExtractedArticle};
pub use progress::{Diagnostic, DiagnosticRecorder, NullSink, ProgressEvent, ProgressSink, Stage};
pub use report::PipelineReport;
pub use storage::StorageRecord;
