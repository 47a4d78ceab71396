//! Progress and diagnostic reporting.
//!
//! Every pipeline stage reports what it is doing through a [`ProgressSink`]
//! supplied by the caller. Per-item failures (a URL that could not be fetched,
//! a file that could not be uploaded) are reported as [`Diagnostic`]s and never
//! abort the stage that produced them.

use std::fmt;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Pipeline stage that emitted an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Auth,
    Research,
    Extract,
    Persist,
}

impl Stage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Research => "research",
            Self::Extract => "extract",
            Self::Persist => "persist",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal, per-item failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub stage: Stage,
    /// What the failure is about: a URL, a file name, or a profile section.
    pub subject: String,
    pub message: String,
}

impl Diagnostic {
    #[must_use]
    pub fn new(stage: Stage, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            stage,
            subject: subject.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.stage, self.subject, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    StageStarted { stage: Stage, message: String },
    Info { stage: Stage, message: String },
    Warning(Diagnostic),
    StageFinished { stage: Stage, message: String },
}

/// Receiver for progress events.
///
/// Implementations must not block for long: events are emitted inline between
/// network calls.
pub trait ProgressSink: Send + Sync {
    fn report(&self, event: &ProgressEvent);

    fn started(&self, stage: Stage, message: &str) {
        self.report(&ProgressEvent::StageStarted {
            stage,
            message: message.to_string(),
        });
    }

    fn info(&self, stage: Stage, message: &str) {
        self.report(&ProgressEvent::Info {
            stage,
            message: message.to_string(),
        });
    }

    fn warn(&self, diagnostic: Diagnostic) {
        self.report(&ProgressEvent::Warning(diagnostic));
    }

    fn finished(&self, stage: Stage, message: &str) {
        self.report(&ProgressEvent::StageFinished {
            stage,
            message: message.to_string(),
        });
    }
}

/// Sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn report(&self, _event: &ProgressEvent) {}
}

/// Forwards events to an inner sink while keeping a copy of every warning.
pub struct DiagnosticRecorder<'a> {
    inner: &'a dyn ProgressSink,
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl<'a> DiagnosticRecorder<'a> {
    #[must_use]
    pub fn new(inner: &'a dyn ProgressSink) -> Self {
        Self {
            inner,
            diagnostics: Mutex::new(Vec::new()),
        }
    }

    /// Warnings recorded so far, in emission order.
    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl ProgressSink for DiagnosticRecorder<'_> {
    fn report(&self, event: &ProgressEvent) {
        if let ProgressEvent::Warning(diagnostic) = event {
            self.diagnostics
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .push(diagnostic.clone());
        }
        self.inner.report(event);
    }
}
