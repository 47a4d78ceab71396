use std::sync::{Mutex, OnceLock};

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use scout_core::{ProgressEvent, ProgressSink};

use crate::ui;

pub struct Progress {
    bar: Option<ProgressBar>,
}

static MULTI_PROGRESS: OnceLock<MultiProgress> = OnceLock::new();

fn multi_progress() -> &'static MultiProgress {
    MULTI_PROGRESS.get_or_init(MultiProgress::new)
}

impl Progress {
    #[must_use]
    pub fn spinner(message: &str) -> Self {
        if !ui::prefs().progress {
            return Self { bar: None };
        }

        let bar = multi_progress().add(ProgressBar::new_spinner());
        bar.enable_steady_tick(std::time::Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        Self { bar: Some(bar) }
    }

    pub fn set_prefix(&self, prefix: &str) {
        if let Some(bar) = &self.bar {
            bar.set_prefix(prefix.to_string());
        }
    }

    pub fn set_message(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(message.to_string());
        }
    }

    pub fn println(&self, line: &str) {
        if let Some(bar) = &self.bar {
            bar.println(line);
        }
    }

    pub fn finish_ok(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.finish_with_message(message.to_string());
        }
    }

    pub fn finish_clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

/// One spinner per pipeline stage; warnings are printed above it.
#[derive(Default)]
pub struct SpinnerSink {
    current: Mutex<Option<Progress>>,
}

impl SpinnerSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear a spinner left running by a stage that failed midway.
    pub fn clear(&self) {
        if let Some(progress) = self.lock().take() {
            progress.finish_clear();
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Progress>> {
        self.current
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl ProgressSink for SpinnerSink {
    fn report(&self, event: &ProgressEvent) {
        let mut current = self.lock();
        match event {
            ProgressEvent::StageStarted { stage, message } => {
                if let Some(previous) = current.take() {
                    previous.finish_clear();
                }
                let progress = Progress::spinner(message);
                progress.set_prefix(stage.as_str());
                *current = Some(progress);
            }
            ProgressEvent::Info { message, .. } => {
                if let Some(progress) = current.as_ref() {
                    progress.set_message(message);
                }
            }
            ProgressEvent::Warning(diagnostic) => {
                if let Some(progress) = current.as_ref() {
                    progress.println(&format!("  ! {diagnostic}"));
                }
            }
            ProgressEvent::StageFinished { stage, message } => {
                if let Some(progress) = current.take() {
                    progress.finish_ok(&format!("{stage}: {message}"));
                }
            }
        }
    }
}
