use scout_config::ScoutConfig;
use scout_core::{Diagnostic, DiagnosticRecorder, ExtractedArticle};
use serde::Serialize;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::ExtractArgs;
use crate::output::output;
use crate::progress::SpinnerSink;

#[derive(Serialize)]
struct ExtractResponse {
    requested: usize,
    extracted: usize,
    articles: Vec<ExtractedArticle>,
    skipped: Vec<Diagnostic>,
}

pub async fn handle(
    args: &ExtractArgs,
    config: &ScoutConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let extractor = bootstrap::extractor(config, args.max_chars)?;
    let sink = SpinnerSink::new();
    let recorder = DiagnosticRecorder::new(&sink);

    let articles = extractor.extract(&args.urls, &recorder).await;
    let skipped = recorder.into_diagnostics();
    sink.clear();

    output(
        &ExtractResponse {
            requested: args.urls.len(),
            extracted: articles.len(),
            articles,
            skipped,
        },
        flags.format,
    )
}
