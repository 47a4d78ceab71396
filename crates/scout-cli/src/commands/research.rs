use std::collections::BTreeMap;

use anyhow::Context;
use scout_config::ScoutConfig;
use scout_core::{Diagnostic, PipelineReport};
use serde::Serialize;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::ResearchArgs;
use crate::commands::auth::sign_in;
use crate::output::output;
use crate::progress::SpinnerSink;

#[derive(Serialize)]
struct ResearchResponse<'a> {
    company: &'a str,
    folder: &'a str,
    folder_link: &'a str,
    files: &'a BTreeMap<String, String>,
    competitors: &'a [String],
    articles_found: usize,
    articles_extracted: usize,
    partial: bool,
    diagnostics: &'a [Diagnostic],
    completed_at: String,
}

impl<'a> From<&'a PipelineReport> for ResearchResponse<'a> {
    fn from(report: &'a PipelineReport) -> Self {
        Self {
            company: &report.company_name,
            folder: &report.record.company_folder_name,
            folder_link: &report.record.folder_link,
            files: &report.record.file_links,
            competitors: &report.profile.competitors,
            articles_found: report.profile.articles.len(),
            articles_extracted: report.extracted_count,
            partial: report.is_partial(),
            diagnostics: &report.diagnostics,
            completed_at: report.completed_at.to_rfc3339(),
        }
    }
}

pub async fn handle(
    args: &ResearchArgs,
    config: &ScoutConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    if args.company.trim().is_empty() {
        anyhow::bail!("research: company name must not be empty");
    }
    config
        .require_research_ready()
        .context("research needs both Google OAuth and Gemini configured")?;

    let orchestrator = bootstrap::orchestrator(config, args.folder.as_deref())?;
    tracing::info!(
        model = orchestrator.research().model().model(),
        company = args.company.trim(),
        "starting research"
    );
    let mut session = bootstrap::session(config)?;
    let sink = SpinnerSink::new();

    let signed_in = sign_in(&mut session, config, flags, &sink).await;
    if let Err(error) = signed_in {
        sink.clear();
        return Err(error);
    }

    let result = orchestrator.run(&mut session, &args.company, &sink).await;
    sink.clear();
    session.sign_out();

    let report =
        result.with_context(|| format!("research run for '{}' failed", args.company.trim()))?;
    for diagnostic in &report.diagnostics {
        tracing::debug!(%diagnostic, "run diagnostic");
    }
    output(&ResearchResponse::from(&report), flags.format)
}
