use scout_config::ScoutConfig;
use scout_core::CompanyProfile;
use scout_research::ResearchError;
use serde::Serialize;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::ProfileArgs;
use crate::output::output;
use crate::progress::SpinnerSink;

#[derive(Serialize)]
struct ProfileResponse<'a> {
    company: &'a str,
    profile: &'a CompanyProfile,
    degraded: Option<String>,
}

pub async fn handle(
    args: &ProfileArgs,
    config: &ScoutConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let company = args.company.trim();
    if company.is_empty() {
        anyhow::bail!("profile: company name must not be empty");
    }

    let pipeline = bootstrap::research(config)?;
    let sink = SpinnerSink::new();
    let outcome = pipeline.research(company, &sink).await;
    sink.clear();

    let degraded = match outcome.error {
        Some(error @ ResearchError::ModelUnavailable(_)) => {
            return Err(anyhow::Error::new(error).context(format!("research for '{company}' failed")));
        }
        Some(ResearchError::ParseDegraded(reason)) => Some(reason),
        None => None,
    };

    output(
        &ProfileResponse {
            company,
            profile: &outcome.profile,
            degraded,
        },
        flags.format,
    )
}
