//! Turning configuration into ready-to-use clients.

use anyhow::Context;
use scout_auth::{AuthSession, GoogleOAuthClient, OAuthClientConfig};
use scout_config::ScoutConfig;
use scout_drive::{DriveClient, PersistenceLayer};
use scout_extract::{ContentExtractor, HttpFetcher};
use scout_pipeline::Orchestrator;
use scout_research::{GeminiClient, ResearchPipeline};

pub type Session = AuthSession<GoogleOAuthClient>;
pub type ScoutOrchestrator = Orchestrator<GeminiClient, HttpFetcher, DriveClient>;

pub fn load_config() -> anyhow::Result<ScoutConfig> {
    ScoutConfig::load_with_dotenv().context("failed to load scout configuration")
}

/// A fresh, signed-out session for the configured OAuth client.
pub fn session(config: &ScoutConfig) -> anyhow::Result<Session> {
    config
        .google
        .validate()
        .context("Google OAuth client is not configured (set GOOGLE_CLIENT_ID and GOOGLE_CLIENT_SECRET)")?;

    let google = &config.google;
    let client = GoogleOAuthClient::new(OAuthClientConfig {
        client_id: google.client_id.clone(),
        client_secret: google.client_secret.clone(),
        auth_uri: google.auth_uri.clone(),
        token_uri: google.token_uri.clone(),
        userinfo_uri: google.userinfo_uri.clone(),
    })
    .context("failed to build OAuth client")?;

    Ok(AuthSession::new(client, google.client_id.clone(), google.auth_uri.clone()))
}

pub fn research(config: &ScoutConfig) -> anyhow::Result<ResearchPipeline<GeminiClient>> {
    config
        .require_gemini()
        .context("Gemini is not configured (set GEMINI_API_KEY)")?;
    let client = GeminiClient::new(&config.gemini).context("failed to build Gemini client")?;
    Ok(ResearchPipeline::new(client))
}

pub fn extractor(
    config: &ScoutConfig,
    max_chars: Option<usize>,
) -> anyhow::Result<ContentExtractor<HttpFetcher>> {
    let fetcher = HttpFetcher::new(&config.extract).context("failed to build page fetcher")?;
    Ok(ContentExtractor::new(
        fetcher,
        max_chars.unwrap_or(config.extract.max_content_chars),
    ))
}

pub fn orchestrator(
    config: &ScoutConfig,
    root_folder: Option<&str>,
) -> anyhow::Result<ScoutOrchestrator> {
    let drive = DriveClient::new(&config.drive).context("failed to build Drive client")?;
    let root_folder = root_folder.unwrap_or(&config.drive.root_folder_name);
    Ok(Orchestrator::new(
        research(config)?,
        extractor(config, None)?,
        PersistenceLayer::new(drive, root_folder),
    ))
}
