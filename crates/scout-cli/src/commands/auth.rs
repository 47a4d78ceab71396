use std::time::Duration;

use anyhow::Context;
use scout_auth::TokenSet;
use scout_config::ScoutConfig;
use scout_core::ProgressSink;
use serde::Serialize;

use crate::bootstrap::{self, Session};
use crate::cli::{AuthCommands, GlobalFlags};
use crate::output::output;
use crate::progress::SpinnerSink;

#[derive(Serialize)]
struct AuthUrlResponse {
    authorization_url: String,
    redirect_uri: String,
}

#[derive(Serialize)]
struct AuthLoginResponse {
    authenticated: bool,
    email: Option<String>,
    name: Option<String>,
    expires_at: String,
}

pub async fn handle(
    action: &AuthCommands,
    config: &ScoutConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        AuthCommands::Url => handle_url(config, flags),
        AuthCommands::Login => handle_login(config, flags).await,
    }
}

fn handle_url(config: &ScoutConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut session = bootstrap::session(config)?;
    let redirect_uri = config.google.redirect_uri.clone();
    let authorization_url = session
        .build_authorization_url(&redirect_uri)
        .context("failed to build authorization URL")?;

    output(
        &AuthUrlResponse {
            authorization_url,
            redirect_uri,
        },
        flags.format,
    )
}

async fn handle_login(config: &ScoutConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut session = bootstrap::session(config)?;
    let sink = SpinnerSink::new();
    let signed_in = sign_in(&mut session, config, flags, &sink).await;
    sink.clear();
    let token = signed_in?;

    let user = session
        .provider()
        .user_info(&token)
        .await
        .context("signed in, but the user profile could not be read")?;
    session.sign_out();

    output(
        &AuthLoginResponse {
            authenticated: true,
            email: user.email,
            name: user.name,
            expires_at: token.expires_at.to_rfc3339(),
        },
        flags.format,
    )
}

/// Browser sign-in on the configured redirect URI.
pub(crate) async fn sign_in(
    session: &mut Session,
    config: &ScoutConfig,
    flags: &GlobalFlags,
    sink: &dyn ProgressSink,
) -> anyhow::Result<TokenSet> {
    let open_browser = config.general.open_browser && !flags.no_browser;
    scout_auth::browser_flow::login(
        session,
        &config.google.redirect_uri,
        Duration::from_secs(config.general.login_timeout_secs),
        open_browser,
        sink,
    )
    .await
    .context("Google sign-in failed")
}
