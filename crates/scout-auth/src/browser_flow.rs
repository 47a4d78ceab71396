//! Loopback sign-in: receive the OAuth redirect on a local HTTP listener.
//!
//! 1. Bind `tiny_http` on the redirect URI's host and port
//! 2. Build the authorization URL and open the browser at it
//! 3. Wait for `<redirect path>?code=…&state=…` (in `spawn_blocking`, since `tiny_http::recv` blocks)
//! 4. Hand `code` and `state` to [`AuthSession::complete_authorization`]

use std::time::{Duration, Instant};

use scout_core::{ProgressSink, Stage};

use crate::error::AuthError;
use crate::provider::TokenEndpoint;
use crate::session::AuthSession;
use crate::token::TokenSet;

/// Query parameters delivered on a successful redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackParams {
    pub code: String,
    pub state: String,
}

/// Local listener for the provider redirect.
pub struct CallbackServer {
    server: tiny_http::Server,
    path: String,
}

impl CallbackServer {
    /// Bind to the host and port named in `redirect_uri`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::BrowserFlowFailed` if the URI cannot be parsed or the
    /// address cannot be bound.
    pub fn bind(redirect_uri: &str) -> Result<Self, AuthError> {
        let url = reqwest::Url::parse(redirect_uri)
            .map_err(|e| AuthError::BrowserFlowFailed(format!("invalid redirect URI: {e}")))?;
        let host = url
            .host_str()
            .ok_or_else(|| AuthError::BrowserFlowFailed("redirect URI has no host".into()))?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| AuthError::BrowserFlowFailed("redirect URI has no port".into()))?;

        let server = tiny_http::Server::http((host, port))
            .map_err(|e| AuthError::BrowserFlowFailed(format!("failed to bind {host}:{port}: {e}")))?;

        Ok(Self {
            server,
            path: url.path().to_string(),
        })
    }

    /// Port actually bound (differs from the URI when it names port 0).
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.server.server_addr().to_ip().map(|addr| addr.port())
    }

    /// Block until the redirect arrives or `timeout` elapses.
    ///
    /// Requests for other paths (favicon, preflight) and requests without
    /// `code`/`error` parameters are answered and ignored.
    ///
    /// # Errors
    ///
    /// - `AuthError::ProviderError` if the provider redirected with `error=…`
    ///   (for example the user denied consent).
    /// - `AuthError::BrowserFlowFailed` on timeout or listener failure.
    pub fn wait(self, timeout: Duration) -> Result<CallbackParams, AuthError> {
        let deadline = Instant::now() + timeout;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(timed_out(timeout));
            }

            let request = match self.server.recv_timeout(remaining) {
                Ok(Some(req)) => req,
                Ok(None) => return Err(timed_out(timeout)),
                Err(e) => return Err(AuthError::BrowserFlowFailed(format!("recv error: {e}"))),
            };

            let url = request.url().to_string();
            let (path, query) = url.split_once('?').unwrap_or((url.as_str(), ""));
            if path != self.path {
                let _ = request.respond(tiny_http::Response::empty(204));
                continue;
            }

            match parse_callback_query(query) {
                CallbackQuery::Code(params) => {
                    let _ = request.respond(html_response(
                        "<h1>Signed in</h1><p>You can close this tab and return to the terminal.</p>",
                    ));
                    return Ok(params);
                }
                CallbackQuery::Denied(error) => {
                    let _ = request.respond(html_response(
                        "<h1>Sign-in failed</h1><p>Check the terminal for details.</p>",
                    ));
                    return Err(AuthError::ProviderError(format!(
                        "authorization denied: {error}"
                    )));
                }
                CallbackQuery::Incomplete => {
                    let _ = request.respond(html_response(
                        "<h1>Waiting for sign-in…</h1><p>Redirecting, please wait.</p>",
                    ));
                }
            }
        }
    }
}

/// Run the whole browser sign-in for `session`.
///
/// The listener is bound before the authorization URL is built, so a fast
/// redirect cannot arrive before anyone is listening. When `open_browser` is
/// false (or launching fails) the URL is printed for the user to open.
///
/// # Errors
///
/// Propagates binding, timeout, provider, and state-mismatch errors.
pub async fn login<P: TokenEndpoint>(
    session: &mut AuthSession<P>,
    redirect_uri: &str,
    timeout: Duration,
    open_browser: bool,
    sink: &dyn ProgressSink,
) -> Result<TokenSet, AuthError> {
    let server = CallbackServer::bind(redirect_uri)?;
    let auth_url = session.build_authorization_url(redirect_uri)?;

    sink.started(Stage::Auth, "waiting for browser sign-in");
    eprintln!("Sign in with Google: {auth_url}");
    if open_browser && let Err(error) = open::that(&auth_url) {
        eprintln!("Failed to open browser: {error}");
        eprintln!("Open the URL above manually, then return here.");
    }

    let params = tokio::task::spawn_blocking(move || server.wait(timeout))
        .await
        .map_err(|e| AuthError::BrowserFlowFailed(format!("spawn_blocking join: {e}")))??;

    let token = session
        .complete_authorization(&params.code, &params.state)
        .await?;
    sink.finished(Stage::Auth, "signed in");
    Ok(token)
}

#[derive(Debug, PartialEq, Eq)]
enum CallbackQuery {
    Code(CallbackParams),
    Denied(String),
    Incomplete,
}

fn parse_callback_query(query: &str) -> CallbackQuery {
    let mut code = None;
    let mut state = None;
    let mut error = None;

    for pair in query.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        let value = urlencoding::decode(value)
            .map(std::borrow::Cow::into_owned)
            .unwrap_or_else(|_| value.to_string());
        match key {
            "code" => code = Some(value),
            "state" => state = Some(value),
            "error" => error = Some(value),
            _ => {}
        }
    }

    if let Some(error) = error {
        return CallbackQuery::Denied(error);
    }
    match code {
        Some(code) => CallbackQuery::Code(CallbackParams {
            code,
            state: state.unwrap_or_default(),
        }),
        None => CallbackQuery::Incomplete,
    }
}

fn html_response(body: &str) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let page = format!("<html><body>{body}</body></html>");
    let response = tiny_http::Response::from_string(page);
    match tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"text/html; charset=utf-8"[..]) {
        Ok(header) => response.with_header(header),
        Err(()) => response,
    }
}

fn timed_out(timeout: Duration) -> AuthError {
    AuthError::BrowserFlowFailed(format!(
        "browser callback timed out after {}s",
        timeout.as_secs()
    ))
}
