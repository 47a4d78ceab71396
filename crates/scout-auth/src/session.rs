//! Authorization-code session state machine.
//!
//! ```text
//! Unauthenticated ──build_authorization_url──▶ AuthorizationRequested
//!        ▲                                            │
//!        │ state mismatch / exchange failure          │ complete_authorization
//!        │                                            ▼
//!        └──────────────── sign_out ◀──────────── Authenticated ◀──┐
//!                                                     │            │ refresh
//!                                                     ▼            │
//!                                                  Expired ────────┘
//! ```
//!
//! Sign-out is terminal: the session refuses to start a new authorization and a
//! fresh [`AuthSession`] must be constructed.

use base64::Engine as _;
use chrono::Utc;

use crate::error::AuthError;
use crate::provider::{DEFAULT_SCOPES, TokenEndpoint};
use crate::token::TokenSet;

/// Observable session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Unauthenticated,
    AuthorizationRequested,
    Authenticated,
    Expired,
}

enum SessionState {
    Unauthenticated,
    AuthorizationRequested { pending_state: String },
    Authenticated(TokenSet),
    /// Only the refresh credential survives expiry.
    Expired { refresh_token: Option<String> },
}

/// One user's OAuth session for the lifetime of the process.
pub struct AuthSession<P> {
    provider: P,
    client_id: String,
    auth_uri: String,
    scopes: Vec<String>,
    redirect_uri: Option<String>,
    state: SessionState,
    closed: bool,
}

impl<P: TokenEndpoint> AuthSession<P> {
    #[must_use]
    pub fn new(provider: P, client_id: impl Into<String>, auth_uri: impl Into<String>) -> Self {
        Self {
            provider,
            client_id: client_id.into(),
            auth_uri: auth_uri.into(),
            scopes: DEFAULT_SCOPES.iter().map(|s| (*s).to_string()).collect(),
            redirect_uri: None,
            state: SessionState::Unauthenticated,
            closed: false,
        }
    }

    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    #[must_use]
    pub fn redirect_uri(&self) -> Option<&str> {
        self.redirect_uri.as_deref()
    }

    /// Current state; an authenticated session whose token has lapsed reports
    /// [`SessionStatus::Expired`].
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        match &self.state {
            SessionState::Unauthenticated => SessionStatus::Unauthenticated,
            SessionState::AuthorizationRequested { .. } => SessionStatus::AuthorizationRequested,
            SessionState::Authenticated(token) if token.is_expired() => SessionStatus::Expired,
            SessionState::Authenticated(_) => SessionStatus::Authenticated,
            SessionState::Expired { .. } => SessionStatus::Expired,
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.status() == SessionStatus::Authenticated
    }

    /// Token held by the session, present only while authenticated and
    /// unexpired. Agrees with [`Self::status`].
    #[must_use]
    pub fn token(&self) -> Option<&TokenSet> {
        match &self.state {
            SessionState::Authenticated(token) if !token.is_expired() => Some(token),
            _ => None,
        }
    }

    /// Start an authorization attempt.
    ///
    /// Generates a fresh anti-forgery token, stores it as pending (replacing any
    /// earlier attempt), and returns the provider URL to send the user to.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::ReauthRequired` on a signed-out session, or
    /// `AuthError::ProviderError` if no random state can be generated.
    pub fn build_authorization_url(&mut self, redirect_uri: &str) -> Result<String, AuthError> {
        if self.closed {
            return Err(AuthError::ReauthRequired(
                "session was signed out; start a new session".into(),
            ));
        }

        let pending_state = generate_state()?;
        let scope = self.scopes.join(" ");
        let url = format!(
            "{auth_uri}?client_id={client_id}&redirect_uri={redirect}&response_type=code\
             &scope={scope}&state={state}&access_type=offline&include_granted_scopes=true\
             &prompt=consent",
            auth_uri = self.auth_uri,
            client_id = urlencoding::encode(&self.client_id),
            redirect = urlencoding::encode(redirect_uri),
            scope = urlencoding::encode(&scope),
            state = urlencoding::encode(&pending_state),
        );

        tracing::debug!(redirect_uri, "authorization requested");
        self.redirect_uri = Some(redirect_uri.to_string());
        self.state = SessionState::AuthorizationRequested { pending_state };
        Ok(url)
    }

    /// Finish an authorization attempt with the callback's `code` and `state`.
    ///
    /// # Errors
    ///
    /// - `AuthError::StateMismatch` if `returned_state` differs from the pending
    ///   anti-forgery token or nothing is pending. No provider call is made.
    /// - `AuthError::ProviderError` if the code exchange fails.
    ///
    /// A failed attempt leaves a pending session `Unauthenticated`; a session
    /// with nothing pending keeps its current state.
    pub async fn complete_authorization(
        &mut self,
        code: &str,
        returned_state: &str,
    ) -> Result<TokenSet, AuthError> {
        let SessionState::AuthorizationRequested { pending_state } = &self.state else {
            tracing::warn!("authorization callback received with no pending request");
            return Err(AuthError::StateMismatch);
        };
        let pending = pending_state.clone();

        // A callback consumes the pending attempt whatever its outcome.
        self.state = SessionState::Unauthenticated;

        if pending != returned_state {
            tracing::warn!("authorization callback state does not match pending request");
            return Err(AuthError::StateMismatch);
        }

        let redirect_uri = self.redirect_uri.clone().unwrap_or_default();
        let response = self.provider.exchange_code(code, &redirect_uri).await?;
        let token = TokenSet::from_response(response, Utc::now(), None);
        tracing::info!(expires_at = %token.expires_at, "authorization complete");
        self.state = SessionState::Authenticated(token.clone());
        Ok(token)
    }

    /// Return a usable access token, refreshing it once if it has expired.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::ReauthRequired` when the session is not
    /// authenticated, holds no refresh token, or the refresh call fails.
    pub async fn get_valid_token(&mut self) -> Result<TokenSet, AuthError> {
        let refresh_token = match &self.state {
            SessionState::Authenticated(token) if !token.is_expired() => return Ok(token.clone()),
            SessionState::Authenticated(token) => token.refresh_token.clone(),
            SessionState::Expired { refresh_token } => refresh_token.clone(),
            SessionState::Unauthenticated | SessionState::AuthorizationRequested { .. } => {
                return Err(AuthError::ReauthRequired("not signed in".into()));
            }
        };

        self.state = SessionState::Expired {
            refresh_token: refresh_token.clone(),
        };

        let Some(refresh_token) = refresh_token else {
            return Err(AuthError::ReauthRequired(
                "access token expired and no refresh token was issued".into(),
            ));
        };

        match self.provider.refresh(&refresh_token).await {
            Ok(response) => {
                let token = TokenSet::from_response(response, Utc::now(), Some(refresh_token));
                tracing::info!(expires_at = %token.expires_at, "access token refreshed");
                self.state = SessionState::Authenticated(token.clone());
                Ok(token)
            }
            Err(error) => {
                tracing::warn!(%error, "token refresh failed");
                Err(AuthError::ReauthRequired(format!("token refresh failed: {error}")))
            }
        }
    }

    /// Clear all credentials and close the session.
    pub fn sign_out(&mut self) {
        self.state = SessionState::Unauthenticated;
        self.redirect_uri = None;
        self.closed = true;
        tracing::info!("signed out");
    }
}

/// 32 random bytes, URL-safe base64 without padding.
fn generate_state() -> Result<String, AuthError> {
    let mut bytes = [0u8; 32];
    getrandom::fill(&mut bytes)
        .map_err(|e| AuthError::ProviderError(format!("failed to generate anti-forgery token: {e}")))?;
    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
}
