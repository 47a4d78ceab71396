//! Identity provider HTTP client.
//!
//! [`TokenEndpoint`] is the seam [`crate::AuthSession`] calls through; the
//! production implementation is [`GoogleOAuthClient`], which talks to Google's
//! OAuth 2.0 token and userinfo endpoints with `reqwest`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::token::{TokenResponse, TokenSet};

/// OAuth scopes requested at sign-in: file creation in Drive plus identity.
pub const DEFAULT_SCOPES: [&str; 4] = [
    "https://www.googleapis.com/auth/drive.file",
    "openid",
    "https://www.googleapis.com/auth/userinfo.email",
    "https://www.googleapis.com/auth/userinfo.profile",
];

/// The two token-endpoint grants a session needs.
///
/// Each method makes exactly one outbound call.
#[async_trait]
pub trait TokenEndpoint: Send + Sync {
    /// Exchange an authorization code (`grant_type=authorization_code`).
    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenResponse, AuthError>;

    /// Mint a new access token (`grant_type=refresh_token`).
    async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, AuthError>;
}

/// OAuth client registration and endpoint locations.
#[derive(Debug, Clone)]
pub struct OAuthClientConfig {
    pub client_id: String,
    pub client_secret: String,
    pub auth_uri: String,
    pub token_uri: String,
    pub userinfo_uri: String,
}

/// Signed-in user's profile, from the userinfo endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

/// Google OAuth 2.0 client.
pub struct GoogleOAuthClient {
    http: reqwest::Client,
    config: OAuthClientConfig,
}

impl GoogleOAuthClient {
    /// # Errors
    ///
    /// Returns `AuthError::ProviderError` if the HTTP client cannot be built.
    pub fn new(config: OAuthClientConfig) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .user_agent("scout/0.1")
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| AuthError::ProviderError(format!("build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    /// Fetch the signed-in user's email and name.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::ProviderError` if the request fails or returns non-200.
    pub async fn user_info(&self, token: &TokenSet) -> Result<UserInfo, AuthError> {
        tracing::debug!(uri = %self.config.userinfo_uri, "fetching user info");
        let resp = self
            .http
            .get(&self.config.userinfo_uri)
            .header(reqwest::header::AUTHORIZATION, token.bearer())
            .send()
            .await
            .map_err(|e| AuthError::ProviderError(format!("userinfo: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(AuthError::ProviderError(format!(
                "userinfo: HTTP {status}: {body}"
            )));
        }

        resp.json()
            .await
            .map_err(|e| AuthError::ProviderError(format!("parse userinfo: {e}")))
    }

    async fn post_token(
        &self,
        grant: &str,
        params: &[(&str, &str)],
    ) -> Result<TokenResponse, AuthError> {
        let mut pairs = vec![
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("grant_type", grant),
        ];
        pairs.extend_from_slice(params);

        tracing::debug!(grant, uri = %self.config.token_uri, "calling token endpoint");
        let resp = self
            .http
            .post(&self.config.token_uri)
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(form_encode(&pairs))
            .send()
            .await
            .map_err(|e| AuthError::ProviderError(format!("{grant}: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(AuthError::ProviderError(format!(
                "{grant}: HTTP {status}: {}",
                describe_token_error(&body)
            )));
        }

        resp.json()
            .await
            .map_err(|e| AuthError::ProviderError(format!("parse token response: {e}")))
    }
}

#[async_trait]
impl TokenEndpoint for GoogleOAuthClient {
    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenResponse, AuthError> {
        self.post_token(
            "authorization_code",
            &[("code", code), ("redirect_uri", redirect_uri)],
        )
        .await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, AuthError> {
        self.post_token("refresh_token", &[("refresh_token", refresh_token)])
            .await
    }
}

/// `application/x-www-form-urlencoded` body.
pub(crate) fn form_encode(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Render an OAuth error body (`{"error": ..., "error_description": ...}`),
/// falling back to the raw body.
fn describe_token_error(body: &str) -> String {
    #[derive(Deserialize)]
    struct OAuthErrorBody {
        error: String,
        #[serde(default)]
        error_description: Option<String>,
    }

    match serde_json::from_str::<OAuthErrorBody>(body) {
        Ok(OAuthErrorBody {
            error,
            error_description: Some(description),
        }) => format!("{error}: {description}"),
        Ok(OAuthErrorBody { error, .. }) => error,
        Err(_) => body.to_string(),
    }
}
