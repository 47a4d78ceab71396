//! Google OAuth client configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_redirect_uri() -> String {
    String::from("http://127.0.0.1:8501/callback")
}

fn default_auth_uri() -> String {
    String::from("https://accounts.google.com/o/oauth2/auth")
}

fn default_token_uri() -> String {
    String::from("https://oauth2.googleapis.com/token")
}

fn default_userinfo_uri() -> String {
    String::from("https://www.googleapis.com/oauth2/v2/userinfo")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GoogleConfig {
    /// OAuth client ID (legacy env: `GOOGLE_CLIENT_ID`).
    #[serde(default)]
    pub client_id: String,

    /// OAuth client secret (legacy env: `GOOGLE_CLIENT_SECRET`).
    #[serde(default)]
    pub client_secret: String,

    /// Where the provider sends the user back (legacy env: `REDIRECT_URI`).
    /// The CLI listens on this host and port for the callback.
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,

    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,

    #[serde(default = "default_token_uri")]
    pub token_uri: String,

    #[serde(default = "default_userinfo_uri")]
    pub userinfo_uri: String,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: default_redirect_uri(),
            auth_uri: default_auth_uri(),
            token_uri: default_token_uri(),
            userinfo_uri: default_userinfo_uri(),
        }
    }
}

impl GoogleConfig {
    /// Check if the OAuth client credentials are present.
    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }

    /// Ensure credentials are present and the redirect URI is an HTTP(S) URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] when the client ID or secret is
    /// missing, or [`ConfigError::InvalidValue`] for a malformed redirect URI.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.is_configured() {
            return Err(ConfigError::NotConfigured {
                section: "google".into(),
            });
        }
        if !(self.redirect_uri.starts_with("http://") || self.redirect_uri.starts_with("https://"))
        {
            return Err(ConfigError::InvalidValue {
                field: "google.redirect_uri".into(),
                reason: format!("expected an http(s) URL, got '{}'", self.redirect_uri),
            });
        }
        Ok(())
    }
}
