//! # scout-auth
//!
//! OAuth 2.0 authorization-code sign-in for Scout.
//!
//! Provides the [`AuthSession`] state machine (anti-forgery state, code
//! exchange, single best-effort refresh, terminal sign-out), the Google token
//! and userinfo client ([`GoogleOAuthClient`]), and a loopback redirect
//! receiver for command-line sign-in (`tiny_http` + `open`).
//!
//! Tokens live only in memory, inside the session that obtained them.

pub mod browser_flow;
pub mod error;
pub mod provider;
pub mod session;
pub mod token;

pub use error::AuthError;
pub use provider::{DEFAULT_SCOPES, GoogleOAuthClient, OAuthClientConfig, TokenEndpoint, UserInfo};
pub use session::{AuthSession, SessionStatus};
pub use token::{TokenResponse, TokenSet};
