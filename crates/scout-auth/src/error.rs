use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// The `state` returned on the callback does not match the pending
    /// anti-forgery token. Authorization must be restarted.
    #[error("OAuth state mismatch; restart sign-in")]
    StateMismatch,

    #[error("re-authentication required: {0}")]
    ReauthRequired(String),

    #[error("identity provider error: {0}")]
    ProviderError(String),

    #[error("browser sign-in failed: {0}")]
    BrowserFlowFailed(String),
}
