//! State-machine tests for `AuthSession` against an in-memory token endpoint.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use rstest::rstest;
use scout_auth::{AuthError, AuthSession, SessionStatus, TokenEndpoint, TokenResponse};

const REDIRECT: &str = "http://127.0.0.1:8501/callback";

/// Token endpoint that counts calls and returns scripted lifetimes.
struct FakeEndpoint {
    exchange_calls: AtomicUsize,
    refresh_calls: AtomicUsize,
    exchange_expires_in: i64,
    exchange_refresh_token: Option<String>,
    fail_exchange: bool,
    fail_refresh: bool,
    last_redirect: Mutex<Option<String>>,
}

impl FakeEndpoint {
    fn issuing(expires_in: i64, refresh_token: Option<&str>) -> Self {
        Self {
            exchange_calls: AtomicUsize::new(0),
            refresh_calls: AtomicUsize::new(0),
            exchange_expires_in: expires_in,
            exchange_refresh_token: refresh_token.map(String::from),
            fail_exchange: false,
            fail_refresh: false,
            last_redirect: Mutex::new(None),
        }
    }

    fn exchanges(&self) -> usize {
        self.exchange_calls.load(Ordering::SeqCst)
    }

    fn refreshes(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenEndpoint for FakeEndpoint {
    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenResponse, AuthError> {
        self.exchange_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_redirect.lock().unwrap() = Some(redirect_uri.to_string());
        if self.fail_exchange {
            return Err(AuthError::ProviderError("invalid_grant".into()));
        }
        Ok(TokenResponse {
            access_token: format!("access-for-{code}"),
            expires_in: Some(self.exchange_expires_in),
            refresh_token: self.exchange_refresh_token.clone(),
            scope: None,
            token_type: Some("Bearer".into()),
        })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, AuthError> {
        let n = self.refresh_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_refresh {
            return Err(AuthError::ProviderError("invalid_grant".into()));
        }
        Ok(TokenResponse {
            access_token: format!("refreshed-{n}-from-{refresh_token}"),
            expires_in: Some(3600),
            refresh_token: None,
            scope: None,
            token_type: Some("Bearer".into()),
        })
    }
}

fn session(endpoint: FakeEndpoint) -> AuthSession<FakeEndpoint> {
    AuthSession::new(
        endpoint,
        "client-123.apps.googleusercontent.com",
        "https://accounts.google.com/o/oauth2/auth",
    )
}

fn state_param(url: &str) -> String {
    reqwest::Url::parse(url)
        .unwrap()
        .query_pairs()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.into_owned())
        .expect("state param present")
}

async fn authenticated(endpoint: FakeEndpoint) -> AuthSession<FakeEndpoint> {
    let mut session = session(endpoint);
    let url = session.build_authorization_url(REDIRECT).unwrap();
    session
        .complete_authorization("code-1", &state_param(&url))
        .await
        .expect("authorization succeeds");
    session
}

#[test]
fn authorization_url_carries_scopes_redirect_and_state() {
    let mut session = session(FakeEndpoint::issuing(3600, Some("r")));
    assert_eq!(session.status(), SessionStatus::Unauthenticated);

    let url = session.build_authorization_url(REDIRECT).unwrap();
    let parsed = reqwest::Url::parse(&url).unwrap();
    let params: std::collections::HashMap<String, String> = parsed
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    assert!(url.starts_with("https://accounts.google.com/o/oauth2/auth?"));
    assert_eq!(params["client_id"], "client-123.apps.googleusercontent.com");
    assert_eq!(params["redirect_uri"], REDIRECT);
    assert_eq!(params["response_type"], "code");
    assert_eq!(params["access_type"], "offline");
    assert!(params["scope"].contains("https://www.googleapis.com/auth/drive.file"));
    assert!(params["scope"].contains("openid"));
    assert!(params["scope"].contains("userinfo.email"));
    assert!(params["scope"].contains("userinfo.profile"));
    assert!(!params["state"].is_empty());
    assert_eq!(session.status(), SessionStatus::AuthorizationRequested);
    assert_eq!(session.redirect_uri(), Some(REDIRECT));
}

#[test]
fn each_authorization_attempt_gets_a_fresh_state() {
    let mut session = session(FakeEndpoint::issuing(3600, None));
    let first = state_param(&session.build_authorization_url(REDIRECT).unwrap());
    let second = state_param(&session.build_authorization_url(REDIRECT).unwrap());
    assert_ne!(first, second);
}

#[tokio::test]
async fn matching_state_exchanges_code_once() {
    let mut session = session(FakeEndpoint::issuing(3600, Some("1//refresh")));
    let url = session.build_authorization_url(REDIRECT).unwrap();

    let token = session
        .complete_authorization("4/code", &state_param(&url))
        .await
        .expect("authorization succeeds");

    assert_eq!(token.access_token, "access-for-4/code");
    assert_eq!(token.refresh_token.as_deref(), Some("1//refresh"));
    assert_eq!(session.status(), SessionStatus::Authenticated);
    assert!(session.token().is_some());
    assert_eq!(session.provider().exchanges(), 1);
    assert_eq!(
        session.provider().last_redirect.lock().unwrap().as_deref(),
        Some(REDIRECT)
    );
}

#[rstest]
#[case::empty("")]
#[case::different("not-the-state")]
#[case::suffixed("__SUFFIX__")]
#[tokio::test]
async fn mismatched_state_is_rejected_without_exchange(#[case] returned: &str) {
    let mut session = session(FakeEndpoint::issuing(3600, None));
    let url = session.build_authorization_url(REDIRECT).unwrap();
    let returned = if returned == "__SUFFIX__" {
        format!("{}x", state_param(&url))
    } else {
        returned.to_string()
    };

    let err = session
        .complete_authorization("code", &returned)
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::StateMismatch));
    assert_eq!(session.status(), SessionStatus::Unauthenticated);
    assert!(session.token().is_none());
    assert_eq!(session.provider().exchanges(), 0);
}

#[tokio::test]
async fn replayed_state_after_mismatch_is_rejected() {
    let mut session = session(FakeEndpoint::issuing(3600, None));
    let url = session.build_authorization_url(REDIRECT).unwrap();
    let state = state_param(&url);

    let _ = session.complete_authorization("code", "forged").await;
    let err = session
        .complete_authorization("code", &state)
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::StateMismatch));
    assert_eq!(session.provider().exchanges(), 0);
}

#[tokio::test]
async fn callback_without_pending_request_is_a_mismatch() {
    let mut session = session(FakeEndpoint::issuing(3600, None));
    let err = session
        .complete_authorization("code", "anything")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::StateMismatch));
    assert_eq!(session.status(), SessionStatus::Unauthenticated);
}

#[tokio::test]
async fn restart_after_mismatch_succeeds() {
    let mut session = session(FakeEndpoint::issuing(3600, None));
    session.build_authorization_url(REDIRECT).unwrap();
    let _ = session.complete_authorization("code", "forged").await;

    let url = session.build_authorization_url(REDIRECT).unwrap();
    session
        .complete_authorization("code", &state_param(&url))
        .await
        .expect("second attempt succeeds");
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn failed_exchange_is_a_provider_error() {
    let mut endpoint = FakeEndpoint::issuing(3600, None);
    endpoint.fail_exchange = true;
    let mut session = session(endpoint);
    let url = session.build_authorization_url(REDIRECT).unwrap();

    let err = session
        .complete_authorization("code", &state_param(&url))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::ProviderError(_)));
    assert_eq!(session.status(), SessionStatus::Unauthenticated);
}

#[tokio::test]
async fn fresh_token_is_returned_without_refresh() {
    let mut session = authenticated(FakeEndpoint::issuing(3600, Some("1//r"))).await;

    let first = session.get_valid_token().await.unwrap();
    let second = session.get_valid_token().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.access_token, "access-for-code-1");
    assert_eq!(session.provider().refreshes(), 0);
}

#[tokio::test]
async fn expired_token_is_refreshed_exactly_once() {
    let mut session = authenticated(FakeEndpoint::issuing(0, Some("1//r"))).await;
    assert_eq!(session.status(), SessionStatus::Expired);
    assert!(session.token().is_none());

    let token = session.get_valid_token().await.unwrap();
    assert_eq!(token.access_token, "refreshed-1-from-1//r");
    assert_eq!(token.refresh_token.as_deref(), Some("1//r"));
    assert_eq!(session.provider().refreshes(), 1);
    assert_eq!(session.status(), SessionStatus::Authenticated);
    assert_eq!(session.token(), Some(&token));

    // The refreshed token is valid for an hour: no further refresh.
    session.get_valid_token().await.unwrap();
    assert_eq!(session.provider().refreshes(), 1);
}

#[tokio::test]
async fn expired_token_without_refresh_token_requires_reauth() {
    let mut session = authenticated(FakeEndpoint::issuing(0, None)).await;

    let err = session.get_valid_token().await.unwrap_err();

    assert!(matches!(err, AuthError::ReauthRequired(_)));
    assert_eq!(session.provider().refreshes(), 0);
    assert_eq!(session.status(), SessionStatus::Expired);
    assert!(session.token().is_none());
}

#[tokio::test]
async fn failed_refresh_requires_reauth_and_makes_one_call_per_invocation() {
    let mut endpoint = FakeEndpoint::issuing(0, Some("1//r"));
    endpoint.fail_refresh = true;
    let mut session = authenticated(endpoint).await;

    let err = session.get_valid_token().await.unwrap_err();
    assert!(matches!(err, AuthError::ReauthRequired(_)));
    assert_eq!(session.provider().refreshes(), 1);

    let _ = session.get_valid_token().await;
    assert_eq!(session.provider().refreshes(), 2);
    assert_eq!(session.status(), SessionStatus::Expired);
}

#[tokio::test]
async fn unauthenticated_session_requires_reauth() {
    let mut session = session(FakeEndpoint::issuing(3600, None));
    assert!(matches!(
        session.get_valid_token().await,
        Err(AuthError::ReauthRequired(_))
    ));

    session.build_authorization_url(REDIRECT).unwrap();
    assert!(matches!(
        session.get_valid_token().await,
        Err(AuthError::ReauthRequired(_))
    ));
}

#[tokio::test]
async fn sign_out_clears_credentials_and_closes_session() {
    let mut session = authenticated(FakeEndpoint::issuing(3600, Some("1//r"))).await;

    session.sign_out();

    assert_eq!(session.status(), SessionStatus::Unauthenticated);
    assert!(session.token().is_none());
    assert!(session.redirect_uri().is_none());
    assert!(matches!(
        session.get_valid_token().await,
        Err(AuthError::ReauthRequired(_))
    ));
    assert!(matches!(
        session.build_authorization_url(REDIRECT),
        Err(AuthError::ReauthRequired(_))
    ));
}
