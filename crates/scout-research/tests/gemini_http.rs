//! `GeminiClient` against a local HTTP server standing in for the API.

use std::io::Read as _;
use std::thread;

use scout_config::GeminiConfig;
use scout_research::{GeminiClient, LanguageModel, ModelError};

/// What the server saw: URL, `x-goog-api-key` header, body.
type Received = (String, Option<String>, String);

/// Serve exactly one request with `status`/`body`.
fn serve_once(status: u16, body: &'static str) -> (String, thread::JoinHandle<Received>) {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let port = server.server_addr().to_ip().unwrap().port();
    let handle = thread::spawn(move || {
        let mut request = server.recv().unwrap();
        let url = request.url().to_string();
        let key = request
            .headers()
            .iter()
            .find(|h| h.field.equiv("x-goog-api-key"))
            .map(|h| h.value.to_string());
        let mut received = String::new();
        request.as_reader().read_to_string(&mut received).unwrap();
        let response = tiny_http::Response::from_string(body).with_status_code(status);
        request.respond(response).unwrap();
        (url, key, received)
    });
    (format!("http://127.0.0.1:{port}"), handle)
}

fn client(base_url: String) -> GeminiClient {
    client_with_key(base_url, "test-key")
}

fn client_with_key(base_url: String, api_key: &str) -> GeminiClient {
    GeminiClient::new(&GeminiConfig {
        api_key: api_key.into(),
        model: "gemini-test".into(),
        base_url,
        timeout_secs: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn posts_prompt_and_returns_candidate_text() {
    let (base, server) = serve_once(
        200,
        r#"{"candidates":[{"content":{"parts":[{"text":"Globex, "},{"text":"Initech"}]}}]}"#,
    );

    let answer = client(base).generate("List competitors of Acme").await.unwrap();
    assert_eq!(answer, "Globex, Initech");

    let (url, key, body) = server.join().unwrap();
    assert_eq!(url, "/v1beta/models/gemini-test:generateContent");
    assert_eq!(key.as_deref(), Some("test-key"));
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        body,
        serde_json::json!({"contents": [{"parts": [{"text": "List competitors of Acme"}]}]})
    );
}

#[tokio::test]
async fn api_error_surfaces_status_and_message() {
    let (base, server) = serve_once(
        429,
        r#"{"error":{"code":429,"message":"Resource has been exhausted","status":"RESOURCE_EXHAUSTED"}}"#,
    );

    let err = client(base).generate("hello").await.unwrap_err();
    server.join().unwrap();

    assert!(matches!(
        err,
        ModelError::Api { status: 429, ref message } if message == "Resource has been exhausted"
    ));
}

#[tokio::test]
async fn transport_error_does_not_reveal_api_key() {
    // Nothing listens on port 1.
    let err = client_with_key("http://127.0.0.1:1".into(), "SECRET-KEY-123")
        .generate("hi")
        .await
        .unwrap_err();

    assert!(matches!(err, ModelError::Http(_)));
    let rendered = format!("{err} {err:?}");
    assert!(!rendered.contains("SECRET-KEY-123"), "{rendered}");
}
