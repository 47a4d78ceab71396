//! `DriveClient` request shapes against a local HTTP server.

use std::io::Read as _;
use std::thread;

use chrono::Utc;
use scout_auth::{TokenResponse, TokenSet};
use scout_config::DriveConfig;
use scout_drive::{DriveClient, StorageApi, StorageError};

#[derive(Debug)]
struct Captured {
    method: String,
    url: String,
    authorization: Option<String>,
    content_type: Option<String>,
    body: String,
}

/// Answer each request with the next `(status, body)` and capture it.
fn serve(responses: Vec<(u16, &'static str)>) -> (String, thread::JoinHandle<Vec<Captured>>) {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let port = server.server_addr().to_ip().unwrap().port();
    let handle = thread::spawn(move || {
        let mut captured = Vec::new();
        for (status, body) in responses {
            let mut request = server.recv().unwrap();
            let header = |name: &'static str| {
                request
                    .headers()
                    .iter()
                    .find(|h| h.field.equiv(name))
                    .map(|h| h.value.to_string())
            };
            let authorization = header("Authorization");
            let content_type = header("Content-Type");
            let mut received = String::new();
            request.as_reader().read_to_string(&mut received).unwrap();
            captured.push(Captured {
                method: request.method().to_string(),
                url: request.url().to_string(),
                authorization,
                content_type,
                body: received,
            });
            request
                .respond(tiny_http::Response::from_string(body).with_status_code(status))
                .unwrap();
        }
        captured
    });
    (format!("http://127.0.0.1:{port}"), handle)
}

fn client(api_base: String) -> DriveClient {
    DriveClient::new(&DriveConfig {
        api_base,
        ..DriveConfig::default()
    })
    .unwrap()
}

fn token() -> TokenSet {
    TokenSet::from_response(
        TokenResponse {
            access_token: "ya29.drive".into(),
            expires_in: Some(3600),
            refresh_token: None,
            scope: None,
            token_type: None,
        },
        Utc::now(),
        None,
    )
}

#[tokio::test]
async fn folder_search_create_upload_and_link() {
    let (base, server) = serve(vec![
        (200, r#"{"files": []}"#),
        (200, r#"{"id": "folder-1"}"#),
        (
            200,
            r#"{"id": "file-1", "webViewLink": "https://drive.google.com/file/d/file-1/view"}"#,
        ),
        (
            200,
            r#"{"webViewLink": "https://drive.google.com/drive/folders/folder-1"}"#,
        ),
    ]);
    let drive = client(base);
    let token = token();

    let found = drive.find_folder(&token, "Macy's", None).await.unwrap();
    assert_eq!(found, None);

    let id = drive
        .create_folder(&token, "Acme_20261015_143000", Some("root-1"))
        .await
        .unwrap();
    assert_eq!(id, "folder-1");

    let uploaded = drive
        .upload_file(&token, "folder-1", "competitors.txt", "text/plain", "X\nY")
        .await
        .unwrap();
    assert_eq!(uploaded.id, "file-1");
    assert_eq!(
        uploaded.web_view_link.as_deref(),
        Some("https://drive.google.com/file/d/file-1/view")
    );

    let link = drive.web_view_link(&token, "folder-1").await.unwrap();
    assert_eq!(link, "https://drive.google.com/drive/folders/folder-1");

    let requests = server.join().unwrap();
    assert!(
        requests
            .iter()
            .all(|r| r.authorization.as_deref() == Some("Bearer ya29.drive"))
    );

    let search = &requests[0];
    assert_eq!(search.method, "GET");
    let search_url = reqwest::Url::parse(&format!("http://x{}", search.url)).unwrap();
    assert_eq!(search_url.path(), "/drive/v3/files");
    let q = search_url
        .query_pairs()
        .find(|(k, _)| k == "q")
        .map(|(_, v)| v.into_owned())
        .unwrap();
    assert_eq!(
        q,
        r"name='Macy\'s' and mimeType='application/vnd.google-apps.folder' and trashed=false and 'root' in parents"
    );

    let create = &requests[1];
    assert_eq!(create.method, "POST");
    assert_eq!(create.url, "/drive/v3/files?fields=id");
    let metadata: serde_json::Value = serde_json::from_str(&create.body).unwrap();
    assert_eq!(
        metadata,
        serde_json::json!({
            "name": "Acme_20261015_143000",
            "mimeType": "application/vnd.google-apps.folder",
            "parents": ["root-1"],
        })
    );

    let upload = &requests[2];
    assert_eq!(upload.method, "POST");
    assert_eq!(
        upload.url,
        "/upload/drive/v3/files?uploadType=multipart&fields=id%2CwebViewLink"
    );
    let content_type = upload.content_type.as_deref().unwrap();
    let boundary = content_type
        .strip_prefix("multipart/related; boundary=")
        .unwrap();
    assert!(upload.body.starts_with(&format!("--{boundary}\r\n")));
    assert!(upload.body.contains(r#"{"name":"competitors.txt","parents":["folder-1"]}"#));
    assert!(upload.body.contains("Content-Type: text/plain; charset=UTF-8\r\n\r\nX\nY\r\n"));
    assert!(upload.body.ends_with(&format!("--{boundary}--\r\n")));

    assert_eq!(requests[3].url, "/drive/v3/files/folder-1?fields=webViewLink");
}

#[tokio::test]
async fn existing_folder_id_is_returned() {
    let (base, server) = serve(vec![(
        200,
        r#"{"files": [{"id": "abc", "name": "Sales Research"}, {"id": "def", "name": "Sales Research"}]}"#,
    )]);

    let found = client(base)
        .find_folder(&token(), "Sales Research", None)
        .await
        .unwrap();
    server.join().unwrap();

    assert_eq!(found.as_deref(), Some("abc"));
}

#[tokio::test]
async fn api_errors_carry_drive_message() {
    let (base, server) = serve(vec![(
        401,
        r#"{"error": {"code": 401, "message": "Invalid Credentials"}}"#,
    )]);

    let err = client(base)
        .create_folder(&token(), "x", None)
        .await
        .unwrap_err();
    server.join().unwrap();

    assert!(matches!(
        err,
        StorageError::Api { status: 401, ref message } if message == "Invalid Credentials"
    ));
}
