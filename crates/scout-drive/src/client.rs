//! Google Drive v3 REST client.

use std::fmt::Write as _;
use std::time::Duration;

use async_trait::async_trait;
use scout_auth::TokenSet;
use scout_config::DriveConfig;
use serde::Deserialize;

use crate::api::{FOLDER_MIME_TYPE, StorageApi, UploadedFile};
use crate::error::StorageError;

#[derive(Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<FileRef>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileRef {
    id: String,
    #[serde(default)]
    web_view_link: Option<String>,
}

/// Drive v3 client; the access token is supplied per call.
pub struct DriveClient {
    http: reqwest::Client,
    api_base: String,
}

impl DriveClient {
    /// # Errors
    ///
    /// Returns `StorageError::Http` if the HTTP client cannot be built.
    pub fn new(config: &DriveConfig) -> Result<Self, StorageError> {
        let http = reqwest::Client::builder()
            .user_agent("scout/0.1")
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    fn files_url(&self) -> String {
        format!("{}/drive/v3/files", self.api_base)
    }
}

#[async_trait]
impl StorageApi for DriveClient {
    async fn find_folder(
        &self,
        token: &TokenSet,
        name: &str,
        parent: Option<&str>,
    ) -> Result<Option<String>, StorageError> {
        let query = folder_query(name, parent);
        let url = format!(
            "{}?q={}&spaces=drive&fields={}&pageSize=10",
            self.files_url(),
            urlencoding::encode(&query),
            urlencoding::encode("files(id,name)")
        );
        tracing::debug!(folder = name, "searching for folder");

        let resp = check_response(
            self.http
                .get(&url)
                .header(reqwest::header::AUTHORIZATION, token.bearer())
                .send()
                .await?,
        )
        .await?;
        let list: FileList = parse_json(resp).await?;
        Ok(list.files.into_iter().next().map(|f| f.id))
    }

    async fn create_folder(
        &self,
        token: &TokenSet,
        name: &str,
        parent: Option<&str>,
    ) -> Result<String, StorageError> {
        let mut metadata = serde_json::json!({
            "name": name,
            "mimeType": FOLDER_MIME_TYPE,
        });
        if let Some(parent) = parent {
            metadata["parents"] = serde_json::json!([parent]);
        }
        tracing::debug!(folder = name, "creating folder");

        let resp = check_response(
            self.http
                .post(format!("{}?fields=id", self.files_url()))
                .header(reqwest::header::AUTHORIZATION, token.bearer())
                .json(&metadata)
                .send()
                .await?,
        )
        .await?;
        let created: FileRef = parse_json(resp).await?;
        Ok(created.id)
    }

    async fn upload_file(
        &self,
        token: &TokenSet,
        parent: &str,
        name: &str,
        mime_type: &str,
        content: &str,
    ) -> Result<UploadedFile, StorageError> {
        let metadata = serde_json::json!({ "name": name, "parents": [parent] });
        let boundary = multipart_boundary()?;
        let body = multipart_related(&boundary, &metadata, mime_type, content);
        let url = format!(
            "{}/upload/drive/v3/files?uploadType=multipart&fields={}",
            self.api_base,
            urlencoding::encode("id,webViewLink")
        );
        tracing::debug!(file = name, bytes = content.len(), "uploading file");

        let resp = check_response(
            self.http
                .post(&url)
                .header(reqwest::header::AUTHORIZATION, token.bearer())
                .header(
                    reqwest::header::CONTENT_TYPE,
                    format!("multipart/related; boundary={boundary}"),
                )
                .body(body)
                .send()
                .await?,
        )
        .await?;
        let created: FileRef = parse_json(resp).await?;
        Ok(UploadedFile {
            id: created.id,
            web_view_link: created.web_view_link,
        })
    }

    async fn web_view_link(&self, token: &TokenSet, file_id: &str) -> Result<String, StorageError> {
        let url = format!(
            "{}/{}?fields=webViewLink",
            self.files_url(),
            urlencoding::encode(file_id)
        );
        let resp = check_response(
            self.http
                .get(&url)
                .header(reqwest::header::AUTHORIZATION, token.bearer())
                .send()
                .await?,
        )
        .await?;

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Link {
            web_view_link: Option<String>,
        }
        let link: Link = parse_json(resp).await?;
        link.web_view_link
            .ok_or_else(|| StorageError::Parse("response has no webViewLink".into()))
    }
}

/// Drive search expression for a non-trashed folder named `name` directly
/// under `parent` (`root` when `None`).
#[must_use]
pub fn folder_query(name: &str, parent: Option<&str>) -> String {
    format!(
        "name='{}' and mimeType='{FOLDER_MIME_TYPE}' and trashed=false and '{}' in parents",
        escape_query_value(name),
        escape_query_value(parent.unwrap_or("root"))
    )
}

/// Escape `\` and `'` for a single-quoted Drive query string.
#[must_use]
pub fn escape_query_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

fn multipart_boundary() -> Result<String, StorageError> {
    let mut bytes = [0u8; 12];
    getrandom::fill(&mut bytes)
        .map_err(|e| StorageError::Parse(format!("failed to generate multipart boundary: {e}")))?;
    let mut boundary = String::from("scout_");
    for byte in bytes {
        let _ = write!(boundary, "{byte:02x}");
    }
    Ok(boundary)
}

/// `multipart/related` body: JSON metadata part, then the media part.
fn multipart_related(
    boundary: &str,
    metadata: &serde_json::Value,
    mime_type: &str,
    content: &str,
) -> String {
    format!(
        "--{boundary}\r\n\
         Content-Type: application/json; charset=UTF-8\r\n\r\n\
         {metadata}\r\n\
         --{boundary}\r\n\
         Content-Type: {mime_type}; charset=UTF-8\r\n\r\n\
         {content}\r\n\
         --{boundary}--\r\n"
    )
}

/// Map a non-success response to [`StorageError::Api`], preferring the
/// `error.message` field of a Google API error body.
async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, StorageError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    Err(StorageError::Api {
        status,
        message: api_error_message(&body),
    })
}

fn api_error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: ErrorDetail,
    }
    #[derive(Deserialize)]
    struct ErrorDetail {
        message: String,
    }

    serde_json::from_str::<ErrorBody>(body)
        .map_or_else(|_| body.to_string(), |parsed| parsed.error.message)
}

async fn parse_json<T: serde::de::DeserializeOwned>(resp: reqwest::Response) -> Result<T, StorageError> {
    let text = resp.text().await?;
    serde_json::from_str(&text).map_err(|e| StorageError::Parse(e.to_string()))
}
