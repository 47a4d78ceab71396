use async_trait::async_trait;
use scout_auth::TokenSet;

use crate::error::StorageError;

/// MIME type Drive uses for folders.
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// A file created by [`StorageApi::upload_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub id: String,
    pub web_view_link: Option<String>,
}

/// The slice of a cloud file store that persistence needs.
///
/// `parent: None` means the user's top-level folder.
#[async_trait]
pub trait StorageApi: Send + Sync {
    /// First non-trashed folder named exactly `name` under `parent`.
    async fn find_folder(
        &self,
        token: &TokenSet,
        name: &str,
        parent: Option<&str>,
    ) -> Result<Option<String>, StorageError>;

    /// Create a folder and return its id.
    async fn create_folder(
        &self,
        token: &TokenSet,
        name: &str,
        parent: Option<&str>,
    ) -> Result<String, StorageError>;

    /// Create a new file with `content`. Never overwrites an existing file.
    async fn upload_file(
        &self,
        token: &TokenSet,
        parent: &str,
        name: &str,
        mime_type: &str,
        content: &str,
    ) -> Result<UploadedFile, StorageError>;

    /// Shareable browser link for a file or folder.
    async fn web_view_link(&self, token: &TokenSet, file_id: &str) -> Result<String, StorageError>;
}
