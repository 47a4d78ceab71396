//! Writing one research run into a fresh, timestamped company folder.
//!
//! ```text
//! <root folder>/                      located or created
//!   <company>_<YYYYmmdd_HHMMSS>/      one per run (UTC)
//!     company_overview.txt
//!     competitors.txt
//!     article_1.md … article_n.md
//! ```
//!
//! Runs are intentionally not idempotent: every run gets its own folder and
//! nothing is ever overwritten. When the timestamped name is already taken (two
//! runs within the same second) the new folder gets a `_2`, `_3`, … suffix.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use scout_auth::TokenSet;
use scout_core::{CompanyProfile, Diagnostic, ExtractedArticle, ProgressSink, Stage, StorageRecord};

use crate::api::StorageApi;
use crate::error::PersistError;

pub const OVERVIEW_FILE: &str = "company_overview.txt";
pub const COMPETITORS_FILE: &str = "competitors.txt";

const NO_OVERVIEW: &str = "No overview available.";
const NO_COMPETITORS: &str = "No competitors listed.";
const UNTITLED_ARTICLE: &str = "Untitled Article";
const NO_CONTENT: &str = "No content extracted.";

/// Suffixes tried before giving up on a free company folder name.
const MAX_NAME_ATTEMPTS: usize = 20;

type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// One file to write: logical key, file name, MIME type, content.
struct PlannedFile {
    key: String,
    name: String,
    mime_type: &'static str,
    content: String,
}

/// Persists research runs through a [`StorageApi`].
pub struct PersistenceLayer<S> {
    storage: S,
    root_folder_name: String,
    clock: Clock,
}

impl<S: StorageApi> PersistenceLayer<S> {
    #[must_use]
    pub fn new(storage: S, root_folder_name: impl Into<String>) -> Self {
        Self {
            storage,
            root_folder_name: root_folder_name.into(),
            clock: Box::new(Utc::now),
        }
    }

    /// Replace the clock used for company folder timestamps.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Write `profile` and `articles` into a new company folder.
    ///
    /// Individual upload failures are reported to `sink` and leave the file's
    /// link out of the record.
    ///
    /// # Errors
    ///
    /// Returns `PersistError::FolderResolutionFailed` if the root or company
    /// folder cannot be found or created; nothing further is written.
    pub async fn persist(
        &self,
        token: &TokenSet,
        company: &str,
        profile: &CompanyProfile,
        articles: &[ExtractedArticle],
        sink: &dyn ProgressSink,
    ) -> Result<StorageRecord, PersistError> {
        sink.started(Stage::Persist, &format!("saving to '{}'", self.root_folder_name));

        let root_folder_id = self
            .locate_or_create(token, &self.root_folder_name, None)
            .await?;

        let base_name = company_folder_name(company, (self.clock)());
        let (company_folder_id, company_folder_name) = self
            .create_fresh(token, &base_name, &root_folder_id)
            .await?;

        let mut file_links = BTreeMap::new();
        for file in plan_files(profile, articles) {
            sink.info(Stage::Persist, &format!("uploading {}", file.name));
            match self
                .storage
                .upload_file(token, &company_folder_id, &file.name, file.mime_type, &file.content)
                .await
            {
                Ok(uploaded) => {
                    let link = uploaded
                        .web_view_link
                        .unwrap_or_else(|| file_fallback_link(&uploaded.id));
                    file_links.insert(file.key, link);
                }
                Err(error) => {
                    let failure = PersistError::UploadFailed {
                        file: file.name.clone(),
                        reason: error.to_string(),
                    };
                    tracing::warn!(file = %file.name, %error, "upload failed");
                    sink.warn(Diagnostic::new(Stage::Persist, file.name, failure.to_string()));
                }
            }
        }

        let folder_link = match self.storage.web_view_link(token, &company_folder_id).await {
            Ok(link) => link,
            Err(error) => {
                tracing::warn!(folder = %company_folder_name, %error, "could not read folder link");
                sink.warn(Diagnostic::new(
                    Stage::Persist,
                    company_folder_name.as_str(),
                    format!("could not read folder link, using fallback: {error}"),
                ));
                folder_fallback_link(&company_folder_id)
            }
        };

        sink.finished(
            Stage::Persist,
            &format!("saved {} file(s) to {company_folder_name}", file_links.len()),
        );

        Ok(StorageRecord {
            root_folder_id,
            company_folder_id,
            company_folder_name,
            folder_link,
            file_links,
        })
    }

    async fn locate_or_create(
        &self,
        token: &TokenSet,
        name: &str,
        parent: Option<&str>,
    ) -> Result<String, PersistError> {
        let resolution_failed = |reason: String| PersistError::FolderResolutionFailed {
            folder: name.to_string(),
            reason,
        };

        let existing = self
            .storage
            .find_folder(token, name, parent)
            .await
            .map_err(|e| resolution_failed(format!("search failed: {e}")))?;
        if let Some(id) = existing {
            tracing::debug!(folder = name, %id, "folder found");
            return Ok(id);
        }

        let id = self
            .storage
            .create_folder(token, name, parent)
            .await
            .map_err(|e| resolution_failed(format!("create failed: {e}")))?;
        tracing::info!(folder = name, %id, "folder created");
        Ok(id)
    }

    /// Create a folder under `parent` named `base_name`, or the first free
    /// `base_name_<n>`. Existing folders are never reused.
    async fn create_fresh(
        &self,
        token: &TokenSet,
        base_name: &str,
        parent: &str,
    ) -> Result<(String, String), PersistError> {
        for attempt in 1..=MAX_NAME_ATTEMPTS {
            let name = if attempt == 1 {
                base_name.to_string()
            } else {
                format!("{base_name}_{attempt}")
            };
            let taken = self
                .storage
                .find_folder(token, &name, Some(parent))
                .await
                .map_err(|e| PersistError::FolderResolutionFailed {
                    folder: name.clone(),
                    reason: format!("search failed: {e}"),
                })?;
            if taken.is_some() {
                tracing::debug!(folder = %name, "company folder name taken");
                continue;
            }

            let id = self
                .storage
                .create_folder(token, &name, Some(parent))
                .await
                .map_err(|e| PersistError::FolderResolutionFailed {
                    folder: name.clone(),
                    reason: format!("create failed: {e}"),
                })?;
            tracing::info!(folder = %name, %id, "company folder created");
            return Ok((id, name));
        }

        Err(PersistError::FolderResolutionFailed {
            folder: base_name.to_string(),
            reason: format!("no free folder name after {MAX_NAME_ATTEMPTS} attempts"),
        })
    }
}

/// `<company>_<UTC %Y%m%d_%H%M%S>`.
#[must_use]
pub fn company_folder_name(company: &str, at: DateTime<Utc>) -> String {
    format!("{}_{}", company.trim(), at.format("%Y%m%d_%H%M%S"))
}

#[must_use]
pub fn overview_text(profile: &CompanyProfile) -> String {
    if profile.overview.trim().is_empty() {
        NO_OVERVIEW.to_string()
    } else {
        profile.overview.clone()
    }
}

#[must_use]
pub fn competitors_text(profile: &CompanyProfile) -> String {
    if profile.competitors.is_empty() {
        NO_COMPETITORS.to_string()
    } else {
        profile.competitors.join("\n")
    }
}

#[must_use]
pub fn article_markdown(article: &ExtractedArticle) -> String {
    let title = article
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(UNTITLED_ARTICLE);
    let body = article
        .markdown_content
        .as_deref()
        .filter(|b| !b.trim().is_empty())
        .unwrap_or(NO_CONTENT);
    format!("# {title}\n\nSource: {}\n\n{body}", article.url)
}

fn plan_files(profile: &CompanyProfile, articles: &[ExtractedArticle]) -> Vec<PlannedFile> {
    let mut files = vec![
        PlannedFile {
            key: "overview".to_string(),
            name: OVERVIEW_FILE.to_string(),
            mime_type: "text/plain",
            content: overview_text(profile),
        },
        PlannedFile {
            key: "competitors".to_string(),
            name: COMPETITORS_FILE.to_string(),
            mime_type: "text/plain",
            content: competitors_text(profile),
        },
    ];
    files.extend(articles.iter().enumerate().map(|(i, article)| PlannedFile {
        key: format!("article_{}", i + 1),
        name: format!("article_{}.md", i + 1),
        mime_type: "text/markdown",
        content: article_markdown(article),
    }));
    files
}

fn folder_fallback_link(id: &str) -> String {
    format!("https://drive.google.com/drive/folders/{id}")
}

fn file_fallback_link(id: &str) -> String {
    format!("https://drive.google.com/file/d/{id}/view")
}
