//! URL list → readable articles.

use reqwest::Url;
use scout_core::{Diagnostic, ExtractedArticle, ProgressSink, Stage};

use crate::error::ExtractError;
use crate::fetch::PageFetcher;
use crate::readability::extract_readable;

/// Fetches article URLs one at a time and keeps the ones with readable content.
pub struct ContentExtractor<F> {
    fetcher: F,
    max_content_chars: usize,
}

impl<F: PageFetcher> ContentExtractor<F> {
    /// `max_content_chars` caps each article body in characters (0 = unlimited).
    #[must_use]
    pub const fn new(fetcher: F, max_content_chars: usize) -> Self {
        Self {
            fetcher,
            max_content_chars,
        }
    }

    #[must_use]
    pub const fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Extract every URL in order.
    ///
    /// URLs that cannot be fetched or have no readable content are skipped and
    /// reported to `sink` as warnings; the result keeps the input order of the
    /// URLs that succeeded.
    pub async fn extract(&self, urls: &[String], sink: &dyn ProgressSink) -> Vec<ExtractedArticle> {
        sink.started(Stage::Extract, &format!("extracting {} article(s)", urls.len()));

        let mut articles = Vec::with_capacity(urls.len());
        for (index, url) in urls.iter().enumerate() {
            sink.info(
                Stage::Extract,
                &format!("[{}/{}] {url}", index + 1, urls.len()),
            );
            match self.extract_one(url).await {
                Ok(article) => articles.push(article),
                Err(error) => {
                    tracing::warn!(url = %url, %error, "skipping article");
                    sink.warn(Diagnostic::new(Stage::Extract, url.as_str(), error.to_string()));
                }
            }
        }

        sink.finished(
            Stage::Extract,
            &format!("extracted {} of {} article(s)", articles.len(), urls.len()),
        );
        articles
    }

    async fn extract_one(&self, url: &str) -> Result<ExtractedArticle, ExtractError> {
        Url::parse(url).map_err(|e| ExtractError::InvalidUrl(format!("{url}: {e}")))?;

        let page = self.fetcher.fetch(url).await?;
        let base = Url::parse(&page.final_url)
            .map_err(|e| ExtractError::InvalidUrl(format!("{}: {e}", page.final_url)))?;

        let readable = extract_readable(&page.body, &base, self.max_content_chars)
            .ok_or(ExtractError::NoContent)?;
        tracing::debug!(url, chars = readable.markdown.len(), "extracted article");

        Ok(ExtractedArticle {
            url: url.to_string(),
            title: readable.title,
            markdown_content: Some(readable.markdown),
        })
    }
}
