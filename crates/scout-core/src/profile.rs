//! Company research records.
//!
//! A [`CompanyProfile`] is produced once per research request by the research
//! stage and is never mutated afterwards. [`ExtractedArticle`]s are produced by
//! the extraction stage, one per URL that yielded readable content.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Overview text carried by a profile whose model queries failed.
pub const UNAVAILABLE_OVERVIEW: &str = "Error: Could not retrieve overview.";

/// A news article or report suggested by the language model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRef {
    pub title: String,
    /// Empty when the model produced a title without a URL line.
    pub url: String,
}

impl ArticleRef {
    #[must_use]
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }

    #[must_use]
    pub fn has_url(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

/// Structured result of researching a single company.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub overview: String,
    pub competitors: Vec<String>,
    pub articles: Vec<ArticleRef>,
}

impl CompanyProfile {
    /// Placeholder profile handed downstream when the model could not be reached.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            overview: UNAVAILABLE_OVERVIEW.to_string(),
            competitors: Vec::new(),
            articles: Vec::new(),
        }
    }

    /// Article URLs in order of first appearance, with blanks and duplicates removed.
    #[must_use]
    pub fn article_urls(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.articles
            .iter()
            .map(|article| article.url.trim())
            .filter(|url| !url.is_empty())
            .filter(|url| seen.insert(*url))
            .map(String::from)
            .collect()
    }

    /// Title the model gave for `url`, if any.
    #[must_use]
    pub fn title_for(&self, url: &str) -> Option<&str> {
        self.articles
            .iter()
            .find(|article| article.url.trim() == url)
            .map(|article| article.title.as_str())
            .filter(|title| !title.is_empty())
    }
}

/// Readable content pulled from one article URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedArticle {
    pub url: String,
    pub title: Option<String>,
    pub markdown_content: Option<String>,
}
