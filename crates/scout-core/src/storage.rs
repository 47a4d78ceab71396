use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Where a research run was written.
///
/// Created once per successful persistence run and never mutated. A new run
/// for the same company produces a new record pointing at a new folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageRecord {
    pub root_folder_id: String,
    pub company_folder_id: String,
    pub company_folder_name: String,
    /// Shareable link to the company folder (the primary handle).
    pub folder_link: String,
    /// Logical name (`overview`, `competitors`, `article_<n>`) to file link.
    /// Files whose upload failed are absent.
    pub file_links: BTreeMap<String, String>,
}

impl StorageRecord {
    #[must_use]
    pub fn link(&self, logical_name: &str) -> Option<&str> {
        self.file_links.get(logical_name).map(String::as_str)
    }
}
