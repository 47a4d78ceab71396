//! Web content extraction configuration.

use serde::{Deserialize, Serialize};

fn default_user_agent() -> String {
    String::from("Mozilla/5.0 (compatible; scout/0.1)")
}

const fn default_timeout_secs() -> u64 {
    20
}

/// Extracted markdown longer than this is truncated (0 disables truncation).
const fn default_max_content_chars() -> usize {
    200_000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtractConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            max_content_chars: default_max_content_chars(),
        }
    }
}
