//! Google Drive persistence configuration.

use serde::{Deserialize, Serialize};

fn default_root_folder_name() -> String {
    String::from("Sales Research")
}

fn default_api_base() -> String {
    String::from("https://www.googleapis.com")
}

const fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DriveConfig {
    /// Top-level folder every research run is filed under.
    #[serde(default = "default_root_folder_name")]
    pub root_folder_name: String,

    /// Base URL for both the metadata (`/drive/v3`) and upload
    /// (`/upload/drive/v3`) endpoints.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            root_folder_name: default_root_folder_name(),
            api_base: default_api_base(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
