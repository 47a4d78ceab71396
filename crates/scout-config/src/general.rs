//! General application configuration.

use serde::{Deserialize, Serialize};

/// How long the CLI waits for the OAuth redirect.
const fn default_login_timeout_secs() -> u64 {
    120
}

const fn default_open_browser() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    #[serde(default = "default_login_timeout_secs")]
    pub login_timeout_secs: u64,

    /// Launch the system browser at the authorization URL during sign-in.
    #[serde(default = "default_open_browser")]
    pub open_browser: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            login_timeout_secs: default_login_timeout_secs(),
            open_browser: default_open_browser(),
        }
    }
}
