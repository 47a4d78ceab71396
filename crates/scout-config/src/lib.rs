//! # scout-config
//!
//! Layered configuration loading for Scout using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`SCOUT_*` prefix, `__` as separator)
//! 2. Legacy unprefixed variables (`GOOGLE_CLIENT_ID`, `GOOGLE_CLIENT_SECRET`,
//!    `REDIRECT_URI`, `GEMINI_API_KEY`)
//! 3. Project-level `.scout/config.toml`
//! 4. User-level `~/.config/scout/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `SCOUT_GOOGLE__CLIENT_ID` -> `google.client_id`,
//! `SCOUT_GEMINI__MODEL` -> `gemini.model`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use scout_config::ScoutConfig;
//!
//! let config = ScoutConfig::load_with_dotenv().expect("config");
//! if config.gemini.is_configured() {
//!     println!("model: {}", config.gemini.model);
//! }
//! ```

mod drive;
mod error;
mod extract;
mod gemini;
mod general;
mod google;

pub use drive::DriveConfig;
pub use error::ConfigError;
pub use extract::ExtractConfig;
pub use gemini::GeminiConfig;
pub use general::GeneralConfig;
pub use google::GoogleConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Unprefixed variable names kept for `.env` files written for earlier
/// deployments, mapped to their config keys.
const LEGACY_ENV_KEYS: [(&str, &str); 4] = [
    ("GOOGLE_CLIENT_ID", "google.client_id"),
    ("GOOGLE_CLIENT_SECRET", "google.client_secret"),
    ("REDIRECT_URI", "google.redirect_uri"),
    ("GEMINI_API_KEY", "gemini.api_key"),
];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ScoutConfig {
    #[serde(default)]
    pub google: GoogleConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub drive: DriveConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl ScoutConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".scout/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Legacy variable names, then prefixed ones (highest priority)
        figment
            .merge(Self::legacy_env())
            .merge(Env::prefixed("SCOUT_").split("__"))
    }

    /// Ensure everything the full research command needs is present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first section that is missing or invalid.
    pub fn require_research_ready(&self) -> Result<(), ConfigError> {
        self.google.validate()?;
        self.require_gemini()
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] if no Gemini API key is set.
    pub fn require_gemini(&self) -> Result<(), ConfigError> {
        if self.gemini.is_configured() {
            Ok(())
        } else {
            Err(ConfigError::NotConfigured {
                section: "gemini".into(),
            })
        }
    }

    fn legacy_env() -> Env {
        let names = LEGACY_ENV_KEYS.map(|(name, _)| name);
        Env::raw().only(&names).map(|key| {
            LEGACY_ENV_KEYS
                .iter()
                .find(|(name, _)| key.as_str().eq_ignore_ascii_case(name))
                .map_or_else(|| key.as_str().to_string(), |(_, path)| (*path).to_string())
                .into()
        })
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("scout").join("config.toml"))
    }
}
