//! Configuration management for the client.

use crate::{CoreError, CoreResult, Paths};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Default API base URL (can be overridden at compile time via TEMPORA_API_URL env var).
pub const DEFAULT_API_URL: &str = match option_env!("TEMPORA_API_URL") {
    Some(url) => url,
    None => "https://api.tempora.app",
};

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Main client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Base URL of the credential API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Skip the automatic session check when the coordinator mounts.
    #[serde(default)]
    pub suppress_initial_check: bool,
}

fn default_api_base_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            api_base_url: DEFAULT_API_URL.to_string(),
            suppress_initial_check: false,
        }
    }
}

impl Config {
    /// Create a new Config with default values, then override from environment.
    pub fn new() -> Self {
        let mut config = Self::default();
        config.load_from_env();
        config
    }

    /// Load configuration from the standard config file, falling back to
    /// defaults when the file does not exist. Environment variables
    /// override the file.
    pub fn load(paths: &Paths) -> CoreResult<Self> {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        config.load_from_env();

        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the standard config file.
    pub fn save(&self, paths: &Paths) -> CoreResult<()> {
        paths.ensure_dirs()?;
        let config_path = paths.config_file();
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    /// Override configuration from environment variables.
    fn load_from_env(&mut self) {
        if let Ok(log_level) = std::env::var("TEMPORA_LOG_LEVEL") {
            self.log_level = log_level;
        }
        if let Ok(api_base_url) = std::env::var("TEMPORA_API_URL") {
            self.api_base_url = api_base_url;
        }
        if let Ok(raw) = std::env::var("TEMPORA_SUPPRESS_INITIAL_CHECK") {
            self.suppress_initial_check = matches!(raw.as_str(), "1" | "true" | "yes");
        }
    }

    /// Get the API base URL as a parsed URL.
    pub fn api_base_url(&self) -> CoreResult<Url> {
        Url::parse(&self.api_base_url).map_err(CoreError::from)
    }
}
