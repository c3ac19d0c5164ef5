//! Client configuration.
//!
//! Loaded from `<config dir>/mindcare/config.toml` when that file exists,
//! otherwise defaults are used. `MINDCARE_API_URL` overrides the base URL.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::error::{MindCareError, Result};

pub const API_URL_ENV: &str = "MINDCARE_API_URL";

const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub(crate) const DEFAULT_MIN_INPUT_CHARS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the analysis backend
    pub api_base_url: String,
    /// Per-request timeout applied by the HTTP client
    pub request_timeout_secs: u64,
    /// Minimum trimmed input length accepted for analysis
    pub min_input_chars: usize,
    pub user_agent: String,
    /// Where the persistent user id lives (None = platform data dir)
    pub user_id_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            min_input_chars: DEFAULT_MIN_INPUT_CHARS,
            user_agent: format!("MindCare/{}", env!("CARGO_PKG_VERSION")),
            user_id_path: None,
        }
    }
}

impl ClientConfig {
    /// Default config file location, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("mindcare").join("config.toml"))
    }

    /// Load from the default location and apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => {
                debug!("No config file found, using defaults");
                Self::default()
            }
        };
        if let Ok(url) = std::env::var(API_URL_ENV) {
            info!("Using API base URL from {}: {}", API_URL_ENV, url);
            config.api_base_url = url;
        }
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML config file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            MindCareError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: ClientConfig = toml::from_str(&content).map_err(|e| {
            MindCareError::Config(format!("Invalid config in {}: {}", path.display(), e))
        })?;
        info!("Loaded config from {:?}", path);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.base_url()?;
        if self.request_timeout_secs == 0 {
            return Err(MindCareError::Config(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.min_input_chars == 0 {
            return Err(MindCareError::Config(
                "min_input_chars must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Parsed base URL with a trailing slash so endpoint paths join beneath it.
    pub fn base_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.api_base_url).map_err(|e| {
            MindCareError::Config(format!("Invalid api_base_url '{}': {}", self.api_base_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(MindCareError::Config(format!(
                "api_base_url must be http or https, got '{}'",
                url.scheme()
            )));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Resolved user id file location.
    pub fn user_id_file(&self) -> Option<PathBuf> {
        self.user_id_path
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join("mindcare").join("user_id")))
    }
}
