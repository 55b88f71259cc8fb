//! Dashboard configuration.
//!
//! Load order: built-in defaults, then the YAML file named by
//! `KYC_DASHBOARD_CONFIG` (default `config/dashboard.yaml`, optional), then
//! individual environment overrides.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::error::{DashboardError, Result};
use crate::query::QueryOptions;

/// Default configuration path
pub const DEFAULT_CONFIG_PATH: &str = "config/dashboard.yaml";

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub api: ApiConfig,
    pub freshness: FreshnessConfig,
    pub polling: PollingConfig,
}

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api/v1/".to_string(),
            timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Staleness windows per resource family (seconds)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FreshnessConfig {
    pub corporations_secs: u64,
    pub signals_secs: u64,
    pub dashboard_secs: u64,
    pub snapshot_secs: u64,
    /// How long unused entries survive garbage collection
    pub cache_time_secs: u64,
}

impl Default for FreshnessConfig {
    fn default() -> Self {
        Self {
            corporations_secs: 5 * 60, // registry data rarely changes
            signals_secs: 30,
            dashboard_secs: 60,
            snapshot_secs: 5 * 60,
            cache_time_secs: 10 * 60,
        }
    }
}

impl FreshnessConfig {
    fn options(&self, stale_secs: u64) -> QueryOptions {
        QueryOptions::fresh_for(Duration::from_secs(stale_secs))
            .cache_time(Duration::from_secs(self.cache_time_secs))
    }

    pub fn corporations(&self) -> QueryOptions {
        self.options(self.corporations_secs)
    }

    pub fn signals(&self) -> QueryOptions {
        self.options(self.signals_secs)
    }

    pub fn dashboard(&self) -> QueryOptions {
        self.options(self.dashboard_secs)
    }

    pub fn snapshot(&self) -> QueryOptions {
        self.options(self.snapshot_secs)
    }

    /// Job status is always refetched
    pub fn job(&self) -> QueryOptions {
        self.options(0)
    }
}

/// Job status polling
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub interval_ms: u64,
    /// Consecutive failed polls before giving up
    pub max_consecutive_errors: u32,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 2000,
            max_consecutive_errors: 3,
        }
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl DashboardConfig {
    /// Parse a YAML document
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| DashboardError::Config(e.to_string()))
    }

    /// Load a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            DashboardError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&yaml)
    }

    /// Defaults → optional config file → environment overrides, validated.
    pub fn load() -> Result<Self> {
        let path = std::env::var("KYC_DASHBOARD_CONFIG")
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let config = if Path::new(&path).exists() {
            tracing::info!(path = %path, "Loading dashboard configuration");
            Self::from_file(&path)?
        } else {
            tracing::debug!(path = %path, "No configuration file, using defaults");
            Self::default()
        };

        let config = config.with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply `KYC_API_BASE_URL`, `KYC_API_TIMEOUT_SECS` and
    /// `KYC_POLL_INTERVAL_MS` when set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("KYC_API_BASE_URL") {
            self.api.base_url = url;
        }
        if let Some(secs) = std::env::var("KYC_API_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            self.api.timeout_secs = secs;
        }
        if let Some(ms) = std::env::var("KYC_POLL_INTERVAL_MS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            self.polling.interval_ms = ms;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.api.base_url).map_err(|e| {
            DashboardError::Config(format!("Invalid api.base_url '{}': {}", self.api.base_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(DashboardError::Config(format!(
                "api.base_url must be http(s), got '{}'",
                url.scheme()
            )));
        }
        if self.polling.interval_ms == 0 {
            return Err(DashboardError::Config(
                "polling.interval_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
