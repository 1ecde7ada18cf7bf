/// Service configuration loader - parses rainfall_service.toml
///
/// Separates deployment settings (bind address, worker count, FWS site
/// location and timeouts) from code. Every field has a default, so the
/// service runs without a configuration file at all.
///
/// Precedence, lowest to highest: built-in defaults, TOML file,
/// environment (including `.env`), command-line flags.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration file looked up in the working directory when no
/// `--config` path is given.
pub const DEFAULT_CONFIG_PATH: &str = "rainfall_service.toml";

pub const DEFAULT_FWS_BASE_URL: &str = "https://www.harriscountyfws.org";
pub const DEFAULT_ROW_SELECTOR: &str = "#gageDataTable tbody tr";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Root configuration structure for TOML parsing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub scraper: ScraperConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Size of the request worker pool.
    pub workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            workers: 4,
        }
    }
}

/// Harris County FWS site settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// CSS selector matching one rainfall row per element.
    pub row_selector: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_FWS_BASE_URL.to_string(),
            timeout_secs: 30,
            user_agent: format!("hcfws-rainfall-service/{}", env!("CARGO_PKG_VERSION")),
            row_selector: DEFAULT_ROW_SELECTOR.to_string(),
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl ServiceConfig {
    /// Parses a TOML document. Missing tables and fields take defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Loads configuration from `path`, or from `rainfall_service.toml` when
    /// `path` is `None`. An explicitly named file must exist; the default
    /// file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
        };

        if !required && !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .map_err(|source| ConfigError::Read { path: path.clone(), source })?;

        Self::from_toml_str(&contents)
    }

    /// Loads `.env` if present and applies process environment overrides.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        dotenv::dotenv().ok();
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary key lookup.
    ///
    /// Recognised keys: `RAINFALL_SERVICE_HOST`, `RAINFALL_SERVICE_PORT`,
    /// `RAINFALL_SERVICE_WORKERS`, `HCFWS_BASE_URL`, `HCFWS_TIMEOUT_SECS`.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("RAINFALL_SERVICE_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("RAINFALL_SERVICE_PORT") {
            self.server.port = parse_value("RAINFALL_SERVICE_PORT", &port)?;
        }
        if let Some(workers) = lookup("RAINFALL_SERVICE_WORKERS") {
            self.server.workers = parse_value("RAINFALL_SERVICE_WORKERS", &workers)?;
        }
        if let Some(base_url) = lookup("HCFWS_BASE_URL") {
            self.scraper.base_url = base_url;
        }
        if let Some(timeout) = lookup("HCFWS_TIMEOUT_SECS") {
            self.scraper.timeout_secs = parse_value("HCFWS_TIMEOUT_SECS", &timeout)?;
        }
        Ok(())
    }

    /// Rejects settings the service cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.workers == 0 {
            return Err(invalid("server.workers", "0"));
        }
        if self.scraper.timeout_secs == 0 {
            return Err(invalid("scraper.timeout_secs", "0"));
        }
        let url = &self.scraper.base_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(invalid("scraper.base_url", url));
        }
        if scraper::Selector::parse(&self.scraper.row_selector).is_err() {
            return Err(invalid("scraper.row_selector", &self.scraper.row_selector));
        }
        Ok(())
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| invalid(key, value))
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}
