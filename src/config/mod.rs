//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::fetch::youtube::YOUTUBE_API_BASE;
use crate::fetch::FetcherConfig;

/// Environment variable that overrides `youtube.api_key`.
pub const API_KEY_ENV: &str = "YOUTUBE_API_KEY";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// YouTube Data API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YouTubeConfig {
    /// API key; `YOUTUBE_API_KEY` takes precedence when set
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the Data API
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Per-request timeout in seconds (unset = no timeout)
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

fn default_api_base() -> String {
    YOUTUBE_API_BASE.to_string()
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: default_api_base(),
            timeout_seconds: None,
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub youtube: YouTubeConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            youtube: YouTubeConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.youtube.timeout_seconds == Some(0) {
            return Err(ConfigError::ValidationError(
                "YouTube timeout must be greater than 0".to_string(),
            ));
        }

        if url::Url::parse(&self.youtube.api_base).is_err() {
            return Err(ConfigError::ValidationError(format!(
                "YouTube API base is not a valid URL: {}",
                self.youtube.api_base
            )));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Fetcher settings, reading the API key from the environment now.
    pub fn fetcher_config(&self) -> FetcherConfig {
        self.fetcher_config_with_env(std::env::var(API_KEY_ENV).ok())
    }

    /// Fetcher settings with an explicit environment override for the key.
    pub fn fetcher_config_with_env(&self, env_key: Option<String>) -> FetcherConfig {
        let api_key = env_key
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.youtube.api_key.clone());

        FetcherConfig {
            api_key,
            api_base: self.youtube.api_base.trim_end_matches('/').to_string(),
            timeout: self.youtube.timeout_seconds.map(Duration::from_secs),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.log_level, "info");
        assert_eq!(config.youtube.api_base, YOUTUBE_API_BASE);
        assert!(config.youtube.api_key.is_none());
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_config_validation_ok() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_timeout() {
        let mut config = AppConfig::default();
        config.youtube.timeout_seconds = Some(0);

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_api_base() {
        let mut config = AppConfig::default();
        config.youtube.api_base = "not a url".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
log_level = "debug"

[youtube]
api_key = "file-key"
timeout_seconds = 15

[server]
port = 9090
"#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.youtube.api_key.as_deref(), Some("file-key"));
        assert_eq!(config.youtube.timeout_seconds, Some(15));
        assert_eq!(config.youtube.api_base, YOUTUBE_API_BASE);
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_config_from_file_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "log_level = ").unwrap();

        let err = AppConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_config_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_env_key_overrides_file_key() {
        let mut config = AppConfig::default();
        config.youtube.api_key = Some("file-key".to_string());

        let fetcher = config.fetcher_config_with_env(Some("env-key".to_string()));
        assert_eq!(fetcher.api_key.as_deref(), Some("env-key"));

        let fetcher = config.fetcher_config_with_env(None);
        assert_eq!(fetcher.api_key.as_deref(), Some("file-key"));

        let fetcher = config.fetcher_config_with_env(Some("  ".to_string()));
        assert_eq!(fetcher.api_key.as_deref(), Some("file-key"));
    }

    #[test]
    fn test_fetcher_config_mapping() {
        let mut config = AppConfig::default();
        config.youtube.api_base = "http://localhost:3000/v3/".to_string();
        config.youtube.timeout_seconds = Some(20);

        let fetcher = config.fetcher_config_with_env(None);

        assert_eq!(fetcher.api_base, "http://localhost:3000/v3");
        assert_eq!(fetcher.timeout, Some(Duration::from_secs(20)));
        assert!(fetcher.api_key.is_none());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        // Should be parseable
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.youtube.api_base, parsed.youtube.api_base);
    }
}
