//! Application configuration module
//!
//! Provides configuration types for the application. Values are resolved in
//! three layers: built-in defaults, an optional TOML file under the platform
//! config directory, and environment variables (highest precedence).
//!
//! Recognized environment variables:
//!
//! - `RIDELINK_SERVER_URL` - backend base URL (REST + broadcasting auth)
//! - `RIDELINK_PUBLIC_API_URL` - public URL for assets (avatars, attachments)
//! - `RIDELINK_BROADCASTER_KEY` - broadcaster application key
//! - `RIDELINK_BROADCASTER_CLUSTER` - broadcaster cluster identifier
//!
//! Absence of the broadcaster key or cluster is not an error: realtime
//! features are disabled and the client runs in poll-only mode.

use serde::Deserialize;
use thiserror::Error;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Backend base URL
    pub server_url: Option<String>,
    /// Public API URL used for asset links
    pub public_api_url: Option<String>,
    /// Broadcaster application key
    pub broadcaster_key: Option<String>,
    /// Broadcaster cluster identifier
    pub broadcaster_cluster: Option<String>,
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Load configuration from the optional TOML file, then apply
    /// environment-variable overrides.
    pub fn load() -> Self {
        let mut config = Self::from_file().unwrap_or_default();
        config.apply_env();
        config
    }

    /// Read `<config_dir>/ridelink/config.toml` if it exists.
    fn from_file() -> Option<Self> {
        let path = dirs::config_dir()?.join("ridelink").join("config.toml");
        let raw = std::fs::read_to_string(&path).ok()?;
        match toml::from_str(&raw) {
            Ok(config) => {
                tracing::debug!("[config] loaded {}", path.display());
                Some(config)
            }
            Err(e) => {
                tracing::warn!("[config] ignoring malformed {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Apply environment-variable overrides.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("RIDELINK_SERVER_URL") {
            self.server_url = Some(url);
        }
        if let Ok(url) = std::env::var("RIDELINK_PUBLIC_API_URL") {
            self.public_api_url = Some(url);
        }
        if let Ok(key) = std::env::var("RIDELINK_BROADCASTER_KEY") {
            self.broadcaster_key = Some(key);
        }
        if let Ok(cluster) = std::env::var("RIDELINK_BROADCASTER_CLUSTER") {
            self.broadcaster_cluster = Some(cluster);
        }
    }

    /// Whether enough broadcaster configuration is present for realtime
    pub fn realtime_configured(&self) -> bool {
        self.broadcaster_key.is_some() && self.broadcaster_cluster.is_some()
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    server_url: Option<String>,
    public_api_url: Option<String>,
    broadcaster_key: Option<String>,
    broadcaster_cluster: Option<String>,
}

impl AppConfigBuilder {
    /// Set the backend base URL
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    /// Set the public API URL
    pub fn public_api_url(mut self, url: impl Into<String>) -> Self {
        self.public_api_url = Some(url.into());
        self
    }

    /// Set the broadcaster application key
    pub fn broadcaster_key(mut self, key: impl Into<String>) -> Self {
        self.broadcaster_key = Some(key.into());
        self
    }

    /// Set the broadcaster cluster identifier
    pub fn broadcaster_cluster(mut self, cluster: impl Into<String>) -> Self {
        self.broadcaster_cluster = Some(cluster.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        if let Some(ref url) = self.server_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::InvalidUrl(url.clone()));
            }
        }
        Ok(AppConfig {
            server_url: self.server_url,
            public_api_url: self.public_api_url,
            broadcaster_key: self.broadcaster_key,
            broadcaster_cluster: self.broadcaster_cluster,
        })
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = AppConfig::builder().build().unwrap();
        assert!(config.server_url.is_none());
        assert!(!config.realtime_configured());
    }

    #[test]
    fn test_builder_full() {
        let config = AppConfig::builder()
            .server_url("http://127.0.0.1:3000")
            .public_api_url("http://127.0.0.1:3000/storage")
            .broadcaster_key("app-key")
            .broadcaster_cluster("eu")
            .build()
            .unwrap();
        assert_eq!(config.server_url.as_deref(), Some("http://127.0.0.1:3000"));
        assert!(config.realtime_configured());
    }

    #[test]
    fn test_builder_rejects_bad_url() {
        let result = AppConfig::builder().server_url("not a url").build();
        assert!(matches!(result, Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_realtime_needs_both_key_and_cluster() {
        let config = AppConfig::builder()
            .broadcaster_key("app-key")
            .build()
            .unwrap();
        assert!(!config.realtime_configured());
    }

    #[test]
    #[serial_test::serial]
    fn test_env_overrides() {
        std::env::set_var("RIDELINK_SERVER_URL", "https://env.ridelink.test");
        std::env::set_var("RIDELINK_BROADCASTER_KEY", "env-key");

        let mut config = AppConfig::default();
        config.apply_env();
        assert_eq!(config.server_url.as_deref(), Some("https://env.ridelink.test"));
        assert_eq!(config.broadcaster_key.as_deref(), Some("env-key"));
        assert!(config.broadcaster_cluster.is_none());

        std::env::remove_var("RIDELINK_SERVER_URL");
        std::env::remove_var("RIDELINK_BROADCASTER_KEY");
    }

    #[test]
    #[serial_test::serial]
    fn test_env_absent_leaves_values() {
        std::env::remove_var("RIDELINK_SERVER_URL");
        let mut config = AppConfig::builder()
            .server_url("http://127.0.0.1:8000")
            .build()
            .unwrap();
        config.apply_env();
        assert_eq!(config.server_url.as_deref(), Some("http://127.0.0.1:8000"));
    }

    #[test]
    fn test_toml_shape() {
        let config: AppConfig = toml::from_str(
            r#"
            server_url = "https://api.ridelink.test"
            broadcaster_key = "k"
            broadcaster_cluster = "mt1"
            "#,
        )
        .unwrap();
        assert_eq!(config.server_url.as_deref(), Some("https://api.ridelink.test"));
        assert_eq!(config.broadcaster_cluster.as_deref(), Some("mt1"));
        assert!(config.public_api_url.is_none());
    }
}
