use crate::shared::config::{AppConfig, AppConfigBuilder, ConfigError};

/// Default server URL
const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

/// Application configuration wrapper.
#[derive(Debug, Clone)]
pub struct Config {
    app: AppConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app: AppConfig::load(),
        }
    }
}

impl Config {
    /// Create a new configuration from the environment and optional file
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builder(builder: AppConfigBuilder) -> Result<Self, ConfigError> {
        Ok(Self {
            app: builder.build()?,
        })
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.server_url(), path)
    }

    pub fn server_url(&self) -> &str {
        self.app.server_url.as_deref().unwrap_or(DEFAULT_SERVER_URL)
    }

    /// Resolve an asset path (avatar, attachment) against the public API URL
    pub fn asset_url(&self, path: &str) -> String {
        let base = self
            .app
            .public_api_url
            .as_deref()
            .unwrap_or_else(|| self.server_url());
        format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    /// Broadcaster application key, if configured
    pub fn broadcaster_key(&self) -> Option<&str> {
        self.app.broadcaster_key.as_deref()
    }

    /// Broadcaster cluster identifier, if configured
    pub fn broadcaster_cluster(&self) -> Option<&str> {
        self.app.broadcaster_cluster.as_deref()
    }

    /// Whether realtime features can be enabled at all
    pub fn realtime_configured(&self) -> bool {
        self.app.realtime_configured()
    }
}
