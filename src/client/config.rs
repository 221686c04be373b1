use std::time::Duration;

use secrecy::SecretString;

use crate::client::consts::{
    API_KEY_VAR, BASE_URL, BASE_URL_VAR, DEFAULT_EVENT_CAPACITY, DEFAULT_RECONNECT_DELAY_MS,
    DEFAULT_SETUP_RETRY_INTERVAL_MS, MIN_INTERVAL_MS,
};

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Connection target and tunables. The endpoint and the API key are always
/// injected here, never compiled into the request.
#[derive(Debug)]
pub struct Config {
    base_url: String,
    api_key: SecretString,
    event_capacity: usize,
    setup_retry_interval: Duration,
    reconnect_delay: Duration,
}

pub struct ConfigBuilder {
    config: Config,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.config.base_url = base_url.to_string();
        self
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.config.api_key = SecretString::from(api_key.to_string());
        self
    }

    /// Capacity of the broadcast channel behind `Client::subscribe`.
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.config.event_capacity = capacity.max(1);
        self
    }

    /// Clamped to at least one millisecond.
    pub fn with_setup_retry_interval(mut self, interval: Duration) -> Self {
        self.config.setup_retry_interval = interval.max(Duration::from_millis(MIN_INTERVAL_MS));
        self
    }

    /// Clamped to at least one millisecond.
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.config.reconnect_delay = delay.max(Duration::from_millis(MIN_INTERVAL_MS));
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    // Default endpoint and timings, no credentials.
    pub fn new() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            api_key: SecretString::from(String::new()),
            event_capacity: DEFAULT_EVENT_CAPACITY,
            setup_retry_interval: Duration::from_millis(DEFAULT_SETUP_RETRY_INTERVAL_MS),
            reconnect_delay: Duration::from_millis(DEFAULT_RECONNECT_DELAY_MS),
        }
    }

    /// Loads configuration from environment variables.
    ///
    /// *   `MULTIMODAL_LIVE_API_KEY`: API key appended to the endpoint URL. Required.
    /// *   `MULTIMODAL_LIVE_URL`: (Optional) WebSocket endpoint. Defaults to the public endpoint.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let api_key = std::env::var(API_KEY_VAR)
            .map_err(|_| ConfigError::MissingVar(API_KEY_VAR.to_string()))?;
        if api_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                API_KEY_VAR.to_string(),
                "value is empty".to_string(),
            ));
        }

        let base_url = std::env::var(BASE_URL_VAR).unwrap_or_else(|_| BASE_URL.to_string());
        if !(base_url.starts_with("ws://") || base_url.starts_with("wss://")) {
            return Err(ConfigError::InvalidValue(
                BASE_URL_VAR.to_string(),
                format!("'{}' is not a ws:// or wss:// URL", base_url),
            ));
        }

        Ok(Self::builder()
            .with_base_url(&base_url)
            .with_api_key(&api_key)
            .build())
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &SecretString {
        &self.api_key
    }

    pub fn event_capacity(&self) -> usize {
        self.event_capacity
    }

    pub fn setup_retry_interval(&self) -> Duration {
        self.setup_retry_interval
    }

    pub fn reconnect_delay(&self) -> Duration {
        self.reconnect_delay
    }
}
