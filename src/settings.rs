use config::{Config, ConfigError, File};
use serde::Deserialize;
use std::time::Duration;

/// Default bound on how long an authorize cycle may await its native
/// callback before being resolved as abandoned.
pub const DEFAULT_AUTHORIZE_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default)]
    pub consumer_key: String,
    #[serde(default)]
    pub consumer_secret: String,
    #[serde(default = "default_authorize_timeout_secs")]
    pub authorize_timeout_secs: u64,
}

fn default_authorize_timeout_secs() -> u64 {
    DEFAULT_AUTHORIZE_TIMEOUT_SECS
}

impl Settings {
    /// Load and validate settings from the config file and environment.
    pub fn load() -> Result<Self, crate::error::BridgeError> {
        let settings = Self::new()?;
        settings
            .validate()
            .map_err(crate::error::BridgeError::Configuration)?;
        Ok(settings)
    }

    pub fn new() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("TWITTER_LOGIN_CONFIG").unwrap_or_else(|_| "config.toml".to_string());

        let settings = Config::builder()
            .add_source(File::with_name(&config_path).required(false))
            .add_source(config::Environment::with_prefix("TWITTER_LOGIN").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.consumer_key.is_empty() {
            return Err("consumer_key is required".to_string());
        }
        if self.consumer_secret.is_empty() {
            return Err("consumer_secret is required".to_string());
        }
        if self.authorize_timeout_secs == 0 {
            return Err("authorize_timeout_secs must be greater than zero".to_string());
        }
        Ok(())
    }

    pub fn authorize_timeout(&self) -> Duration {
        Duration::from_secs(self.authorize_timeout_secs)
    }
}
