use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<config::ConfigError> for BridgeError {
    fn from(err: config::ConfigError) -> Self {
        BridgeError::Configuration(err.to_string())
    }
}
