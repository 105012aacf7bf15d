//! Core error types for the mNAV tracker.
//!
//! Market data failures never surface here: the price source turns them into
//! absent values. What remains are configuration problems detected at startup
//! and failures of a whole refresh cycle.

use rust_decimal::Decimal;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the tracker.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Refresh cycle failed: {0}")]
    Refresh(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Problems with the dashboard configuration. All of these are fatal at
/// startup.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Failed to read configuration file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Malformed configuration: {0}")]
    Parse(String),

    #[error("No entities configured")]
    NoEntities,

    #[error("Duplicate entity id '{0}'")]
    DuplicateEntity(String),

    #[error("Entity '{id}': {message}")]
    InvalidEntity { id: String, message: String },

    #[error("{0} must be positive")]
    NonPositive(&'static str),

    #[error("Invalid {class} thresholds: buyBelow {buy_below} is above sellAbove {sell_above}")]
    InvalidThresholds {
        class: &'static str,
        buy_below: Decimal,
        sell_above: Decimal,
    },
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
