//! Error types for the market data crate.
//!
//! Every variant is an "ordinary" upstream failure. None of them escape the
//! [`PriceSource`](crate::registry::PriceSource) boundary: they are logged
//! there and turned into absent facts.

use thiserror::Error;

/// Errors that can occur while talking to a market data provider.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The provider could not be reached or answered with a non-success status.
    #[error("Upstream unavailable: {provider} - {message}")]
    UpstreamUnavailable {
        /// The provider that failed
        provider: String,
        /// Status line or transport error
        message: String,
    },

    /// The provider answered, but the payload lacks the expected section
    /// or could not be parsed.
    #[error("Data incomplete for {asset}: {message}")]
    DataIncomplete {
        /// The asset that was requested
        asset: String,
        /// What was missing
        message: String,
    },

    /// The provider rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// The endpoint is not available under the credential tier in use.
    #[error("Not supported by {provider}: {operation}")]
    NotSupported {
        /// The endpoint or operation that was refused
        operation: String,
        /// The provider that refused it
        provider: String,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// True when the failure reflects missing or partial data rather than a
    /// transport problem.
    pub fn is_data_incomplete(&self) -> bool {
        matches!(self, Self::DataIncomplete { .. })
    }
}
