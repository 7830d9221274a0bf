//! Error types for build pricing.
//!
//! Malformed build data never produces an error; it degrades to empty
//! buckets. The errors here come from the edges of the crate: document
//! text that is not JSON, persisted state, configuration, and the
//! external exchange rate source.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PricingError>;

/// Errors that can occur while pricing a build.
///
/// # Examples
///
/// ```rust
/// use buildprice::PricingError;
///
/// let err = PricingError::RateUnavailable("Standard".to_string());
/// println!("{}", err); // "Exchange rate unavailable: Standard"
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PricingError {
    /// The build document text could not be parsed as JSON.
    #[error("Malformed build document: {0}")]
    Document(String),

    /// Reading from or writing to persistent storage failed.
    ///
    /// Contains the storage key and a description of the failure.
    #[error("Storage failure for {key}: {message}")]
    Storage { key: String, message: String },

    /// A value could not be serialized for persistence.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// The exchange rate source failed or returned an unusable rate.
    #[error("Exchange rate unavailable: {0}")]
    RateUnavailable(String),

    /// The configuration file could not be read or parsed.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl PricingError {
    /// Build a [`PricingError::Storage`] for `key` from any displayable cause.
    pub fn storage(key: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        PricingError::Storage {
            key: key.into(),
            message: cause.to_string(),
        }
    }
}

impl From<serde_json::Error> for PricingError {
    fn from(err: serde_json::Error) -> Self {
        PricingError::Serialization(err.to_string())
    }
}
