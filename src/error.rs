//! Error types for the currency engine

use thiserror::Error;

/// Main error type for currency and exchange-rate operations
///
/// Conversion and formatting never surface these: they fail open. Errors
/// exist at the source and store seams, where a caller can actually react.
#[derive(Error, Debug)]
pub enum CurrencyError {
    #[error("Rate source unreachable: {0}")]
    SourceUnreachable(String),

    #[error("Malformed rate response: {0}")]
    MalformedResponse(String),

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("State store error: {0}")]
    StoreError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

/// Result type alias for currency-engine operations
pub type Result<T> = std::result::Result<T, CurrencyError>;
