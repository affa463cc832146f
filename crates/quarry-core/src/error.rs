//! Error types for the fundamentals pipeline.

use thiserror::Error;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, QuarryError>;

/// Errors that can occur while fetching statements or deriving metrics.
#[derive(Debug, Error)]
pub enum QuarryError {
    /// Provider returned nothing usable for the symbol
    #[error("no usable data for {symbol}: {reason}")]
    DataUnavailable {
        /// Symbol that was queried
        symbol: String,
        /// Reason the data is unusable
        reason: String,
    },

    /// A required line item could not be located by keyword match
    #[error("could not resolve {field} column; available columns: [{}]", available.join(", "))]
    MetricResolution {
        /// Semantic field that failed to resolve
        field: String,
        /// Column labels that were actually present
        available: Vec<String>,
    },

    /// Fewer than two aligned data points survived alignment
    #[error("not enough data to compute growth metrics: {points} aligned point(s), need at least 2")]
    InsufficientData {
        /// Number of aligned points
        points: usize,
    },

    /// Invalid symbol
    #[error("invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Data parsing error
    #[error("data parsing error: {0}")]
    Parse(String),

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
