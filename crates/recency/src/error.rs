//! Error types for recency

use std::fmt;

/// Result type alias for recency operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for cache operations
///
/// A missing key is not an error: lookups return `Option`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Requested capacity was zero or negative
    InvalidCapacity(i64),

    /// Recency list and lookup index disagree
    Invariant(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidCapacity(capacity) => {
                write!(f, "Invalid capacity: {} (must be greater than 0)", capacity)
            }
            Error::Invariant(msg) => write!(f, "Invariant violated: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
