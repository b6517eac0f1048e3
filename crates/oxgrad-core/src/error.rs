//! Error types for oxgrad

use thiserror::Error;

/// Result type for oxgrad operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in oxgrad operations
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// No colors were supplied to a gradient factory
    #[error("Gradient requires at least one color")]
    EmptyColors,

    /// Positions were supplied but do not pair up with the colors
    #[error("Position count mismatch: expected {expected}, got {actual}")]
    PositionCount { expected: usize, actual: usize },

    /// Tile mode tag outside the known range
    #[error("Invalid tile mode: {0}")]
    InvalidTileMode(u32),

    /// The device, local, or points-to-unit transform cannot be inverted
    #[error("Transform is not invertible")]
    NonInvertibleMatrix,

    /// Color space conversion failed
    #[error("Color conversion error: {0}")]
    ColorConversion(String),

    /// Flattened gradient data is malformed or truncated
    #[error("Deserialize error: {0}")]
    Deserialize(String),
}
