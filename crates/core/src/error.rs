//! Error types for the woodgrain core.

use thiserror::Error;

/// Errors produced by woodgrain operations.
#[derive(Debug, Error)]
pub enum WoodgrainError {
    /// A viewport width or height was negative or not finite.
    #[error("invalid dimensions: {width}x{height} (width and height must be finite and non-negative)")]
    InvalidDimensions { width: f64, height: f64 },

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A configuration value was out of range or inconsistent.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A host-side I/O or listener registration failure.
    #[error("io error: {0}")]
    Io(String),
}
