//! Error types for Tollgate.

use std::time::Duration;

use thiserror::Error;

/// Main error type for Tollgate operations.
#[derive(Error, Debug)]
pub enum TollgateError {
    /// Configuration document errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A constructor argument outside its valid range
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: String,
    },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TollgateError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        TollgateError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Result type alias for Tollgate operations.
pub type Result<T> = std::result::Result<T, TollgateError>;

/// Reject zero for a count-like parameter.
pub(crate) fn ensure_positive(name: &'static str, value: u64) -> Result<()> {
    if value == 0 {
        return Err(TollgateError::invalid(name, "must be greater than zero"));
    }
    Ok(())
}

/// Reject zero-length windows.
pub(crate) fn ensure_window(name: &'static str, window: Duration) -> Result<()> {
    if window.is_zero() {
        return Err(TollgateError::invalid(name, "window must be longer than zero"));
    }
    Ok(())
}

/// Reject negative, NaN and infinite rates. Zero is allowed.
pub(crate) fn ensure_rate(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(TollgateError::invalid(name, format!("must be finite, got {value}")));
    }
    if value < 0.0 {
        return Err(TollgateError::invalid(name, format!("must not be negative, got {value}")));
    }
    Ok(())
}
