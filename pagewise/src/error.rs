//! Library error types.

use thiserror::Error;

/// Errors raised while configuring paged views.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PagerError {
    /// A grid needs at least one slot per row.
    #[error("Grid cross axis count must be at least 1")]
    ZeroCrossAxisCount,

    /// A grid extent or ratio was zero, negative or not a number.
    #[error("Grid {field} must be a positive number, got {value}")]
    InvalidGridDimension {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f32,
    },

    /// The viewport of a windowed host cannot be empty.
    #[error("Viewport must show at least one {unit}")]
    EmptyViewport {
        /// "slot" or "row".
        unit: &'static str,
    },

    /// A configuration field was rejected.
    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfig {
        /// Name of the offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}
