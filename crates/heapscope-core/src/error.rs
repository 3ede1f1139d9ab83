//! Error types for window construction.

use std::fmt;

/// Errors from constructing a discrete window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowError {
    /// A maximum bound was below its minimum bound.
    InvertedBounds {
        /// The axis whose bounds were inverted (`"address"` or `"tick"`).
        axis: &'static str,
        /// The offending minimum, widened to `u64`.
        min: u64,
        /// The offending maximum, widened to `u64`.
        max: u64,
    },
}

impl fmt::Display for WindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvertedBounds { axis, min, max } => {
                write!(f, "inverted {axis} bounds: min {min} > max {max}")
            }
        }
    }
}

impl std::error::Error for WindowError {}
