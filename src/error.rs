//! Error type shared by every filter.
//!
//! Filters fail for two reasons only: the caller handed them a configuration
//! that has no defined meaning (even-sized kernel, inverted random range,
//! empty image), or a working buffer could not be allocated. Everything else
//! (out-of-range sample coordinates, segments running past the row start) is
//! clamped at the point of computation and never surfaces as an error.

/// Errors produced by the filter engine.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    /// Kernel has an even or zero dimension, or the weight count does not
    /// match its dimensions.
    #[error("invalid kernel: {0}")]
    InvalidKernel(String),

    /// A random sampling range has `min > max`.
    #[error("invalid {name} range: min {min} exceeds max {max}")]
    InvalidRange {
        name: &'static str,
        min: i32,
        max: i32,
    },

    /// Image shape is not a non-empty `(height, width, 3)` grid.
    #[error("invalid image dimensions: {0}")]
    InvalidDimensions(String),

    /// A working buffer could not be reserved.
    #[error("failed to allocate a {width}x{height} pixel buffer")]
    Allocation { width: usize, height: usize },
}

pub type Result<T> = std::result::Result<T, FilterError>;
