//! Error types for buffers and parameters.
//!
//! # Usage
//!
//! ```rust
//! use cph_core::{CoreError, Result};
//!
//! fn check_dims(width: usize, height: usize) -> Result<()> {
//!     if width == 0 || height == 0 {
//!         return Err(CoreError::InvalidDimensions { width, height, channels: 3 });
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_dims(0, 4).is_err());
//! ```
//!
//! # Used By
//!
//! - [`crate::image::Image`] - buffer invariants
//! - `cph-color` - domain conversion boundaries
//! - `cph-pipeline` - wrapped in `PipelineError`

use thiserror::Error;

/// Result alias using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;

/// Failures detected on pixel buffers and parameter sets.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// Width, height or channel count is zero or unsupported.
    #[error("invalid dimensions {width}x{height}x{channels}")]
    InvalidDimensions {
        /// Width in pixels.
        width: usize,
        /// Height in pixels.
        height: usize,
        /// Channels per pixel.
        channels: usize,
    },

    /// Buffer length does not match `width * height * channels`.
    #[error("buffer holds {actual} values, expected {expected}")]
    BufferSize {
        /// `width * height * channels`.
        expected: usize,
        /// Actual element count.
        actual: usize,
    },

    /// A NaN or infinite value was found.
    ///
    /// `index` is the flat element index of the first offender.
    #[error("non-finite value at element {index}")]
    NonFinite {
        /// Flat element index.
        index: usize,
    },

    /// A parameter could not be brought into its valid range.
    #[error("parameter {field} = {value} outside [{min}, {max}]")]
    InvalidParameter {
        /// Field name.
        field: &'static str,
        /// Offending value.
        value: f32,
        /// Range minimum.
        min: f32,
        /// Range maximum.
        max: f32,
    },

    /// Two buffers disagree on channel layout.
    #[error("channel mismatch: expected {expected}, got {actual}")]
    ChannelMismatch {
        /// Expected channels.
        expected: usize,
        /// Actual channels.
        actual: usize,
    },
}
