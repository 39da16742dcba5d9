//! Error types for pixfx-core.
//!
//! The core types validate their invariants at construction time, so the
//! only failures here are caller precondition violations: a pixel buffer
//! whose length disagrees with its dimensions, a dimension product that
//! overflows, an out-of-range coordinate, or an unknown edge policy id.
//!
//! # Usage
//!
//! ```rust
//! use pixfx_core::{Error, Raster};
//!
//! let err = Raster::from_pixels(2, 2, vec![0; 3]).unwrap_err();
//! assert!(matches!(err, Error::BufferSize { expected: 4, got: 3 }));
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the core raster types.
#[derive(Debug, Error)]
pub enum Error {
    /// Pixel coordinates are outside raster bounds.
    #[error("pixel ({x}, {y}) out of bounds for raster {width}x{height}")]
    OutOfBounds {
        /// X coordinate that was out of bounds
        x: i64,
        /// Y coordinate that was out of bounds
        y: i64,
        /// Raster width
        width: u32,
        /// Raster height
        height: u32,
    },

    /// Pixel buffer length does not equal `width * height`.
    #[error("pixel buffer holds {got} pixels, expected {expected}")]
    BufferSize {
        /// Required length
        expected: usize,
        /// Supplied length
        got: usize,
    },

    /// Invalid raster dimensions.
    ///
    /// Returned when `width * height` would overflow `usize`.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// Edge policy name or numeric id not recognised.
    #[error("unknown edge policy: {0}")]
    UnknownEdgePolicy(String),
}

impl Error {
    /// Creates an [`Error::OutOfBounds`] error.
    #[inline]
    pub fn out_of_bounds(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self::OutOfBounds {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Returns `true` if this is a bounds-related error.
    #[inline]
    pub fn is_bounds_error(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. })
    }
}
