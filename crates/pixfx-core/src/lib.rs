//! # pixfx-core
//!
//! Core types for 8-bit ARGB raster processing.
//!
//! This crate provides the value types shared by every pixfx crate:
//!
//! - [`Pixel`] - packed `0xAARRGGBB` pixel and channel helpers
//! - [`Raster`] - row-major pixel buffer with a guaranteed length invariant
//! - [`WorkRect`] - output region for geometric transforms
//! - [`EdgePolicy`] - out-of-bounds handling shared by resampling and convolution
//!
//! ## Crate Structure
//!
//! ```text
//! pixfx-core (this crate)
//!    ^
//!    |
//!    +-- pixfx-ops (resample, convolve, composite)
//!    +-- pixfx-io (PNG load/save)
//!    +-- pixfx-cli
//! ```
//!
//! All types are plain values: created per call, never shared between calls.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod edge;
pub mod error;
pub mod pixel;
pub mod raster;
pub mod rect;

pub use edge::EdgePolicy;
pub use error::{Error, Result};
pub use pixel::Pixel;
pub use raster::Raster;
pub use rect::WorkRect;

/// Prelude module for convenient imports.
///
/// ```
/// use pixfx_core::prelude::*;
///
/// let raster = Raster::filled(4, 4, pixel::pack(255, 128, 128, 128));
/// assert_eq!(raster.bounds(), WorkRect::from_size(4, 4));
/// ```
pub mod prelude {
    pub use crate::edge::EdgePolicy;
    pub use crate::error::{Error, Result};
    pub use crate::pixel::{self, Pixel};
    pub use crate::raster::Raster;
    pub use crate::rect::WorkRect;
}
