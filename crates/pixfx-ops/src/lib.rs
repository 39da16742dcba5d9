//! # pixfx-ops
//!
//! The shared numeric kernels behind raster filters.
//!
//! Individual filters are thin: a blur is a [`Kernel`], a twirl is a
//! coordinate map, a blend mode is a [`BlendOp`]. They all funnel into the
//! three engines in this crate.
//!
//! # Modules
//!
//! - [`resample`] - inverse-mapping resampler with bilinear reconstruction
//! - [`convolve`] - discrete convolution with horizontal/vertical fast paths
//! - [`composite`] - pixel blend operators and the alpha-over law
//! - [`kernel`] - convolution kernels and builders
//! - [`warp`] - affine, twirl, ripple and barrel coordinate maps
//! - [`hsb`] - hue/saturation/brightness conversion
//!
//! # Example
//!
//! ```rust
//! use pixfx_core::{pixel, EdgePolicy, Raster};
//! use pixfx_ops::{convolve, resample, Kernel};
//!
//! let src = Raster::filled(16, 16, pixel::pack(255, 200, 100, 50));
//!
//! // Blur
//! let blurred = convolve::convolve(&Kernel::box_blur(3), &src, true, EdgePolicy::Clamp);
//! assert_eq!(blurred, src);
//!
//! // Shift one pixel right, wrapping around
//! let shifted = resample::resample(
//!     &src,
//!     src.bounds(),
//!     &|x: i32, y: i32| (x as f32 - 1.0, y as f32),
//!     EdgePolicy::Wrap,
//! )?;
//! assert_eq!(shifted, src);
//! # Ok::<(), pixfx_ops::OpsError>(())
//! ```
//!
//! # Features
//!
//! - `parallel` (default) - process output rows on the rayon thread pool.
//!   Results are bit-identical with and without it.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod rows;

pub mod composite;
pub mod convolve;
pub mod hsb;
pub mod kernel;
pub mod resample;
pub mod warp;

pub use composite::BlendOp;
pub use convolve::ConvolveOptions;
pub use error::{OpsError, OpsResult};
pub use kernel::Kernel;
pub use resample::{InverseMap, Interpolation, ResampleOptions};
pub use warp::{Affine, Barrel, Ripple, Twirl, WaveShape};

pub use pixfx_core::EdgePolicy;
