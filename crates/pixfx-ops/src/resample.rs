//! Inverse-mapping resampler.
//!
//! Geometric warps are expressed as a backward map: for every destination
//! coordinate the map answers "which source coordinate lands here". The
//! resampler pulls that source coordinate out of the raster, so the output
//! has no holes regardless of how the warp stretches the image.
//!
//! # Sampling
//!
//! The mapped coordinate `(fx, fy)` is bounds-checked as a float, before any
//! rounding, against `[0, width) x [0, height)`:
//!
//! - inside: bilinear blend of the 2x2 neighbourhood at `floor(fx, fy)`; the
//!   `+1` neighbour is clamped to the last row/column
//! - outside: the [`EdgePolicy`] resolves `floor(fx, fy)` to a single source
//!   pixel, or to transparent black for `Omit`
//!
//! Checking the float matters for `-1 < fx < 0`: truncation would report
//! column 0 and sample a pixel that is actually off the image.
//!
//! A NaN coordinate has no nearest pixel and always produces transparent
//! black.
//!
//! # Example
//!
//! ```rust
//! use pixfx_core::{pixel, EdgePolicy, Raster, WorkRect};
//! use pixfx_ops::resample::resample;
//!
//! let src = Raster::from_fn(4, 4, |x, y| pixel::pack(255, x as u8, y as u8, 0));
//! let shifted = resample(
//!     &src,
//!     src.bounds(),
//!     &|x: i32, y: i32| (x as f32 + 1.0, y as f32),
//!     EdgePolicy::Wrap,
//! )
//! .unwrap();
//! assert_eq!(shifted.pixel(0, 0), src.pixel(1, 0));
//! assert_eq!(shifted.pixel(3, 0), src.pixel(0, 0));
//! ```

use pixfx_core::pixel::{pack, round_channel, unpack, TRANSPARENT};
use pixfx_core::{EdgePolicy, Pixel, Raster, WorkRect};
#[allow(unused_imports)]
use tracing::{debug, trace};

use crate::rows::for_each_row;
use crate::{OpsError, OpsResult};

/// Backward coordinate map from destination to source space.
pub trait InverseMap: Sync {
    /// Source coordinate sampled for destination pixel `(x, y)`.
    fn map_inverse(&self, x: i32, y: i32) -> (f32, f32);

    /// Destination rectangle needed to hold the warped `rect`.
    ///
    /// The default keeps the source rectangle.
    fn transform_space(&self, rect: WorkRect) -> WorkRect {
        rect
    }
}

impl<F> InverseMap for F
where
    F: Fn(i32, i32) -> (f32, f32) + Sync,
{
    #[inline]
    fn map_inverse(&self, x: i32, y: i32) -> (f32, f32) {
        self(x, y)
    }
}

/// Reconstruction filter for in-bounds samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Interpolation {
    /// Weighted 2x2 neighbourhood.
    #[default]
    Bilinear,
    /// The pixel at `floor(fx), floor(fy)`.
    Nearest,
}

/// Options for [`resample_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResampleOptions {
    /// Out-of-bounds handling.
    pub edge: EdgePolicy,
    /// In-bounds reconstruction.
    pub interpolation: Interpolation,
}

impl ResampleOptions {
    /// Bilinear options with the given edge policy.
    pub fn new(edge: EdgePolicy) -> Self {
        Self {
            edge,
            interpolation: Interpolation::Bilinear,
        }
    }
}

/// Resamples `source` through `map` into a raster covering `work_rect`.
///
/// Output pixel `(i, j)` corresponds to destination coordinate
/// `(work_rect.x + i, work_rect.y + j)`.
///
/// # Errors
///
/// - [`OpsError::InvalidDimensions`] if `source` is empty or `work_rect`
///   holds more pixels than can be addressed
pub fn resample<M>(
    source: &Raster,
    work_rect: WorkRect,
    map: &M,
    edge: EdgePolicy,
) -> OpsResult<Raster>
where
    M: InverseMap + ?Sized,
{
    resample_with(source, work_rect, map, &ResampleOptions::new(edge))
}

/// [`resample`] with explicit [`ResampleOptions`].
pub fn resample_with<M>(
    source: &Raster,
    work_rect: WorkRect,
    map: &M,
    options: &ResampleOptions,
) -> OpsResult<Raster>
where
    M: InverseMap + ?Sized,
{
    trace!(
        src_width = source.width(),
        src_height = source.height(),
        x = work_rect.x,
        y = work_rect.y,
        width = work_rect.width,
        height = work_rect.height,
        edge = %options.edge,
        interpolation = ?options.interpolation,
        "resample"
    );

    if source.is_empty() {
        return Err(OpsError::InvalidDimensions(format!(
            "cannot resample an empty {}x{} source",
            source.width(),
            source.height()
        )));
    }
    let count = (work_rect.width as usize)
        .checked_mul(work_rect.height as usize)
        .ok_or_else(|| {
            OpsError::InvalidDimensions(format!(
                "work rect {}x{} is too large",
                work_rect.width, work_rect.height
            ))
        })?;

    let mut out = Raster::from_pixels(work_rect.width, work_rect.height, vec![TRANSPARENT; count])?;
    let options = *options;
    for_each_row(out.pixels_mut(), work_rect.width as usize, |row, dst| {
        let y = offset(work_rect.y, row);
        for (col, px) in dst.iter_mut().enumerate() {
            let (fx, fy) = map.map_inverse(offset(work_rect.x, col), y);
            *px = sample(source, fx, fy, &options);
        }
    });
    Ok(out)
}

/// Warps `source` into the rectangle reported by
/// [`InverseMap::transform_space`].
///
/// The returned raster's pixel `(0, 0)` is the destination coordinate at the
/// derived rectangle's origin, which may be negative.
pub fn transform<M>(source: &Raster, map: &M, edge: EdgePolicy) -> OpsResult<(Raster, WorkRect)>
where
    M: InverseMap + ?Sized,
{
    let rect = map.transform_space(source.bounds());
    debug!(
        x = rect.x,
        y = rect.y,
        width = rect.width,
        height = rect.height,
        "derived work rect"
    );
    let out = resample(source, rect, map, edge)?;
    Ok((out, rect))
}

/// Bilinear blend of a 2x2 neighbourhood.
///
/// `xw` and `yw` are the fractional offsets from `c00` towards `c10` and
/// `c01`. Each channel is rounded to nearest and clamped. Zero offsets
/// return `c00` unchanged.
pub fn bilinear(xw: f32, yw: f32, c00: Pixel, c10: Pixel, c01: Pixel, c11: Pixel) -> Pixel {
    if xw == 0.0 && yw == 0.0 {
        return c00;
    }
    let m00 = (1.0 - xw) * (1.0 - yw);
    let m10 = xw * (1.0 - yw);
    let m01 = (1.0 - xw) * yw;
    let m11 = xw * yw;

    let p00 = unpack(c00);
    let p10 = unpack(c10);
    let p01 = unpack(c01);
    let p11 = unpack(c11);
    let ch = |i: usize| {
        round_channel(
            p00[i] as f32 * m00 + p10[i] as f32 * m10 + p01[i] as f32 * m01 + p11[i] as f32 * m11,
        )
    };
    pack(ch(0), ch(1), ch(2), ch(3))
}

/// Samples `source` at a mapped coordinate.
#[inline]
fn sample(source: &Raster, fx: f32, fy: f32, options: &ResampleOptions) -> Pixel {
    let (w, h) = source.dimensions();
    let inside = fx >= 0.0 && fy >= 0.0 && fx < w as f32 && fy < h as f32;

    if !inside {
        if fx.is_nan() || fy.is_nan() {
            return TRANSPARENT;
        }
        let ix = options.edge.map_index(fx.floor() as i64, w);
        let iy = options.edge.map_index(fy.floor() as i64, h);
        return match (ix, iy) {
            (Some(x), Some(y)) => source.pixel(x, y),
            _ => TRANSPARENT,
        };
    }

    // f32 rounding can land exactly on the far edge
    let ix = (fx.floor() as u32).min(w - 1);
    let iy = (fy.floor() as u32).min(h - 1);
    match options.interpolation {
        Interpolation::Nearest => source.pixel(ix, iy),
        Interpolation::Bilinear => {
            let xw = fx - ix as f32;
            let yw = fy - iy as f32;
            let x1 = (ix + 1).min(w - 1);
            let y1 = (iy + 1).min(h - 1);
            bilinear(
                xw,
                yw,
                source.pixel(ix, iy),
                source.pixel(x1, iy),
                source.pixel(ix, y1),
                source.pixel(x1, y1),
            )
        }
    }
}

#[inline]
fn offset(origin: i32, i: usize) -> i32 {
    (origin as i64 + i as i64).clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
