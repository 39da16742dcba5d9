//! Row scheduling for per-pixel kernels.
//!
//! Every output row of the resampler and the convolution engine depends
//! only on the source raster, so rows can be filled in any order. With the
//! `parallel` feature rows are handed to rayon; without it they run in a
//! plain loop. Each row is computed by the same closure either way, so the
//! output is bit-identical.

use pixfx_core::Pixel;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Calls `f(y, row)` for every `width`-pixel row of `dst`.
#[cfg(feature = "parallel")]
pub(crate) fn for_each_row<F>(dst: &mut [Pixel], width: usize, f: F)
where
    F: Fn(usize, &mut [Pixel]) + Sync + Send,
{
    if width == 0 || dst.is_empty() {
        return;
    }
    dst.par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| f(y, row));
}

/// Calls `f(y, row)` for every `width`-pixel row of `dst` (single-threaded).
#[cfg(not(feature = "parallel"))]
pub(crate) fn for_each_row<F>(dst: &mut [Pixel], width: usize, f: F)
where
    F: Fn(usize, &mut [Pixel]) + Sync + Send,
{
    if width == 0 || dst.is_empty() {
        return;
    }
    for (y, row) in dst.chunks_mut(width).enumerate() {
        f(y, row);
    }
}
