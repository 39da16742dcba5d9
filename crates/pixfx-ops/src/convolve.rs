//! Discrete convolution of ARGB rasters.
//!
//! [`convolve`] applies a weighted neighbourhood [`Kernel`] to every pixel
//! and returns a raster of the same size. The kernel shape picks the loop:
//!
//! - `rows == 1` - [`convolve_h`], horizontal only
//! - `cols == 1` - [`convolve_v`], vertical only
//! - otherwise  - [`convolve_hv`], full 2-D
//!
//! All three produce identical output for the kernels they share; the 1-D
//! loops only skip the bookkeeping of the unused axis.
//!
//! # Edges
//!
//! Out-of-bounds neighbours are resolved per axis with the [`EdgePolicy`]:
//! `Clamp` and `Wrap` substitute an in-bounds row or column, `Omit` skips the
//! sample. Skipped samples contribute nothing and the remaining weights are
//! not renormalised, so with `Omit` even a kernel summing to 1 darkens the
//! border.
//!
//! # Rounding
//!
//! Channel sums are accumulated in `f32`, then `+ 0.5`, truncated and
//! clamped to `[0, 255]`. When alpha is excluded the output alpha is `0xff`.
//!
//! # Example
//!
//! ```rust
//! use pixfx_core::{pixel, EdgePolicy, Raster};
//! use pixfx_ops::convolve::convolve;
//! use pixfx_ops::kernel::Kernel;
//!
//! let src = Raster::filled(8, 8, pixel::pack(255, 128, 128, 128));
//! let out = convolve(&Kernel::box_blur(3), &src, true, EdgePolicy::Clamp);
//! assert_eq!(out, src);
//! ```

use pixfx_core::pixel::{pack, truncate_channel, unpack};
use pixfx_core::{EdgePolicy, Pixel, Raster};
#[allow(unused_imports)]
use tracing::{debug, trace};

use crate::kernel::Kernel;
use crate::rows::for_each_row;

/// Options for [`convolve_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvolveOptions {
    /// Convolve the alpha channel too. When `false` the output is opaque.
    pub include_alpha: bool,
    /// Out-of-bounds handling.
    pub edge: EdgePolicy,
}

impl Default for ConvolveOptions {
    fn default() -> Self {
        Self {
            include_alpha: true,
            edge: EdgePolicy::Omit,
        }
    }
}

/// Per-channel running sums.
#[derive(Debug, Clone, Copy, Default)]
struct Accum {
    a: f32,
    r: f32,
    g: f32,
    b: f32,
}

impl Accum {
    #[inline]
    fn add(&mut self, weight: f32, p: Pixel) {
        let [a, r, g, b] = unpack(p);
        self.a += weight * a as f32;
        self.r += weight * r as f32;
        self.g += weight * g as f32;
        self.b += weight * b as f32;
    }

    #[inline]
    fn finish(self, include_alpha: bool) -> Pixel {
        let a = if include_alpha {
            truncate_channel(self.a)
        } else {
            0xff
        };
        pack(
            a,
            truncate_channel(self.r),
            truncate_channel(self.g),
            truncate_channel(self.b),
        )
    }
}

/// Signed source index for output position `pos` and kernel tap `tap`.
#[inline]
fn neighbour(pos: usize, tap: usize, center: usize) -> i64 {
    pos as i64 + tap as i64 - center as i64
}

/// Convolves `src` with `kernel`, dispatching on kernel shape.
pub fn convolve(kernel: &Kernel, src: &Raster, include_alpha: bool, edge: EdgePolicy) -> Raster {
    trace!(
        width = src.width(),
        height = src.height(),
        kernel_cols = kernel.cols(),
        kernel_rows = kernel.rows(),
        include_alpha,
        %edge,
        "convolve"
    );

    if kernel.is_horizontal() {
        debug!("horizontal pass");
        convolve_h(kernel, src, include_alpha, edge)
    } else if kernel.is_vertical() {
        debug!("vertical pass");
        convolve_v(kernel, src, include_alpha, edge)
    } else {
        debug!("2-D pass");
        convolve_hv(kernel, src, include_alpha, edge)
    }
}

/// [`convolve`] with an options record.
pub fn convolve_with(kernel: &Kernel, src: &Raster, options: &ConvolveOptions) -> Raster {
    convolve(kernel, src, options.include_alpha, options.edge)
}

/// Full 2-D convolution, valid for any kernel shape.
pub fn convolve_hv(kernel: &Kernel, src: &Raster, include_alpha: bool, edge: EdgePolicy) -> Raster {
    let (width, height) = src.dimensions();
    let (cx, cy) = kernel.center();
    let mut dst = Raster::new(width, height);

    for_each_row(dst.pixels_mut(), width as usize, |y, out| {
        for (x, slot) in out.iter_mut().enumerate() {
            let mut acc = Accum::default();
            for ky in 0..kernel.rows() {
                let Some(iy) = edge.map_index(neighbour(y, ky, cy), height) else {
                    continue;
                };
                let src_row = src.row(iy);
                for (kx, &w) in kernel.row(ky).iter().enumerate() {
                    if w == 0.0 {
                        continue;
                    }
                    let Some(ix) = edge.map_index(neighbour(x, kx, cx), width) else {
                        continue;
                    };
                    acc.add(w, src_row[ix as usize]);
                }
            }
            *slot = acc.finish(include_alpha);
        }
    });

    dst
}

/// Horizontal-only convolution. Only row 0 of the kernel is used.
pub fn convolve_h(kernel: &Kernel, src: &Raster, include_alpha: bool, edge: EdgePolicy) -> Raster {
    let (width, height) = src.dimensions();
    let (cx, _) = kernel.center();
    let weights = kernel.row(0);
    let mut dst = Raster::new(width, height);

    for_each_row(dst.pixels_mut(), width as usize, |y, out| {
        let src_row = src.row(y as u32);
        for (x, slot) in out.iter_mut().enumerate() {
            let mut acc = Accum::default();
            for (kx, &w) in weights.iter().enumerate() {
                if w == 0.0 {
                    continue;
                }
                let Some(ix) = edge.map_index(neighbour(x, kx, cx), width) else {
                    continue;
                };
                acc.add(w, src_row[ix as usize]);
            }
            *slot = acc.finish(include_alpha);
        }
    });

    dst
}

/// Vertical-only convolution. Only column 0 of the kernel is used.
pub fn convolve_v(kernel: &Kernel, src: &Raster, include_alpha: bool, edge: EdgePolicy) -> Raster {
    let (width, height) = src.dimensions();
    let (_, cy) = kernel.center();
    let cols = kernel.cols();
    let weights: Vec<f32> = kernel.weights().iter().step_by(cols).copied().collect();
    let mut dst = Raster::new(width, height);

    for_each_row(dst.pixels_mut(), width as usize, |y, out| {
        for (x, slot) in out.iter_mut().enumerate() {
            let mut acc = Accum::default();
            for (ky, &w) in weights.iter().enumerate() {
                if w == 0.0 {
                    continue;
                }
                let Some(iy) = edge.map_index(neighbour(y, ky, cy), height) else {
                    continue;
                };
                acc.add(w, src.pixel(x as u32, iy));
            }
            *slot = acc.finish(include_alpha);
        }
    });

    dst
}

/// Two sequential 1-D passes: `row` horizontally, then `column` vertically.
///
/// Each pass rounds back to 8 bits, exactly as two separate calls to
/// [`convolve`] would.
pub fn convolve_separable(
    row: &Kernel,
    column: &Kernel,
    src: &Raster,
    include_alpha: bool,
    edge: EdgePolicy,
) -> Raster {
    trace!(
        width = src.width(),
        height = src.height(),
        row_taps = row.cols(),
        column_taps = column.rows(),
        "convolve_separable"
    );
    let tmp = convolve_h(row, src, include_alpha, edge);
    convolve_v(column, &tmp, include_alpha, edge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixfx_core::pixel::{self, OPAQUE_BLACK};

    fn gradient(w: u32, h: u32) -> Raster {
        Raster::from_fn(w, h, |x, y| {
            pack(
                (200 + x * 3) as u8,
                (x * 20) as u8,
                (y * 25) as u8,
                ((x * 7 + y * 11) % 256) as u8,
            )
        })
    }

    #[test]
    fn test_identity_kernel() {
        let src = gradient(7, 5);
        for edge in EdgePolicy::ALL {
            let out = convolve(&Kernel::identity(), &src, true, edge);
            assert_eq!(out, src);
        }
    }

    #[test]
    fn test_exclude_alpha_forces_opaque() {
        let src = Raster::filled(4, 4, pixel::pack(10, 50, 60, 70));
        let out = convolve(&Kernel::identity(), &src, false, EdgePolicy::Clamp);
        assert!(out.pixels().iter().all(|&p| p == pixel::pack(255, 50, 60, 70)));
    }

    #[test]
    fn test_omit_skips_missing_neighbours() {
        // 1x3 horizontal average on a single row: the end pixels only see
        // two of the three taps.
        let src = Raster::filled(3, 1, pixel::pack(255, 90, 90, 90));
        let k = Kernel::row_vector(vec![1.0 / 3.0; 3]).unwrap();
        let out = convolve(&k, &src, true, EdgePolicy::Omit);
        assert_eq!(pixel::red(out.pixel(0, 0)), 60);
        assert_eq!(pixel::red(out.pixel(1, 0)), 90);
        assert_eq!(pixel::red(out.pixel(2, 0)), 60);
        assert_eq!(pixel::alpha(out.pixel(0, 0)), 170);
    }

    #[test]
    fn test_clamp_uses_nearest_edge() {
        // Shift right by one: output(x) = input(x - 1)
        let src = Raster::from_fn(4, 1, |x, _| OPAQUE_BLACK | (x * 10));
        let k = Kernel::row_vector(vec![1.0, 0.0, 0.0]).unwrap();
        let out = convolve(&k, &src, true, EdgePolicy::Clamp);
        assert_eq!(out.row(0), &[OPAQUE_BLACK, OPAQUE_BLACK, OPAQUE_BLACK | 10, OPAQUE_BLACK | 20]);
    }

    #[test]
    fn test_wrap_tiles() {
        let src = Raster::from_fn(4, 1, |x, _| OPAQUE_BLACK | (x * 10));
        let k = Kernel::row_vector(vec![1.0, 0.0, 0.0]).unwrap();
        let out = convolve(&k, &src, true, EdgePolicy::Wrap);
        assert_eq!(out.pixel(0, 0), OPAQUE_BLACK | 30);
    }

    #[test]
    fn test_vertical_wrap() {
        let src = Raster::from_fn(1, 4, |_, y| OPAQUE_BLACK | (y * 10));
        let k = Kernel::column_vector(vec![0.0, 0.0, 1.0]).unwrap();
        let out = convolve(&k, &src, true, EdgePolicy::Wrap);
        // output(y) = input(y + 1)
        assert_eq!(out.pixel(0, 3), OPAQUE_BLACK);
        assert_eq!(out.pixel(0, 0), OPAQUE_BLACK | 10);
    }

    #[test]
    fn test_vertical_matches_general() {
        let src = gradient(6, 9);
        let k = Kernel::gaussian(2.0).unwrap().transpose();
        for edge in EdgePolicy::ALL {
            assert_eq!(
                convolve_v(&k, &src, true, edge),
                convolve_hv(&k, &src, true, edge)
            );
        }
    }

    #[test]
    fn test_negative_sums_clamp_to_zero() {
        let src = Raster::from_fn(3, 3, |x, y| {
            if x == 1 && y == 1 { OPAQUE_BLACK } else { pixel::OPAQUE_WHITE }
        });
        let out = convolve(&Kernel::edge_detect(), &src, false, EdgePolicy::Clamp);
        // centre: 4*0 - 4*255 < 0
        assert_eq!(out.pixel(1, 1), OPAQUE_BLACK);
    }

    #[test]
    fn test_separable_gaussian_keeps_flat_field() {
        let src = Raster::filled(10, 10, pixel::pack(255, 40, 80, 120));
        let k = Kernel::gaussian(2.0).unwrap();
        let out = convolve_separable(&k, &k.transpose(), &src, true, EdgePolicy::Clamp);
        assert_eq!(out, src);
    }

    #[test]
    fn test_empty_raster() {
        let src = Raster::new(0, 0);
        let out = convolve(&Kernel::box_blur(3), &src, true, EdgePolicy::Wrap);
        assert!(out.is_empty());
    }

    #[test]
    fn test_options_default() {
        let opts = ConvolveOptions::default();
        assert!(opts.include_alpha);
        assert_eq!(opts.edge, EdgePolicy::Omit);
        let src = gradient(3, 3);
        assert_eq!(convolve_with(&Kernel::identity(), &src, &opts), src);
    }
}
