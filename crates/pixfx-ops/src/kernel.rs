//! Convolution kernels.
//!
//! A [`Kernel`] is a row-major weight matrix whose centre sits at
//! `(cols / 2, rows / 2)`. Kernels with a single row or a single column are
//! separable passes and take the fast paths in [`crate::convolve`].
//!
//! # Builders
//!
//! - [`Kernel::identity`] - passes pixels through unchanged
//! - [`Kernel::box_blur`] - simple average
//! - [`Kernel::gaussian`] - 1-D Gaussian row vector (separable)
//! - [`Kernel::sharpen`], [`Kernel::edge_detect`], [`Kernel::emboss`]
//! - [`Kernel::sobel_x`], [`Kernel::sobel_y`]
//!
//! # Example
//!
//! ```rust
//! use pixfx_ops::kernel::Kernel;
//!
//! let k = Kernel::gaussian(3.0)?;
//! assert_eq!((k.cols(), k.rows()), (7, 1));
//! assert!(k.is_horizontal());
//! assert!((k.sum() - 1.0).abs() < 1e-5);
//! # Ok::<(), pixfx_ops::OpsError>(())
//! ```

use crate::{OpsError, OpsResult};

/// Largest radius accepted by the radius-driven builders.
pub const MAX_RADIUS: f32 = 4096.0;

/// Convolution kernel for raster filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    cols: usize,
    rows: usize,
    weights: Vec<f32>,
}

impl Kernel {
    /// Creates a kernel from row-major weights.
    ///
    /// # Errors
    ///
    /// [`OpsError::InvalidKernel`] if either dimension is zero, if
    /// `weights.len() != cols * rows`, or if any weight is not finite.
    pub fn new(cols: usize, rows: usize, weights: Vec<f32>) -> OpsResult<Self> {
        if cols == 0 || rows == 0 {
            return Err(OpsError::InvalidKernel(format!(
                "kernel dimensions must be non-zero, got {}x{}",
                cols, rows
            )));
        }
        let expected = cols.checked_mul(rows).ok_or_else(|| {
            OpsError::InvalidKernel(format!("kernel {}x{} overflows", cols, rows))
        })?;
        if weights.len() != expected {
            return Err(OpsError::InvalidKernel(format!(
                "kernel data size {} doesn't match {}x{}",
                weights.len(),
                cols,
                rows
            )));
        }
        if let Some(i) = weights.iter().position(|w| !w.is_finite()) {
            return Err(OpsError::InvalidKernel(format!(
                "weight {} is not finite ({})",
                i, weights[i]
            )));
        }
        Ok(Self { cols, rows, weights })
    }

    /// Single-row kernel.
    pub fn row_vector(weights: Vec<f32>) -> OpsResult<Self> {
        let cols = weights.len();
        Self::new(cols, 1, weights)
    }

    /// Single-column kernel.
    pub fn column_vector(weights: Vec<f32>) -> OpsResult<Self> {
        let rows = weights.len();
        Self::new(1, rows, weights)
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Row-major weights.
    #[inline]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Weights of row `r`.
    #[inline]
    pub fn row(&self, r: usize) -> &[f32] {
        &self.weights[r * self.cols..(r + 1) * self.cols]
    }

    /// Kernel centre as `(col, row)`.
    #[inline]
    pub fn center(&self) -> (usize, usize) {
        (self.cols / 2, self.rows / 2)
    }

    /// `true` for a single-row kernel.
    #[inline]
    pub fn is_horizontal(&self) -> bool {
        self.rows == 1
    }

    /// `true` for a single-column kernel.
    #[inline]
    pub fn is_vertical(&self) -> bool {
        self.cols == 1
    }

    /// Sum of all weights.
    pub fn sum(&self) -> f32 {
        self.weights.iter().sum()
    }

    /// Swaps rows and columns. A row vector becomes a column vector.
    pub fn transpose(&self) -> Kernel {
        let mut weights = Vec::with_capacity(self.weights.len());
        for c in 0..self.cols {
            for r in 0..self.rows {
                weights.push(self.weights[r * self.cols + c]);
            }
        }
        Kernel {
            cols: self.rows,
            rows: self.cols,
            weights,
        }
    }

    /// Scales weights so they sum to 1. Kernels summing to zero are
    /// returned unchanged.
    pub fn normalized(&self) -> Kernel {
        let sum = self.sum();
        if sum == 0.0 {
            return self.clone();
        }
        Kernel {
            cols: self.cols,
            rows: self.rows,
            weights: self.weights.iter().map(|w| w / sum).collect(),
        }
    }

    /// 3x3 kernel with a single 1 at the centre.
    pub fn identity() -> Self {
        Self {
            cols: 3,
            rows: 3,
            weights: vec![0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0],
        }
    }

    /// Creates a box blur kernel (simple average).
    ///
    /// Even sizes are rounded up to the next odd size.
    ///
    /// ```rust
    /// use pixfx_ops::kernel::Kernel;
    ///
    /// let k = Kernel::box_blur(3);
    /// assert_eq!(k.weights().len(), 9);
    /// ```
    pub fn box_blur(size: usize) -> Self {
        let size = if size % 2 == 0 { size + 1 } else { size };
        let count = size * size;
        let weight = 1.0 / count as f32;
        Self {
            cols: size,
            rows: size,
            weights: vec![weight; count],
        }
    }

    /// Creates a 1-D Gaussian row vector of `2 * ceil(radius) + 1` taps.
    ///
    /// Sigma is `radius / 3`; taps farther than `radius` from the centre
    /// are zero. Apply it horizontally, then its [`transpose`](Self::transpose)
    /// vertically, for a full Gaussian blur. A radius of zero or less gives
    /// the single-tap identity.
    ///
    /// # Errors
    ///
    /// [`OpsError::InvalidParameter`] if `radius` is NaN or above
    /// [`MAX_RADIUS`].
    pub fn gaussian(radius: f32) -> OpsResult<Self> {
        if radius.is_nan() || radius > MAX_RADIUS {
            return Err(OpsError::InvalidParameter(format!(
                "gaussian radius must be at most {MAX_RADIUS}, got {radius}"
            )));
        }
        if radius <= 0.0 {
            return Self::row_vector(vec![1.0]);
        }
        let r = radius.ceil() as i32;
        let sigma = radius / 3.0;
        let sigma22 = 2.0 * sigma * sigma;
        let sqrt_sigma_pi2 = (2.0 * std::f32::consts::PI * sigma).sqrt();
        let radius2 = radius * radius;

        let mut weights: Vec<f32> = (-r..=r)
            .map(|i| {
                let distance = (i * i) as f32;
                if distance > radius2 {
                    0.0
                } else {
                    (-distance / sigma22).exp() / sqrt_sigma_pi2
                }
            })
            .collect();
        let total: f32 = weights.iter().sum();
        for w in &mut weights {
            *w /= total;
        }
        Self::row_vector(weights)
    }

    /// Creates a 3x3 sharpening kernel (weights sum to 1).
    pub fn sharpen() -> Self {
        Self {
            cols: 3,
            rows: 3,
            weights: vec![
                0.0, -0.2, 0.0,
                -0.2, 1.8, -0.2,
                0.0, -0.2, 0.0,
            ],
        }
    }

    /// Creates a Laplacian edge detection kernel.
    pub fn edge_detect() -> Self {
        Self {
            cols: 3,
            rows: 3,
            weights: vec![
                0.0, -1.0, 0.0,
                -1.0, 4.0, -1.0,
                0.0, -1.0, 0.0,
            ],
        }
    }

    /// Creates an emboss kernel.
    pub fn emboss() -> Self {
        Self {
            cols: 3,
            rows: 3,
            weights: vec![
                -2.0, -1.0, 0.0,
                -1.0, 1.0, 1.0,
                0.0, 1.0, 2.0,
            ],
        }
    }

    /// Horizontal Sobel gradient.
    pub fn sobel_x() -> Self {
        Self {
            cols: 3,
            rows: 3,
            weights: vec![
                -1.0, 0.0, 1.0,
                -2.0, 0.0, 2.0,
                -1.0, 0.0, 1.0,
            ],
        }
    }

    /// Vertical Sobel gradient.
    pub fn sobel_y() -> Self {
        Self::sobel_x().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_new_validates_length() {
        assert!(Kernel::new(3, 3, vec![0.0; 9]).is_ok());
        assert!(matches!(
            Kernel::new(3, 3, vec![0.0; 8]),
            Err(OpsError::InvalidKernel(_))
        ));
        assert!(Kernel::new(0, 3, Vec::new()).is_err());
    }

    #[test]
    fn test_new_rejects_non_finite() {
        assert!(Kernel::new(1, 2, vec![1.0, f32::NAN]).is_err());
        assert!(Kernel::new(1, 1, vec![f32::INFINITY]).is_err());
    }

    #[test]
    fn test_center_uses_integer_division() {
        let k = Kernel::new(4, 2, vec![0.0; 8]).unwrap();
        assert_eq!(k.center(), (2, 1));
        assert_eq!(Kernel::identity().center(), (1, 1));
    }

    #[test]
    fn test_kernel_box() {
        let k = Kernel::box_blur(3);
        assert_eq!((k.cols(), k.rows()), (3, 3));
        for v in k.weights() {
            assert_abs_diff_eq!(*v, 1.0 / 9.0, epsilon = 1e-6);
        }
        assert_eq!(Kernel::box_blur(4).cols(), 5);
    }

    #[test]
    fn test_kernel_gaussian_1d() {
        let k = Kernel::gaussian(2.0).unwrap();
        assert_eq!(k.cols(), 5);
        assert!(k.is_horizontal());
        assert_abs_diff_eq!(k.sum(), 1.0, epsilon = 1e-5);
        // symmetric, peaked at the centre
        let w = k.weights();
        assert_abs_diff_eq!(w[0], w[4], epsilon = 1e-7);
        assert!(w[2] > w[1] && w[1] > w[0]);
    }

    #[test]
    fn test_kernel_gaussian_zero_radius() {
        assert_eq!(Kernel::gaussian(0.0).unwrap().weights(), &[1.0]);
        assert_eq!(Kernel::gaussian(-3.0).unwrap().weights(), &[1.0]);
    }

    #[test]
    fn test_kernel_gaussian_rejects_huge_radius() {
        for radius in [3.0e9, f32::INFINITY, f32::NAN, MAX_RADIUS + 1.0] {
            assert!(
                matches!(Kernel::gaussian(radius), Err(OpsError::InvalidParameter(_))),
                "{radius}"
            );
        }
        let k = Kernel::gaussian(MAX_RADIUS).unwrap();
        assert_eq!(k.cols(), 2 * MAX_RADIUS as usize + 1);
    }

    #[test]
    fn test_builders_pass_validation() {
        let built = [
            Kernel::identity(),
            Kernel::box_blur(5),
            Kernel::gaussian(0.5).unwrap(),
            Kernel::gaussian(7.3).unwrap(),
            Kernel::sharpen(),
            Kernel::edge_detect(),
            Kernel::emboss(),
            Kernel::sobel_x(),
            Kernel::sobel_y(),
        ];
        for k in built {
            let again = Kernel::new(k.cols(), k.rows(), k.weights().to_vec()).unwrap();
            assert_eq!(again, k);
        }
    }

    #[test]
    fn test_sharpen_preserves_brightness() {
        assert_abs_diff_eq!(Kernel::sharpen().sum(), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(Kernel::edge_detect().sum(), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_transpose() {
        let k = Kernel::new(3, 2, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let t = k.transpose();
        assert_eq!((t.cols(), t.rows()), (2, 3));
        assert_eq!(t.weights(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
        assert_eq!(t.transpose(), k);
        assert!(Kernel::gaussian(1.0).unwrap().transpose().is_vertical());
    }

    #[test]
    fn test_sobel_y_is_transposed_x() {
        assert_eq!(Kernel::sobel_y().row(0), &[-1.0, -2.0, -1.0]);
    }

    #[test]
    fn test_normalized() {
        let k = Kernel::row_vector(vec![1.0, 2.0, 1.0]).unwrap().normalized();
        assert_eq!(k.weights(), &[0.25, 0.5, 0.25]);
        let zero = Kernel::edge_detect();
        assert_eq!(zero.normalized(), zero);
    }
}
