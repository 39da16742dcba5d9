//! Ready-made coordinate maps for the resampler.
//!
//! Each warp is a small parameter record implementing [`InverseMap`]; the
//! shared [`resample`](crate::resample::resample) loop does the sampling.
//!
//! ```rust
//! use pixfx_core::{EdgePolicy, Raster};
//! use pixfx_ops::resample::transform;
//! use pixfx_ops::warp::Affine;
//!
//! let src = Raster::new(64, 32);
//! let rot = Affine::rotate(30f32.to_radians(), 32.0, 16.0);
//! let (out, rect) = transform(&src, &rot, EdgePolicy::Omit).unwrap();
//! assert!(rect.width > 64 && rect.height > 32);
//! assert_eq!(out.dimensions(), (rect.width, rect.height));
//! ```

use std::fmt;
use std::str::FromStr;

use pixfx_core::WorkRect;

use crate::resample::InverseMap;
use crate::{OpsError, OpsResult};

// === Affine ===

/// 2x3 affine transform.
///
/// The forward map is `x' = a*x + b*y + tx`, `y' = c*x + d*y + ty`. The
/// resampler evaluates the precomputed inverse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    forward: [f64; 6],
    inverse: [f64; 6],
}

impl Affine {
    /// Builds a transform from its forward coefficients.
    ///
    /// # Errors
    ///
    /// [`OpsError::InvalidParameter`] if a coefficient is not finite or the
    /// matrix is singular.
    pub fn new(a: f64, b: f64, c: f64, d: f64, tx: f64, ty: f64) -> OpsResult<Self> {
        let forward = [a, b, c, d, tx, ty];
        if forward.iter().any(|v| !v.is_finite()) {
            return Err(OpsError::InvalidParameter(format!(
                "affine coefficients must be finite: {forward:?}"
            )));
        }
        let det = a * d - b * c;
        if det.abs() < 1e-12 {
            return Err(OpsError::InvalidParameter(format!(
                "affine matrix is singular (det = {det})"
            )));
        }
        let inverse = [
            d / det,
            -b / det,
            -c / det,
            a / det,
            (b * ty - d * tx) / det,
            (c * tx - a * ty) / det,
        ];
        Ok(Self { forward, inverse })
    }

    /// Shift by `(tx, ty)`.
    pub fn translate(tx: f64, ty: f64) -> Self {
        Self {
            forward: [1.0, 0.0, 0.0, 1.0, tx, ty],
            inverse: [1.0, 0.0, 0.0, 1.0, -tx, -ty],
        }
    }

    /// Scale about the origin.
    ///
    /// # Errors
    ///
    /// [`OpsError::InvalidParameter`] if either factor is zero or not finite.
    pub fn scale(sx: f64, sy: f64) -> OpsResult<Self> {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Rotation by `angle` radians (clockwise on screen) about `(cx, cy)`.
    pub fn rotate(angle: f32, cx: f32, cy: f32) -> Self {
        let (sin, cos) = (angle as f64).sin_cos();
        let (cx, cy) = (cx as f64, cy as f64);
        let tx = cx - cos * cx + sin * cy;
        let ty = cy - sin * cx - cos * cy;
        // orthonormal, so the inverse is the transpose
        Self {
            forward: [cos, -sin, sin, cos, tx, ty],
            inverse: [cos, sin, -sin, cos, -(cos * tx + sin * ty), sin * tx - cos * ty],
        }
    }

    /// Forward coefficients `[a, b, c, d, tx, ty]`.
    pub fn coefficients(&self) -> [f64; 6] {
        self.forward
    }

    /// Applies the forward transform.
    pub fn map_forward(&self, x: f64, y: f64) -> (f64, f64) {
        apply(&self.forward, x, y)
    }
}

#[inline]
fn apply(m: &[f64; 6], x: f64, y: f64) -> (f64, f64) {
    (m[0] * x + m[1] * y + m[4], m[2] * x + m[3] * y + m[5])
}

impl InverseMap for Affine {
    fn map_inverse(&self, x: i32, y: i32) -> (f32, f32) {
        let (sx, sy) = apply(&self.inverse, x as f64, y as f64);
        (sx as f32, sy as f32)
    }

    fn transform_space(&self, rect: WorkRect) -> WorkRect {
        let (x0, y0) = (rect.x as f64, rect.y as f64);
        let (x1, y1) = (rect.right() as f64, rect.bottom() as f64);
        let corners = [(x0, y0), (x1, y0), (x0, y1), (x1, y1)].map(|(x, y)| self.map_forward(x, y));

        let min_x = corners.iter().map(|c| c.0).fold(f64::INFINITY, f64::min);
        let min_y = corners.iter().map(|c| c.1).fold(f64::INFINITY, f64::min);
        let max_x = corners.iter().map(|c| c.0).fold(f64::NEG_INFINITY, f64::max);
        let max_y = corners.iter().map(|c| c.1).fold(f64::NEG_INFINITY, f64::max);
        // shave rounding noise so exact integers stay put
        let lo = |v: f64| (v + 1e-6).floor() as i64;
        let hi = |v: f64| (v - 1e-6).ceil() as i64;
        WorkRect::from_edges(lo(min_x), lo(min_y), hi(max_x), hi(max_y))
    }
}

// === Twirl ===

/// Swirl around a centre, strongest at the centre and fading to nothing at
/// `radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Twirl {
    /// Centre x in pixels.
    pub cx: f32,
    /// Centre y in pixels.
    pub cy: f32,
    /// Radius of the affected disc in pixels.
    pub radius: f32,
    /// Rotation at the centre, in radians.
    pub angle: f32,
}

impl Twirl {
    /// Twirl centred on `(cx, cy)`.
    pub fn new(cx: f32, cy: f32, radius: f32, angle: f32) -> Self {
        Self { cx, cy, radius, angle }
    }
}

impl InverseMap for Twirl {
    fn map_inverse(&self, x: i32, y: i32) -> (f32, f32) {
        let dx = x as f32 - self.cx;
        let dy = y as f32 - self.cy;
        let d2 = dx * dx + dy * dy;
        if self.radius <= 0.0 || d2 > self.radius * self.radius {
            return (x as f32, y as f32);
        }
        let d = d2.sqrt();
        let a = dy.atan2(dx) + self.angle * (self.radius - d) / self.radius;
        (self.cx + d * a.cos(), self.cy + d * a.sin())
    }
}

// === Ripple ===

/// Periodic profile of a [`Ripple`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WaveShape {
    /// `sin(t)`.
    #[default]
    Sine,
    /// Fractional part of `t`, rising from 0 to 1.
    Sawtooth,
    /// Rises 0 to 1 and falls back over each unit of `t`.
    Triangle,
}

impl WaveShape {
    /// Evaluates the profile at `t`.
    pub fn eval(self, t: f32) -> f32 {
        match self {
            WaveShape::Sine => t.sin(),
            WaveShape::Sawtooth => modulo(t, 1.0),
            WaveShape::Triangle => {
                let r = modulo(t, 1.0);
                2.0 * if r < 0.5 { r } else { 1.0 - r }
            }
        }
    }
}

impl fmt::Display for WaveShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WaveShape::Sine => "sine",
            WaveShape::Sawtooth => "sawtooth",
            WaveShape::Triangle => "triangle",
        })
    }
}

impl FromStr for WaveShape {
    type Err = OpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sine" | "sin" => Ok(WaveShape::Sine),
            "sawtooth" | "saw" => Ok(WaveShape::Sawtooth),
            "triangle" | "tri" => Ok(WaveShape::Triangle),
            _ => Err(OpsError::InvalidParameter(format!("unknown wave shape: {s}"))),
        }
    }
}

/// Floored modulo, never negative for positive `b`.
#[inline]
fn modulo(a: f32, b: f32) -> f32 {
    a - b * (a / b).floor()
}

/// Displaces columns by a wave along y and rows by a wave along x.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ripple {
    /// Horizontal displacement in pixels.
    pub x_amplitude: f32,
    /// Vertical displacement in pixels.
    pub y_amplitude: f32,
    /// Rows per unit of wave phase for the horizontal displacement.
    pub x_wavelength: f32,
    /// Columns per unit of wave phase for the vertical displacement.
    pub y_wavelength: f32,
    /// Wave profile.
    pub wave: WaveShape,
}

impl Ripple {
    /// # Errors
    ///
    /// [`OpsError::InvalidParameter`] unless both wavelengths are positive
    /// and every parameter is finite.
    pub fn new(
        x_amplitude: f32,
        y_amplitude: f32,
        x_wavelength: f32,
        y_wavelength: f32,
        wave: WaveShape,
    ) -> OpsResult<Self> {
        if ![x_amplitude, y_amplitude, x_wavelength, y_wavelength]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(OpsError::InvalidParameter("ripple parameters must be finite".into()));
        }
        if x_wavelength <= 0.0 || y_wavelength <= 0.0 {
            return Err(OpsError::InvalidParameter(format!(
                "ripple wavelengths must be positive, got {x_wavelength} and {y_wavelength}"
            )));
        }
        Ok(Self {
            x_amplitude,
            y_amplitude,
            x_wavelength,
            y_wavelength,
            wave,
        })
    }
}

impl InverseMap for Ripple {
    fn map_inverse(&self, x: i32, y: i32) -> (f32, f32) {
        let (x, y) = (x as f32, y as f32);
        let fx = self.wave.eval(y / self.x_wavelength);
        let fy = self.wave.eval(x / self.y_wavelength);
        (x + self.x_amplitude * fx, y + self.y_amplitude * fy)
    }

    fn transform_space(&self, rect: WorkRect) -> WorkRect {
        rect.expand(
            self.x_amplitude.abs().ceil() as u32,
            self.y_amplitude.abs().ceil() as u32,
        )
    }
}

// === Barrel ===

/// Radial lens distortion `r' = r * (1 + k1*r^2 + k2*r^4)`.
///
/// Radii are normalised so the centre-to-edge distance along each axis is 1.
/// Positive coefficients pull the edges inwards (barrel), negative push them
/// out (pincushion).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Barrel {
    /// Quadratic coefficient.
    pub k1: f32,
    /// Quartic coefficient.
    pub k2: f32,
    /// Centre x in pixels.
    pub cx: f32,
    /// Centre y in pixels.
    pub cy: f32,
    /// Horizontal normalisation in pixels.
    pub half_width: f32,
    /// Vertical normalisation in pixels.
    pub half_height: f32,
}

impl Barrel {
    /// Distortion centred on a `width x height` image.
    pub fn centered(k1: f32, k2: f32, width: u32, height: u32) -> Self {
        let half = |n: u32| (n.saturating_sub(1) as f32 / 2.0).max(0.5);
        Self {
            k1,
            k2,
            cx: width.saturating_sub(1) as f32 / 2.0,
            cy: height.saturating_sub(1) as f32 / 2.0,
            half_width: half(width),
            half_height: half(height),
        }
    }
}

impl InverseMap for Barrel {
    fn map_inverse(&self, x: i32, y: i32) -> (f32, f32) {
        let nx = (x as f32 - self.cx) / self.half_width;
        let ny = (y as f32 - self.cy) / self.half_height;
        let r2 = nx * nx + ny * ny;
        let factor = 1.0 + self.k1 * r2 + self.k2 * r2 * r2;
        (
            self.cx + nx * factor * self.half_width,
            self.cy + ny * factor * self.half_height,
        )
    }
}
