//! Row-major ARGB pixel buffers.
//!
//! A [`Raster`] owns exactly `width * height` packed pixels, top row first:
//!
//! ```text
//! Memory: [p(0,0) p(1,0) ... p(w-1,0)]  ← Row 0
//!         [p(0,1) p(1,1) ... p(w-1,1)]  ← Row 1
//!         ...
//! ```
//!
//! The length invariant is checked once at construction; every kernel can
//! then index rows without re-validating.
//!
//! # Usage
//!
//! ```rust
//! use pixfx_core::{pixel, Raster};
//!
//! let mut img = Raster::new(16, 8);
//! img.set(3, 2, pixel::OPAQUE_WHITE);
//! assert_eq!(img.get(3, 2), Some(pixel::OPAQUE_WHITE));
//! assert_eq!(img.get(16, 0), None);
//! assert_eq!(img.row(2).len(), 16);
//! ```

use crate::error::{Error, Result};
use crate::pixel::{Pixel, TRANSPARENT};
use crate::rect::WorkRect;

/// Owned ARGB raster.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
}

impl Raster {
    /// Creates a fully transparent raster.
    ///
    /// # Panics
    ///
    /// Panics if `width * height` overflows `usize`.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, TRANSPARENT)
    }

    /// Creates a raster with every pixel set to `pixel`.
    ///
    /// # Panics
    ///
    /// Panics if `width * height` overflows `usize`.
    pub fn filled(width: u32, height: u32, pixel: Pixel) -> Self {
        let count = pixel_count(width, height).expect("raster dimensions overflow usize");
        Self {
            width,
            height,
            pixels: vec![pixel; count],
        }
    }

    /// Creates a raster from existing pixel data.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDimensions`] if `width * height` overflows
    /// - [`Error::BufferSize`] if `pixels.len() != width * height`
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Pixel>) -> Result<Self> {
        let expected = pixel_count(width, height)?;
        if pixels.len() != expected {
            return Err(Error::BufferSize {
                expected,
                got: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Builds a raster by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> Pixel,
    {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Raster width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Raster height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of pixels.
    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Returns `true` if the raster has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// The raster's own rectangle, at the origin.
    #[inline]
    pub fn bounds(&self) -> WorkRect {
        WorkRect::from_size(self.width, self.height)
    }

    /// All pixels, row-major.
    #[inline]
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// All pixels, mutably. The length cannot change.
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [Pixel] {
        &mut self.pixels
    }

    /// Consumes the raster, returning its pixel buffer.
    #[inline]
    pub fn into_pixels(self) -> Vec<Pixel> {
        self.pixels
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Pixel {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        self.pixels[self.offset(x, y)]
    }

    /// Pixel at `(x, y)`, or `None` if out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<Pixel> {
        if x < self.width && y < self.height {
            Some(self.pixels[self.offset(x, y)])
        } else {
            None
        }
    }

    /// Sets the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, p: Pixel) {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        let offset = self.offset(x, y);
        self.pixels[offset] = p;
    }

    /// Sets the pixel at `(x, y)`, reporting out-of-bounds coordinates.
    pub fn try_set(&mut self, x: u32, y: u32, p: Pixel) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::out_of_bounds(
                x as i64,
                y as i64,
                self.width,
                self.height,
            ));
        }
        self.set(x, y, p);
        Ok(())
    }

    /// Row `y` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[Pixel] {
        let start = self.offset(0, y);
        &self.pixels[start..start + self.width as usize]
    }

    /// Row `y` as a mutable slice.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [Pixel] {
        let start = self.offset(0, y);
        let width = self.width as usize;
        &mut self.pixels[start..start + width]
    }

    /// Iterates `(x, y, pixel)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, Pixel)> + '_ {
        let width = self.width.max(1);
        self.pixels
            .iter()
            .enumerate()
            .map(move |(i, &p)| ((i as u32) % width, (i as u32) / width, p))
    }

    /// Applies `f` to every pixel in place.
    pub fn map_in_place<F>(&mut self, mut f: F)
    where
        F: FnMut(Pixel) -> Pixel,
    {
        for p in &mut self.pixels {
            *p = f(*p);
        }
    }
}

fn pixel_count(width: u32, height: u32) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| Error::invalid_dimensions(width, height, "pixel count overflows usize"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::{OPAQUE_BLACK, OPAQUE_WHITE};

    #[test]
    fn test_new_is_transparent() {
        let img = Raster::new(3, 2);
        assert_eq!(img.len(), 6);
        assert!(img.pixels().iter().all(|&p| p == TRANSPARENT));
    }

    #[test]
    fn test_from_pixels_checks_length() {
        assert!(Raster::from_pixels(2, 2, vec![0; 4]).is_ok());
        let err = Raster::from_pixels(2, 2, vec![0; 5]).unwrap_err();
        assert!(matches!(err, Error::BufferSize { expected: 4, got: 5 }));
    }

    #[test]
    fn test_empty_raster() {
        let img = Raster::from_pixels(0, 7, Vec::new()).unwrap();
        assert!(img.is_empty());
        assert_eq!(img.bounds().area(), 0);
    }

    #[test]
    fn test_rows() {
        let mut img = Raster::from_fn(4, 3, |x, y| x + 10 * y);
        assert_eq!(img.row(1), &[10, 11, 12, 13]);
        img.row_mut(2)[0] = OPAQUE_WHITE;
        assert_eq!(img.pixel(0, 2), OPAQUE_WHITE);
    }

    #[test]
    fn test_try_set_out_of_bounds() {
        let mut img = Raster::new(2, 2);
        assert!(img.try_set(1, 1, OPAQUE_BLACK).is_ok());
        assert!(img.try_set(2, 0, OPAQUE_BLACK).unwrap_err().is_bounds_error());
    }

    #[test]
    fn test_iter_coordinates() {
        let img = Raster::from_fn(3, 2, |x, y| x * 100 + y);
        for (x, y, p) in img.iter() {
            assert_eq!(p, x * 100 + y);
        }
        assert_eq!(img.iter().count(), 6);
    }

    #[test]
    fn test_map_in_place() {
        let mut img = Raster::filled(2, 2, TRANSPARENT);
        img.map_in_place(|p| p | OPAQUE_BLACK);
        assert!(img.pixels().iter().all(|&p| p == OPAQUE_BLACK));
    }
}
