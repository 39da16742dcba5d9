//! Work rectangles for geometric transforms.
//!
//! A [`WorkRect`] names the destination region a resampler produces. It
//! uses the standard image convention:
//!
//! ```text
//! (0,0) ────────► X
//!   │
//!   │   ┌──────────┐
//!   │   │  Source  │
//!   │   └──────────┘
//!   ▼
//!   Y
//! ```
//!
//! Unlike a crop rectangle it may extend beyond the source raster (and its
//! origin may be negative) so that displacement effects such as ripples and
//! rotations can keep the fringe they pull in from outside the source.
//!
//! # Usage
//!
//! ```rust
//! use pixfx_core::WorkRect;
//!
//! let rect = WorkRect::from_size(100, 50).expand(4, 2);
//! assert_eq!((rect.x, rect.y), (-4, -2));
//! assert_eq!((rect.width, rect.height), (108, 54));
//! assert!(rect.contains(-4, 51));
//! ```

/// Destination region with a signed origin.
///
/// # Invariants
///
/// - A rectangle with zero width or height is empty and produces an empty
///   raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WorkRect {
    /// X coordinate of the left edge (inclusive)
    pub x: i32,
    /// Y coordinate of the top edge (inclusive)
    pub y: i32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl WorkRect {
    /// Creates a rectangle with the given origin and dimensions.
    #[inline]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle at the origin.
    #[inline]
    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    /// Returns `true` if the rectangle has no area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of pixels covered.
    #[inline]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Returns `true` if `(x, y)` lies inside the rectangle.
    #[inline]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= self.x as i64 && x < self.right() && y >= self.y as i64 && y < self.bottom()
    }

    /// Smallest rectangle containing both `self` and `other`.
    ///
    /// Empty rectangles are ignored.
    pub fn union(&self, other: &WorkRect) -> WorkRect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x0 = (self.x as i64).min(other.x as i64);
        let y0 = (self.y as i64).min(other.y as i64);
        let x1 = self.right().max(other.right());
        let y1 = self.bottom().max(other.bottom());
        Self::from_edges(x0, y0, x1, y1)
    }

    /// Grows the rectangle by `dx` columns on the left and right and `dy`
    /// rows on top and bottom.
    pub fn expand(&self, dx: u32, dy: u32) -> WorkRect {
        Self::from_edges(
            self.x as i64 - dx as i64,
            self.y as i64 - dy as i64,
            self.right() + dx as i64,
            self.bottom() + dy as i64,
        )
    }

    /// Builds a rectangle from inclusive-exclusive edges, saturating to the
    /// representable range.
    pub fn from_edges(x0: i64, y0: i64, x1: i64, y1: i64) -> WorkRect {
        let x = x0.clamp(i32::MIN as i64, i32::MAX as i64);
        let y = y0.clamp(i32::MIN as i64, i32::MAX as i64);
        let width = (x1 - x).clamp(0, u32::MAX as i64) as u32;
        let height = (y1 - y).clamp(0, u32::MAX as i64) as u32;
        WorkRect::new(x as i32, y as i32, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        let r = WorkRect::new(-3, 2, 10, 5);
        assert_eq!(r.right(), 7);
        assert_eq!(r.bottom(), 7);
        assert_eq!(r.area(), 50);
        assert!(!r.is_empty());
    }

    #[test]
    fn test_contains() {
        let r = WorkRect::from_size(4, 4);
        assert!(r.contains(0, 0));
        assert!(r.contains(3, 3));
        assert!(!r.contains(4, 0));
        assert!(!r.contains(-1, 0));
    }

    #[test]
    fn test_union() {
        let a = WorkRect::new(0, 0, 10, 10);
        let b = WorkRect::new(-5, 5, 4, 20);
        let u = a.union(&b);
        assert_eq!(u, WorkRect::new(-5, 0, 15, 25));
        assert_eq!(a.union(&WorkRect::default()), a);
    }

    #[test]
    fn test_expand() {
        let r = WorkRect::from_size(8, 6).expand(2, 1);
        assert_eq!(r, WorkRect::new(-2, -1, 12, 8));
    }

    #[test]
    fn test_from_edges_negative_extent() {
        let r = WorkRect::from_edges(5, 5, 2, 2);
        assert!(r.is_empty());
    }
}
