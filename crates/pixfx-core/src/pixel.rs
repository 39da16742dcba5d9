//! Packed 32-bit ARGB pixels.
//!
//! A [`Pixel`] is a plain `u32` laid out as `0xAARRGGBB`, 8 bits per channel.
//! Arithmetic on channels is done in wider types (`i32`, `f32`) and the
//! result is clamped back into `[0, 255]` before it is re-packed.
//!
//! # Example
//!
//! ```
//! use pixfx_core::pixel::{self, pack, unpack};
//!
//! let p = pack(255, 200, 100, 50);
//! assert_eq!(p, 0xFFC86432);
//! assert_eq!(unpack(p), [255, 200, 100, 50]);
//! assert_eq!(pixel::red(p), 200);
//! ```

/// Packed `0xAARRGGBB` pixel.
pub type Pixel = u32;

/// Fully transparent black.
pub const TRANSPARENT: Pixel = 0x0000_0000;

/// Opaque black.
pub const OPAQUE_BLACK: Pixel = 0xFF00_0000;

/// Opaque white.
pub const OPAQUE_WHITE: Pixel = 0xFFFF_FFFF;

/// Bits of the alpha channel.
pub const ALPHA_MASK: Pixel = 0xFF00_0000;

/// Bits of the red, green and blue channels.
pub const RGB_MASK: Pixel = 0x00FF_FFFF;

/// Every channel bit set; the default channel mask for compositing.
pub const ALL_CHANNELS: Pixel = 0xFFFF_FFFF;

/// Packs four channels into a pixel.
#[inline]
pub const fn pack(a: u8, r: u8, g: u8, b: u8) -> Pixel {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

/// Packs four already-clamped `i32` channels.
///
/// Values outside `[0, 255]` are clamped first, so this never produces an
/// invalid pixel.
#[inline]
pub fn pack_i32(a: i32, r: i32, g: i32, b: i32) -> Pixel {
    pack(
        clamp_channel(a) as u8,
        clamp_channel(r) as u8,
        clamp_channel(g) as u8,
        clamp_channel(b) as u8,
    )
}

/// Splits a pixel into `[a, r, g, b]`.
#[inline]
pub const fn unpack(p: Pixel) -> [u8; 4] {
    [(p >> 24) as u8, (p >> 16) as u8, (p >> 8) as u8, p as u8]
}

/// Splits a pixel into `[a, r, g, b]` as `i32` for integer arithmetic.
#[inline]
pub const fn unpack_i32(p: Pixel) -> [i32; 4] {
    [
        ((p >> 24) & 0xff) as i32,
        ((p >> 16) & 0xff) as i32,
        ((p >> 8) & 0xff) as i32,
        (p & 0xff) as i32,
    ]
}

/// Alpha channel.
#[inline]
pub const fn alpha(p: Pixel) -> u8 {
    (p >> 24) as u8
}

/// Red channel.
#[inline]
pub const fn red(p: Pixel) -> u8 {
    (p >> 16) as u8
}

/// Green channel.
#[inline]
pub const fn green(p: Pixel) -> u8 {
    (p >> 8) as u8
}

/// Blue channel.
#[inline]
pub const fn blue(p: Pixel) -> u8 {
    p as u8
}

/// Clamps an integer channel value into `[0, 255]`.
#[inline]
pub const fn clamp_channel(v: i32) -> i32 {
    if v < 0 {
        0
    } else if v > 255 {
        255
    } else {
        v
    }
}

/// Rounds a float channel value to the nearest integer and clamps it.
///
/// NaN maps to 0.
#[inline]
pub fn round_channel(v: f32) -> u8 {
    // `as` saturates and sends NaN to 0
    clamp_channel(v.round() as i32) as u8
}

/// Rounds the way accumulation loops do: add one half, truncate toward
/// zero, then clamp.
#[inline]
pub fn truncate_channel(v: f32) -> u8 {
    clamp_channel((v + 0.5) as i32) as u8
}

/// Replaces the alpha channel of `p`.
#[inline]
pub const fn with_alpha(p: Pixel, a: u8) -> Pixel {
    (p & RGB_MASK) | ((a as u32) << 24)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_unpack() {
        let p = pack(0x12, 0x34, 0x56, 0x78);
        assert_eq!(p, 0x1234_5678);
        assert_eq!(unpack(p), [0x12, 0x34, 0x56, 0x78]);
        assert_eq!(unpack_i32(p), [0x12, 0x34, 0x56, 0x78]);
        assert_eq!(alpha(p), 0x12);
        assert_eq!(blue(p), 0x78);
    }

    #[test]
    fn test_pack_i32_clamps() {
        assert_eq!(pack_i32(300, -5, 128, 255), 0xFF00_80FF);
    }

    #[test]
    fn test_round_channel() {
        assert_eq!(round_channel(127.5), 128);
        assert_eq!(round_channel(127.49), 127);
        assert_eq!(round_channel(-3.0), 0);
        assert_eq!(round_channel(1e9), 255);
        assert_eq!(round_channel(f32::NAN), 0);
    }

    #[test]
    fn test_truncate_channel() {
        assert_eq!(truncate_channel(127.5), 128);
        assert_eq!(truncate_channel(127.4), 127);
        assert_eq!(truncate_channel(-0.9), 0);
        assert_eq!(truncate_channel(255.4), 255);
        assert_eq!(truncate_channel(400.0), 255);
    }

    #[test]
    fn test_with_alpha() {
        assert_eq!(with_alpha(0x0011_2233, 0xff), 0xFF11_2233);
        assert_eq!(with_alpha(OPAQUE_WHITE, 0), RGB_MASK);
    }
}
