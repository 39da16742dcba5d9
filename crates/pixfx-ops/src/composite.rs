//! Pixel compositing algebra.
//!
//! [`combine`] merges a `top` pixel onto a `bottom` pixel in two steps:
//!
//! 1. The [`BlendOp`] replaces top's colour with a mix of both colours
//!    (unpremultiplied 8-bit arithmetic). A few operators finish the whole
//!    computation here and return immediately.
//! 2. Alpha-over: top's alpha is scaled by `extra_alpha / 255` to `a1`,
//!    bottom keeps `a3 = (255 - a1) * a2 / 255`, and each colour channel
//!    becomes `(top * a1 + bottom * a3) / 255`, alpha `a1 + a3`.
//!
//! [`combine_masked`] additionally restricts which bits of the result
//! replace bottom's bits.
//!
//! # Randomness
//!
//! [`BlendOp::Dissolve`] is stochastic. Every entry point takes the random
//! source explicitly, so a seeded generator makes the output reproducible.
//!
//! # Example
//!
//! ```rust
//! use pixfx_ops::composite::{combine, BlendOp};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let top = 0xFF_80_40_20;
//! let bottom = 0xFF_10_10_10;
//! assert_eq!(combine(top, bottom, BlendOp::Replace, 255, &mut rng), top);
//! assert_eq!(combine(top, bottom, BlendOp::Normal, 0, &mut rng), bottom);
//! ```

use std::fmt;
use std::str::FromStr;

use pixfx_core::pixel::{clamp_channel, pack_i32, unpack_i32, ALL_CHANNELS};
use pixfx_core::{Pixel, Raster};
use rand::RngCore;
#[allow(unused_imports)]
use tracing::{debug, trace};

use crate::hsb::{hsb_to_rgb, rgb_to_hsb};
use crate::{OpsError, OpsResult};

/// Compositing operator. Discriminants are the legacy numeric ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum BlendOp {
    /// Top pixel verbatim; skips every later step.
    Replace = 0,
    /// Plain alpha-over.
    #[default]
    Normal = 1,
    /// Per-channel minimum (darken).
    Min = 2,
    /// Per-channel maximum (lighten).
    Max = 3,
    /// Clamped sum.
    Add = 4,
    /// `bottom - top`, clamped.
    Subtract = 5,
    /// `|top - bottom|`.
    Difference = 6,
    /// `top * bottom / 255`.
    Multiply = 7,
    /// Bottom's saturation and brightness with top's hue.
    Hue = 8,
    /// Bottom's hue and brightness with top's saturation.
    Saturation = 9,
    /// Bottom's hue and saturation with top's brightness.
    Value = 10,
    /// Bottom's brightness with top's hue and saturation.
    Color = 11,
    /// `255 - (255 - top)(255 - bottom) / 255`.
    Screen = 12,
    /// `(top + bottom) / 2`.
    Average = 13,
    /// Screen and multiply mixed by top's value.
    Overlay = 14,
    /// Forces colour channels to white.
    Clear = 15,
    /// Legacy id with no colour step; behaves like [`BlendOp::Normal`].
    Exchange = 16,
    /// Whole-pixel random choice between top and bottom, weighted by top's
    /// alpha.
    Dissolve = 17,
    /// Bottom's colour and alpha scaled by top's alpha; returns immediately.
    DstIn = 18,
    /// Bottom's colour with the product of both alphas; returns immediately.
    Alpha = 19,
    /// Top's alpha as an inverted grey level; returns immediately.
    AlphaToGray = 20,
}

impl BlendOp {
    /// Every operator, in id order.
    pub const ALL: [BlendOp; 21] = [
        BlendOp::Replace,
        BlendOp::Normal,
        BlendOp::Min,
        BlendOp::Max,
        BlendOp::Add,
        BlendOp::Subtract,
        BlendOp::Difference,
        BlendOp::Multiply,
        BlendOp::Hue,
        BlendOp::Saturation,
        BlendOp::Value,
        BlendOp::Color,
        BlendOp::Screen,
        BlendOp::Average,
        BlendOp::Overlay,
        BlendOp::Clear,
        BlendOp::Exchange,
        BlendOp::Dissolve,
        BlendOp::DstIn,
        BlendOp::Alpha,
        BlendOp::AlphaToGray,
    ];

    /// Canonical lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            BlendOp::Replace => "replace",
            BlendOp::Normal => "normal",
            BlendOp::Min => "min",
            BlendOp::Max => "max",
            BlendOp::Add => "add",
            BlendOp::Subtract => "subtract",
            BlendOp::Difference => "difference",
            BlendOp::Multiply => "multiply",
            BlendOp::Hue => "hue",
            BlendOp::Saturation => "saturation",
            BlendOp::Value => "value",
            BlendOp::Color => "color",
            BlendOp::Screen => "screen",
            BlendOp::Average => "average",
            BlendOp::Overlay => "overlay",
            BlendOp::Clear => "clear",
            BlendOp::Exchange => "exchange",
            BlendOp::Dissolve => "dissolve",
            BlendOp::DstIn => "dst-in",
            BlendOp::Alpha => "alpha",
            BlendOp::AlphaToGray => "alpha-to-gray",
        }
    }

    /// `true` for operators that return before the alpha-over step.
    pub const fn short_circuits(self) -> bool {
        matches!(
            self,
            BlendOp::Replace | BlendOp::DstIn | BlendOp::Alpha | BlendOp::AlphaToGray
        )
    }
}

impl fmt::Display for BlendOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BlendOp {
    type Err = OpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        let op = match key.as_str() {
            "replace" => BlendOp::Replace,
            "normal" | "over" => BlendOp::Normal,
            "min" | "darken" => BlendOp::Min,
            "max" | "lighten" => BlendOp::Max,
            "add" => BlendOp::Add,
            "subtract" | "sub" => BlendOp::Subtract,
            "difference" | "diff" => BlendOp::Difference,
            "multiply" | "mul" => BlendOp::Multiply,
            "hue" => BlendOp::Hue,
            "saturation" => BlendOp::Saturation,
            "value" | "brightness" => BlendOp::Value,
            "color" | "colour" => BlendOp::Color,
            "screen" => BlendOp::Screen,
            "average" | "avg" => BlendOp::Average,
            "overlay" => BlendOp::Overlay,
            "clear" => BlendOp::Clear,
            "exchange" => BlendOp::Exchange,
            "dissolve" => BlendOp::Dissolve,
            "dstin" => BlendOp::DstIn,
            "alpha" => BlendOp::Alpha,
            "alphatogray" | "alphatogrey" => BlendOp::AlphaToGray,
            _ => return Err(OpsError::UnknownOperator(s.to_string())),
        };
        Ok(op)
    }
}

impl TryFrom<u8> for BlendOp {
    type Error = OpsError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        BlendOp::ALL
            .get(id as usize)
            .copied()
            .ok_or_else(|| OpsError::UnknownOperator(id.to_string()))
    }
}

/// Combines `top` onto `bottom` with operator `op`.
///
/// `extra_alpha` scales top's alpha (255 = unchanged, 0 = top invisible).
/// `rng` is only consulted by [`BlendOp::Dissolve`].
pub fn combine<R>(top: Pixel, bottom: Pixel, op: BlendOp, extra_alpha: u8, rng: &mut R) -> Pixel
where
    R: RngCore + ?Sized,
{
    if op == BlendOp::Replace {
        return top;
    }

    let [mut a1, mut r1, mut g1, mut b1] = unpack_i32(top);
    let [a2, r2, g2, b2] = unpack_i32(bottom);

    match op {
        BlendOp::Replace | BlendOp::Normal | BlendOp::Exchange => {}
        BlendOp::Min => {
            r1 = r1.min(r2);
            g1 = g1.min(g2);
            b1 = b1.min(b2);
        }
        BlendOp::Max => {
            r1 = r1.max(r2);
            g1 = g1.max(g2);
            b1 = b1.max(b2);
        }
        BlendOp::Add => {
            r1 = clamp_channel(r1 + r2);
            g1 = clamp_channel(g1 + g2);
            b1 = clamp_channel(b1 + b2);
        }
        BlendOp::Subtract => {
            r1 = clamp_channel(r2 - r1);
            g1 = clamp_channel(g2 - g1);
            b1 = clamp_channel(b2 - b1);
        }
        BlendOp::Difference => {
            r1 = (r1 - r2).abs();
            g1 = (g1 - g2).abs();
            b1 = (b1 - b2).abs();
        }
        BlendOp::Multiply => {
            r1 = r1 * r2 / 255;
            g1 = g1 * g2 / 255;
            b1 = b1 * b2 / 255;
        }
        BlendOp::Hue | BlendOp::Saturation | BlendOp::Value | BlendOp::Color => {
            let hsb1 = rgb_to_hsb(r1, g1, b1);
            let mut hsb2 = rgb_to_hsb(r2, g2, b2);
            match op {
                BlendOp::Hue => hsb2[0] = hsb1[0],
                BlendOp::Saturation => hsb2[1] = hsb1[1],
                BlendOp::Value => hsb2[2] = hsb1[2],
                _ => {
                    hsb2[0] = hsb1[0];
                    hsb2[1] = hsb1[1];
                }
            }
            let [_, r, g, b] = unpack_i32(hsb_to_rgb(hsb2[0], hsb2[1], hsb2[2]));
            r1 = r;
            g1 = g;
            b1 = b;
        }
        BlendOp::Screen => {
            r1 = screen(r1, r2);
            g1 = screen(g1, g2);
            b1 = screen(b1, b2);
        }
        BlendOp::Average => {
            r1 = (r1 + r2) / 2;
            g1 = (g1 + g2) / 2;
            b1 = (b1 + b2) / 2;
        }
        BlendOp::Overlay => {
            r1 = overlay(r1, r2);
            g1 = overlay(g1, g2);
            b1 = overlay(b1, b2);
        }
        BlendOp::Clear => {
            r1 = 0xff;
            g1 = 0xff;
            b1 = 0xff;
        }
        BlendOp::Dissolve => {
            let roll = (rng.next_u32() & 0xff) as i32;
            if roll >= a1 {
                return bottom;
            }
            a1 = 0xff;
        }
        BlendOp::DstIn => {
            return pack_i32(
                a2 * a1 / 255,
                r2 * a1 / 255,
                g2 * a1 / 255,
                b2 * a1 / 255,
            );
        }
        BlendOp::Alpha => {
            return pack_i32(a1 * a2 / 255, r2, g2, b2);
        }
        BlendOp::AlphaToGray => {
            let na = 255 - a1;
            return pack_i32(a1, na, na, na);
        }
    }

    let a1 = a1 * extra_alpha as i32 / 255;
    if a1 == 0 {
        return bottom;
    }
    let a3 = (255 - a1) * a2 / 255;
    pack_i32(
        a1 + a3,
        (r1 * a1 + r2 * a3) / 255,
        (g1 * a1 + g2 * a3) / 255,
        (b1 * a1 + b2 * a3) / 255,
    )
}

/// [`combine`] restricted to the bits set in `channel_mask`.
///
/// Bits outside the mask come from `bottom` unchanged.
pub fn combine_masked<R>(
    top: Pixel,
    bottom: Pixel,
    op: BlendOp,
    extra_alpha: u8,
    channel_mask: Pixel,
    rng: &mut R,
) -> Pixel
where
    R: RngCore + ?Sized,
{
    let result = combine(top, bottom, op, extra_alpha, rng);
    (bottom & !channel_mask) | (result & channel_mask)
}

/// Combines two rasters pixel by pixel.
///
/// Pixels are visited in row-major order so a seeded `rng` gives the same
/// dissolve pattern on every run.
///
/// # Errors
///
/// [`OpsError::SizeMismatch`] if the rasters differ in size.
pub fn composite<R>(
    top: &Raster,
    bottom: &Raster,
    op: BlendOp,
    extra_alpha: u8,
    channel_mask: Pixel,
    rng: &mut R,
) -> OpsResult<Raster>
where
    R: RngCore + ?Sized,
{
    trace!(
        width = bottom.width(),
        height = bottom.height(),
        %op,
        extra_alpha,
        "composite"
    );

    if top.dimensions() != bottom.dimensions() {
        return Err(OpsError::SizeMismatch(format!(
            "top is {}x{}, bottom is {}x{}",
            top.width(),
            top.height(),
            bottom.width(),
            bottom.height()
        )));
    }

    let mut out = bottom.clone();
    let full_mask = channel_mask == ALL_CHANNELS;
    for (dst, &t) in out.pixels_mut().iter_mut().zip(top.pixels()) {
        *dst = if full_mask {
            combine(t, *dst, op, extra_alpha, rng)
        } else {
            combine_masked(t, *dst, op, extra_alpha, channel_mask, rng)
        };
    }
    Ok(out)
}

#[inline]
fn screen(top: i32, bottom: i32) -> i32 {
    255 - ((255 - top) * (255 - bottom)) / 255
}

#[inline]
fn overlay(top: i32, bottom: i32) -> i32 {
    let s = screen(top, bottom);
    let m = top * bottom / 255;
    (s * top + m * (255 - top)) / 255
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixfx_core::pixel::{pack, unpack, OPAQUE_WHITE, RGB_MASK};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x5eed)
    }

    const TOP: Pixel = 0xFF_C8_64_32; // (255, 200, 100, 50)
    const BOTTOM: Pixel = 0xFF_32_96_FA; // (255, 50, 150, 250)

    fn op(o: BlendOp) -> [u8; 4] {
        unpack(combine(TOP, BOTTOM, o, 255, &mut rng()))
    }

    #[test]
    fn test_replace_is_verbatim() {
        let translucent = 0x40_11_22_33;
        assert_eq!(combine(translucent, BOTTOM, BlendOp::Replace, 0, &mut rng()), translucent);
    }

    #[test]
    fn test_opaque_normal_returns_top() {
        assert_eq!(combine(TOP, BOTTOM, BlendOp::Normal, 255, &mut rng()), TOP);
    }

    #[test]
    fn test_zero_extra_alpha_returns_bottom() {
        let bottom = 0x80_10_20_30;
        for o in BlendOp::ALL.into_iter().filter(|o| !o.short_circuits()) {
            assert_eq!(combine(TOP, bottom, o, 0, &mut rng()), bottom, "{o}");
        }
    }

    #[test]
    fn test_channel_ops() {
        assert_eq!(op(BlendOp::Min), [255, 50, 100, 50]);
        assert_eq!(op(BlendOp::Max), [255, 200, 150, 250]);
        assert_eq!(op(BlendOp::Add), [255, 250, 250, 255]);
        assert_eq!(op(BlendOp::Subtract), [255, 0, 50, 200]);
        assert_eq!(op(BlendOp::Difference), [255, 150, 50, 200]);
        assert_eq!(op(BlendOp::Multiply), [255, 39, 58, 49]);
        assert_eq!(op(BlendOp::Average), [255, 125, 125, 150]);
        assert_eq!(op(BlendOp::Clear), [255, 255, 255, 255]);
    }

    #[test]
    fn test_screen() {
        // 255 - (55 * 205) / 255 = 255 - 44
        assert_eq!(op(BlendOp::Screen)[1], 211);
        assert_eq!(screen(0, 0), 0);
        assert_eq!(screen(255, 0), 255);
    }

    #[test]
    fn test_overlay_values() {
        assert_eq!(overlay(0, 200), 0);
        assert_eq!(overlay(255, 200), 255);
        // s = 192, m = 64: (192 * 128 + 64 * 127) / 255 = 128.25
        assert_eq!(overlay(128, 128), 128);
        // s = 222, m = 78: (222 * 100 + 78 * 155) / 255 = 134.47
        assert_eq!(overlay(100, 200), 134);
        // s = 211, m = 39: (211 * 200 + 39 * 55) / 255 = 173.9
        assert_eq!(overlay(200, 50), 173);
    }

    #[test]
    fn test_overlay_opaque_pixels() {
        let top = pack(255, 128, 100, 200);
        let bottom = pack(255, 128, 200, 50);
        assert_eq!(
            combine(top, bottom, BlendOp::Overlay, 255, &mut rng()),
            pack(255, 128, 134, 173)
        );
    }

    #[test]
    fn test_exchange_behaves_like_normal() {
        let top = 0x80_FF_00_00;
        assert_eq!(
            combine(top, BOTTOM, BlendOp::Exchange, 200, &mut rng()),
            combine(top, BOTTOM, BlendOp::Normal, 200, &mut rng())
        );
    }

    #[test]
    fn test_alpha_over_half() {
        let top = pack(128, 255, 0, 0);
        let bottom = pack(255, 0, 0, 255);
        let [a, r, g, b] = unpack(combine(top, bottom, BlendOp::Normal, 255, &mut rng()));
        // a3 = 127 * 255 / 255 = 127
        assert_eq!(a, 255);
        assert_eq!(r, 128);
        assert_eq!(g, 0);
        assert_eq!(b, 127);
    }

    #[test]
    fn test_extra_alpha_scales_top() {
        let [a, r, _, b] = unpack(combine(TOP, BOTTOM, BlendOp::Normal, 51, &mut rng()));
        // a1 = 51, a3 = 204
        assert_eq!(a, 255);
        assert_eq!(r, ((200 * 51 + 50 * 204) / 255) as u8);
        assert_eq!(b, ((50 * 51 + 250 * 204) / 255) as u8);
    }

    #[test]
    fn test_hsb_ops_keep_bottom_components() {
        let red = pack(255, 255, 0, 0);
        let grey = pack(255, 128, 128, 128);
        // grey has no saturation, so substituting only hue keeps it grey
        assert_eq!(combine(red, grey, BlendOp::Hue, 255, &mut rng()), grey);
        // taking red's brightness lifts grey to white
        assert_eq!(combine(red, grey, BlendOp::Value, 255, &mut rng()), OPAQUE_WHITE);
        // hue + saturation from red, brightness from grey
        let [_, r, g, b] = unpack(combine(red, grey, BlendOp::Color, 255, &mut rng()));
        assert_eq!((r, g, b), (128, 0, 0));
        let [_, r, g, b] = unpack(combine(red, grey, BlendOp::Saturation, 255, &mut rng()));
        assert_eq!((r, g, b), (128, 0, 0));
    }

    #[test]
    fn test_hue_onto_saturated_bottom() {
        let orange = pack(255, 255, 128, 0);
        let blue = pack(255, 0, 0, 200);
        // hue 128/1530 of a turn, full saturation, brightness 200/255:
        // green = 200 * 128 / 255 + 0.5 = 100.89, truncated
        assert_eq!(
            combine(orange, blue, BlendOp::Hue, 255, &mut rng()),
            pack(255, 200, 100, 0)
        );
    }

    #[test]
    fn test_saturation_onto_saturated_bottom() {
        let half = pack(255, 200, 100, 100);
        let blue = pack(255, 0, 0, 200);
        // saturation 0.5 halves the minimum channels of blue
        assert_eq!(
            combine(half, blue, BlendOp::Saturation, 255, &mut rng()),
            pack(255, 100, 100, 200)
        );
    }

    #[test]
    fn test_dst_in() {
        let top = pack(128, 1, 2, 3);
        let bottom = pack(255, 200, 100, 50);
        assert_eq!(
            unpack(combine(top, bottom, BlendOp::DstIn, 0, &mut rng())),
            [128, 100, 50, 25]
        );
    }

    #[test]
    fn test_alpha_and_alpha_to_gray() {
        let top = pack(100, 1, 2, 3);
        let bottom = pack(200, 7, 8, 9);
        assert_eq!(
            unpack(combine(top, bottom, BlendOp::Alpha, 255, &mut rng())),
            [78, 7, 8, 9]
        );
        assert_eq!(
            unpack(combine(top, bottom, BlendOp::AlphaToGray, 255, &mut rng())),
            [100, 155, 155, 155]
        );
    }

    #[test]
    fn test_dissolve_is_reproducible_and_whole_pixel() {
        let top = pack(128, 255, 255, 255);
        let bottom = pack(255, 0, 0, 0);
        let run = |seed| {
            let mut r = StdRng::seed_from_u64(seed);
            (0..256)
                .map(|_| combine(top, bottom, BlendOp::Dissolve, 255, &mut r))
                .collect::<Vec<_>>()
        };
        let a = run(1);
        assert_eq!(a, run(1));
        let tops = a.iter().filter(|&&p| p == 0xFF_FF_FF_FF).count();
        let bottoms = a.iter().filter(|&&p| p == bottom).count();
        assert_eq!(tops + bottoms, 256);
        assert!(tops > 64 && bottoms > 64);
    }

    #[test]
    fn test_dissolve_transparent_top_never_wins() {
        let mut r = rng();
        for _ in 0..64 {
            assert_eq!(combine(0x00_FF_FF_FF, BOTTOM, BlendOp::Dissolve, 255, &mut r), BOTTOM);
        }
    }

    #[test]
    fn test_channel_mask() {
        let top = pack(255, 10, 20, 30);
        let bottom = pack(255, 200, 210, 220);
        let out = combine_masked(top, bottom, BlendOp::Normal, 255, 0x00_FF_00_00, &mut rng());
        assert_eq!(unpack(out), [255, 10, 210, 220]);
        let rgb_only = combine_masked(0x00_11_22_33, bottom, BlendOp::Replace, 255, RGB_MASK, &mut rng());
        assert_eq!(rgb_only, 0xFF_11_22_33);
    }

    #[test]
    fn test_parse_and_ids() {
        for o in BlendOp::ALL {
            assert_eq!(o.name().parse::<BlendOp>().unwrap(), o);
            assert_eq!(BlendOp::try_from(o as u8).unwrap(), o);
        }
        assert_eq!("Alpha_To_Gray".parse::<BlendOp>().unwrap(), BlendOp::AlphaToGray);
        assert_eq!("over".parse::<BlendOp>().unwrap(), BlendOp::Normal);
        assert!(matches!("glow".parse::<BlendOp>(), Err(OpsError::UnknownOperator(_))));
        assert!(BlendOp::try_from(21).is_err());
    }

    #[test]
    fn test_composite_rasters() {
        let top = Raster::filled(3, 2, TOP);
        let bottom = Raster::filled(3, 2, BOTTOM);
        let out = composite(&top, &bottom, BlendOp::Normal, 255, ALL_CHANNELS, &mut rng()).unwrap();
        assert!(out.pixels().iter().all(|&p| p == TOP));

        let masked = composite(&top, &bottom, BlendOp::Normal, 255, 0xFF, &mut rng()).unwrap();
        assert!(masked.pixels().iter().all(|&p| p == (BOTTOM & !0xFF) | (TOP & 0xFF)));

        let wrong = Raster::new(2, 2);
        assert!(matches!(
            composite(&wrong, &bottom, BlendOp::Normal, 255, ALL_CHANNELS, &mut rng()),
            Err(OpsError::SizeMismatch(_))
        ));
    }
}
