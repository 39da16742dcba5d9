//! Hue / saturation / brightness conversion for the HSB blend operators.
//!
//! Hue is a fraction of a full turn in `[0, 1)`, saturation and brightness
//! are in `[0, 1]`. Conversions work on call-local values only, so the
//! blend operators that use them are safe to run from many threads.

use pixfx_core::pixel::{pack, Pixel};

/// Converts 8-bit RGB to `[hue, saturation, brightness]`.
pub fn rgb_to_hsb(r: i32, g: i32, b: i32) -> [f32; 3] {
    let cmax = r.max(g).max(b);
    let cmin = r.min(g).min(b);

    let brightness = cmax as f32 / 255.0;
    let saturation = if cmax != 0 {
        (cmax - cmin) as f32 / cmax as f32
    } else {
        0.0
    };

    let hue = if saturation == 0.0 {
        0.0
    } else {
        let span = (cmax - cmin) as f32;
        let redc = (cmax - r) as f32 / span;
        let greenc = (cmax - g) as f32 / span;
        let bluec = (cmax - b) as f32 / span;
        let sector = if r == cmax {
            bluec - greenc
        } else if g == cmax {
            2.0 + redc - bluec
        } else {
            4.0 + greenc - redc
        };
        let h = sector / 6.0;
        if h < 0.0 { h + 1.0 } else { h }
    };

    [hue, saturation, brightness]
}

/// Converts `hue, saturation, brightness` back to an opaque pixel.
///
/// Hue wraps, so only its fractional part matters. Channels are scaled by
/// 255 and rounded by adding one half and truncating.
pub fn hsb_to_rgb(hue: f32, saturation: f32, brightness: f32) -> Pixel {
    let to_byte = |v: f32| (v * 255.0 + 0.5) as u8;

    if saturation == 0.0 {
        let v = to_byte(brightness);
        return pack(0xff, v, v, v);
    }

    let h = (hue - hue.floor()) * 6.0;
    let f = h - h.floor();
    let p = brightness * (1.0 - saturation);
    let q = brightness * (1.0 - saturation * f);
    let t = brightness * (1.0 - saturation * (1.0 - f));

    let (r, g, b) = match h as i32 {
        0 => (brightness, t, p),
        1 => (q, brightness, p),
        2 => (p, brightness, t),
        3 => (p, q, brightness),
        4 => (t, p, brightness),
        _ => (brightness, p, q),
    };

    pack(0xff, to_byte(r), to_byte(g), to_byte(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use pixfx_core::pixel::unpack;

    #[test]
    fn primaries() {
        assert_eq!(rgb_to_hsb(255, 0, 0), [0.0, 1.0, 1.0]);
        let green = rgb_to_hsb(0, 255, 0);
        assert_abs_diff_eq!(green[0], 1.0 / 3.0, epsilon = 1e-6);
        let blue = rgb_to_hsb(0, 0, 255);
        assert_abs_diff_eq!(blue[0], 2.0 / 3.0, epsilon = 1e-6);
    }

    #[test]
    fn grey_has_no_hue() {
        let [h, s, v] = rgb_to_hsb(128, 128, 128);
        assert_eq!(h, 0.0);
        assert_eq!(s, 0.0);
        assert_abs_diff_eq!(v, 128.0 / 255.0, epsilon = 1e-6);
        assert_eq!(hsb_to_rgb(h, s, v), pack(0xff, 128, 128, 128));
    }

    #[test]
    fn black_is_safe() {
        assert_eq!(rgb_to_hsb(0, 0, 0), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn magenta_hue_wraps_positive() {
        let [h, _, _] = rgb_to_hsb(255, 0, 128);
        assert!(h > 0.8 && h < 1.0);
    }

    #[test]
    fn round_trip_is_close() {
        for &(r, g, b) in &[(12, 200, 99), (255, 128, 0), (3, 4, 250), (77, 77, 200)] {
            let [h, s, v] = rgb_to_hsb(r, g, b);
            let [a, r2, g2, b2] = unpack(hsb_to_rgb(h, s, v));
            assert_eq!(a, 0xff);
            assert!((r2 as i32 - r).abs() <= 1);
            assert!((g2 as i32 - g).abs() <= 1);
            assert!((b2 as i32 - b).abs() <= 1);
        }
    }

    #[test]
    fn hue_wraps() {
        assert_eq!(hsb_to_rgb(1.0, 1.0, 1.0), hsb_to_rgb(0.0, 1.0, 1.0));
        assert_eq!(hsb_to_rgb(-0.5, 1.0, 1.0), hsb_to_rgb(0.5, 1.0, 1.0));
    }
}
