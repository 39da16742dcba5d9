//! Byte-order conversion between packed ARGB pixels and interleaved 8-bit
//! channel buffers.

use pixfx_core::pixel::{pack, unpack};
use pixfx_core::Pixel;

/// Packs interleaved `R G B A` bytes. A trailing partial pixel is ignored.
pub fn argb_from_rgba8(bytes: &[u8]) -> Vec<Pixel> {
    bytes
        .chunks_exact(4)
        .map(|c| pack(c[3], c[0], c[1], c[2]))
        .collect()
}

/// Packs interleaved `R G B` bytes as opaque pixels.
pub fn argb_from_rgb8(bytes: &[u8]) -> Vec<Pixel> {
    bytes
        .chunks_exact(3)
        .map(|c| pack(0xff, c[0], c[1], c[2]))
        .collect()
}

/// Packs interleaved `Y A` bytes.
pub fn argb_from_gray_alpha8(bytes: &[u8]) -> Vec<Pixel> {
    bytes
        .chunks_exact(2)
        .map(|c| pack(c[1], c[0], c[0], c[0]))
        .collect()
}

/// Packs single-channel grey bytes as opaque pixels.
pub fn argb_from_gray8(bytes: &[u8]) -> Vec<Pixel> {
    bytes.iter().map(|&y| pack(0xff, y, y, y)).collect()
}

/// Unpacks pixels into interleaved `R G B A` bytes.
pub fn rgba8_from_argb(pixels: &[Pixel]) -> Vec<u8> {
    let mut out = Vec::with_capacity(pixels.len() * 4);
    for &p in pixels {
        let [a, r, g, b] = unpack(p);
        out.extend_from_slice(&[r, g, b, a]);
    }
    out
}
