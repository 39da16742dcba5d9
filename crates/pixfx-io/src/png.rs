//! PNG reading and writing.
//!
//! Any PNG the `png` crate can decode is accepted: palette and low bit depth
//! images are expanded, 16-bit channels are reduced to 8 bits. Files are
//! always written as 8-bit RGBA.
//!
//! # Example
//!
//! ```rust,ignore
//! use pixfx_io::png;
//!
//! let image = png::read("input.png")?;
//! png::write("output.png", &image)?;
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use pixfx_core::Raster;
use tracing::debug;

use crate::convert::{
    argb_from_gray8, argb_from_gray_alpha8, argb_from_rgb8, argb_from_rgba8, rgba8_from_argb,
};
use crate::{IoError, IoResult};

/// Reads a PNG file into an ARGB raster.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<Raster> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut decoder = png::Decoder::new(BufReader::new(file));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("cannot determine output buffer size".into()))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;
    let data = &buf[..info.buffer_size()];

    if info.bit_depth != png::BitDepth::Eight {
        return Err(IoError::UnsupportedFormat(format!(
            "{:?} bit depth after expansion",
            info.bit_depth
        )));
    }
    let pixels = match info.color_type {
        png::ColorType::Rgba => argb_from_rgba8(data),
        png::ColorType::Rgb => argb_from_rgb8(data),
        png::ColorType::GrayscaleAlpha => argb_from_gray_alpha8(data),
        png::ColorType::Grayscale => argb_from_gray8(data),
        png::ColorType::Indexed => {
            return Err(IoError::UnsupportedFormat("unexpanded palette image".into()));
        }
    };

    debug!(
        path = %path.display(),
        width = info.width,
        height = info.height,
        color_type = ?info.color_type,
        "read png"
    );
    Ok(Raster::from_pixels(info.width, info.height, pixels)?)
}

/// Writes a raster as an 8-bit RGBA PNG.
pub fn write<P: AsRef<Path>>(path: P, image: &Raster) -> IoResult<()> {
    let path = path.as_ref();
    if image.is_empty() {
        return Err(IoError::EncodeError(format!(
            "cannot encode an empty {}x{} raster",
            image.width(),
            image.height()
        )));
    }

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let mut encoder = png::Encoder::new(writer, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut png_writer = encoder
        .write_header()
        .map_err(|e: png::EncodingError| IoError::EncodeError(e.to_string()))?;
    png_writer
        .write_image_data(&rgba8_from_argb(image.pixels()))
        .map_err(|e: png::EncodingError| IoError::EncodeError(e.to_string()))?;
    png_writer
        .finish()
        .map_err(|e: png::EncodingError| IoError::EncodeError(e.to_string()))?;

    debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "wrote png"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixfx_core::pixel::pack;

    fn encode_raw(path: &Path, w: u32, h: u32, color: png::ColorType, depth: png::BitDepth, data: &[u8]) {
        let file = File::create(path).unwrap();
        let mut encoder = png::Encoder::new(BufWriter::new(file), w, h);
        encoder.set_color(color);
        encoder.set_depth(depth);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(data).unwrap();
        writer.finish().unwrap();
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rt.png");
        let img = Raster::from_fn(5, 3, |x, y| pack((x * 50) as u8, (y * 80) as u8, 17, (x + y) as u8));
        write(&path, &img).unwrap();
        assert_eq!(read(&path).unwrap(), img);
    }

    #[test]
    fn test_read_gray() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        encode_raw(&path, 2, 1, png::ColorType::Grayscale, png::BitDepth::Eight, &[0, 200]);
        let img = read(&path).unwrap();
        assert_eq!(img.pixels(), &[0xFF_00_00_00, 0xFF_C8_C8_C8]);
    }

    #[test]
    fn test_read_rgb16_is_stripped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgb16.png");
        // big-endian samples; the high byte survives
        encode_raw(&path, 1, 1, png::ColorType::Rgb, png::BitDepth::Sixteen, &[0x12, 0x34, 0xAB, 0xCD, 0xFF, 0x00]);
        let img = read(&path).unwrap();
        assert_eq!(img.pixel(0, 0), 0xFF_12_AB_FF);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read(dir.path().join("nope.png")).unwrap_err();
        assert!(matches!(err, IoError::Io(_)));
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        assert!(matches!(read(&path).unwrap_err(), IoError::DecodeError(_)));
    }

    #[test]
    fn test_empty_raster_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = write(dir.path().join("e.png"), &Raster::new(0, 0)).unwrap_err();
        assert!(matches!(err, IoError::EncodeError(_)));
    }
}
