//! # pixfx-io
//!
//! Loading and saving [`Raster`](pixfx_core::Raster)s.
//!
//! The kernels in `pixfx-ops` never touch files; this crate is the thin
//! layer the command-line tool uses to get pixels in and out.
//!
//! - [`png`] - PNG read/write via the `png` crate
//! - [`convert`] - interleaved byte buffers to and from packed ARGB
//!
//! ```rust,ignore
//! let image = pixfx_io::read("in.png")?;
//! pixfx_io::write("out.png", &image)?;
//! ```

#![warn(missing_docs)]

mod error;

pub mod convert;
pub mod png;

pub use convert::{argb_from_rgba8, rgba8_from_argb};
pub use error::{IoError, IoResult};

use std::path::Path;

use pixfx_core::Raster;

/// Reads an image file, picking the decoder from the extension.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<Raster> {
    let path = path.as_ref();
    match extension(path).as_deref() {
        Some("png") => png::read(path),
        other => Err(unsupported(path, other)),
    }
}

/// Writes an image file, picking the encoder from the extension.
pub fn write<P: AsRef<Path>>(path: P, image: &Raster) -> IoResult<()> {
    let path = path.as_ref();
    match extension(path).as_deref() {
        Some("png") => png::write(path, image),
        other => Err(unsupported(path, other)),
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

fn unsupported(path: &Path, ext: Option<&str>) -> IoError {
    IoError::UnsupportedFormat(format!(
        "{} (extension {:?})",
        path.display(),
        ext.unwrap_or("")
    ))
}
