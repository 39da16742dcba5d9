//! Image info command.
//!
//! Prints dimensions, file size and simple channel statistics.

use crate::InfoArgs;
use anyhow::Result;
use pixfx_core::pixel::unpack;
use pixfx_core::Raster;
use std::fs;

/// Runs the info command.
pub fn run(args: InfoArgs) -> Result<()> {
    for path in &args.input {
        let file_size = fs::metadata(path)?.len();
        let image = super::load_image(path)?;
        let stats = Stats::gather(&image);

        println!("{}", path.display());
        println!("  Resolution: {}x{}", image.width(), image.height());
        println!("  Pixels:     {}", image.len());
        println!("  File size:  {}", super::format_size(file_size));
        println!(
            "  Mean ARGB:  {:.1} {:.1} {:.1} {:.1}",
            stats.mean[0], stats.mean[1], stats.mean[2], stats.mean[3]
        );
        println!(
            "  Alpha:      {} opaque, {} transparent, {} partial",
            stats.opaque,
            stats.transparent,
            image.len() - stats.opaque - stats.transparent
        );

        if args.input.len() > 1 {
            println!();
        }
    }

    Ok(())
}

struct Stats {
    mean: [f64; 4],
    opaque: usize,
    transparent: usize,
}

impl Stats {
    fn gather(image: &Raster) -> Self {
        let mut sums = [0u64; 4];
        let mut opaque = 0;
        let mut transparent = 0;
        for &p in image.pixels() {
            let ch = unpack(p);
            for (s, c) in sums.iter_mut().zip(ch) {
                *s += c as u64;
            }
            match ch[0] {
                0xff => opaque += 1,
                0 => transparent += 1,
                _ => {}
            }
        }
        let n = image.len().max(1) as f64;
        Self {
            mean: sums.map(|s| s as f64 / n),
            opaque,
            transparent,
        }
    }
}
