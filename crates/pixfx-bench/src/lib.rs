//! Shared fixtures for the pixfx benchmarks.
//!
//! Run with: `cargo bench -p pixfx-bench`

use pixfx_core::Raster;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Deterministic noise raster of the given size.
pub fn noise(width: u32, height: u32, seed: u64) -> Raster {
    let mut rng = StdRng::seed_from_u64(seed);
    Raster::from_fn(width, height, |_, _| rng.r#gen::<u32>())
}
