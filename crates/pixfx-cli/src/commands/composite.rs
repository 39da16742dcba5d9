//! Composite command - combine two layers with a blend operator.

#[allow(unused_imports)]
use tracing::{debug, info, trace};
use anyhow::{Context, Result};
use crate::{CompositeArgs, commands::{load_image, save_image}};
use pixfx_core::Pixel;
use pixfx_ops::composite::composite;
use pixfx_ops::BlendOp;
use rand::rngs::StdRng;
use rand::SeedableRng;

pub fn run(args: CompositeArgs) -> Result<()> {
    let op: BlendOp = args.op.parse()?;
    let mask = parse_mask(&args.mask)?;

    info!(top = %args.top.display(), bottom = %args.bottom.display(), "loading");
    let top = load_image(&args.top)?;
    let bottom = load_image(&args.bottom)?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    info!(%op, opacity = args.opacity, mask = %format!("{mask:08x}"), "compositing");

    let result = composite(&top, &bottom, op, args.opacity, mask, &mut rng)
        .with_context(|| format!("Cannot composite {} over {}", args.top.display(), args.bottom.display()))?;

    save_image(&args.output, &result)?;
    info!(output = %args.output.display(), "saved");
    Ok(())
}

fn parse_mask(text: &str) -> Result<Pixel> {
    let hex = text.trim().trim_start_matches("0x").trim_start_matches("0X");
    Pixel::from_str_radix(hex, 16).with_context(|| format!("Invalid channel mask: '{text}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks() {
        assert_eq!(parse_mask("ffffffff").unwrap(), 0xFFFF_FFFF);
        assert_eq!(parse_mask("0x00FFFFFF").unwrap(), 0x00FF_FFFF);
        assert!(parse_mask("zz").is_err());
        assert!(parse_mask("1ffffffff").is_err());
    }
}
