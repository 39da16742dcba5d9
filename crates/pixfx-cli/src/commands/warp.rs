//! Warp command - geometric transforms through the resampler.

#[allow(unused_imports)]
use tracing::{debug, info, trace};
use anyhow::{bail, Result};
use crate::{WarpArgs, commands::{load_image, save_image}};
use pixfx_core::{EdgePolicy, Raster};
use pixfx_ops::resample::{resample_with, InverseMap, Interpolation, ResampleOptions};
use pixfx_ops::{Affine, Barrel, Ripple, Twirl, WaveShape};

pub fn run(args: WarpArgs, edge: EdgePolicy) -> Result<()> {
    info!(input = %args.input.display(), "loading");
    let input = load_image(&args.input)?;
    info!(
        width = input.width(),
        height = input.height(),
        warp = %args.warp_type,
        %edge,
        "warping"
    );

    let map = build_map(&input, &args)?;
    let options = ResampleOptions {
        edge,
        interpolation: if args.nearest {
            Interpolation::Nearest
        } else {
            Interpolation::Bilinear
        },
    };
    let rect = if args.expand {
        map.transform_space(input.bounds())
    } else {
        input.bounds()
    };
    debug!(x = rect.x, y = rect.y, width = rect.width, height = rect.height, "output rect");

    let result = resample_with(&input, rect, map.as_ref(), &options)?;
    save_image(&args.output, &result)?;
    info!(output = %args.output.display(), "saved");
    Ok(())
}

fn build_map(input: &Raster, args: &WarpArgs) -> Result<Box<dyn InverseMap>> {
    let (w, h) = (input.width() as f32, input.height() as f32);
    let (cx, cy) = ((w - 1.0) / 2.0, (h - 1.0) / 2.0);

    let map: Box<dyn InverseMap> = match args.warp_type.to_lowercase().as_str() {
        "rotate" => Box::new(Affine::rotate(args.angle.to_radians(), cx, cy)),
        "translate" | "offset" => Box::new(Affine::translate(args.dx as f64, args.dy as f64)),
        "scale" => {
            let sx = if args.dx == 0.0 { 1.0 } else { args.dx };
            let sy = if args.dy == 0.0 { sx } else { args.dy };
            Box::new(Affine::scale(sx as f64, sy as f64)?)
        }
        "twirl" | "swirl" => {
            let radius = if args.radius > 0.0 { args.radius } else { w.min(h) / 2.0 };
            Box::new(Twirl::new(cx, cy, radius, args.angle.to_radians()))
        }
        "ripple" | "wave" => {
            let wave: WaveShape = args.wave.parse()?;
            Box::new(Ripple::new(
                args.amplitude,
                args.amplitude,
                args.wavelength,
                args.wavelength,
                wave,
            )?)
        }
        "barrel" | "pincushion" => {
            let sign = if args.warp_type.eq_ignore_ascii_case("pincushion") { -1.0 } else { 1.0 };
            Box::new(Barrel::centered(
                sign * args.k1.abs(),
                sign * args.k2.abs(),
                input.width(),
                input.height(),
            ))
        }
        _ => bail!(
            "Unknown warp type: '{}'. Valid: rotate, translate, scale, twirl, ripple, barrel, pincushion",
            args.warp_type
        ),
    };
    Ok(map)
}
