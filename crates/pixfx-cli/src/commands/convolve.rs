//! Convolve command - builtin or custom kernels.

#[allow(unused_imports)]
use tracing::{debug, info, trace};
use anyhow::{bail, Context, Result};
use crate::{ConvolveArgs, commands::{load_image, save_image}};
use pixfx_core::{EdgePolicy, Raster};
use pixfx_ops::convolve::{convolve, convolve_separable};
use pixfx_ops::Kernel;
use pixfx_ops::kernel::MAX_RADIUS;

pub fn run(args: ConvolveArgs, edge: EdgePolicy) -> Result<()> {
    info!(input = %args.input.display(), "loading");
    let input = load_image(&args.input)?;
    info!(width = input.width(), height = input.height(), kernel = %args.kernel, %edge, "convolving");

    let include_alpha = !args.no_alpha;
    let result = if let Some(weights) = &args.weights {
        let kernel = parse_kernel(weights, args.cols, args.rows)?;
        convolve(&kernel, &input, include_alpha, edge)
    } else {
        apply_builtin(&input, &args, include_alpha, edge)?
    };

    save_image(&args.output, &result)?;
    info!(output = %args.output.display(), "saved");
    Ok(())
}

fn apply_builtin(input: &Raster, args: &ConvolveArgs, include_alpha: bool, edge: EdgePolicy) -> Result<Raster> {
    let kernel = match args.kernel.to_lowercase().as_str() {
        "gaussian" | "gauss" => {
            let row = Kernel::gaussian(args.radius)?;
            debug!(taps = row.cols(), "separable gaussian");
            return Ok(convolve_separable(&row, &row.transpose(), input, include_alpha, edge));
        }
        "box" | "blur" => {
            if !(0.0..=MAX_RADIUS).contains(&args.radius) {
                bail!("radius must be in 0..={MAX_RADIUS}, got {}", args.radius);
            }
            Kernel::box_blur(2 * args.radius.round() as usize + 1)
        }
        "sharpen" => Kernel::sharpen(),
        "edge" | "laplacian" => Kernel::edge_detect(),
        "emboss" => Kernel::emboss(),
        "sobel-x" | "sobelx" => Kernel::sobel_x(),
        "sobel-y" | "sobely" => Kernel::sobel_y(),
        "identity" => Kernel::identity(),
        _ => bail!(
            "Unknown kernel: '{}'. Valid: box, gaussian, sharpen, edge, emboss, sobel-x, sobel-y, identity",
            args.kernel
        ),
    };
    Ok(convolve(&kernel, input, include_alpha, edge))
}

/// Parses `"w0,w1,..."` into a kernel, inferring a square shape when
/// neither dimension is given.
fn parse_kernel(text: &str, cols: Option<usize>, rows: Option<usize>) -> Result<Kernel> {
    let weights = text
        .split(',')
        .map(|s| s.trim().parse::<f32>().with_context(|| format!("bad weight '{s}'")))
        .collect::<Result<Vec<_>>>()?;
    let n = weights.len();
    let (cols, rows) = match (cols, rows) {
        (Some(c), Some(r)) => (c, r),
        (Some(c), None) if c > 0 => (c, n / c),
        (None, Some(r)) if r > 0 => (n / r, r),
        (None, None) => {
            let side = (n as f64).sqrt().round() as usize;
            if side * side != n {
                bail!("{n} weights do not form a square kernel; pass --cols/--rows");
            }
            (side, side)
        }
        _ => bail!("kernel dimensions must be positive"),
    };
    Ok(Kernel::new(cols, rows, weights)?)
}
