//! pixfx - raster filter command-line tool
//!
//! Thin wrapper over `pixfx-ops`: load a PNG, run one kernel, save a PNG.

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use pixfx_core::EdgePolicy;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "pixfx")]
#[command(author, version, about = "Raster convolution, warping and compositing")]
#[command(long_about = "
Applies the pixfx raster kernels to PNG images.

Examples:
  pixfx info image.png                          # Show image info
  pixfx convolve in.png -o out.png -k gaussian -r 4
  pixfx convolve in.png -o out.png --weights 0,-1,0,-1,5,-1,0,-1,0 --cols 3 --rows 3
  pixfx --edge wrap warp in.png -o out.png -t ripple --amplitude 6
  pixfx warp in.png -o out.png -t rotate --angle 30 --expand
  pixfx composite top.png bottom.png -o out.png --op multiply --opacity 200
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,

    /// Out-of-bounds handling: omit, clamp or wrap
    #[arg(long, global = true, default_value = "omit")]
    edge: EdgePolicy,
}

#[derive(Subcommand)]
enum Commands {
    /// Display image information
    #[command(visible_alias = "i")]
    Info(InfoArgs),

    /// Convolve with a kernel (blur, sharpen, edge detect, custom)
    #[command(visible_alias = "conv")]
    Convolve(ConvolveArgs),

    /// Geometric warp through an inverse coordinate map
    Warp(WarpArgs),

    /// Combine two images with a blend operator
    #[command(visible_alias = "comp")]
    Composite(CompositeArgs),
}

#[derive(Args)]
struct InfoArgs {
    /// Input image(s)
    #[arg(required = true)]
    input: Vec<PathBuf>,
}

#[derive(Args)]
struct ConvolveArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Kernel: box, gaussian, sharpen, edge, emboss, sobel-x, sobel-y, identity
    #[arg(short, long, default_value = "box")]
    kernel: String,

    /// Kernel radius (box size is 2r+1)
    #[arg(short, long, default_value = "1")]
    radius: f32,

    /// Custom comma-separated weights, row-major (overrides --kernel)
    #[arg(long, allow_hyphen_values = true)]
    weights: Option<String>,

    /// Columns of the custom kernel
    #[arg(long)]
    cols: Option<usize>,

    /// Rows of the custom kernel
    #[arg(long)]
    rows: Option<usize>,

    /// Leave alpha out of the sums; output is opaque
    #[arg(long)]
    no_alpha: bool,
}

#[derive(Args)]
struct WarpArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Warp type: rotate, translate, scale, twirl, ripple, barrel
    #[arg(short = 't', long = "type", default_value = "rotate")]
    warp_type: String,

    /// Rotation or twirl angle in degrees
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    angle: f32,

    /// Horizontal offset or scale factor
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    dx: f32,

    /// Vertical offset or scale factor
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    dy: f32,

    /// Twirl radius in pixels (0 = half the smaller side)
    #[arg(long, default_value = "0")]
    radius: f32,

    /// Ripple amplitude in pixels
    #[arg(long, default_value = "5", allow_hyphen_values = true)]
    amplitude: f32,

    /// Ripple wavelength
    #[arg(long, default_value = "16")]
    wavelength: f32,

    /// Ripple wave: sine, sawtooth, triangle
    #[arg(long, default_value = "sine")]
    wave: String,

    /// Barrel quadratic coefficient
    #[arg(long, default_value = "0.2", allow_hyphen_values = true)]
    k1: f32,

    /// Barrel quartic coefficient
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    k2: f32,

    /// Grow the canvas to hold the whole warped image
    #[arg(long)]
    expand: bool,

    /// Nearest-neighbour sampling instead of bilinear
    #[arg(long)]
    nearest: bool,
}

#[derive(Args)]
struct CompositeArgs {
    /// Top (source) layer
    top: PathBuf,

    /// Bottom (destination) layer
    bottom: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Blend operator (normal, multiply, screen, overlay, hue, dissolve, ...)
    #[arg(long, default_value = "normal")]
    op: String,

    /// Extra opacity applied to the top layer, 0..255
    #[arg(long, default_value = "255")]
    opacity: u8,

    /// Channel mask as hex AARRGGBB; unmasked bits keep the bottom layer
    #[arg(long, default_value = "ffffffff")]
    mask: String,

    /// Random seed for dissolve (default: from entropy)
    #[arg(long)]
    seed: Option<u64>,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Convolve(args) => commands::convolve::run(args, cli.edge),
        Commands::Warp(args) => commands::warp::run(args, cli.edge),
        Commands::Composite(args) => commands::composite::run(args),
    }
}
