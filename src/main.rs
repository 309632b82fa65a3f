use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod error;
mod format;
mod geometry;
mod input;
mod overlay;
mod raster;
mod render;

use raster::{Rasterizer, Renderfall, Waterfall, WindowKind};
use render::RenderConfig;

/// Render a SigMF-annotated spectrogram
#[derive(Parser, Debug)]
#[command(name = "sigmf-render")]
#[command(version, about, long_about = None)]
struct Args {
    /// SigMF file to render (.sigmf-meta or .sigmf-data)
    #[arg(value_name = "INPUT")]
    infile: PathBuf,

    /// FFT size
    #[arg(short = 'n', long, default_value = "2048")]
    fftsize: u32,

    /// Windowing function
    #[arg(short, long, value_enum, default_value_t = WindowKind::Blackman)]
    window: WindowKind,

    /// Output SVG path (defaults to <infile>.svg)
    #[arg(short, long)]
    outfile: Option<PathBuf>,

    /// Overlap N samples per frame
    #[arg(short = 'l', long, default_value = "0")]
    overlap: u32,

    /// Render only the first N samples from the dataset
    #[arg(short, long)]
    clip: Option<u64>,

    /// Which rasterizer draws the spectrogram
    #[arg(long, value_enum, default_value_t = RendererChoice::Renderfall)]
    renderer: RendererChoice,

    /// renderfall executable to call
    #[arg(long, default_value = raster::renderfall::DEFAULT_PROGRAM)]
    renderfall_bin: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RendererChoice {
    /// External renderfall process
    Renderfall,
    /// Built-in FFT waterfall
    Builtin,
}

impl From<&Args> for RenderConfig {
    fn from(args: &Args) -> Self {
        RenderConfig {
            outfile: args.outfile.clone(),
            fft_size: args.fftsize,
            overlap: args.overlap,
            window: args.window,
            clip: args.clip,
            verbose: args.verbose,
            ..RenderConfig::new(&args.infile)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = RenderConfig::from(&args);
    let rasterizer: Box<dyn Rasterizer> = match args.renderer {
        RendererChoice::Renderfall => Box::new(Renderfall::new(&args.renderfall_bin)),
        RendererChoice::Builtin => Box::new(Waterfall),
    };

    let outcome = render::render(&config, rasterizer.as_ref())
        .with_context(|| format!("failed to render {}", args.infile.display()))?;

    println!(
        "Wrote {} ({} x {}) over {}",
        outcome.svg_path.display(),
        outcome.geometry.pixel_width,
        outcome.geometry.pixel_height,
        outcome.raster.path.display()
    );

    Ok(())
}
