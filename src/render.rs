use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{RenderError, RenderResult};
use crate::format::FormatDescriptor;
use crate::geometry::RenderGeometry;
use crate::input::{data_sample_count, SigMfMeta, SigMfPaths};
use crate::overlay::{build_overlay, write_overlay};
use crate::raster::{RasterHandle, RasterParams, Rasterizer, WindowKind};

/// Settings for one render request
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Either file of a SigMF pair
    pub input: PathBuf,
    /// SVG output path; defaults to the input with an `.svg` extension
    pub outfile: Option<PathBuf>,
    pub fft_size: u32,
    pub overlap: u32,
    pub window: WindowKind,
    /// Render only the first N samples; zero means everything
    pub clip: Option<u64>,
    pub verbose: bool,
}

impl RenderConfig {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            outfile: None,
            fft_size: 2048,
            overlap: 0,
            window: WindowKind::default(),
            clip: None,
            verbose: false,
        }
    }

    pub fn svg_path(&self) -> PathBuf {
        self.outfile
            .clone()
            .unwrap_or_else(|| self.input.with_extension("svg"))
    }

    /// The raster always sits next to the SVG so a relative href resolves.
    pub fn png_path(&self) -> PathBuf {
        self.svg_path().with_extension("png")
    }

    fn effective_clip(&self) -> Option<u64> {
        self.clip.filter(|&c| c > 0)
    }
}

/// What a render produced
#[derive(Debug, Clone)]
pub struct RenderOutcome {
    pub svg_path: PathBuf,
    pub raster: RasterHandle,
    pub geometry: RenderGeometry,
}

/// Render a SigMF recording: write the SVG overlay, then rasterize the
/// samples underneath it.
pub fn render<R: Rasterizer + ?Sized>(
    config: &RenderConfig,
    rasterizer: &R,
) -> RenderResult<RenderOutcome> {
    let paths = SigMfPaths::from_input(&config.input)?;
    let svg_path = config.svg_path();
    let png_path = config.png_path();

    debug!(meta = %paths.meta.display(), "reading metadata");
    let meta = SigMfMeta::load(&paths.meta)?;
    let format = FormatDescriptor::parse(&meta.global.datatype)?;
    // Fails on real or big-endian data before anything is written
    let format_name = format.renderer_type_name()?;

    let mut sample_count = data_sample_count(&paths.data, &format)?;
    if let Some(clip) = config.effective_clip() {
        sample_count = sample_count.min(clip);
    }
    info!(
        %format,
        sample_count,
        sample_rate = meta.global.sample_rate,
        "loaded {}",
        paths.data.display()
    );

    let geometry =
        RenderGeometry::from_meta(&meta, config.fft_size, config.overlap, sample_count)?;
    let href = png_path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| RenderError::InvalidPath(png_path.clone()))?;
    let doc = build_overlay(&meta, &geometry, href)?;

    ensure_parent_dir(&svg_path)?;
    info!(
        width = geometry.pixel_width,
        height = geometry.pixel_height,
        boundaries = doc.lines().count(),
        annotations = doc.rects().count(),
        "writing SVG wrapper to {}",
        svg_path.display()
    );
    write_overlay(&svg_path, &doc)?;

    let params = RasterParams {
        fft_size: config.fft_size,
        overlap: config.overlap,
        window: config.window,
        format_name,
        byte_offset: 0,
        clip: config.effective_clip(),
        output: png_path,
        verbose: config.verbose,
    };
    let raster = rasterizer.rasterize(&paths.data, &params)?;

    Ok(RenderOutcome {
        svg_path,
        raster,
        geometry,
    })
}

fn ensure_parent_dir(path: &Path) -> RenderResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
