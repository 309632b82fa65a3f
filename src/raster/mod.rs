//! Spectrogram rasterizers. The overlay only needs to know the raster's pixel
//! dimensions, so how the PNG gets produced sits behind [`Rasterizer`].

pub mod renderfall;
pub mod waterfall;
pub mod window;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::RenderResult;

pub use renderfall::Renderfall;
pub use waterfall::Waterfall;
pub use window::WindowKind;

/// Everything a rasterizer needs besides the raw sample file
#[derive(Debug, Clone, PartialEq)]
pub struct RasterParams {
    pub fft_size: u32,
    pub overlap: u32,
    pub window: WindowKind,
    /// Renderer type name, e.g. `float32`
    pub format_name: String,
    /// Byte offset into the data file
    pub byte_offset: u64,
    /// Render only the first N samples
    pub clip: Option<u64>,
    pub output: PathBuf,
    pub verbose: bool,
}

impl RasterParams {
    /// Command line for renderfall, in the order it documents its options
    pub fn to_args(&self, data: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-n".into(),
            self.fft_size.to_string().into(),
            "-f".into(),
            self.format_name.clone().into(),
            "-w".into(),
            self.window.as_str().into(),
            "-o".into(),
            self.output.clone().into_os_string(),
            "-s".into(),
            self.byte_offset.to_string().into(),
            "-l".into(),
            self.overlap.to_string().into(),
            "-c".into(),
            self.clip.unwrap_or(0).to_string().into(),
        ];
        if self.verbose {
            args.push("-v".into());
        }
        args.push(data.as_os_str().to_os_string());
        args
    }
}

/// A raster produced on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterHandle {
    pub path: PathBuf,
}

/// Turns a raw sample file into a spectrogram image.
///
/// Implementations must produce exactly `fft_size` columns and
/// `samples / (fft_size - overlap)` rows so the overlay lines up.
pub trait Rasterizer {
    fn rasterize(&self, data: &Path, params: &RasterParams) -> RenderResult<RasterHandle>;
}
