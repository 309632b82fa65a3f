pub mod meta;
pub mod samples;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{RenderError, RenderResult};
use crate::format::FormatDescriptor;

pub use meta::SigMfMeta;

/// IQ sample pair (In-phase, Quadrature)
#[derive(Debug, Clone, Copy)]
pub struct IqSample {
    pub i: f32,
    pub q: f32,
}

impl IqSample {
    pub fn new(i: f32, q: f32) -> Self {
        Self { i, q }
    }
}

/// The metadata/data file pair of a SigMF recording
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigMfPaths {
    pub meta: PathBuf,
    pub data: PathBuf,
}

impl SigMfPaths {
    /// Accepts either half of the pair (`x.sigmf-meta` or `x.sigmf-data`).
    /// Archives (`x.sigmf`) are not handled.
    pub fn from_input(path: &Path) -> RenderResult<Self> {
        let s = path
            .to_str()
            .ok_or_else(|| RenderError::InvalidPath(path.to_path_buf()))?;
        let base = s
            .strip_suffix("-meta")
            .or_else(|| s.strip_suffix("-data"))
            .filter(|base| base.ends_with(".sigmf"))
            .ok_or_else(|| RenderError::InvalidPath(path.to_path_buf()))?;

        Ok(Self {
            meta: PathBuf::from(format!("{base}-meta")),
            data: PathBuf::from(format!("{base}-data")),
        })
    }
}

/// Number of whole samples in a data file of `byte_len` bytes.
/// A partial trailing sample is dropped.
pub fn sample_count(byte_len: u64, format: &FormatDescriptor) -> u64 {
    let size = format.element_byte_size();
    let remainder = byte_len % size;
    if remainder != 0 {
        debug!(remainder, "dropping partial trailing sample");
    }
    byte_len / size
}

/// Sample count of a data file on disk.
pub fn data_sample_count<P: AsRef<Path>>(path: P, format: &FormatDescriptor) -> RenderResult<u64> {
    let byte_len = std::fs::metadata(path)?.len();
    Ok(sample_count(byte_len, format))
}
