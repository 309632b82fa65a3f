use crate::error::{RenderError, RenderResult};
use crate::input::SigMfMeta;

/// Maps sample indices and frequencies onto the pixel grid of a rendered
/// waterfall: one row per FFT frame, one column per FFT bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderGeometry {
    pub pixel_width: u32,
    pub pixel_height: u64,
    /// Samples actually rendered (after clipping), not the file length.
    pub sample_count: u64,
    pub center_frequency_hz: f64,
    pub sample_rate_hz: f64,
}

impl RenderGeometry {
    pub fn new(
        fft_size: u32,
        overlap: u32,
        sample_count: u64,
        center_frequency_hz: f64,
        sample_rate_hz: f64,
    ) -> RenderResult<Self> {
        if fft_size <= overlap {
            return Err(RenderError::geometry(format!(
                "overlap of {overlap} must be smaller than FFT frame size of {fft_size}"
            )));
        }
        if sample_count == 0 {
            return Err(RenderError::geometry("no samples to render"));
        }
        let hop = u64::from(fft_size - overlap);
        if sample_count < hop {
            return Err(RenderError::geometry(format!(
                "{sample_count} samples is less than one frame of {hop}"
            )));
        }
        if !(sample_rate_hz.is_finite() && sample_rate_hz > 0.0) {
            return Err(RenderError::geometry(format!(
                "sample rate must be positive, got {sample_rate_hz}"
            )));
        }

        Ok(Self {
            pixel_width: fft_size,
            pixel_height: sample_count / hop,
            sample_count,
            center_frequency_hz,
            sample_rate_hz,
        })
    }

    /// Build the context from a metadata document. Frequency drift across
    /// capture segments is not modeled; the first capture sets the center.
    pub fn from_meta(
        meta: &SigMfMeta,
        fft_size: u32,
        overlap: u32,
        sample_count: u64,
    ) -> RenderResult<Self> {
        let center = meta.first_capture()?.frequency.ok_or_else(|| {
            RenderError::geometry("first capture segment has no core:frequency")
        })?;
        Self::new(fft_size, overlap, sample_count, center, meta.global.sample_rate)
    }

    pub fn width(&self) -> f64 {
        f64::from(self.pixel_width)
    }

    pub fn height(&self) -> f64 {
        self.pixel_height as f64
    }

    /// Vertical pixel position of a sample offset.
    pub fn sample_index_to_row(&self, index: u64) -> f64 {
        (index as f64 / self.sample_count as f64) * self.height()
    }

    /// Horizontal pixel position of an absolute frequency. The raster spans
    /// exactly one sample rate, centered on the capture frequency.
    pub fn frequency_to_column(&self, freq_hz: f64) -> f64 {
        let start_freq = self.center_frequency_hz - self.sample_rate_hz / 2.0;
        ((freq_hz - start_freq) / self.sample_rate_hz) * self.width()
    }
}
