use std::fs::File;
use std::io::{BufReader, Seek, SeekFrom};
use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};
use rustfft::{num_complex::Complex, FftPlanner};
use tracing::{debug, info};

use super::{RasterHandle, RasterParams, Rasterizer};
use crate::error::{RenderError, RenderResult};
use crate::format::SampleType;
use crate::input::samples::IqSampleReader;

/// Built-in waterfall renderer producing the same pixel grid as renderfall:
/// one row per frame of `fft_size - overlap` fresh samples, one column per
/// FFT bin with negative frequencies on the left.
#[derive(Debug, Clone, Copy, Default)]
pub struct Waterfall;

impl Rasterizer for Waterfall {
    fn rasterize(&self, data: &Path, params: &RasterParams) -> RenderResult<RasterHandle> {
        let sample_type = SampleType::from_name(&params.format_name)
            .ok_or_else(|| RenderError::UnsupportedFormat(params.format_name.clone()))?;
        if params.fft_size <= params.overlap {
            return Err(RenderError::geometry(format!(
                "overlap of {} must be smaller than FFT frame size of {}",
                params.overlap, params.fft_size
            )));
        }

        let mut file = File::open(data)?;
        let byte_len = file.metadata()?.len().saturating_sub(params.byte_offset);
        file.seek(SeekFrom::Start(params.byte_offset))?;

        let mut nsamples = byte_len / sample_type.bytes_per_sample() as u64;
        if let Some(clip) = params.clip.filter(|&c| c > 0) {
            nsamples = nsamples.min(clip);
        }

        let fft_size = params.fft_size as usize;
        let overlap = params.overlap as usize;
        let hop = fft_size - overlap;
        let frames = u32::try_from(nsamples / hop as u64)
            .map_err(|_| RenderError::geometry("too many frames for a single image"))?;
        if frames == 0 {
            return Err(RenderError::geometry(format!(
                "{nsamples} samples is less than one frame of {hop}"
            )));
        }

        info!(
            width = params.fft_size,
            height = frames,
            output = %params.output.display(),
            "rendering waterfall"
        );

        let mut reader = IqSampleReader::new(BufReader::new(file), sample_type);
        let window = params.window.coefficients(fft_size);
        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(fft_size);

        let mut frame = vec![Complex::new(0.0f32, 0.0); fft_size];
        let mut buffer = vec![Complex::new(0.0f32, 0.0); fft_size];
        let mut image = RgbImage::new(params.fft_size, frames);
        let half = fft_size / 2;
        let progress_step = (frames / 10).max(1);

        for y in 0..frames {
            // Keep the trailing `overlap` samples, append `hop` fresh ones
            frame.copy_within(hop.., 0);
            let chunk = match reader.read_chunk(hop)? {
                Some(c) => c,
                None => break,
            };
            for (slot, s) in frame[overlap..].iter_mut().zip(chunk) {
                *slot = Complex::new(s.i, s.q);
            }

            for ((out, s), w) in buffer.iter_mut().zip(&frame).zip(&window) {
                *out = *s * *w;
            }
            fft.process(&mut buffer);

            for x in 0..fft_size {
                let bin = buffer[(x + half) % fft_size];
                image.put_pixel(x as u32, y, shade(bin.norm()));
            }

            if params.verbose && y % progress_step == 0 {
                debug!("progress: {}%", 100 * u64::from(y) / u64::from(frames));
            }
        }

        image.save_with_format(&params.output, ImageFormat::Png)?;

        Ok(RasterHandle {
            path: params.output.clone(),
        })
    }
}

/// Black-on-white log magnitude scale
fn shade(magnitude: f32) -> Rgb<u8> {
    let db = f64::from(magnitude).log10();
    let v = (255.0 - (db * 85.0 + 200.0)).clamp(0.0, 255.0) as u8;
    Rgb([v, v, v])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::WindowKind;
    use std::f32::consts::PI;
    use std::path::PathBuf;

    fn write_tone(path: &Path, samples: usize, bin: f32, n: usize) {
        let mut bytes = Vec::with_capacity(samples * 8);
        for k in 0..samples {
            let phase = 2.0 * PI * bin * k as f32 / n as f32;
            bytes.extend_from_slice(&phase.cos().to_le_bytes());
            bytes.extend_from_slice(&phase.sin().to_le_bytes());
        }
        std::fs::write(path, bytes).unwrap();
    }

    fn params(output: PathBuf) -> RasterParams {
        RasterParams {
            fft_size: 64,
            overlap: 0,
            window: WindowKind::Hann,
            format_name: "float32".into(),
            byte_offset: 0,
            clip: None,
            output,
            verbose: false,
        }
    }

    #[test]
    fn dimensions_follow_frame_math() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("tone.sigmf-data");
        write_tone(&data, 64 * 10 + 5, 8.0, 64);

        let mut p = params(dir.path().join("tone.png"));
        p.overlap = 32;
        let handle = Waterfall.rasterize(&data, &p).unwrap();
        let img = image::open(&handle.path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (64, 645 / 32));
    }

    #[test]
    fn clip_limits_rows() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("tone.sigmf-data");
        write_tone(&data, 64 * 10, 8.0, 64);

        let mut p = params(dir.path().join("tone.png"));
        p.clip = Some(64 * 3);
        Waterfall.rasterize(&data, &p).unwrap();
        let img = image::open(&p.output).unwrap().to_rgb8();
        assert_eq!(img.height(), 3);
    }

    #[test]
    fn positive_tone_lands_right_of_center() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("tone.sigmf-data");
        write_tone(&data, 64 * 4, 16.0, 64);

        let p = params(dir.path().join("tone.png"));
        Waterfall.rasterize(&data, &p).unwrap();
        let img = image::open(&p.output).unwrap().to_rgb8();
        for y in 0..img.height() {
            let tone = img.get_pixel(32 + 16, y)[0];
            let mirror = img.get_pixel(32 - 16, y)[0];
            assert!(tone < mirror, "row {y}: tone {tone} vs mirror {mirror}");
        }
    }

    #[test]
    fn too_few_samples_is_a_geometry_error() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("short.sigmf-data");
        write_tone(&data, 10, 1.0, 64);
        let err = Waterfall
            .rasterize(&data, &params(dir.path().join("short.png")))
            .unwrap_err();
        assert!(matches!(err, RenderError::InvalidGeometry(_)));
    }

    #[test]
    fn unknown_type_name_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let mut p = params(dir.path().join("x.png"));
        p.format_name = "float16".into();
        let err = Waterfall.rasterize(Path::new("unused"), &p).unwrap_err();
        assert!(matches!(err, RenderError::UnsupportedFormat(_)));
    }

    #[test]
    fn silence_is_white() {
        assert_eq!(shade(0.0), Rgb([255, 255, 255]));
        assert_eq!(shade(1e6), Rgb([0, 0, 0]));
    }
}
