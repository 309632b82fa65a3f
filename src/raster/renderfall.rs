use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use super::{RasterHandle, RasterParams, Rasterizer};
use crate::error::{RenderError, RenderResult};

pub const DEFAULT_PROGRAM: &str = "renderfall";

/// Drives the external `renderfall` binary. The call blocks until it exits;
/// a non-zero exit is reported as is, never retried.
#[derive(Debug, Clone)]
pub struct Renderfall {
    program: PathBuf,
}

impl Renderfall {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Default for Renderfall {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl Rasterizer for Renderfall {
    fn rasterize(&self, data: &Path, params: &RasterParams) -> RenderResult<RasterHandle> {
        let args = params.to_args(data);
        debug!(?args, "calling {}", self.program().display());
        info!(output = %params.output.display(), "rendering waterfall with renderfall");

        let status = Command::new(self.program()).args(&args).status()?;
        if !status.success() {
            return Err(RenderError::ExternalProcessFailure {
                program: self.program.display().to_string(),
                status,
            });
        }

        Ok(RasterHandle {
            path: params.output.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::WindowKind;

    fn params() -> RasterParams {
        RasterParams {
            fft_size: 256,
            overlap: 0,
            window: WindowKind::Blackman,
            format_name: "float32".into(),
            byte_offset: 0,
            clip: None,
            output: PathBuf::from("rec.png"),
            verbose: false,
        }
    }

    #[test]
    fn default_program_is_renderfall() {
        assert_eq!(Renderfall::default().program(), Path::new("renderfall"));
    }

    #[test]
    fn missing_program_is_an_io_error() {
        let r = Renderfall::new("renderfall-that-does-not-exist");
        let err = r.rasterize(Path::new("rec.sigmf-data"), &params()).unwrap_err();
        assert!(matches!(err, RenderError::Io(_)));
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_a_process_failure() {
        let err = Renderfall::new("false")
            .rasterize(Path::new("rec.sigmf-data"), &params())
            .unwrap_err();
        match err {
            RenderError::ExternalProcessFailure { program, status } => {
                assert_eq!(program, "false");
                assert!(!status.success());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn successful_exit_returns_the_output_path() {
        let handle = Renderfall::new("true")
            .rasterize(Path::new("rec.sigmf-data"), &params())
            .unwrap();
        assert_eq!(handle.path, PathBuf::from("rec.png"));
    }
}
