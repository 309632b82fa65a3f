use std::path::PathBuf;
use std::process::ExitStatus;

pub type RenderResult<T> = Result<T, RenderError>;

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("invalid sample format '{token}': {reason}")]
    InvalidFormatToken { token: String, reason: String },

    #[error("unsupported sample format '{0}': only complex little-endian samples can be rendered")]
    UnsupportedFormat(String),

    #[error("annotation {index} has non-positive width ({width:.3} px): freq lower edge must be below upper edge")]
    InvalidAnnotation { index: usize, width: f64 },

    #[error("invalid render geometry: {0}")]
    InvalidGeometry(String),

    #[error("metadata has no capture segments")]
    MissingCaptures,

    #[error("not a SigMF path: {}", .0.display())]
    InvalidPath(PathBuf),

    #[error("{program} exited with {status}")]
    ExternalProcessFailure { program: String, status: ExitStatus },

    #[error("metadata error: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error("raster encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RenderError {
    pub fn format_token(token: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFormatToken {
            token: token.into(),
            reason: reason.into(),
        }
    }

    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::InvalidGeometry(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_name_the_problem() {
        assert!(RenderError::format_token("xq", "bad base type")
            .to_string()
            .contains("'xq'"));
        assert!(RenderError::UnsupportedFormat("ru8_be".into())
            .to_string()
            .contains("complex little-endian"));
        assert!(RenderError::InvalidAnnotation { index: 3, width: 0.0 }
            .to_string()
            .starts_with("annotation 3"));
        assert!(RenderError::geometry("x")
            .to_string()
            .contains("invalid render geometry"));
    }

    #[test]
    fn io_errors_pass_through() {
        let err = RenderError::from(std::io::Error::other("boom"));
        assert_eq!(err.to_string(), "boom");
    }
}
