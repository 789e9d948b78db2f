//! Error types for humoments.

use thiserror::Error;

/// Result alias for humoments operations.
pub type HuResult<T> = std::result::Result<T, HuError>;

/// Errors that can occur while computing or reporting Hu invariants.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum HuError {
    /// Width or height of a pixel buffer is zero.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Row stride is smaller than the row width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// Pixel buffer is shorter than the declared geometry requires.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// The mask has no foreground pixels, so `M(0,0) == 0`.
    #[error("degenerate image: mask has no foreground pixels")]
    DegenerateImage,
    /// An entry could not be decoded as an image.
    #[error("failed to decode {name}: {reason}")]
    Decode { name: String, reason: String },
    /// The search directory yielded no usable images.
    #[error("no images found in {path}")]
    EmptyDirectory { path: String },
    /// Filesystem failure while listing entries or writing the report.
    #[error("i/o error: {reason}")]
    Io { reason: String },
    /// A report read back from text does not follow the expected layout.
    #[error("malformed report at line {line}: {reason}")]
    ReportFormat { line: usize, reason: String },
    /// The reference image failed; the whole run is aborted.
    #[error("reference image {name} failed: {source}")]
    Reference {
        name: String,
        #[source]
        source: Box<HuError>,
    },
}

impl From<std::io::Error> for HuError {
    fn from(err: std::io::Error) -> Self {
        HuError::Io {
            reason: err.to_string(),
        }
    }
}
