//! Error types for walkbars operations.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline stage an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Configuration loading and validation.
    Configuration,
    /// Series generation.
    Generation,
    /// Grouping samples into frames.
    Assembly,
    /// Rasterizing frames.
    Rendering,
    /// Encoding and writing the output artifact.
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Configuration => "configuration",
            Self::Generation => "generation",
            Self::Assembly => "assembly",
            Self::Rendering => "rendering",
            Self::Write => "write",
        };
        f.write_str(name)
    }
}

/// Errors that can occur in walkbars operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration value.
    #[error("invalid configuration value for '{key}': {message}")]
    InvalidConfig {
        /// The configuration key with the invalid value.
        key: &'static str,
        /// Why the value was rejected.
        message: String,
    },

    /// Configuration parsing error with line number.
    #[error("configuration error at line {line}: {message}")]
    ConfigParse {
        /// Line number where the error occurred (1-indexed, 0 if unknown).
        line: usize,
        /// Error message describing the issue.
        message: String,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {0}")]
    ConfigNotFound(String),

    /// The configuration produces no frames.
    #[error("no frames to render")]
    EmptyData,

    /// Samples could not be grouped into complete, ordered frames.
    #[error("frame assembly error: {0}")]
    FrameAssembly(String),

    /// Invalid dimensions for framebuffer or chart.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Scale domain error (e.g., empty axis range).
    #[error("Scale domain error: {0}")]
    ScaleDomain(String),

    /// Rendering error.
    #[error("Rendering error: {0}")]
    Rendering(String),

    /// GIF encoding error.
    #[error("GIF encoding error: {0}")]
    GifEncoding(#[from] gif::EncodingError),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),

    /// Output could not be written or published.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Build an [`Error::InvalidConfig`].
    pub(crate) fn invalid(key: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidConfig { key, message: message.into() }
    }

    /// Build an [`Error::Write`] for `path`.
    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Write { path: path.into(), source }
    }

    /// The pipeline stage this error belongs to.
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self {
            Self::InvalidConfig { .. } | Self::ConfigParse { .. } | Self::ConfigNotFound(_) => {
                Stage::Configuration
            }
            Self::EmptyData => Stage::Generation,
            Self::FrameAssembly(_) => Stage::Assembly,
            Self::InvalidDimensions { .. } | Self::ScaleDomain(_) | Self::Rendering(_) => {
                Stage::Rendering
            }
            Self::GifEncoding(_) | Self::PngEncoding(_) | Self::Write { .. } => {
                Stage::Write
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidDimensions { width: 0, height: 100 };
        assert!(err.to_string().contains("Invalid dimensions"));
    }

    #[test]
    fn test_invalid_config_names_key() {
        let err = Error::invalid("frames_per_second", "must be positive, got 0");
        let display = err.to_string();
        assert!(display.contains("frames_per_second"));
        assert!(display.contains("must be positive"));
        assert_eq!(err.stage(), Stage::Configuration);
    }

    #[test]
    fn test_write_error_names_path() {
        let err = Error::write("/no/such/dir/out.gif", io::Error::from(io::ErrorKind::NotFound));
        assert!(err.to_string().contains("/no/such/dir/out.gif"));
        assert_eq!(err.stage(), Stage::Write);
    }

    #[test]
    fn test_stages() {
        assert_eq!(Error::EmptyData.stage(), Stage::Generation);
        assert_eq!(Error::FrameAssembly("gap".into()).stage(), Stage::Assembly);
        assert_eq!(Error::Rendering("x".into()).stage(), Stage::Rendering);
        assert_eq!(Stage::Write.to_string(), "write");
    }
}
