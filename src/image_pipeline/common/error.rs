use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Invalid method '{0}'. Must be 'pad', 'crop', or 'stretch'")]
    InvalidPolicy(String),

    #[error("Invalid image input: {0}")]
    InvalidImageInput(String),

    #[error("Failed to read input file: {0}")]
    InputReadError(String),
    
    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),
    
    #[error("Failed to decode image: {0}")]
    DecodeFailure(String),
    
    #[error("Failed to encode image: {0}")]
    EncodeFailure(String),
    
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Error converting {}: {source}", path.display())]
    ConversionFailure {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
    
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ConversionError {
    pub(crate) fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter { name, reason: reason.into() }
    }

    /// Wraps a decoder-internal failure together with the file it came from.
    pub(crate) fn conversion_failure(
        path: impl Into<PathBuf>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::ConversionFailure { path: path.into(), source: source.into() }
    }
}

pub type Result<T> = std::result::Result<T, ConversionError>;
