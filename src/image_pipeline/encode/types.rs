//! Encoding configuration types

use std::path::Path;

use crate::image_pipeline::common::error::{ConversionError, Result};

/// Highest accepted compression level; 0 is the lowest.
pub const MAX_COMPRESSION_LEVEL: u8 = 9;

/// Checks a user-supplied compression level against `0..=9`.
pub fn validate_compression_level(level: i32) -> Result<u8> {
    if (0..=MAX_COMPRESSION_LEVEL as i32).contains(&level) {
        Ok(level as u8)
    } else {
        Err(ConversionError::invalid_parameter(
            "compression_level",
            format!("must be between 0 and {}, got {}", MAX_COMPRESSION_LEVEL, level),
        ))
    }
}

/// Encoded output container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Png,
    Tiff,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Tiff => "tiff",
        }
    }

    /// Format implied by the extension of `path`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "png" => Ok(Self::Png),
            "tif" | "tiff" => Ok(Self::Tiff),
            _ => Err(ConversionError::UnsupportedFormat(format!(
                "cannot encode {} (expected .png, .tif or .tiff)",
                path.display()
            ))),
        }
    }
}

/// Options shared by every raster writer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Compression level in `0..=9`; higher is smaller and slower
    pub compression_level: u8,
    /// Spend extra encoder effort on smaller output (adaptive PNG row
    /// filters, horizontal TIFF predictor) without dropping any metadata
    pub optimize: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            compression_level: 6,
            optimize: true,
        }
    }
}

impl EncodeOptions {
    pub fn new(compression_level: i32) -> Result<Self> {
        Ok(Self {
            compression_level: validate_compression_level(compression_level)?,
            ..Self::default()
        })
    }
}
