//! Loads encoded raster images from disk.

use std::path::Path;

use image::ImageReader;
use tracing::info;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::raster::color::{ColorMode, normalize_color_mode};
use crate::image_pipeline::raster::types::RasterImage;
use crate::logger::LogHandle;

/// File extensions (lowercase, without the dot) accepted as raster sources.
pub const SUPPORTED_FORMATS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif", "tiff", "tif", "webp"];

/// Case-insensitive check of the extension against [`SUPPORTED_FORMATS`].
pub fn is_supported_format(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_FORMATS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

#[derive(Debug, Clone)]
pub struct RasterLoader {
    log: LogHandle,
}

impl Default for RasterLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterLoader {
    pub fn new() -> Self {
        Self {
            log: LogHandle::new("raster_loader"),
        }
    }

    pub fn with_log(mut self, log: LogHandle) -> Self {
        self.log = log;
        self
    }

    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<RasterImage> {
        self.load_with_mode(path).map(|(image, _)| image)
    }

    /// Loads `path` and also reports the color mode it decoded to.
    pub fn load_with_mode<P: AsRef<Path>>(&self, path: P) -> Result<(RasterImage, ColorMode)> {
        let path = path.as_ref();
        let _guard = self.log.enter();

        if !path.exists() {
            return Err(ConversionError::FileNotFound(path.to_path_buf()));
        }

        let decoded = ImageReader::open(path)
            .map_err(|e| ConversionError::InputReadError(format!("{}: {}", path.display(), e)))?
            .with_guessed_format()
            .map_err(|e| ConversionError::InputReadError(format!("{}: {}", path.display(), e)))?
            .decode()
            .map_err(|e| ConversionError::DecodeFailure(format!("{}: {}", path.display(), e)))?;

        let mode = ColorMode::of(&decoded);
        let image = normalize_color_mode(decoded)?;

        info!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            source_mode = ?mode,
            "Loaded raster"
        );
        Ok((image, mode))
    }
}
