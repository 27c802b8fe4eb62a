use image::imageops::{self, FilterType};
use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::raster::types::RasterImage;

/// Resampling filter for every resize in the pipeline. Lanczos3 keeps
/// resampled output free of the aliasing a nearest-neighbor filter shows.
pub const RESAMPLE_FILTER: FilterType = FilterType::Lanczos3;

/// Resamples `image` to exactly `width x height` with [`RESAMPLE_FILTER`].
///
/// A zero target dimension is rejected as `InvalidImageInput`.
pub fn resample(image: &RasterImage, width: u32, height: u32) -> Result<RasterImage> {
    debug!(
        "Resampling {}x{} -> {}x{} ({:?})",
        image.width(),
        image.height(),
        width,
        height,
        RESAMPLE_FILTER
    );

    if width == 0 || height == 0 {
        return Err(ConversionError::InvalidImageInput(format!(
            "resample target must be non-zero, got {}x{}",
            width, height
        )));
    }

    RasterImage::new(imageops::resize(image.pixels(), width, height, RESAMPLE_FILTER))
}
