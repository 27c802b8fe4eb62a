use image::{ColorType, DynamicImage};
use tracing::debug;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::raster::types::RasterImage;

/// Color layout an encoded image decoded to, before normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Luma8,
    LumaA8,
    Rgb8,
    Rgba8,
    Luma16,
    LumaA16,
    Rgb16,
    Rgba16,
    Rgb32F,
    Rgba32F,
    Other,
}

impl ColorMode {
    pub fn of(image: &DynamicImage) -> Self {
        match image.color() {
            ColorType::L8 => Self::Luma8,
            ColorType::La8 => Self::LumaA8,
            ColorType::Rgb8 => Self::Rgb8,
            ColorType::Rgba8 => Self::Rgba8,
            ColorType::L16 => Self::Luma16,
            ColorType::La16 => Self::LumaA16,
            ColorType::Rgb16 => Self::Rgb16,
            ColorType::Rgba16 => Self::Rgba16,
            ColorType::Rgb32F => Self::Rgb32F,
            ColorType::Rgba32F => Self::Rgba32F,
            _ => Self::Other,
        }
    }

    /// Whether this mode already matches the raster representation.
    pub fn is_rgb8(self) -> bool {
        self == Self::Rgb8
    }
}

/// Converts a decoded image to the 8-bit RGB raster representation.
///
/// RGB8 input is moved through untouched. Alpha is dropped, luma is
/// replicated across the three channels, and deeper samples are scaled down
/// to 8 bits.
pub fn normalize_color_mode(image: DynamicImage) -> Result<RasterImage> {
    let mode = ColorMode::of(&image);
    match image {
        DynamicImage::ImageRgb8(buffer) => RasterImage::new(buffer),
        other => {
            debug!("Normalizing color mode {:?} -> Rgb8", mode);
            RasterImage::new(other.to_rgb8())
        }
    }
}
