//! Raster image types

use image::{Rgb, RgbImage};

use crate::image_pipeline::common::error::{ConversionError, Result};

/// Number of interleaved channels in a [`RasterImage`].
pub const RGB_CHANNELS: usize = 3;

/// Decoded 8-bit RGB raster.
///
/// Width and height are always non-zero and the pixel layout is always
/// interleaved `[R, G, B, R, G, B, ...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pixels: RgbImage,
}

impl RasterImage {
    pub fn new(pixels: RgbImage) -> Result<Self> {
        let (width, height) = pixels.dimensions();
        if width == 0 || height == 0 {
            return Err(ConversionError::InvalidImageInput(format!(
                "raster dimensions must be non-zero, got {}x{}",
                width, height
            )));
        }
        Ok(Self { pixels })
    }

    /// Builds a raster from an interleaved RGB buffer.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * RGB_CHANNELS;
        if data.len() != expected {
            return Err(ConversionError::InvalidImageInput(format!(
                "buffer of {} bytes does not match {}x{} RGB ({} bytes)",
                data.len(),
                width,
                height,
                expected
            )));
        }
        let pixels = RgbImage::from_raw(width, height, data).ok_or_else(|| {
            ConversionError::InvalidImageInput(format!("cannot wrap {}x{} buffer", width, height))
        })?;
        Self::new(pixels)
    }

    /// A raster of uniform color.
    pub fn filled(width: u32, height: u32, color: [u8; 3]) -> Result<Self> {
        Self::new(RgbImage::from_pixel(width, height, Rgb(color)))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn is_square(&self) -> bool {
        self.width() == self.height()
    }

    /// RGB value at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the image; see [`Self::get_pixel`].
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.pixels.get_pixel(x, y).0
    }

    /// RGB value at `(x, y)`, or `None` outside the image.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        self.pixels.get_pixel_checked(x, y).map(|p| p.0)
    }

    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    pub fn into_pixels(self) -> RgbImage {
        self.pixels
    }

    /// Bytes per row of the interleaved buffer.
    pub fn row_stride(&self) -> usize {
        self.width() as usize * RGB_CHANNELS
    }
}
