use tracing::info;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::raster::{RGB_CHANNELS, RasterImage, resample};
use crate::image_pipeline::square::types::{ConversionPolicy, SquareMethod};
use crate::logger::LogHandle;

/// Applies a [`ConversionPolicy`] with logging under its own span.
#[derive(Debug, Clone)]
pub struct SquareNormalizer {
    log: LogHandle,
}

impl Default for SquareNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SquareNormalizer {
    pub fn new() -> Self {
        Self {
            log: LogHandle::new("square_normalizer"),
        }
    }

    pub fn with_log(mut self, log: LogHandle) -> Self {
        self.log = log;
        self
    }

    pub fn normalize(&self, image: &RasterImage, policy: &ConversionPolicy) -> Result<RasterImage> {
        let _guard = self.log.enter();
        let (width, height) = image.dimensions();
        let squared = normalize(image, policy)?;

        if image.is_square() {
            info!("Image is already square");
        } else {
            info!(
                "Converted image to square using {}: {}x{} -> {}x{}",
                policy.method,
                width,
                height,
                squared.width(),
                squared.height()
            );
        }
        Ok(squared)
    }
}

/// Produces a square raster from `image` without touching the input.
///
/// Square input yields a copy under every policy.
pub fn normalize(image: &RasterImage, policy: &ConversionPolicy) -> Result<RasterImage> {
    if image.is_square() {
        return Ok(image.clone());
    }

    match policy.method {
        SquareMethod::Pad => pad(image, policy.fill_color),
        SquareMethod::Crop => crop(image),
        SquareMethod::Stretch => {
            let target = image.width().max(image.height());
            resample(image, target, target)
        }
    }
}

fn pad(image: &RasterImage, fill_color: [u8; 3]) -> Result<RasterImage> {
    let (width, height) = (image.width() as usize, image.height() as usize);
    let max_dim = width.max(height);
    // Floor division: an odd leftover pixel of padding lands bottom/right.
    let pad_cols = (max_dim - width) / 2;
    let pad_rows = (max_dim - height) / 2;

    let mut canvas: Vec<u8> = fill_color
        .iter()
        .copied()
        .cycle()
        .take(max_dim * max_dim * RGB_CHANNELS)
        .collect();

    let src = image.as_raw();
    let src_stride = image.row_stride();
    let dst_stride = max_dim * RGB_CHANNELS;
    for row in 0..height {
        let src_offset = row * src_stride;
        let dst_offset = (row + pad_rows) * dst_stride + pad_cols * RGB_CHANNELS;
        canvas[dst_offset..dst_offset + src_stride]
            .copy_from_slice(&src[src_offset..src_offset + src_stride]);
    }

    RasterImage::from_raw(max_dim as u32, max_dim as u32, canvas)
}

fn crop(image: &RasterImage) -> Result<RasterImage> {
    let (width, height) = (image.width() as usize, image.height() as usize);
    let min_dim = width.min(height);
    let left = (width - min_dim) / 2;
    let top = (height - min_dim) / 2;

    let src = image.as_raw();
    let src_stride = image.row_stride();
    let dst_stride = min_dim * RGB_CHANNELS;
    let mut cropped = Vec::with_capacity(min_dim * dst_stride);
    for row in top..top + min_dim {
        let start = row * src_stride + left * RGB_CHANNELS;
        cropped.extend_from_slice(&src[start..start + dst_stride]);
    }

    RasterImage::from_raw(min_dim as u32, min_dim as u32, cropped)
}
