use std::io::Write;
use tracing::debug;
use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::encode::types::EncodeOptions;
use crate::image_pipeline::encode::writer::RasterWriter;
use crate::image_pipeline::raster::RasterImage;

pub struct PngRasterWriter;

/// Maps the 0-9 deflate scale onto the encoder's presets.
pub(crate) fn png_compression(level: u8) -> png::Compression {
    match level {
        0..=2 => png::Compression::Fast,
        3..=6 => png::Compression::Default,
        _ => png::Compression::Best,
    }
}

impl RasterWriter for PngRasterWriter {
    fn write_raster(
        &self,
        image: &RasterImage,
        output: &mut dyn Write,
        options: &EncodeOptions,
    ) -> Result<()> {
        debug!("Encoding PNG image: {}x{}", image.width(), image.height());

        let mut encoder = png::Encoder::new(output, image.width(), image.height());
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png_compression(options.compression_level));
        if options.optimize {
            encoder.set_adaptive_filter(png::AdaptiveFilterType::Adaptive);
        }

        let mut writer = encoder
            .write_header()
            .map_err(|e| ConversionError::EncodeFailure(e.to_string()))?;
        writer
            .write_image_data(image.as_raw())
            .map_err(|e| ConversionError::EncodeFailure(e.to_string()))?;
        writer
            .finish()
            .map_err(|e| ConversionError::EncodeFailure(e.to_string()))?;

        debug!("PNG encoding complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient() -> RasterImage {
        let data: Vec<u8> = (0..16 * 9 * 3).map(|v| (v % 251) as u8).collect();
        RasterImage::from_raw(16, 9, data).unwrap()
    }

    #[test]
    fn output_decodes_to_same_pixels() {
        let image = gradient();
        for level in [0, 5, 9] {
            let mut buffer = Vec::new();
            let options = EncodeOptions::new(level).unwrap();
            PngRasterWriter.write_raster(&image, &mut buffer, &options).unwrap();

            let decoded = image::load_from_memory_with_format(&buffer, image::ImageFormat::Png)
                .unwrap()
                .to_rgb8();
            assert_eq!(decoded.as_raw(), image.as_raw());
        }
    }

    #[test]
    fn compression_presets_cover_range() {
        assert!(matches!(png_compression(0), png::Compression::Fast));
        assert!(matches!(png_compression(6), png::Compression::Default));
        assert!(matches!(png_compression(9), png::Compression::Best));
    }
}
