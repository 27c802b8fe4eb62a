use std::io::Write;
use tracing::debug;
use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::encode::types::EncodeOptions;
use crate::image_pipeline::encode::writer::RasterWriter;
use crate::image_pipeline::raster::RasterImage;

pub struct StandardTiffWriter;

/// Level 0 stores samples uncompressed; 1-9 map onto the deflate presets.
pub(crate) fn tiff_compression(level: u8) -> tiff::encoder::Compression {
    use tiff::encoder::compression::DeflateLevel;
    match level {
        0 => tiff::encoder::Compression::Uncompressed,
        1..=3 => tiff::encoder::Compression::Deflate(DeflateLevel::Fast),
        4..=6 => tiff::encoder::Compression::Deflate(DeflateLevel::Balanced),
        _ => tiff::encoder::Compression::Deflate(DeflateLevel::Best),
    }
}

impl RasterWriter for StandardTiffWriter {
    fn write_raster(
        &self,
        image: &RasterImage,
        output: &mut dyn Write,
        options: &EncodeOptions,
    ) -> Result<()> {
        debug!("Encoding TIFF image: {}x{}", image.width(), image.height());
        
        let mut buffer = Vec::new();
        
        {
            let mut encoder = tiff::encoder::TiffEncoder::new(std::io::Cursor::new(&mut buffer))
                .map_err(|e| ConversionError::EncodeFailure(e.to_string()))?
                .with_compression(tiff_compression(options.compression_level));
            
            if options.optimize && options.compression_level > 0 {
                encoder = encoder.with_predictor(tiff::tags::Predictor::Horizontal);
            }
            
            encoder.write_image::<tiff::encoder::colortype::RGB8>(
                image.width(),
                image.height(),
                image.as_raw(),
            ).map_err(|e| ConversionError::EncodeFailure(e.to_string()))?;
        }
        
        output
            .write_all(&buffer)
            .map_err(|e| ConversionError::OutputWriteError(e.to_string()))?;
        
        debug!("TIFF encoding complete");
        Ok(())
    }
}
