//! Raster encoding module
//!
//! This module serializes rasters to PNG or TIFF files with a 0-9 compression
//! level.

mod writer;
mod png_writer;
mod standard_tiff_writer;
pub mod types;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

pub use writer::RasterWriter;
pub use png_writer::PngRasterWriter;
pub use standard_tiff_writer::StandardTiffWriter;
pub use types::{EncodeOptions, MAX_COMPRESSION_LEVEL, OutputFormat, validate_compression_level};

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::raster::RasterImage;

/// Writer for `format`.
pub fn writer_for(format: OutputFormat) -> Box<dyn RasterWriter> {
    match format {
        OutputFormat::Png => Box::new(PngRasterWriter),
        OutputFormat::Tiff => Box::new(StandardTiffWriter),
    }
}

/// Encodes `image` into a new file at `output_path`.
///
/// The file handle is closed before returning, on success and on error.
pub fn encode_to_file(
    image: &RasterImage,
    output_path: &Path,
    format: OutputFormat,
    options: &EncodeOptions,
) -> Result<()> {
    debug!(
        output = %output_path.display(),
        format = ?format,
        level = options.compression_level,
        "Encoding raster"
    );

    let file = File::create(output_path).map_err(|e| {
        ConversionError::OutputWriteError(format!("{}: {}", output_path.display(), e))
    })?;
    let mut output = BufWriter::new(file);

    writer_for(format)
        .write_raster(image, &mut output, options)
        .map_err(|e| with_output_path(output_path, e))?;

    output.flush().map_err(|e| {
        ConversionError::OutputWriteError(format!("{}: {}", output_path.display(), e))
    })?;
    Ok(())
}

/// Prefixes writer errors with the file they were writing to.
fn with_output_path(output_path: &Path, error: ConversionError) -> ConversionError {
    match error {
        ConversionError::EncodeFailure(reason) => {
            ConversionError::EncodeFailure(format!("{}: {}", output_path.display(), reason))
        }
        ConversionError::OutputWriteError(reason) => {
            ConversionError::OutputWriteError(format!("{}: {}", output_path.display(), reason))
        }
        ConversionError::IoError(e) => {
            ConversionError::OutputWriteError(format!("{}: {}", output_path.display(), e))
        }
        other => other,
    }
}
