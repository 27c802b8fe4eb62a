use std::path::{Path, PathBuf};

use tracing::info;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::encode::{EncodeOptions, OutputFormat, encode_to_file};
use crate::image_pipeline::raster::RasterLoader;
use crate::image_pipeline::square::{ConversionPolicy, SquareNormalizer};

/// `<stem>_<method>.<ext>` inside `dir`.
pub(crate) fn squared_output_path(
    input: &Path,
    dir: &Path,
    policy: &ConversionPolicy,
    format: OutputFormat,
) -> PathBuf {
    let stem = input.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    dir.join(format!("{}_{}.{}", stem, policy.method, format.extension()))
}

/// Loads, squares and encodes one raster with the given components.
pub(crate) fn square_with(
    loader: &RasterLoader,
    normalizer: &SquareNormalizer,
    input: &Path,
    output: &Path,
    policy: &ConversionPolicy,
    options: &EncodeOptions,
) -> Result<()> {
    let format = OutputFormat::from_path(output)?;
    let image = loader.load(input)?;
    let squared = normalizer.normalize(&image, policy)?;
    encode_to_file(&squared, output, format, options)
}

/// Squares a single raster file.
///
/// Without `output` the result is written next to the input as
/// `<stem>_<method>.png`.
pub fn square_file<P: AsRef<Path>>(
    input: P,
    output: Option<&Path>,
    policy: &ConversionPolicy,
    compression_level: i32,
) -> Result<PathBuf> {
    let input = input.as_ref();
    let options = EncodeOptions::new(compression_level)?;
    let output = match output {
        Some(path) => path.to_path_buf(),
        None => {
            let dir = input.parent().unwrap_or_else(|| Path::new("."));
            squared_output_path(input, dir, policy, OutputFormat::Png)
        }
    };

    square_with(
        &RasterLoader::new(),
        &SquareNormalizer::new(),
        input,
        &output,
        policy,
        &options,
    )?;

    info!("Processed {} -> {}", input.display(), output.display());
    Ok(output)
}
