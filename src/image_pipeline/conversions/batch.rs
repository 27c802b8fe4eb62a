use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::conversions::runner::{BatchRunner, enumerate_candidates, has_extension};
use crate::image_pipeline::conversions::single::{square_with, squared_output_path};
use crate::image_pipeline::conversions::types::{
    BatchOptions, BatchResult, DEFAULT_SQUARE_OUTPUT_DIR,
};
use crate::image_pipeline::encode::EncodeOptions;
use crate::image_pipeline::raster::{RasterLoader, is_supported_format};
use crate::image_pipeline::raw::{RawDecodeParameters, RawDecoder, RawImageReader, RawLoaderReader};
use crate::image_pipeline::square::{ConversionPolicy, SquareNormalizer};
use crate::logger::LogHandle;

/// Converts every candidate file of a directory and squares the result.
pub struct BatchConverter<R: RawImageReader = RawLoaderReader> {
    decoder: RawDecoder<R>,
    loader: RasterLoader,
    normalizer: SquareNormalizer,
    options: BatchOptions,
    log: LogHandle,
}

impl BatchConverter<RawLoaderReader> {
    pub fn new() -> Self {
        Self::with_decoder(RawDecoder::new())
    }
}

impl Default for BatchConverter<RawLoaderReader> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RawImageReader> BatchConverter<R> {
    pub fn with_decoder(decoder: RawDecoder<R>) -> Self {
        Self {
            decoder,
            loader: RasterLoader::new(),
            normalizer: SquareNormalizer::new(),
            options: BatchOptions::default(),
            log: LogHandle::new("batch_converter"),
        }
    }

    pub fn with_options(mut self, options: BatchOptions) -> Self {
        self.options = options;
        self
    }

    /// Routes this converter and every component it drives through `log`.
    pub fn with_log(mut self, log: LogHandle) -> Self {
        self.decoder = self.decoder.with_log(log.child("raw_decoder"));
        self.loader = self.loader.with_log(log.child("raster_loader"));
        self.normalizer = self.normalizer.with_log(log.child("square_normalizer"));
        self.log = log;
        self
    }

    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// Develops every raw file in `input_dir`, squaring each with `policy`.
    ///
    /// Each file produces `<stem><suffix>.<ext>` (developed) and `<stem>.<ext>`
    /// (squared) in `output_dir`, which defaults to `input_dir`. The first
    /// failure aborts the run and is returned as is.
    pub fn convert_directory(
        &self,
        input_dir: &Path,
        output_dir: Option<&Path>,
        policy: &ConversionPolicy,
        raw_params: &RawDecodeParameters,
    ) -> Result<BatchResult> {
        let _guard = self.log.enter();

        if !input_dir.is_dir() {
            return Err(ConversionError::DirectoryNotFound(input_dir.to_path_buf()));
        }
        self.decoder.validate(raw_params)?;

        let output_dir = output_dir.unwrap_or(input_dir);
        create_output_dir(output_dir)?;

        let raw_extensions = self.options.raw_extensions.as_slice();
        let candidates =
            enumerate_candidates(input_dir, |path| has_extension(path, raw_extensions))?;
        if candidates.is_empty() {
            info!(
                "No {} files found in {}",
                self.options.raw_extensions.join("/"),
                input_dir.display()
            );
        }

        BatchRunner::fail_fast()
            .with_log(self.log.child("batch_runner"))
            .run(&candidates, |raw_path| self.convert_one(raw_path, output_dir, policy, raw_params))
    }

    fn convert_one(
        &self,
        raw_path: &Path,
        output_dir: &Path,
        policy: &ConversionPolicy,
        raw_params: &RawDecodeParameters,
    ) -> Result<PathBuf> {
        let stem = raw_path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
        let extension = self.options.output_format.extension();
        let suffix = &self.options.intermediate_suffix;
        let developed_path = output_dir.join(format!("{}{}.{}", stem, suffix, extension));
        let squared_path = output_dir.join(format!("{}.{}", stem, extension));

        info!("Processing {}", raw_path.display());

        let developed = self.decoder.decode(raw_path, raw_params)?;
        self.decoder.encode(&developed, &developed_path, raw_params.compression_level)?;
        info!("Saved RAW image: {}", developed_path.display());

        let reloaded = self.loader.load(&developed_path)?;
        let squared = self.normalizer.normalize(&reloaded, policy)?;
        self.decoder.encode(&squared, &squared_path, raw_params.compression_level)?;
        info!("Saved square image: {}", squared_path.display());

        Ok(squared_path)
    }

    /// Squares every supported raster in `input_dir` into `output_dir`
    /// (default `<input_dir>/square_outputs`) as `<stem>_<method>.<ext>`.
    ///
    /// Failing files are recorded in the result and skipped.
    pub fn square_directory(
        &self,
        input_dir: &Path,
        output_dir: Option<&Path>,
        policy: &ConversionPolicy,
        compression_level: i32,
    ) -> Result<BatchResult> {
        let _guard = self.log.enter();

        if !input_dir.is_dir() {
            return Err(ConversionError::DirectoryNotFound(input_dir.to_path_buf()));
        }
        let encode_options = EncodeOptions::new(compression_level)?;

        let output_dir = output_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| input_dir.join(DEFAULT_SQUARE_OUTPUT_DIR));
        create_output_dir(&output_dir)?;

        let candidates = enumerate_candidates(input_dir, is_supported_format)?;
        if candidates.is_empty() {
            info!("No supported image files found in {}", input_dir.display());
        }

        let format = self.options.output_format;
        let result = BatchRunner::continue_on_error()
            .with_log(self.log.child("batch_runner"))
            .run(&candidates, |input| {
                let output = squared_output_path(input, &output_dir, policy, format);
                let (loader, normalizer) = (&self.loader, &self.normalizer);
                square_with(loader, normalizer, input, &output, policy, &encode_options)?;
                Ok(output)
            })?;

        info!(
            "Successfully processed {}/{} images",
            result.converted,
            result.total_found
        );
        Ok(result)
    }
}

fn create_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| {
        ConversionError::OutputWriteError(format!("{}: {}", dir.display(), e))
    })
}
