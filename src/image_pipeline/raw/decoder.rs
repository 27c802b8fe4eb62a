use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::common::timing::PipelineTimings;
use crate::image_pipeline::debayer::{CpuDebayer, render_rgb8};
use crate::image_pipeline::encode::{EncodeOptions, OutputFormat, encode_to_file};
use crate::image_pipeline::raster::{RasterImage, resample};
use crate::image_pipeline::raw::params::{PostProcessSettings, RawDecodeParameters};
use crate::image_pipeline::raw::reader::RawImageReader;
use crate::image_pipeline::raw::rawloader_reader::RawLoaderReader;
use crate::logger::LogHandle;

/// Develops RAW sensor files into 8-bit sRGB rasters and encodes them.
pub struct RawDecoder<R: RawImageReader = RawLoaderReader> {
    reader: R,
    debayer: CpuDebayer,
    settings: PostProcessSettings,
    log: LogHandle,
}

impl RawDecoder<RawLoaderReader> {
    pub fn new() -> Self {
        Self::with_reader(RawLoaderReader)
    }
}

impl Default for RawDecoder<RawLoaderReader> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RawImageReader> RawDecoder<R> {
    pub fn with_reader(reader: R) -> Self {
        Self {
            reader,
            debayer: CpuDebayer::new(),
            settings: PostProcessSettings::default(),
            log: LogHandle::new("raw_decoder"),
        }
    }

    pub fn with_log(mut self, log: LogHandle) -> Self {
        self.log = log;
        self
    }

    /// Overrides the develop settings. The gamma exponent always comes from
    /// the decode parameters; the toe slope is kept from `settings`.
    pub fn with_settings(mut self, settings: PostProcessSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &PostProcessSettings {
        &self.settings
    }

    /// Checks `params` and returns the develop settings they resolve to.
    pub fn validate(&self, params: &RawDecodeParameters) -> Result<PostProcessSettings> {
        params.validate()?;
        let settings = self.settings.with_gamma(params.gamma);
        settings.validate()?;
        Ok(settings)
    }

    pub fn decode<P: AsRef<Path>>(
        &self,
        raw_path: P,
        params: &RawDecodeParameters,
    ) -> Result<RasterImage> {
        self.decode_with_timings(raw_path, params).map(|(image, _)| image)
    }

    pub fn decode_with_timings<P: AsRef<Path>>(
        &self,
        raw_path: P,
        params: &RawDecodeParameters,
    ) -> Result<(RasterImage, PipelineTimings)> {
        let raw_path = raw_path.as_ref();
        let _guard = self.log.enter();

        if !raw_path.exists() {
            return Err(ConversionError::FileNotFound(raw_path.to_path_buf()));
        }
        let settings = self.validate(params)?;

        info!(input = %raw_path.display(), "Decoding RAW file");
        let mut timings = PipelineTimings::new();

        let input_data = timings
            .measure("read_input_file", || std::fs::read(raw_path))
            .map_err(|e| {
                ConversionError::conversion_failure(
                    raw_path,
                    ConversionError::InputReadError(format!("{}: {}", raw_path.display(), e)),
                )
            })?;

        let raw_image = {
            let _span = tracing::info_span!("decode_raw", input_size = input_data.len()).entered();
            timings
                .measure("decode_raw", || self.reader.read_raw(&input_data))
                .map_err(|e| ConversionError::conversion_failure(raw_path, e))?
        };
        drop(input_data);

        let rgb8 = {
            let _span = tracing::info_span!("develop",
                width = raw_image.width,
                height = raw_image.height
            ).entered();
            timings
                .measure("develop", || {
                    let linear = self.debayer.process(&raw_image, &settings)?;
                    let pixels = render_rgb8(&linear, raw_image.xyz_to_cam.as_ref(), &settings)?;
                    Ok::<_, anyhow::Error>((linear.width, linear.height, pixels))
                })
                .map_err(|e| ConversionError::conversion_failure(raw_path, e))?
        };

        let (width, height, pixels) = rgb8;
        let mut image = RasterImage::from_raw(width as u32, height as u32, pixels)
            .map_err(|e| ConversionError::conversion_failure(raw_path, e))?;

        if let Some((target_width, target_height)) = params.resize {
            let _span = tracing::info_span!("resize", target_width, target_height).entered();
            image = timings.measure("resize", || resample(&image, target_width, target_height))?;
        }

        info!(
            width = image.width(),
            height = image.height(),
            elapsed_ms = timings.total_duration().as_secs_f64() * 1000.0,
            "RAW decode complete"
        );
        Ok((image, timings))
    }

    /// Writes `image` to `output_path`, choosing the format from its extension.
    pub fn encode<P: AsRef<Path>>(
        &self,
        image: &RasterImage,
        output_path: P,
        compression_level: i32,
    ) -> Result<()> {
        let output_path = output_path.as_ref();
        let _guard = self.log.enter();

        let options = EncodeOptions::new(compression_level)?;
        let format = OutputFormat::from_path(output_path)?;
        let _span = tracing::info_span!("encode", format = ?format).entered();
        encode_to_file(image, output_path, format, &options)?;

        debug!(output = %output_path.display(), "Encoded raster");
        Ok(())
    }

    /// Decodes `raw_path` and writes it next to the input, or to `output_path`.
    pub fn convert_file<P: AsRef<Path>>(
        &self,
        raw_path: P,
        output_path: Option<&Path>,
        params: &RawDecodeParameters,
    ) -> Result<PathBuf> {
        let raw_path = raw_path.as_ref();
        let output_path = output_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| raw_path.with_extension(OutputFormat::Png.extension()));

        let image = self.decode(raw_path, params)?;
        self.encode(&image, &output_path, params.compression_level)?;

        info!(
            "Successfully converted {} to {}",
            raw_path.display(),
            output_path.display()
        );
        Ok(output_path)
    }
}
