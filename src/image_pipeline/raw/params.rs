//! RAW decode configuration types

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::encode::validate_compression_level;

/// Default output compression level.
pub const DEFAULT_COMPRESSION_LEVEL: i32 = 8;

/// Default transfer curve exponent.
pub const DEFAULT_GAMMA: f64 = 2.2;

/// Slope of the linear toe segment handed to the develop step.
pub const DEFAULT_TOE_SLOPE: f64 = 1.0;

/// Parameters for decoding a RAW file into a raster
#[derive(Debug, Clone, PartialEq)]
pub struct RawDecodeParameters {
    /// Output compression level, `0..=9`
    pub compression_level: i32,
    /// Target `(width, height)` to resample the developed image to
    pub resize: Option<(u32, u32)>,
    /// Exponent of the output transfer curve
    pub gamma: f64,
}

impl Default for RawDecodeParameters {
    fn default() -> Self {
        Self {
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            resize: None,
            gamma: DEFAULT_GAMMA,
        }
    }
}

impl RawDecodeParameters {
    pub fn builder() -> RawDecodeParametersBuilder {
        RawDecodeParametersBuilder::default()
    }

    /// Rejects out-of-domain values before any decode work starts.
    pub fn validate(&self) -> Result<()> {
        validate_compression_level(self.compression_level)?;

        if let Some((width, height)) = self.resize {
            if width == 0 || height == 0 {
                return Err(ConversionError::invalid_parameter(
                    "resize",
                    format!("dimensions must be positive, got {}x{}", width, height),
                ));
            }
        }

        if !self.gamma.is_finite() || self.gamma <= 0.0 {
            return Err(ConversionError::invalid_parameter(
                "gamma",
                format!("must be a positive number, got {}", self.gamma),
            ));
        }

        Ok(())
    }
}

/// Builder for RawDecodeParameters
#[derive(Default)]
pub struct RawDecodeParametersBuilder {
    compression_level: Option<i32>,
    resize: Option<Option<(u32, u32)>>,
    gamma: Option<f64>,
}

impl RawDecodeParametersBuilder {
    pub fn compression_level(mut self, level: i32) -> Self {
        self.compression_level = Some(level);
        self
    }
    
    pub fn resize(mut self, resize: Option<(u32, u32)>) -> Self {
        self.resize = Some(resize);
        self
    }
    
    pub fn gamma(mut self, gamma: f64) -> Self {
        self.gamma = Some(gamma);
        self
    }
    
    pub fn build(self) -> RawDecodeParameters {
        let default = RawDecodeParameters::default();
        RawDecodeParameters {
            compression_level: self.compression_level.unwrap_or(default.compression_level),
            resize: self.resize.unwrap_or(default.resize),
            gamma: self.gamma.unwrap_or(default.gamma),
        }
    }
}

/// Output color space of the develop step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputColorSpace {
    /// Camera native RGB, no color matrix applied
    Raw,
    #[default]
    Srgb,
}

/// Post-processing settings handed to the develop step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostProcessSettings {
    /// Apply the as-shot white balance recorded by the camera
    pub use_camera_wb: bool,
    /// Bin each 2x2 CFA cell into one pixel instead of demosaicing
    pub half_size: bool,
    /// Scale brightness so that 1% of samples clip
    pub auto_bright: bool,
    pub output_color: OutputColorSpace,
    /// Bits per output channel
    pub output_bps: u8,
    /// `(gamma, toe_slope)` of the output transfer curve
    pub gamma: (f64, f64),
}

impl Default for PostProcessSettings {
    fn default() -> Self {
        Self {
            use_camera_wb: true,
            half_size: false,
            auto_bright: false,
            output_color: OutputColorSpace::Srgb,
            output_bps: 8,
            gamma: (DEFAULT_GAMMA, DEFAULT_TOE_SLOPE),
        }
    }
}

impl PostProcessSettings {
    /// Settings for `params`: the fixed defaults with its gamma applied as
    /// `(gamma, 1.0)`.
    pub fn for_params(params: &RawDecodeParameters) -> Self {
        Self::default().with_gamma(params.gamma)
    }

    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma.0 = gamma;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.output_bps != 8 {
            return Err(ConversionError::invalid_parameter(
                "output_bps",
                format!("rasters are 8 bits per channel, got {}", self.output_bps),
            ));
        }
        let (gamma, toe_slope) = self.gamma;
        if !gamma.is_finite() || gamma <= 0.0 || !toe_slope.is_finite() || toe_slope < 0.0 {
            return Err(ConversionError::invalid_parameter(
                "gamma",
                format!("invalid curve ({}, {})", gamma, toe_slope),
            ));
        }
        Ok(())
    }
}
