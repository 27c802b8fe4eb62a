//! Image processing pipeline module
//!
//! This module provides a structured approach to square normalization of
//! images, with separate modules for raster loading, RAW decoding, raster
//! encoding and batch orchestration.

pub mod common;
pub mod raster;
pub mod square;
pub mod raw;
pub mod debayer;
pub mod encode;
pub mod conversions;

pub use common::{
    ConversionError,
    PipelineTimings,
    Result,
};

pub use raster::{
    ColorMode,
    RasterImage,
    RasterLoader,
    is_supported_format,
};

pub use square::{
    ConversionPolicy,
    SquareMethod,
    SquareNormalizer,
    normalize,
};

pub use raw::{
    PostProcessSettings,
    RawDecodeParameters,
    RawDecodeParametersBuilder,
    RawDecoder,
    RawImageData,
    RawImageReader,
    RawLoaderReader,
};

pub use encode::{
    EncodeOptions,
    OutputFormat,
    RasterWriter,
};

pub use conversions::{
    BatchConverter,
    BatchOptions,
    BatchResult,
    BatchRunner,
    square_file,
};
