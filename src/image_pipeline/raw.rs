//! RAW image reading module
//!
//! This module provides format-agnostic RAW image reading capabilities and the
//! decoder that develops sensor data into an 8-bit sRGB raster.

mod decoder;
mod reader;
mod rawloader_reader;
pub mod params;
pub mod types;


pub use decoder::RawDecoder;
pub use reader::RawImageReader;
pub use rawloader_reader::RawLoaderReader;
pub use params::{
    OutputColorSpace, PostProcessSettings, RawDecodeParameters, RawDecodeParametersBuilder,
};
pub use types::{CfaPattern, RawImageData};
