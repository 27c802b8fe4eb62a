//! Square normalization module
//!
//! Turns an arbitrary-aspect raster into a 1:1 raster by padding, center
//! cropping or stretching.

mod normalizer;
pub mod types;

#[cfg(test)]
mod tests;

pub use normalizer::{SquareNormalizer, normalize};
pub use types::{ConversionPolicy, DEFAULT_FILL_COLOR, SquareMethod, parse_fill_color};
