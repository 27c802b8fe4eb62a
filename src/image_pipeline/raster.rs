//! In-memory raster module
//!
//! This module holds the canonical 8-bit RGB raster type, the explicit
//! color-mode normalization step and loading of encoded images from disk.

mod color;
mod loader;
mod resample;
pub mod types;

pub use color::{ColorMode, normalize_color_mode};
pub use loader::{RasterLoader, SUPPORTED_FORMATS, is_supported_format};
pub use resample::{RESAMPLE_FILTER, resample};
pub use types::{RasterImage, RGB_CHANNELS};
