//! Debayering module for converting Bayer pattern RAW images to RGB
//!
//! The CPU debayer produces linear camera RGB; the color stage turns that into
//! display-referred 8-bit sRGB.

pub mod color;
pub mod cpu_debayer;
pub mod gamma;
pub mod types;

pub use color::{camera_to_srgb, render_rgb8};
pub use cpu_debayer::CpuDebayer;
pub use gamma::GammaCurve;
pub use types::RgbImageData;
