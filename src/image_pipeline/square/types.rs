//! Squaring policy types

use std::fmt;
use std::str::FromStr;

use crate::image_pipeline::common::error::{ConversionError, Result};

/// Opaque white.
pub const DEFAULT_FILL_COLOR: [u8; 3] = [255, 255, 255];

/// Strategy for reaching a 1:1 aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SquareMethod {
    /// Composite onto a `max(w, h)` canvas; keeps every pixel
    #[default]
    Pad,
    /// Center crop to `min(w, h)`; may discard the longer axis margins
    Crop,
    /// Resample to `max(w, h)` on both axes; distorts aspect ratio
    Stretch,
}

impl SquareMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pad => "pad",
            Self::Crop => "crop",
            Self::Stretch => "stretch",
        }
    }
}

impl fmt::Display for SquareMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SquareMethod {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pad" => Ok(Self::Pad),
            "crop" => Ok(Self::Crop),
            "stretch" => Ok(Self::Stretch),
            other => Err(ConversionError::InvalidPolicy(other.to_string())),
        }
    }
}

/// How a raster is brought to a square aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionPolicy {
    pub method: SquareMethod,
    /// Canvas color, only read by [`SquareMethod::Pad`]
    pub fill_color: [u8; 3],
}

impl Default for ConversionPolicy {
    fn default() -> Self {
        Self {
            method: SquareMethod::default(),
            fill_color: DEFAULT_FILL_COLOR,
        }
    }
}

impl ConversionPolicy {
    /// Parses `method`, rejecting anything but `pad`, `crop` or `stretch`.
    pub fn new(method: &str, fill_color: [u8; 3]) -> Result<Self> {
        Ok(Self {
            method: method.parse()?,
            fill_color,
        })
    }

    pub fn pad(fill_color: [u8; 3]) -> Self {
        Self { method: SquareMethod::Pad, fill_color }
    }

    pub fn crop() -> Self {
        Self { method: SquareMethod::Crop, ..Self::default() }
    }

    pub fn stretch() -> Self {
        Self { method: SquareMethod::Stretch, ..Self::default() }
    }
}

/// Parses a fill color written as `R,G,B` or `#RRGGBB`.
pub fn parse_fill_color(s: &str) -> Result<[u8; 3]> {
    let s = s.trim();
    let invalid =
        || ConversionError::invalid_parameter("fill_color", format!("cannot parse '{}'", s));

    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        return Ok([channel(0)?, channel(2)?, channel(4)?]);
    }

    let channels: Vec<&str> = s.split(',').map(str::trim).collect();
    if channels.len() != 3 {
        return Err(invalid());
    }
    let mut color = [0u8; 3];
    for (slot, value) in color.iter_mut().zip(&channels) {
        *slot = value.parse().map_err(|_| invalid())?;
    }
    Ok(color)
}
