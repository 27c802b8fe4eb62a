//! RAW image data types

/// Color filter array layout of the top-left 2x2 cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CfaPattern {
    Rggb,
    Bggr,
    Grbg,
    Gbrg,
}

/// Channel index of red samples.
pub const RED: usize = 0;
/// Channel index of green samples.
pub const GREEN: usize = 1;
/// Channel index of blue samples.
pub const BLUE: usize = 2;

impl CfaPattern {
    /// Identifies the pattern from the channel of each sample in the top-left
    /// 2x2 cell, listed row by row.
    pub fn from_cell(cell: [usize; 4]) -> Option<Self> {
        match cell {
            [RED, GREEN, GREEN, BLUE] => Some(Self::Rggb),
            [BLUE, GREEN, GREEN, RED] => Some(Self::Bggr),
            [GREEN, RED, BLUE, GREEN] => Some(Self::Grbg),
            [GREEN, BLUE, RED, GREEN] => Some(Self::Gbrg),
            _ => None,
        }
    }

    /// Channel of the sample at `(row, col)`.
    pub fn color_at(self, row: usize, col: usize) -> usize {
        let cell = match self {
            Self::Rggb => [RED, GREEN, GREEN, BLUE],
            Self::Bggr => [BLUE, GREEN, GREEN, RED],
            Self::Grbg => [GREEN, RED, BLUE, GREEN],
            Self::Gbrg => [GREEN, BLUE, RED, GREEN],
        };
        cell[(row % 2) * 2 + col % 2]
    }
}

/// Represents decoded RAW image data
#[derive(Debug, Clone)]
pub struct RawImageData {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Raw samples, `cpp` per pixel (single channel Bayer mosaic when `cpp == 1`)
    pub data: Vec<u16>,
    /// Components per pixel: 1 for a mosaic, 3 for already-interpolated RGB
    pub cpp: usize,
    /// Actual bits per sample from the sensor (e.g., 12, 14, or 16)
    pub bits_per_sample: u32,
    /// Mosaic layout, required when `cpp == 1`
    pub cfa: Option<CfaPattern>,
    /// Per-channel black level (R, G, B, E)
    pub black_levels: [u16; 4],
    /// Per-channel white level (R, G, B, E)
    pub white_levels: [u16; 4],
    /// As-shot white balance multipliers (R, G, B, E); non-finite when unknown
    pub wb_coeffs: [f32; 4],
    /// XYZ to camera color matrix, when the camera is known
    pub xyz_to_cam: Option<[[f32; 3]; 3]>,
}

impl RawImageData {
    /// A Bayer mosaic with zero black level, a white level implied by
    /// `bits_per_sample`, unit white balance and no color matrix.
    pub fn mosaic(
        width: usize,
        height: usize,
        data: Vec<u16>,
        bits_per_sample: u32,
        cfa: CfaPattern,
    ) -> Self {
        let white = white_level_for_bits(bits_per_sample);
        Self {
            width,
            height,
            data,
            cpp: 1,
            bits_per_sample,
            cfa: Some(cfa),
            black_levels: [0; 4],
            white_levels: [white; 4],
            wb_coeffs: [1.0; 4],
            xyz_to_cam: None,
        }
    }

    pub fn expected_len(&self) -> usize {
        self.width * self.height * self.cpp
    }
}

/// Largest sample value representable with `bits` bits (clamped to 1..=16).
pub fn white_level_for_bits(bits: u32) -> u16 {
    let bits = bits.clamp(1, 16);
    ((1u32 << bits) - 1) as u16
}
