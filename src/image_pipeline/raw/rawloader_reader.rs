//! RAW image reader implementation using the rawloader library.
//!
//! This module provides support for reading various RAW image formats (DNG, ARW, CR2, NEF, etc.)
//! using the rawloader library. It handles decoding RAW sensor data and extracting the metadata
//! the develop step needs: levels, white balance, color matrix and CFA layout.

use std::io::Cursor;

use tracing::debug;
use rawloader::{CFA, RawImageData as RawloaderImageData};
use crate::image_pipeline::common::error::{Result, ConversionError};
use crate::image_pipeline::raw::types::{CfaPattern, RawImageData};
use crate::image_pipeline::raw::reader::RawImageReader;

/// RAW image reader that uses the rawloader library for decoding.
///
/// This reader supports any Bayer or linear RAW format that rawloader can decode.
/// X-Trans and other non-2x2 mosaics are rejected.
pub struct RawLoaderReader;

/// Default bit depth when no white level information is available from the RAW file.
const DEFAULT_BITS_PER_SAMPLE: u32 = 16;

/// The bit width of the u16 data type, used for calculating actual bits per sample.
const U16_BITS: u32 = 16;

impl RawImageReader for RawLoaderReader {
    /// Reads and decodes RAW image data from a byte array.
    ///
    /// # Arguments
    ///
    /// * `data` - Raw bytes of the RAW image file
    ///
    /// # Returns
    ///
    /// * `Ok(RawImageData)` - Successfully decoded image with metadata
    /// * `Err(ConversionError::DecodeFailure)` - Failed to decode the RAW file
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rawsquare_rs::image_pipeline::raw::{RawImageReader, RawLoaderReader};
    ///
    /// let reader = RawLoaderReader;
    /// let raw_bytes = std::fs::read("image.dng").unwrap();
    /// let image_data = reader.read_raw(&raw_bytes).unwrap();
    /// ```
    fn read_raw(&self, data: &[u8]) -> Result<RawImageData> {
        debug!("Decoding RAW image, {} bytes", data.len());
        
        let decoded = rawloader::decode(&mut Cursor::new(data))
            .map_err(|e| ConversionError::DecodeFailure(e.to_string()))?;
        
        debug!(
            "Decoded image: {}x{} ({} cpp, {} {})",
            decoded.width, decoded.height, decoded.cpp, decoded.make, decoded.model
        );
        
        Sensor::from(decoded).into_raw_image()
    }
}

/// The parts of a decoded rawloader image the develop step uses.
pub(crate) struct Sensor {
    pub width: usize,
    pub height: usize,
    pub cpp: usize,
    pub data: RawloaderImageData,
    pub cfa: CFA,
    /// Masked border as (top, right, bottom, left)
    pub crops: [usize; 4],
    pub blacklevels: [u16; 4],
    pub whitelevels: [u16; 4],
    pub wb_coeffs: [f32; 4],
    pub xyz_to_cam: [[f32; 3]; 4],
}

impl From<rawloader::RawImage> for Sensor {
    fn from(decoded: rawloader::RawImage) -> Self {
        Self {
            width: decoded.width,
            height: decoded.height,
            cpp: decoded.cpp,
            data: decoded.data,
            cfa: decoded.cfa,
            crops: decoded.crops,
            blacklevels: decoded.blacklevels,
            whitelevels: decoded.whitelevels,
            wb_coeffs: decoded.wb_coeffs,
            xyz_to_cam: decoded.xyz_to_cam,
        }
    }
}

impl Sensor {
    /// Crops to the active area and converts samples and metadata.
    pub(crate) fn into_raw_image(self) -> Result<RawImageData> {
        let [top, right, bottom, left] = self.crops;
        let cpp = self.cpp;

        if cpp != 1 && cpp != 3 {
            return Err(ConversionError::UnsupportedFormat(format!("{} components per pixel", cpp)));
        }
        if left + right >= self.width || top + bottom >= self.height {
            return Err(ConversionError::DecodeFailure(format!(
                "crop {:?} leaves no active area in {}x{}",
                self.crops, self.width, self.height
            )));
        }
        let width = self.width - left - right;
        let height = self.height - top - bottom;

        // The mosaic phase is taken at the crop origin, so odd offsets stay correct
        let cfa = if cpp == 1 {
            let cell = [
                self.cfa.color_at(top, left),
                self.cfa.color_at(top, left + 1),
                self.cfa.color_at(top + 1, left),
                self.cfa.color_at(top + 1, left + 1),
            ];
            let pattern = CfaPattern::from_cell(cell).ok_or_else(|| {
                ConversionError::UnsupportedFormat(format!("CFA pattern '{}'", self.cfa.name))
            })?;
            Some(pattern)
        } else {
            None
        };

        // Integer data is cast directly, float data (normalized 0.0-1.0) is scaled to u16 range
        let (samples, float_data) = match self.data {
            RawloaderImageData::Integer(values) => (values, false),
            RawloaderImageData::Float(values) => (
                values.iter().map(|&v| (v.clamp(0.0, 1.0) * u16::MAX as f32) as u16).collect(),
                true,
            ),
        };
        if samples.len() != self.width * self.height * cpp {
            return Err(ConversionError::DecodeFailure(format!(
                "sample buffer holds {} values, expected {} for {}x{}x{}",
                samples.len(),
                self.width * self.height * cpp,
                self.width,
                self.height,
                cpp
            )));
        }

        let data = if self.crops == [0; 4] {
            samples
        } else {
            debug!("Cropping {}x{} to active area {}x{}", self.width, self.height, width, height);
            let row_len = self.width * cpp;
            samples
                .chunks_exact(row_len)
                .skip(top)
                .take(height)
                .flat_map(|row| row[left * cpp..(left + width) * cpp].iter().copied())
                .collect()
        };
        
        // The white level is the largest value the sensor produces, which gives
        // its real bit depth (4095 -> 12 bits, 16383 -> 14 bits).
        let max_white_level = self.whitelevels.iter().max().copied().unwrap_or(u16::MAX);
        let bits_per_sample = if float_data || max_white_level == 0 {
            DEFAULT_BITS_PER_SAMPLE
        } else {
            U16_BITS - max_white_level.leading_zeros()
        };
        
        debug!(
            "Calculated bits_per_sample: {} (max white level: {})",
            bits_per_sample, max_white_level
        );

        let (black_levels, white_levels) = if float_data {
            ([0; 4], [u16::MAX; 4])
        } else {
            (self.blacklevels, self.whitelevels)
        };

        let mut xyz_to_cam = [[0.0f32; 3]; 3];
        xyz_to_cam.copy_from_slice(&self.xyz_to_cam[..3]);
        let has_matrix = xyz_to_cam.iter().flatten().any(|&v| v != 0.0);
        
        Ok(RawImageData {
            width,
            height,
            data,
            cpp,
            bits_per_sample,
            cfa,
            black_levels,
            white_levels,
            wb_coeffs: self.wb_coeffs,
            xyz_to_cam: has_matrix.then_some(xyz_to_cam),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::debayer::cpu_debayer::white_balance;

    const MATRIX: [[f32; 3]; 4] = [
        [0.9, -0.2, -0.1],
        [-0.3, 1.2, 0.1],
        [0.0, 0.1, 0.6],
        [0.0, 0.0, 0.0],
    ];

    /// A 12-bit mosaic whose samples encode their own position.
    fn sensor(pattern: &str, width: usize, height: usize) -> Sensor {
        Sensor {
            width,
            height,
            cpp: 1,
            data: RawloaderImageData::Integer((0..(width * height) as u16).collect()),
            cfa: CFA::new(pattern),
            crops: [0; 4],
            blacklevels: [64, 64, 64, 64],
            whitelevels: [4095, 4095, 4095, 4095],
            wb_coeffs: [2.0, 1.0, 1.5, f32::NAN],
            xyz_to_cam: MATRIX,
        }
    }

    #[test]
    fn garbage_is_decode_failure() {
        let err = RawLoaderReader.read_raw(b"not a raw file at all").unwrap_err();
        assert!(matches!(err, ConversionError::DecodeFailure(_)));
    }

    #[test]
    fn empty_input_is_decode_failure() {
        let err = RawLoaderReader.read_raw(&[]).unwrap_err();
        assert!(matches!(err, ConversionError::DecodeFailure(_)));
    }

    #[test]
    fn detects_cfa_cell() {
        let rggb = sensor("RGGB", 4, 4).into_raw_image().unwrap();
        assert_eq!(rggb.cfa, Some(CfaPattern::Rggb));

        let grbg = sensor("GRBG", 4, 4).into_raw_image().unwrap();
        assert_eq!(grbg.cfa, Some(CfaPattern::Grbg));
    }

    #[test]
    fn passes_levels_and_metadata_through() {
        let image = sensor("RGGB", 4, 2).into_raw_image().unwrap();

        assert_eq!((image.width, image.height, image.cpp), (4, 2, 1));
        assert_eq!(image.data, (0..8).collect::<Vec<u16>>());
        assert_eq!(image.bits_per_sample, 12);
        assert_eq!(image.black_levels, [64; 4]);
        assert_eq!(image.white_levels, [4095; 4]);
        assert_eq!(image.wb_coeffs[..3], [2.0, 1.0, 1.5]);
        let matrix = image.xyz_to_cam.unwrap();
        assert_eq!(matrix[..], MATRIX[..3]);
    }

    #[test]
    fn all_zero_matrix_is_absent() {
        let mut raw = sensor("RGGB", 2, 2);
        raw.xyz_to_cam = [[0.0; 3]; 4];
        assert_eq!(raw.into_raw_image().unwrap().xyz_to_cam, None);
    }

    #[test]
    fn nan_white_balance_falls_back_to_unity() {
        let mut raw = sensor("RGGB", 2, 2);
        raw.wb_coeffs = [f32::NAN; 4];
        let image = raw.into_raw_image().unwrap();

        assert!(image.wb_coeffs.iter().all(|v| v.is_nan()));
        assert_eq!(white_balance(&image, true), [1.0; 3]);
    }

    #[test]
    fn float_samples_are_scaled_to_full_range() {
        let mut raw = sensor("RGGB", 2, 1);
        raw.data = RawloaderImageData::Float(vec![0.0, 1.0]);
        let image = raw.into_raw_image().unwrap();

        assert_eq!(image.data, vec![0, u16::MAX]);
        assert_eq!(image.bits_per_sample, 16);
        assert_eq!(image.black_levels, [0; 4]);
        assert_eq!(image.white_levels, [u16::MAX; 4]);
    }

    #[test]
    fn crops_to_active_area() {
        let mut raw = sensor("RGGB", 6, 5);
        // top, right, bottom, left
        raw.crops = [1, 2, 1, 1];
        let image = raw.into_raw_image().unwrap();

        assert_eq!((image.width, image.height), (3, 3));
        assert_eq!(image.data, vec![7, 8, 9, 13, 14, 15, 19, 20, 21]);
        assert_eq!(image.expected_len(), image.data.len());
    }

    #[test]
    fn odd_crop_offset_shifts_cfa_phase() {
        let mut raw = sensor("RGGB", 6, 6);
        raw.crops = [0, 0, 0, 1];
        assert_eq!(raw.into_raw_image().unwrap().cfa, Some(CfaPattern::Grbg));

        let mut raw = sensor("RGGB", 6, 6);
        raw.crops = [1, 1, 1, 1];
        assert_eq!(raw.into_raw_image().unwrap().cfa, Some(CfaPattern::Bggr));
    }

    #[test]
    fn crop_covering_sensor_is_rejected() {
        let mut raw = sensor("RGGB", 4, 4);
        raw.crops = [0, 2, 0, 2];
        assert!(matches!(raw.into_raw_image(), Err(ConversionError::DecodeFailure(_))));
    }

    #[test]
    fn short_buffer_is_rejected() {
        let mut raw = sensor("RGGB", 4, 4);
        raw.data = RawloaderImageData::Integer(vec![0; 15]);
        assert!(matches!(raw.into_raw_image(), Err(ConversionError::DecodeFailure(_))));
    }

    #[test]
    fn interleaved_rgb_has_no_cfa() {
        let mut raw = sensor("RGGB", 2, 2);
        raw.cpp = 3;
        raw.data = RawloaderImageData::Integer(vec![100; 12]);
        let image = raw.into_raw_image().unwrap();

        assert_eq!(image.cpp, 3);
        assert_eq!(image.cfa, None);
    }

    #[test]
    fn unsupported_components_are_rejected() {
        let mut raw = sensor("RGGB", 2, 2);
        raw.cpp = 2;
        assert!(matches!(raw.into_raw_image(), Err(ConversionError::UnsupportedFormat(_))));
    }
}
