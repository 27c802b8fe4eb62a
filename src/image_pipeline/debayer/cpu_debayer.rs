use anyhow::{Result, anyhow, bail};
use tracing::{debug, info};
use std::io::Cursor;
use bayer::{BayerDepth, CFA, Demosaic, RasterDepth, RasterMut};
use crate::image_pipeline::debayer::RgbImageData;
use crate::image_pipeline::raw::types::{BLUE, GREEN, RED};
use crate::image_pipeline::raw::{CfaPattern, PostProcessSettings, RawImageData};

/// Full-scale value of a normalized 16-bit sample.
const FULL_SCALE: f32 = u16::MAX as f32;

pub struct CpuDebayer;

impl Default for CpuDebayer {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuDebayer {
    pub fn new() -> Self {
        Self
    }

    /// Normalizes levels, applies white balance and interpolates the mosaic
    /// into linear 16-bit camera RGB.
    pub fn process(
        &self,
        raw_image: &RawImageData,
        settings: &PostProcessSettings,
    ) -> Result<RgbImageData> {
        let width = raw_image.width;
        let height = raw_image.height;
        if width == 0 || height == 0 {
            bail!("RAW image has empty dimensions {}x{}", width, height);
        }
        if raw_image.data.len() != raw_image.expected_len() {
            bail!(
                "RAW buffer holds {} samples, expected {} for {}x{}x{}",
                raw_image.data.len(),
                raw_image.expected_len(),
                width,
                height,
                raw_image.cpp
            );
        }

        let multipliers = white_balance(raw_image, settings.use_camera_wb);
        debug!("White balance multipliers: {:?}", multipliers);

        match (raw_image.cpp, raw_image.cfa) {
            (1, Some(cfa)) => {
                let scaled = scale_samples(raw_image, Some(cfa), &multipliers);
                if settings.half_size {
                    bin_mosaic(&scaled, width, height, cfa)
                } else {
                    demosaic(&scaled, width, height, cfa)
                }
            }
            (1, None) => bail!("Mosaic RAW image has no CFA pattern"),
            (3, _) => {
                let scaled = scale_samples(raw_image, None, &multipliers);
                if settings.half_size {
                    bin_rgb(&scaled, width, height)
                } else {
                    Ok(RgbImageData { width, height, data: scaled, bits_per_sample: 16 })
                }
            }
            (cpp, _) => bail!("Unsupported components per pixel: {}", cpp),
        }
    }
}

/// Green-normalized R, G, B multipliers. Missing or non-positive camera
/// coefficients fall back to unity.
pub(crate) fn white_balance(raw_image: &RawImageData, use_camera_wb: bool) -> [f32; 3] {
    if !use_camera_wb {
        return [1.0; 3];
    }
    let [r, g, b, _] = raw_image.wb_coeffs;
    let usable = |v: f32| v.is_finite() && v > 0.0;
    if !(usable(r) && usable(g) && usable(b)) {
        debug!("No usable as-shot white balance, using unit multipliers");
        return [1.0; 3];
    }
    [r / g, 1.0, b / g]
}

/// Subtracts black, scales each channel's range to 16 bits and applies the
/// white balance; samples that balance past white are clipped.
fn scale_samples(
    raw_image: &RawImageData,
    cfa: Option<CfaPattern>,
    multipliers: &[f32; 3],
) -> Vec<u16> {
    let width = raw_image.width;
    let cpp = raw_image.cpp;

    raw_image
        .data
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let channel = match cfa {
                Some(cfa) => {
                    let pixel = i / cpp;
                    cfa.color_at(pixel / width, pixel % width)
                }
                None => i % cpp,
            };
            let black = raw_image.black_levels[channel] as f32;
            let white = raw_image.white_levels[channel] as f32;
            let range = (white - black).max(1.0);
            let balanced = (value as f32 - black).max(0.0) / range * multipliers[channel];
            let normalized = balanced.min(1.0);
            (normalized * FULL_SCALE).round() as u16
        })
        .collect()
}

fn to_bayer_cfa(cfa: CfaPattern) -> CFA {
    match cfa {
        CfaPattern::Rggb => CFA::RGGB,
        CfaPattern::Bggr => CFA::BGGR,
        CfaPattern::Grbg => CFA::GRBG,
        CfaPattern::Gbrg => CFA::GBRG,
    }
}

fn demosaic(samples: &[u16], width: usize, height: usize, cfa: CfaPattern) -> Result<RgbImageData> {
    info!("Starting CPU debayering for image {}x{}", width, height);

    let bayer_bytes: Vec<u8> = samples.iter().flat_map(|&val| val.to_le_bytes()).collect();

    // Output raster is interleaved RGB at the input depth of 16 bits
    let output_buf_size = width * height * 3 * 2;
    let mut output_buf = vec![0u8; output_buf_size];

    let mut cursor = Cursor::new(&bayer_bytes[..]);

    debug!("Running demosaic with depth=Depth16LE, CFA={:?}, algo=Linear", cfa);

    {
        let mut output_raster =
            RasterMut::new(width, height, RasterDepth::Depth16, &mut output_buf);
        bayer::run_demosaic(
            &mut cursor,
            BayerDepth::Depth16LE,
            to_bayer_cfa(cfa),
            Demosaic::Linear,
            &mut output_raster,
        )
        .map_err(|e| anyhow!("Demosaic failed: {:?}", e))?;
    }

    // The raster stores 16-bit samples in native byte order
    let data = output_buf
        .chunks_exact(2)
        .map(|bytes| u16::from_ne_bytes([bytes[0], bytes[1]]))
        .collect();

    Ok(RgbImageData { width, height, data, bits_per_sample: 16 })
}

/// Collapses each 2x2 CFA cell into one RGB pixel, averaging the greens.
fn bin_mosaic(
    samples: &[u16],
    width: usize,
    height: usize,
    cfa: CfaPattern,
) -> Result<RgbImageData> {
    let (out_width, out_height) = (width / 2, height / 2);
    if out_width == 0 || out_height == 0 {
        bail!("Cannot half-size a {}x{} mosaic", width, height);
    }
    info!("Binning mosaic {}x{} -> {}x{}", width, height, out_width, out_height);

    let mut data = Vec::with_capacity(out_width * out_height * 3);
    for y in 0..out_height {
        for x in 0..out_width {
            let mut sums = [0u32; 3];
            let mut counts = [0u32; 3];
            for (dy, dx) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
                let (row, col) = (y * 2 + dy, x * 2 + dx);
                let channel = cfa.color_at(row, col);
                sums[channel] += samples[row * width + col] as u32;
                counts[channel] += 1;
            }
            for channel in [RED, GREEN, BLUE] {
                data.push((sums[channel] / counts[channel].max(1)) as u16);
            }
        }
    }

    Ok(RgbImageData { width: out_width, height: out_height, data, bits_per_sample: 16 })
}

/// Averages each 2x2 block of an interleaved RGB image.
fn bin_rgb(samples: &[u16], width: usize, height: usize) -> Result<RgbImageData> {
    let (out_width, out_height) = (width / 2, height / 2);
    if out_width == 0 || out_height == 0 {
        bail!("Cannot half-size a {}x{} image", width, height);
    }

    let mut data = Vec::with_capacity(out_width * out_height * 3);
    for y in 0..out_height {
        for x in 0..out_width {
            for channel in 0..3 {
                let sum: u32 = [(0, 0), (0, 1), (1, 0), (1, 1)]
                    .iter()
                    .map(|&(dy, dx)| {
                        samples[((y * 2 + dy) * width + x * 2 + dx) * 3 + channel] as u32
                    })
                    .sum();
                data.push((sum / 4) as u16);
            }
        }
    }

    Ok(RgbImageData { width: out_width, height: out_height, data, bits_per_sample: 16 })
}
