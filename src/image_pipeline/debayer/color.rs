use anyhow::{Result, bail};
use tracing::{debug, warn};
use crate::image_pipeline::debayer::{GammaCurve, RgbImageData};
use crate::image_pipeline::raw::{OutputColorSpace, PostProcessSettings};

/// Linear sRGB (D65) to XYZ.
const SRGB_TO_XYZ: [[f32; 3]; 3] = [
    [0.412453, 0.357580, 0.180423],
    [0.212671, 0.715160, 0.072169],
    [0.019334, 0.119193, 0.950227],
];

const IDENTITY: [[f32; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Fraction of samples allowed to clip when auto-brightening.
const AUTO_BRIGHT_CLIP: f64 = 0.01;

const HISTOGRAM_BINS: usize = 4096;

/// Camera RGB to linear sRGB matrix for a camera's XYZ to camera matrix.
///
/// Rows of the camera to sRGB-primaries product are normalized to sum to one
/// so that white-balanced neutrals stay neutral. Returns `None` for singular
/// or degenerate matrices.
pub fn camera_to_srgb(xyz_to_cam: &[[f32; 3]; 3]) -> Option<[[f32; 3]; 3]> {
    let mut cam_rgb = [[0.0f32; 3]; 3];
    for r in 0..3 {
        for c in 0..3 {
            cam_rgb[r][c] = (0..3).map(|k| xyz_to_cam[r][k] * SRGB_TO_XYZ[k][c]).sum();
        }
    }

    for row in cam_rgb.iter_mut() {
        let sum: f32 = row.iter().sum();
        if sum.abs() < f32::EPSILON {
            return None;
        }
        for value in row.iter_mut() {
            *value /= sum;
        }
    }

    invert(&cam_rgb)
}

fn invert(m: &[[f32; 3]; 3]) -> Option<[[f32; 3]; 3]> {
    let det = m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0]);
    if det.abs() < 1e-9 || !det.is_finite() {
        return None;
    }

    let inv_det = 1.0 / det;
    Some([
        [
            (m[1][1] * m[2][2] - m[1][2] * m[2][1]) * inv_det,
            (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * inv_det,
            (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * inv_det,
        ],
        [
            (m[1][2] * m[2][0] - m[1][0] * m[2][2]) * inv_det,
            (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * inv_det,
            (m[0][2] * m[1][0] - m[0][0] * m[1][2]) * inv_det,
        ],
        [
            (m[1][0] * m[2][1] - m[1][1] * m[2][0]) * inv_det,
            (m[0][1] * m[2][0] - m[0][0] * m[2][1]) * inv_det,
            (m[0][0] * m[1][1] - m[0][1] * m[1][0]) * inv_det,
        ],
    ])
}

/// Converts linear camera RGB to interleaved 8-bit output.
///
/// Order: color matrix, optional auto-bright, transfer curve, quantization.
pub fn render_rgb8(
    rgb: &RgbImageData,
    xyz_to_cam: Option<&[[f32; 3]; 3]>,
    settings: &PostProcessSettings,
) -> Result<Vec<u8>> {
    if rgb.data.len() != rgb.width * rgb.height * 3 {
        bail!(
            "RGB buffer holds {} samples, expected {} for {}x{}",
            rgb.data.len(),
            rgb.width * rgb.height * 3,
            rgb.width,
            rgb.height
        );
    }

    let matrix = match settings.output_color {
        OutputColorSpace::Raw => IDENTITY,
        OutputColorSpace::Srgb => match xyz_to_cam.and_then(camera_to_srgb) {
            Some(matrix) => matrix,
            None => {
                warn!("No usable camera color matrix, treating camera RGB as sRGB");
                IDENTITY
            }
        },
    };

    let max_value = ((1u32 << rgb.bits_per_sample.clamp(1, 16)) - 1) as f32;
    let mut linear: Vec<f32> = Vec::with_capacity(rgb.data.len());
    for pixel in rgb.data.chunks_exact(3) {
        let cam = [
            pixel[0] as f32 / max_value,
            pixel[1] as f32 / max_value,
            pixel[2] as f32 / max_value,
        ];
        for row in &matrix {
            let value = row[0] * cam[0] + row[1] * cam[1] + row[2] * cam[2];
            linear.push(value.clamp(0.0, 1.0));
        }
    }

    let brightness = if settings.auto_bright {
        auto_bright_scale(&linear)
    } else {
        1.0
    };
    debug!("Brightness scale: {:.3}", brightness);

    let (gamma, toe_slope) = settings.gamma;
    let lut = GammaCurve::new(gamma, toe_slope).lut_u16_to_u8();

    Ok(linear
        .iter()
        .map(|&value| {
            let index = ((value * brightness).min(1.0) * u16::MAX as f32).round() as usize;
            lut[index]
        })
        .collect())
}

/// Scale that maps the level exceeded by [`AUTO_BRIGHT_CLIP`] of the samples
/// in the brightest channel to white.
fn auto_bright_scale(linear: &[f32]) -> f32 {
    let pixels = linear.len() / 3;
    if pixels == 0 {
        return 1.0;
    }
    let allowed = (pixels as f64 * AUTO_BRIGHT_CLIP) as usize;

    let mut white_bin = 0usize;
    for channel in 0..3 {
        let mut histogram = vec![0usize; HISTOGRAM_BINS];
        for value in linear.iter().skip(channel).step_by(3) {
            let bin = (value * (HISTOGRAM_BINS - 1) as f32).round() as usize;
            histogram[bin.min(HISTOGRAM_BINS - 1)] += 1;
        }

        let mut total = 0usize;
        let mut bin = HISTOGRAM_BINS - 1;
        while bin > 0 {
            total += histogram[bin];
            if total > allowed {
                break;
            }
            bin -= 1;
        }
        white_bin = white_bin.max(bin);
    }

    if white_bin == 0 {
        1.0
    } else {
        (HISTOGRAM_BINS - 1) as f32 / white_bin as f32
    }
}
