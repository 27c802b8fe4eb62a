//! Types for debayering operations

/// RGB image data after debayering
#[derive(Debug, Clone)]
pub struct RgbImageData {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Linear camera RGB, interleaved [R, G, B, R, G, B, ...]
    pub data: Vec<u16>,
    /// Bits per sample of `data`
    pub bits_per_sample: u32,
}
