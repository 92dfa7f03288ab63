//! Brightness, contrast and sharpness kernels
//!
//! All three are pure functions of the pixel buffer. Sharpness is sampled on a
//! fixed grid rather than convolved over the full frame; the stride and the
//! one-pixel border skip are part of the contract so scores stay comparable
//! between runs and against stored reference images.

use crate::PixelBuffer;
use serde::{Deserialize, Serialize};

/// Grid step, in pixels along each axis, for the sharpness estimator
pub const SHARPNESS_STRIDE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelStatistics {
    /// Mean per-pixel brightness (0.0 - 255.0)
    pub brightness: f64,
    /// Population standard deviation of per-pixel brightness
    pub contrast: f64,
    /// Mean sampled Laplacian magnitude on the red channel
    pub sharpness: f64,
}

impl PixelStatistics {
    pub fn compute(buffer: &PixelBuffer<'_>) -> Self {
        Self {
            brightness: brightness(buffer),
            contrast: contrast(buffer),
            sharpness: sharpness(buffer),
        }
    }
}

#[inline]
fn pixel_brightness(px: &[u8]) -> f64 {
    (px[0] as f64 + px[1] as f64 + px[2] as f64) / 3.0
}

/// Mean of `(R + G + B) / 3` over every pixel
pub fn brightness(buffer: &PixelBuffer<'_>) -> f64 {
    let pixels = buffer.pixel_count();
    if pixels == 0 {
        return 0.0;
    }

    let total: f64 = buffer
        .as_bytes()
        .chunks_exact(crate::CHANNELS)
        .map(pixel_brightness)
        .sum();

    total / pixels as f64
}

/// Standard deviation of per-pixel brightness around the image mean
pub fn contrast(buffer: &PixelBuffer<'_>) -> f64 {
    let pixels = buffer.pixel_count();
    if pixels == 0 {
        return 0.0;
    }

    let mean = brightness(buffer);
    let variance: f64 = buffer
        .as_bytes()
        .chunks_exact(crate::CHANNELS)
        .map(|px| (pixel_brightness(px) - mean).powi(2))
        .sum();

    (variance / pixels as f64).sqrt()
}

/// Mean of `|4c - t - b - l - r|` on the red channel, sampled every
/// [`SHARPNESS_STRIDE`] pixels with the outer border skipped.
///
/// Returns 0.0 when the grid contains no sample (either side shorter than 3px).
pub fn sharpness(buffer: &PixelBuffer<'_>) -> f64 {
    let width = buffer.width();
    let height = buffer.height();
    let mut total = 0.0;
    let mut count = 0usize;

    for y in (1..height.saturating_sub(1)).step_by(SHARPNESS_STRIDE) {
        for x in (1..width.saturating_sub(1)).step_by(SHARPNESS_STRIDE) {
            let center = buffer.red_at(x, y) as f64;
            let top = buffer.red_at(x, y - 1) as f64;
            let bottom = buffer.red_at(x, y + 1) as f64;
            let left = buffer.red_at(x - 1, y) as f64;
            let right = buffer.red_at(x + 1, y) as f64;

            total += (4.0 * center - top - bottom - left - right).abs();
            count += 1;
        }
    }

    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}
