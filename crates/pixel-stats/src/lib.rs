//! Pixel statistics library for listing photo screening
//!
//! This crate owns the one hard contract with the upstream decoder: a borrowed,
//! row-major RGBA8 pixel buffer. On top of it sit the numeric kernels
//! (brightness, contrast, sharpness), the colour quantisation shared by the
//! screenshot heuristics, and a small decode pipeline that turns files or
//! bytes into an analysis-sized buffer.
//!
//! # Features
//!
//! - **Borrowed buffers**: analysis never copies or mutates caller pixels
//! - **Sampled kernels**: fixed strides keep numbers comparable across runs
//! - **Analysis downscale**: long edge capped (1000px by default) before measuring

pub mod decode;
pub mod palette;
pub mod stats;

pub use decode::{decode_bytes, decode_file, DecodeError, DecodedImage, DEFAULT_MAX_DIMENSION};
pub use palette::QuantizedColor;
pub use stats::{brightness, contrast, sharpness, PixelStatistics, SHARPNESS_STRIDE};

use image::RgbaImage;
use thiserror::Error;

/// Number of interleaved channels per pixel (R, G, B, A)
pub const CHANNELS: usize = 4;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PixelBufferError {
    #[error("pixel buffer length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("image dimensions {width}x{height} overflow addressable memory")]
    DimensionOverflow { width: u32, height: u32 },
}

/// Read-only view over a decoded RGBA8 raster, row-major
#[derive(Debug, Clone, Copy)]
pub struct PixelBuffer<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
}

impl PixelBuffer<'static> {
    /// A 0x0 buffer; every statistic over it is zero
    pub const fn empty() -> Self {
        Self {
            data: &[],
            width: 0,
            height: 0,
        }
    }
}

impl<'a> PixelBuffer<'a> {
    /// Wrap raw RGBA bytes, checking the length against the dimensions
    pub fn new(data: &'a [u8], width: u32, height: u32) -> Result<Self, PixelBufferError> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(CHANNELS))
            .ok_or(PixelBufferError::DimensionOverflow { width, height })?;

        if data.len() != expected {
            return Err(PixelBufferError::LengthMismatch {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self { data, width, height })
    }

    /// Borrow an already-decoded `image` raster
    pub fn from_rgba(image: &'a RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            data: image.as_raw(),
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.data.len() / CHANNELS
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The flattened channel bytes
    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// RGB triple of the pixel at `(x, y)`; panics when out of bounds
    pub fn rgb_at(&self, x: u32, y: u32) -> [u8; 3] {
        let i = self.offset(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Red channel of the pixel at `(x, y)`; panics when out of bounds
    pub fn red_at(&self, x: u32, y: u32) -> u8 {
        self.data[self.offset(x, y)]
    }
}

impl<'a> From<&'a RgbaImage> for PixelBuffer<'a> {
    fn from(image: &'a RgbaImage) -> Self {
        Self::from_rgba(image)
    }
}
