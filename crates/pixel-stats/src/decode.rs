//! Decode pipeline: file or bytes to an analysis-sized RGBA buffer
//!
//! Photos are measured at a bounded size. The long edge is scaled down to
//! `max_dimension` (never up) before statistics are taken, while the
//! original dimensions are kept for resolution checks.

use image::{imageops::FilterType, DynamicImage, GenericImageView, ImageReader, RgbaImage};
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::PixelBuffer;

/// Long-edge cap applied before measuring
pub const DEFAULT_MAX_DIMENSION: u32 = 1000;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("decoded image has no pixels")]
    EmptyImage,
}

/// A decoded raster plus the dimensions it had before analysis downscaling
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub rgba: RgbaImage,
    pub original_width: u32,
    pub original_height: u32,
}

impl DecodedImage {
    /// Wrap a raster that was not resized
    pub fn from_rgba(rgba: RgbaImage) -> Self {
        let (original_width, original_height) = rgba.dimensions();
        Self {
            rgba,
            original_width,
            original_height,
        }
    }

    pub fn buffer(&self) -> PixelBuffer<'_> {
        PixelBuffer::from_rgba(&self.rgba)
    }
}

/// Decode an image file, downscaling to `max_dimension` when given
pub fn decode_file(path: &Path, max_dimension: Option<u32>) -> Result<DecodedImage, DecodeError> {
    let img = ImageReader::open(path)
        .map_err(|source| DecodeError::Io {
            path: path.display().to_string(),
            source,
        })?
        .with_guessed_format()
        .map_err(|source| DecodeError::Io {
            path: path.display().to_string(),
            source,
        })?
        .decode()?;

    debug!(path = %path.display(), width = img.width(), height = img.height(), "decoded image");
    prepare(img, max_dimension)
}

/// Decode an in-memory encoded image, downscaling to `max_dimension` when given
pub fn decode_bytes(bytes: &[u8], max_dimension: Option<u32>) -> Result<DecodedImage, DecodeError> {
    let img = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|source| DecodeError::Io {
            path: "<memory>".to_string(),
            source,
        })?
        .decode()?;

    prepare(img, max_dimension)
}

fn prepare(img: DynamicImage, max_dimension: Option<u32>) -> Result<DecodedImage, DecodeError> {
    let (original_width, original_height) = img.dimensions();
    if original_width == 0 || original_height == 0 {
        return Err(DecodeError::EmptyImage);
    }

    let rgba = match max_dimension {
        Some(max_dim) => downscale(img, max_dim),
        None => img,
    }
    .to_rgba8();

    Ok(DecodedImage {
        rgba,
        original_width,
        original_height,
    })
}

/// Target size for analysis: `floor(side * min(1, max_dim / long_edge))`, at least 1px
pub fn analysis_dimensions(width: u32, height: u32, max_dim: u32) -> (u32, u32) {
    let long_edge = width.max(height);
    if long_edge <= max_dim || long_edge == 0 {
        return (width, height);
    }

    let scale = |side: u32| ((side as u64 * max_dim as u64 / long_edge as u64) as u32).max(1);
    (scale(width), scale(height))
}

fn downscale(img: DynamicImage, max_dim: u32) -> DynamicImage {
    let (width, height) = img.dimensions();
    let (new_width, new_height) = analysis_dimensions(width, height, max_dim);

    if (new_width, new_height) == (width, height) {
        return img;
    }

    img.resize_exact(new_width, new_height, FilterType::Triangle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::fs;
    use tempfile::tempdir;

    fn encode_png(img: &RgbaImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(img.clone())
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_analysis_dimensions() {
        assert_eq!(analysis_dimensions(2000, 1000, 1000), (1000, 500));
        assert_eq!(analysis_dimensions(1000, 3000, 1000), (333, 1000));
        assert_eq!(analysis_dimensions(1200, 1200, 1000), (1000, 1000));
        // Never upscale
        assert_eq!(analysis_dimensions(640, 480, 1000), (640, 480));
        // Extreme panoramas keep at least one row
        assert_eq!(analysis_dimensions(5000, 1, 1000), (1000, 1));
    }

    #[test]
    fn test_decode_bytes_keeps_original_dimensions() {
        let img = RgbaImage::from_pixel(1500, 300, Rgba([10, 20, 30, 255]));
        let decoded = decode_bytes(&encode_png(&img), Some(1000)).unwrap();

        assert_eq!((decoded.original_width, decoded.original_height), (1500, 300));
        assert_eq!(decoded.rgba.dimensions(), (1000, 200));
        assert_eq!(decoded.buffer().rgb_at(0, 0), [10, 20, 30]);
    }

    #[test]
    fn test_decode_without_limit() {
        let img = RgbaImage::from_pixel(1500, 300, Rgba([0, 0, 0, 255]));
        let decoded = decode_bytes(&encode_png(&img), None).unwrap();
        assert_eq!(decoded.rgba.dimensions(), (1500, 300));
    }

    #[test]
    fn test_decode_file() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("photo.png");
        fs::write(&file_path, encode_png(&RgbaImage::from_pixel(8, 8, Rgba([1, 2, 3, 255])))).unwrap();

        let decoded = decode_file(&file_path, Some(DEFAULT_MAX_DIMENSION)).unwrap();
        assert_eq!(decoded.rgba.dimensions(), (8, 8));
    }

    #[test]
    fn test_decode_failures() {
        assert!(matches!(decode_bytes(b"not an image", None), Err(DecodeError::Image(_))));

        let temp_dir = tempdir().unwrap();
        let missing = temp_dir.path().join("missing.jpg");
        assert!(matches!(decode_file(&missing, None), Err(DecodeError::Io { .. })));
    }
}
