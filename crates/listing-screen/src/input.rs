//! Per-image input for batch analysis

use image::RgbaImage;
use pixel_stats::{decode_file, DecodedImage};
use std::path::Path;
use tracing::warn;

use crate::config::AnalysisConfig;

/// One photo as handed to the analyzer. `pixels` is `None` when the upstream
/// decode failed; such inputs are scored as the unreadable sentinel.
#[derive(Debug, Clone)]
pub struct ImageInput {
    pub pixels: Option<DecodedImage>,
    pub file_size_bytes: u64,
    pub filename: String,
}

impl ImageInput {
    pub fn from_rgba(rgba: RgbaImage, file_size_bytes: u64, filename: impl Into<String>) -> Self {
        Self::from_decoded(DecodedImage::from_rgba(rgba), file_size_bytes, filename)
    }

    pub fn from_decoded(decoded: DecodedImage, file_size_bytes: u64, filename: impl Into<String>) -> Self {
        Self {
            pixels: Some(decoded),
            file_size_bytes,
            filename: filename.into(),
        }
    }

    pub fn unreadable(file_size_bytes: u64, filename: impl Into<String>) -> Self {
        Self {
            pixels: None,
            file_size_bytes,
            filename: filename.into(),
        }
    }

    /// Load and decode a file. Never fails: read or decode errors are logged
    /// and produce an unreadable input.
    pub fn from_file<P: AsRef<Path>>(path: P, config: &AnalysisConfig) -> Self {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file_size_bytes = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);

        match decode_file(path, config.max_analysis_dimension) {
            Ok(decoded) => Self::from_decoded(decoded, file_size_bytes, filename),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not decode image");
                Self::unreadable(file_size_bytes, filename)
            }
        }
    }
}
