//! Collecting image paths from command-line arguments

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub const IMAGE_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "webp", "gif", "bmp", "tiff"];

pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Expand the given paths into image files. Files are taken as given (in
/// argument order); directories contribute their supported images, sorted,
/// without recursing.
pub fn collect_image_paths(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();

    for path in paths {
        if path.is_dir() {
            let mut found = Vec::new();
            for entry in std::fs::read_dir(path)
                .with_context(|| format!("Failed to read directory {}", path.display()))?
            {
                let entry_path = entry?.path();
                if entry_path.is_file() && is_supported_image(&entry_path) {
                    found.push(entry_path);
                }
            }
            found.sort();
            images.extend(found);
        } else if path.is_file() {
            images.push(path.clone());
        } else {
            return Err(anyhow::anyhow!("Path does not exist: {}", path.display()));
        }
    }

    Ok(images)
}
