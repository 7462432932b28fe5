use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{DynamicImage, RgbImage};

/// Open and decode an image, with a readable error for missing or
/// undecodable files.
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).with_context(|| {
        if !path.exists() {
            format!("file not found: {}", path.display())
        } else {
            format!(
                "unsupported or corrupt image: {}. Supported formats: PNG, JPEG, WebP, BMP, TIFF, GIF",
                path.display()
            )
        }
    })
}

/// Encode `image` to `path`; the format follows the file extension.
pub fn save_image(image: &RgbImage, path: &Path) -> Result<()> {
    image
        .save(path)
        .with_context(|| format!("failed to write image to {}", path.display()))
}

/// `<dir>/<stem>-<palette>.png` next to `input`.
pub fn default_output_path(input: &Path, palette: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    input.with_file_name(format!("{stem}-{palette}.png"))
}
