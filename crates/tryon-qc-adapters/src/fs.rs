//! Filesystem adapter for loading and saving pipeline images.

use std::path::Path;

use anyhow::{Context, Result};
use image::{ImageFormat, RgbImage};
use tracing::debug;

use tryon_qc_core::PipelineError;

/// Supported raster extensions for pipeline inputs.
const RASTER_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp"];

/// Decodes raw bytes into a 3-channel image.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidImage`] for undecodable bytes. This is
/// the fatal malformed-input path: it is surfaced immediately and never
/// enters the retry loop.
pub fn decode_rgb(bytes: &[u8]) -> Result<RgbImage, PipelineError> {
    image::load_from_memory(bytes)
        .map(|decoded| decoded.to_rgb8())
        .map_err(|error| PipelineError::InvalidImage {
            reason: error.to_string(),
        })
}

/// Loads and decodes an image file.
///
/// # Errors
///
/// Returns an error when the file cannot be read or decoded.
pub fn load_rgb(path: &Path) -> Result<RgbImage> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    debug!("loaded {} ({} bytes)", path.display(), bytes.len());
    Ok(decode_rgb(&bytes)?)
}

/// Writes an image as PNG.
///
/// # Errors
///
/// Returns an error when encoding or writing fails.
pub fn save_png(image: &RgbImage, path: &Path) -> Result<()> {
    image
        .save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Checks if a path has a supported raster extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_lowercase)
        .is_some_and(|extension| RASTER_EXTENSIONS.contains(&extension.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_is_supported_image() {
        assert!(is_supported_image(Path::new("photo.jpg")));
        assert!(is_supported_image(Path::new("photo.JPEG")));
        assert!(is_supported_image(Path::new("photo.png")));
        assert!(!is_supported_image(Path::new("photo.txt")));
        assert!(!is_supported_image(Path::new("photo")));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let result = decode_rgb(b"definitely not an image");
        assert!(matches!(result, Err(PipelineError::InvalidImage { .. })));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.png");
        let image = RgbImage::from_pixel(16, 8, Rgb([12, 34, 56]));

        save_png(&image, &path).expect("save");
        let loaded = load_rgb(&path).expect("load");
        assert_eq!(loaded.as_raw(), image.as_raw());
    }

    #[test]
    fn test_load_missing_file_errors() {
        assert!(load_rgb(Path::new("/nonexistent/image.png")).is_err());
    }
}
