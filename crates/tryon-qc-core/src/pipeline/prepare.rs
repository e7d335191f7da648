//! Request preparation: downscaling and background removal.
//!
//! Runs before orchestration: the user portrait is downscaled to the working
//! resolution and its background removed (best-effort), the garment image is
//! downscaled only.

use image::imageops::FilterType;
use image::{DynamicImage, Rgb, RgbImage, RgbaImage};
use tracing::warn;

/// Default working resolution for generator inputs.
pub const DEFAULT_MAX_DIMENSION: u32 = 1536;

/// Clamps a configured working resolution to the supported range.
#[must_use]
pub const fn clamp_max_dimension(value: u32) -> u32 {
    if value < 256 {
        256
    } else if value > 4096 {
        4096
    } else {
        value
    }
}

/// Downscales an image so its larger dimension is at most `max_dim`.
///
/// Images already within bounds are returned unscaled. Aspect ratio is
/// preserved; Lanczos resampling.
#[must_use]
pub fn downscale_max_dim(image: &DynamicImage, max_dim: u32) -> DynamicImage {
    let (width, height) = (image.width(), image.height());
    if width.max(height) <= max_dim {
        return image.clone();
    }
    image.resize(max_dim, max_dim, FilterType::Lanczos3)
}

/// Removes the background via the port, falling back to the original image
/// when the collaborator fails.
#[must_use]
pub fn remove_background_or_original(
    remover: &dyn crate::ports::BackgroundRemover,
    image: &RgbaImage,
) -> RgbaImage {
    match remover.remove(image) {
        Ok(removed) => removed,
        Err(error) => {
            warn!("background removal failed, using original: {error:#}");
            image.clone()
        }
    }
}

/// Flattens an alpha-carrying image over white for the 3-channel geometric
/// operations.
#[must_use]
pub fn flatten_over_white(image: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let pixel = image.get_pixel(x, y);
        let alpha = f32::from(pixel[3]) / 255.0;
        let mut flat = [0u8; 3];
        for c in 0..3 {
            let value = f32::from(pixel[c]) * alpha + 255.0 * (1.0 - alpha);
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                flat[c] = value.round().clamp(0.0, 255.0) as u8;
            }
        }
        Rgb(flat)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    struct FailingRemover;

    impl crate::ports::BackgroundRemover for FailingRemover {
        fn remove(&self, _image: &RgbaImage) -> anyhow::Result<RgbaImage> {
            anyhow::bail!("model unavailable")
        }
    }

    struct ClearingRemover;

    impl crate::ports::BackgroundRemover for ClearingRemover {
        fn remove(&self, image: &RgbaImage) -> anyhow::Result<RgbaImage> {
            let mut out = image.clone();
            for pixel in out.pixels_mut() {
                pixel[3] = 0;
            }
            Ok(out)
        }
    }

    #[test]
    fn test_clamp_max_dimension() {
        assert_eq!(clamp_max_dimension(100), 256);
        assert_eq!(clamp_max_dimension(1536), 1536);
        assert_eq!(clamp_max_dimension(10_000), 4096);
    }

    #[test]
    fn test_downscale_preserves_aspect() {
        let image = DynamicImage::new_rgb8(2000, 1000);
        let scaled = downscale_max_dim(&image, 1536);
        assert_eq!(scaled.width(), 1536);
        assert_eq!(scaled.height(), 768);
    }

    #[test]
    fn test_downscale_noop_when_small() {
        let image = DynamicImage::new_rgb8(400, 300);
        let scaled = downscale_max_dim(&image, 1536);
        assert_eq!((scaled.width(), scaled.height()), (400, 300));
    }

    #[test]
    fn test_background_removal_applies() {
        let image = RgbaImage::from_pixel(8, 8, Rgba([10, 20, 30, 255]));
        let removed = remove_background_or_original(&ClearingRemover, &image);
        assert!(removed.pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_background_removal_falls_back_on_failure() {
        let image = RgbaImage::from_pixel(8, 8, Rgba([10, 20, 30, 255]));
        let out = remove_background_or_original(&FailingRemover, &image);
        assert_eq!(out.as_raw(), image.as_raw());
    }

    #[test]
    fn test_flatten_over_white() {
        let mut image = RgbaImage::from_pixel(2, 1, Rgba([100, 100, 100, 255]));
        image.put_pixel(1, 0, Rgba([100, 100, 100, 0]));
        let flat = flatten_over_white(&image);
        assert_eq!(flat.get_pixel(0, 0).0, [100, 100, 100]);
        assert_eq!(flat.get_pixel(1, 0).0, [255, 255, 255]);
    }
}
