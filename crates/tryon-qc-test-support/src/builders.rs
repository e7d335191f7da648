//! Synthetic image builders for testing.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage};

/// Builder for creating synthetic test images.
///
/// Provides convenience methods for generating images with specific
/// characteristics (flat fields, textured portraits, letterboxed frames).
pub struct SyntheticImage;

impl SyntheticImage {
    /// Creates a flat single-color image.
    #[must_use]
    pub fn flat(width: u32, height: u32, color: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb(color))
    }

    /// Creates a high-contrast checkerboard (strong gradients everywhere).
    ///
    /// Useful for blend tests: gradient-preserving compositing keeps the
    /// pattern visible, naive flattening would not.
    #[must_use]
    pub fn checkerboard(width: u32, height: u32, cell_size: u32) -> RgbImage {
        let cell = cell_size.max(1);
        RgbImage::from_fn(width, height, |x, y| {
            if (x / cell + y / cell) % 2 == 0 {
                Rgb([235, 235, 235])
            } else {
                Rgb([20, 20, 20])
            }
        })
    }

    /// Creates a bright field surrounded by near-black bars of the given
    /// depths, the shape a letterboxing generator produces.
    #[must_use]
    pub fn letterboxed(
        width: u32,
        height: u32,
        top: u32,
        bottom: u32,
        left: u32,
        right: u32,
    ) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            if y < top || y >= height.saturating_sub(bottom) || x < left
                || x >= width.saturating_sub(right)
            {
                Rgb([3, 3, 3])
            } else {
                Rgb([190, 175, 160])
            }
        })
    }

    /// Creates a centered bright visible region inside a near-black frame,
    /// e.g. a 400x300 region in a 500x500 canvas.
    #[must_use]
    pub fn letterboxed_centered(
        width: u32,
        height: u32,
        visible_width: u32,
        visible_height: u32,
    ) -> RgbImage {
        let left = (width - visible_width.min(width)) / 2;
        let top = (height - visible_height.min(height)) / 2;
        Self::letterboxed(
            width,
            height,
            top,
            height - top - visible_height.min(height),
            left,
            width - left - visible_width.min(width),
        )
    }

    /// Encodes an image as PNG bytes, the shape a generator collaborator
    /// returns.
    ///
    /// # Panics
    ///
    /// Panics if encoding fails, which it does not for valid dimensions.
    #[must_use]
    pub fn png_bytes(image: &RgbImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        let encoder = PngEncoder::new(&mut bytes);
        encoder
            .write_image(
                image.as_raw(),
                image.width(),
                image.height(),
                ExtendedColorType::Rgb8,
            )
            .expect("PNG encoding of a synthetic image");
        bytes
    }
}
