//! Background removal port.

use image::RgbaImage;

/// Port for the opaque background-removal collaborator.
///
/// On failure the caller falls back to the original image (see
/// [`crate::pipeline::remove_background_or_original`]); the face locator and
/// blender operate correctly on both backgrounds-removed and original images.
pub trait BackgroundRemover: Send + Sync {
    /// Returns the image with its background attenuated or removed.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying model call fails.
    fn remove(&self, image: &RgbaImage) -> anyhow::Result<RgbaImage>;
}
