//! SeetaFace-based face detector backend.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use image::GrayImage;
use tracing::debug;

use tryon_qc_core::domain::FaceBox;
use tryon_qc_core::ports::{DetectionProfile, FaceDetector};

use crate::models::model_path;

/// Face detector backed by the `rustface` crate (SeetaFace frontal cascade).
///
/// The model is loaded once on construction; a fresh detector instance is
/// created per call from the shared model, keeping the backend `Send + Sync`
/// without locking around the mutable detector state.
pub struct RustfaceDetector {
    model: rustface::Model,
}

impl RustfaceDetector {
    /// Loads a SeetaFace model file from disk.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or is not a valid
    /// SeetaFace model.
    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read model file {}", path.display()))?;
        let model = rustface::read_model(std::io::Cursor::new(bytes))
            .map_err(|error| anyhow!("Failed to parse SeetaFace model: {error}"))?;
        debug!("loaded SeetaFace model from {}", path.display());
        Ok(Self { model })
    }

    /// Loads the installed default model.
    ///
    /// # Errors
    ///
    /// Returns an error when the model is not installed; fetch it with
    /// `tryon-qc models fetch`.
    pub fn from_installed_model() -> Result<Self> {
        let path = model_path("seeta-frontal")
            .ok_or_else(|| anyhow!("Unknown model configuration"))?;
        if !path.exists() {
            anyhow::bail!(
                "Detector model not installed at {}. Run `tryon-qc models fetch`.",
                path.display()
            );
        }
        Self::from_file(&path)
    }
}

impl FaceDetector for RustfaceDetector {
    fn detect(&self, gray: &GrayImage, profile: &DetectionProfile) -> Vec<FaceBox> {
        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(profile.min_face_size);
        // SeetaFace's classifier score threshold stands in for the cascade's
        // neighbor-vote count.
        detector.set_score_thresh(f64::from(profile.min_neighbors));
        // rustface expresses the pyramid step as a shrink factor below one.
        detector.set_pyramid_scale_factor(1.0 / profile.scale_step);
        detector.set_slide_window_step(4, 4);

        let data = rustface::ImageData::new(gray.as_raw(), gray.width(), gray.height());
        detector
            .detect(&data)
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                FaceBox::new(bbox.x(), bbox.y(), bbox.width(), bbox.height())
            })
            .collect()
    }
}
