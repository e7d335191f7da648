//! Artifact screening for generated candidates.
//!
//! Heuristically classifies a generated image as acceptable or as showing a
//! collage / inset / mis-placed-face artifact. Over-rejection wastes
//! generation budget, so every ambiguous or degenerate case resolves to
//! [`Verdict::Acceptable`].

use image::RgbImage;
use tracing::debug;

use crate::detect::detect_faces;
use crate::domain::{RejectReason, Verdict};
use crate::ports::{DetectionProfile, FaceDetector};

/// Screening thresholds.
///
/// Empirically tuned policy constants, not derived invariants; keep them
/// configurable.
#[derive(Debug, Clone)]
pub struct RejectPolicy {
    /// Vertical-center fraction above which a single face is rejected.
    pub max_center_fraction: f64,
    /// Minimum plausible face area as a fraction of the frame.
    pub min_area_fraction: f64,
    /// Maximum plausible face area as a fraction of the frame.
    pub max_area_fraction: f64,
}

impl RejectPolicy {
    /// Stricter thresholds.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            max_center_fraction: 0.6,
            min_area_fraction: 0.01,
            max_area_fraction: 0.35,
        }
    }

    /// Relaxed thresholds, the canonical policy.
    #[must_use]
    pub const fn relaxed() -> Self {
        Self {
            max_center_fraction: 0.7,
            min_area_fraction: 0.008,
            max_area_fraction: 0.40,
        }
    }
}

impl Default for RejectPolicy {
    fn default() -> Self {
        Self::relaxed()
    }
}

/// Artifact screening component.
pub struct ArtifactScreen {
    policy: RejectPolicy,
    profile: DetectionProfile,
}

impl ArtifactScreen {
    /// Creates a screen with the given policy and the screening detection
    /// profile.
    #[must_use]
    pub const fn new(policy: RejectPolicy) -> Self {
        Self {
            policy,
            profile: DetectionProfile::screening(),
        }
    }

    /// Returns the screening policy.
    #[must_use]
    pub const fn policy(&self) -> &RejectPolicy {
        &self.policy
    }

    /// Screens a generated candidate.
    ///
    /// Never fails; detector misses and degenerate frames resolve to
    /// [`Verdict::Acceptable`].
    #[must_use]
    pub fn evaluate(&self, detector: &dyn FaceDetector, image: &RgbImage) -> Verdict {
        let faces = detect_faces(detector, image, &self.profile);
        match faces.as_slice() {
            // Detector misses are common; absence of evidence is not
            // evidence of an artifact.
            [] => Verdict::Acceptable,
            [face] => self.evaluate_single(face, image),
            _ => {
                debug!("candidate rejected: {} faces detected", faces.len());
                Verdict::Rejected(RejectReason::MultipleFaces { count: faces.len() })
            }
        }
    }

    fn evaluate_single(&self, face: &crate::domain::FaceBox, image: &RgbImage) -> Verdict {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Verdict::Acceptable;
        }

        let (_, cy) = face.center();
        let center_fraction = f64::from(cy) / f64::from(height);
        if center_fraction > self.policy.max_center_fraction {
            debug!("candidate rejected: face center at {center_fraction:.2} of frame height");
            return Verdict::Rejected(RejectReason::FaceTooLow { center_fraction });
        }

        let area_fraction = face.area_fraction(width, height);
        if area_fraction < self.policy.min_area_fraction
            || area_fraction > self.policy.max_area_fraction
        {
            debug!("candidate rejected: face covers {area_fraction:.4} of frame");
            return Verdict::Rejected(RejectReason::ImplausibleFaceArea { area_fraction });
        }

        Verdict::Acceptable
    }
}

impl Default for ArtifactScreen {
    fn default() -> Self {
        Self::new(RejectPolicy::default())
    }
}
