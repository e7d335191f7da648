//! Face detector port.

use image::GrayImage;

use crate::domain::FaceBox;

/// Fixed profile for the classical frontal-face detector.
///
/// The values are the empirically tuned operating point of the pipeline;
/// backends map them onto whatever knobs their engine exposes.
#[derive(Debug, Clone)]
pub struct DetectionProfile {
    /// Multiplicative step between detection pyramid scales.
    pub scale_step: f32,
    /// Minimum neighbor-vote count for a candidate to survive.
    pub min_neighbors: u32,
    /// Minimum detectable face size, pixels per side.
    pub min_face_size: u32,
}

impl DetectionProfile {
    /// Profile used for artifact screening (smaller minimum face, so inset
    /// faces are still found).
    #[must_use]
    pub const fn screening() -> Self {
        Self {
            scale_step: 1.1,
            min_neighbors: 5,
            min_face_size: 50,
        }
    }

    /// Profile used for face blending (slightly larger minimum face).
    #[must_use]
    pub const fn blending() -> Self {
        Self {
            scale_step: 1.1,
            min_neighbors: 5,
            min_face_size: 60,
        }
    }
}

impl Default for DetectionProfile {
    fn default() -> Self {
        Self::screening()
    }
}

/// Port for a pluggable face detection backend.
///
/// The bundled adapter wraps the SeetaFace cascade; any backend satisfying
/// this contract may substitute. Zero results is a normal, frequent outcome,
/// never an error, and backends must not synthesize candidates.
pub trait FaceDetector: Send + Sync {
    /// Detects faces in a row-major grayscale buffer.
    fn detect(&self, gray: &GrayImage, profile: &DetectionProfile) -> Vec<FaceBox>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_differ_only_in_min_size() {
        let screening = DetectionProfile::screening();
        let blending = DetectionProfile::blending();

        assert!((screening.scale_step - blending.scale_step).abs() < f32::EPSILON);
        assert_eq!(screening.min_neighbors, blending.min_neighbors);
        assert_eq!(screening.min_face_size, 50);
        assert_eq!(blending.min_face_size, 60);
    }
}
