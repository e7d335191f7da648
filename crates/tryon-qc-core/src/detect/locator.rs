//! Face location over color images.

use image::RgbImage;
use tracing::debug;

use crate::domain::{primary_face, FaceBox};
use crate::ports::{DetectionProfile, FaceDetector};

/// Runs the detector over a color image with the given profile.
///
/// Converts the image to a single-channel intensity representation and
/// returns every candidate. Callers select the primary box when exactly one
/// face is semantically expected, or inspect the count directly when the
/// face count itself is the signal.
#[must_use]
pub fn detect_faces(
    detector: &dyn FaceDetector,
    image: &RgbImage,
    profile: &DetectionProfile,
) -> Vec<FaceBox> {
    let gray = image::imageops::grayscale(image);
    let faces = detector.detect(&gray, profile);
    debug!(
        "detector found {} candidate(s) at min size {}",
        faces.len(),
        profile.min_face_size
    );
    faces
}

/// Locates the most prominent (maximum-area) face, if any.
///
/// `None` is a normal, frequent outcome, not an error.
#[must_use]
pub fn locate_primary_face(
    detector: &dyn FaceDetector,
    image: &RgbImage,
    profile: &DetectionProfile,
) -> Option<FaceBox> {
    primary_face(&detect_faces(detector, image, profile))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GrayImage;

    struct FixedDetector(Vec<FaceBox>);

    impl FaceDetector for FixedDetector {
        fn detect(&self, _gray: &GrayImage, _profile: &DetectionProfile) -> Vec<FaceBox> {
            self.0.clone()
        }
    }

    #[test]
    fn test_no_faces_is_none() {
        let detector = FixedDetector(vec![]);
        let image = RgbImage::new(32, 32);
        assert_eq!(
            locate_primary_face(&detector, &image, &DetectionProfile::screening()),
            None
        );
    }

    #[test]
    fn test_primary_is_largest() {
        let detector = FixedDetector(vec![
            FaceBox::new(0, 0, 10, 10),
            FaceBox::new(5, 5, 20, 20),
        ]);
        let image = RgbImage::new(64, 64);
        assert_eq!(
            locate_primary_face(&detector, &image, &DetectionProfile::screening()),
            Some(FaceBox::new(5, 5, 20, 20))
        );
    }

    #[test]
    fn test_detect_faces_passes_everything_through() {
        let boxes = vec![FaceBox::new(0, 0, 8, 8), FaceBox::new(16, 0, 8, 8)];
        let detector = FixedDetector(boxes.clone());
        let image = RgbImage::new(64, 64);
        assert_eq!(
            detect_faces(&detector, &image, &DetectionProfile::screening()),
            boxes
        );
    }
}
