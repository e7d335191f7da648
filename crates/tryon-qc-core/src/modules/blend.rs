//! Face grafting between a source portrait and a generated image.
//!
//! Grafts the source face region onto the target with boundary-aware
//! seamless compositing to prevent identity drift, gated by geometric sanity
//! checks. Best-effort by contract: every disqualifying condition yields
//! [`BlendOutcome::Unchanged`] and the caller keeps the target as-is.

use image::imageops::{self, FilterType};
use image::RgbImage;
use tracing::debug;

use crate::detect::locate_primary_face;
use crate::domain::{BlendOutcome, BlendSkip, FaceBox};
use crate::modules::seamless::{elliptical_mask, seamless_clone};
use crate::ports::{DetectionProfile, FaceDetector};

/// Configuration for face blending.
#[derive(Debug, Clone)]
pub struct BlendConfig {
    /// Minimum plausible target-face area as a fraction of the frame.
    pub min_area_fraction: f64,
    /// Maximum plausible target-face area as a fraction of the frame.
    pub max_area_fraction: f64,
    /// Mask ellipse semi-axis as a fraction of the face-box width.
    pub mask_width_fraction: f64,
    /// Mask ellipse semi-axis as a fraction of the face-box height.
    pub mask_height_fraction: f64,
    /// Gauss-Seidel sweeps of the seamless-clone solver.
    pub solver_iterations: u32,
}

impl BlendConfig {
    /// First-pass bounds: blending on every attempt.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            min_area_fraction: 0.01,
            max_area_fraction: 0.25,
            mask_width_fraction: 0.45,
            mask_height_fraction: 0.55,
            solver_iterations: 200,
        }
    }

    /// Looser bounds, applicable when blending runs only on retry attempts.
    #[must_use]
    pub const fn retry() -> Self {
        Self {
            min_area_fraction: 0.008,
            max_area_fraction: 0.40,
            ..Self::strict()
        }
    }
}

impl Default for BlendConfig {
    fn default() -> Self {
        Self::strict()
    }
}

/// Face blending component.
pub struct FaceBlender {
    config: BlendConfig,
}

impl FaceBlender {
    /// Creates a new blender with the given configuration.
    #[must_use]
    pub const fn new(config: BlendConfig) -> Self {
        Self { config }
    }

    /// Returns the blender configuration.
    #[must_use]
    pub const fn config(&self) -> &BlendConfig {
        &self.config
    }

    /// Grafts the primary face of `source` onto the primary face of `target`.
    ///
    /// Never fails: any disqualifying condition returns
    /// [`BlendOutcome::Unchanged`] with the reason.
    #[must_use]
    pub fn blend(
        &self,
        detector: &dyn FaceDetector,
        source: &RgbImage,
        target: &RgbImage,
    ) -> BlendOutcome {
        let profile = DetectionProfile::blending();
        let Some(src_box) = locate_primary_face(detector, source, &profile) else {
            return BlendOutcome::Unchanged(BlendSkip::NoSourceFace);
        };
        let Some(dst_box) = locate_primary_face(detector, target, &profile) else {
            return BlendOutcome::Unchanged(BlendSkip::NoTargetFace);
        };

        let (target_w, target_h) = target.dimensions();
        if !dst_box.fits_within(target_w, target_h) {
            debug!("blend skipped: target box {dst_box:?} outside {target_w}x{target_h} frame");
            return BlendOutcome::Unchanged(BlendSkip::OutOfFrame);
        }
        let area_fraction = dst_box.area_fraction(target_w, target_h);
        if area_fraction < self.config.min_area_fraction
            || area_fraction > self.config.max_area_fraction
        {
            debug!("blend skipped: target face covers {area_fraction:.4} of frame");
            return BlendOutcome::Unchanged(BlendSkip::ImplausibleArea);
        }

        let Some(face) = crop_face(source, &src_box) else {
            return BlendOutcome::Unchanged(BlendSkip::EmptyCrop);
        };
        let resized = imageops::resize(
            &face,
            dst_box.width,
            dst_box.height,
            FilterType::CatmullRom,
        );
        let mask = elliptical_mask(
            dst_box.width,
            dst_box.height,
            self.config.mask_width_fraction,
            self.config.mask_height_fraction,
        );
        let composited = seamless_clone(
            &resized,
            target,
            &mask,
            i64::from(dst_box.x),
            i64::from(dst_box.y),
            self.config.solver_iterations,
        );
        BlendOutcome::Blended(composited)
    }
}

impl Default for FaceBlender {
    fn default() -> Self {
        Self::new(BlendConfig::default())
    }
}

/// Crops a face box out of an image, clamped to the frame.
///
/// Returns `None` when the clamped region is empty.
fn crop_face(image: &RgbImage, face: &FaceBox) -> Option<RgbImage> {
    let (width, height) = image.dimensions();
    let x0 = face.x.max(0).unsigned_abs().min(width);
    let y0 = face.y.max(0).unsigned_abs().min(height);
    let x1 = i64::from(face.x)
        .saturating_add(i64::from(face.width))
        .clamp(0, i64::from(width)) as u32;
    let y1 = i64::from(face.y)
        .saturating_add(i64::from(face.height))
        .clamp(0, i64::from(height)) as u32;
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(imageops::crop_imm(image, x0, y0, x1 - x0, y1 - y0).to_image())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Rgb};
    use std::sync::Mutex;

    /// Detector that pops one scripted result per call.
    struct ScriptedDetector {
        script: Mutex<Vec<Vec<FaceBox>>>,
    }

    impl ScriptedDetector {
        fn new(mut script: Vec<Vec<FaceBox>>) -> Self {
            script.reverse();
            Self {
                script: Mutex::new(script),
            }
        }
    }

    impl FaceDetector for ScriptedDetector {
        fn detect(&self, _gray: &GrayImage, _profile: &DetectionProfile) -> Vec<FaceBox> {
            self.script
                .lock()
                .expect("script lock")
                .pop()
                .unwrap_or_default()
        }
    }

    fn checkered_source(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            if (x / 8 + y / 8) % 2 == 0 {
                Rgb([230, 230, 230])
            } else {
                Rgb([20, 20, 20])
            }
        })
    }

    fn flat(width: u32, height: u32, value: u8) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb([value, value, value]))
    }

    #[test]
    fn test_no_source_face_returns_target_unchanged() {
        let detector = ScriptedDetector::new(vec![vec![]]);
        let blender = FaceBlender::default();
        let target = flat(100, 100, 80);
        let outcome = blender.blend(&detector, &checkered_source(100, 100), &target);
        assert_eq!(outcome.skip_reason(), Some(BlendSkip::NoSourceFace));
    }

    #[test]
    fn test_no_target_face_returns_target_unchanged() {
        let detector =
            ScriptedDetector::new(vec![vec![FaceBox::new(10, 10, 60, 60)], vec![]]);
        let blender = FaceBlender::default();
        let target = flat(100, 100, 80);
        let outcome = blender.blend(&detector, &checkered_source(100, 100), &target);
        assert_eq!(outcome.skip_reason(), Some(BlendSkip::NoTargetFace));
    }

    #[test]
    fn test_out_of_frame_target_box_skips() {
        let detector = ScriptedDetector::new(vec![
            vec![FaceBox::new(10, 10, 60, 60)],
            vec![FaceBox::new(80, 80, 60, 60)],
        ]);
        let blender = FaceBlender::default();
        let outcome = blender.blend(&detector, &checkered_source(100, 100), &flat(100, 100, 80));
        assert_eq!(outcome.skip_reason(), Some(BlendSkip::OutOfFrame));
    }

    #[test]
    fn test_tiny_target_face_skips_byte_identical() {
        // 8x8 in a 100x100 frame: 0.64% < 1% strict lower bound.
        let detector = ScriptedDetector::new(vec![
            vec![FaceBox::new(10, 10, 60, 60)],
            vec![FaceBox::new(40, 40, 8, 8)],
        ]);
        let blender = FaceBlender::new(BlendConfig::strict());
        let target = flat(100, 100, 80);
        let outcome = blender.blend(&detector, &checkered_source(100, 100), &target);
        assert_eq!(outcome.skip_reason(), Some(BlendSkip::ImplausibleArea));
        let fallback = outcome.into_image(target.clone());
        assert_eq!(fallback.as_raw(), target.as_raw());
    }

    #[test]
    fn test_huge_target_face_skips() {
        // 60x60 in a 100x100 frame: 36% > 25% strict upper bound.
        let detector = ScriptedDetector::new(vec![
            vec![FaceBox::new(10, 10, 60, 60)],
            vec![FaceBox::new(20, 20, 60, 60)],
        ]);
        let blender = FaceBlender::new(BlendConfig::strict());
        let outcome = blender.blend(&detector, &checkered_source(100, 100), &flat(100, 100, 80));
        assert_eq!(outcome.skip_reason(), Some(BlendSkip::ImplausibleArea));
    }

    #[test]
    fn test_retry_bounds_accept_what_strict_rejects() {
        // 36% of frame area: rejected by strict, accepted by retry (<= 40%).
        let boxes = || {
            vec![
                vec![FaceBox::new(10, 10, 60, 60)],
                vec![FaceBox::new(20, 20, 60, 60)],
            ]
        };
        let strict = FaceBlender::new(BlendConfig::strict());
        let retry = FaceBlender::new(BlendConfig::retry());
        let source = checkered_source(100, 100);
        let target = flat(100, 100, 80);

        let strict_outcome = strict.blend(&ScriptedDetector::new(boxes()), &source, &target);
        assert_eq!(strict_outcome.skip_reason(), Some(BlendSkip::ImplausibleArea));

        let retry_outcome = retry.blend(&ScriptedDetector::new(boxes()), &source, &target);
        assert!(retry_outcome.skip_reason().is_none());
    }

    #[test]
    fn test_blend_changes_masked_region_only() {
        let detector = ScriptedDetector::new(vec![
            vec![FaceBox::new(0, 0, 64, 64)],
            vec![FaceBox::new(20, 20, 40, 40)],
        ]);
        let blender = FaceBlender::default();
        let target = flat(200, 200, 80);
        let outcome = blender.blend(&detector, &checkered_source(64, 64), &target);
        let BlendOutcome::Blended(result) = outcome else {
            panic!("expected a blended image");
        };
        assert_eq!(result.dimensions(), target.dimensions());
        // The checker texture survives inside the mask: the 3x3 patch around
        // the box center cannot stay flat.
        let result_ref = &result;
        let center_values: Vec<u8> = (39..=41)
            .flat_map(|y| (39..=41).map(move |x| result_ref.get_pixel(x, y)[0]))
            .collect();
        assert!(
            center_values.iter().any(|&v| v != 80),
            "masked region should change, got {center_values:?}"
        );
        // Pixels outside the box are untouched.
        assert_eq!(result.get_pixel(0, 0)[0], 80);
        assert_eq!(result.get_pixel(150, 150)[0], 80);
        // Box corners are outside the elliptical mask.
        assert_eq!(result.get_pixel(20, 20)[0], 80);
    }

    #[test]
    fn test_crop_face_clamps_to_frame() {
        let image = checkered_source(50, 50);
        let cropped = crop_face(&image, &FaceBox::new(-10, -10, 30, 30)).expect("crop");
        assert_eq!(cropped.dimensions(), (20, 20));
    }

    #[test]
    fn test_crop_face_empty_region() {
        let image = checkered_source(50, 50);
        assert!(crop_face(&image, &FaceBox::new(60, 60, 10, 10)).is_none());
    }
}
