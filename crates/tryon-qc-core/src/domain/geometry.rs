//! Face bounding-box geometry.

use serde::{Deserialize, Serialize};

/// Axis-aligned face bounding box in image-pixel coordinates, origin top-left.
///
/// Width and height are always positive. Boxes produced by a detector
/// additionally satisfy `x >= 0` and `y >= 0`; boxes from other sources
/// (tests, hand-written fixtures) may not, which is why the geometric gates
/// in the blend and screen modules re-check bounds explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceBox {
    /// X coordinate of the top-left corner.
    pub x: i32,
    /// Y coordinate of the top-left corner.
    pub y: i32,
    /// Box width in pixels.
    pub width: u32,
    /// Box height in pixels.
    pub height: u32,
}

impl FaceBox {
    /// Creates a new box.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Box area in pixels.
    #[must_use]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Box center `(cx, cy)`.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn center(&self) -> (i32, i32) {
        (
            self.x + (self.width / 2) as i32,
            self.y + (self.height / 2) as i32,
        )
    }

    /// Fraction of a `frame_width` x `frame_height` frame covered by this box.
    ///
    /// Returns `0.0` for a degenerate frame.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn area_fraction(&self, frame_width: u32, frame_height: u32) -> f64 {
        let frame_area = u64::from(frame_width) * u64::from(frame_height);
        if frame_area == 0 {
            return 0.0;
        }
        self.area() as f64 / frame_area as f64
    }

    /// Whether the box lies entirely inside a `frame_width` x `frame_height`
    /// frame.
    #[must_use]
    pub fn fits_within(&self, frame_width: u32, frame_height: u32) -> bool {
        self.x >= 0
            && self.y >= 0
            && i64::from(self.x) + i64::from(self.width) <= i64::from(frame_width)
            && i64::from(self.y) + i64::from(self.height) <= i64::from(frame_height)
    }
}

/// Selects the maximum-area box: the "primary face" when exactly one face is
/// semantically expected. Returns `None` for an empty detection result.
#[must_use]
pub fn primary_face(faces: &[FaceBox]) -> Option<FaceBox> {
    faces.iter().copied().max_by_key(FaceBox::area)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_and_center() {
        let b = FaceBox::new(10, 20, 30, 40);
        assert_eq!(b.area(), 1200);
        assert_eq!(b.center(), (25, 40));
    }

    #[test]
    fn test_area_fraction() {
        let b = FaceBox::new(0, 0, 10, 10);
        let frac = b.area_fraction(100, 100);
        assert!((frac - 0.01).abs() < 1e-9);
    }

    #[test]
    fn test_area_fraction_degenerate_frame() {
        let b = FaceBox::new(0, 0, 10, 10);
        assert!((b.area_fraction(0, 100) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fits_within() {
        assert!(FaceBox::new(0, 0, 100, 100).fits_within(100, 100));
        assert!(FaceBox::new(10, 10, 80, 80).fits_within(100, 100));
        assert!(!FaceBox::new(-1, 0, 50, 50).fits_within(100, 100));
        assert!(!FaceBox::new(0, -1, 50, 50).fits_within(100, 100));
        assert!(!FaceBox::new(60, 0, 50, 50).fits_within(100, 100));
        assert!(!FaceBox::new(0, 60, 50, 50).fits_within(100, 100));
    }

    #[test]
    fn test_primary_face_empty() {
        assert_eq!(primary_face(&[]), None);
    }

    #[test]
    fn test_primary_face_picks_largest() {
        let small = FaceBox::new(0, 0, 10, 10);
        let large = FaceBox::new(50, 50, 40, 40);
        assert_eq!(primary_face(&[small, large, small]), Some(large));
    }
}
