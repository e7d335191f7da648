//! Face detection front-end.
//!
//! The locator converts color buffers to intensity and delegates to the
//! [`crate::ports::FaceDetector`] backend with a fixed detection profile.

mod locator;

pub use locator::{detect_faces, locate_primary_face};
