//! Test support utilities for tryon-qc.
//!
//! Provides stub detectors, scripted generators, and synthetic image
//! builders for testing the quality-control pipeline without a detector
//! model or a remote generator.
//!
//! # Example
//!
//! ```
//! use tryon_qc_test_support::{MockGenerator, StubFaceDetector, SyntheticImage};
//! use tryon_qc_core::domain::FaceBox;
//!
//! let candidate = SyntheticImage::checkerboard(256, 256, 8);
//! let generator = MockGenerator::always_returning(SyntheticImage::png_bytes(&candidate));
//! let detector = StubFaceDetector::always_finding(vec![FaceBox::new(100, 60, 60, 60)]);
//! ```

mod builders;
mod mocks;

pub use builders::SyntheticImage;
pub use mocks::{MockGenerator, RecordedRequest, ScriptedResponse, StubFaceDetector};
