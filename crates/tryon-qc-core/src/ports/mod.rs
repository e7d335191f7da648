//! Port definitions for hexagonal architecture.
//!
//! These traits define the boundaries between the domain core and external
//! collaborators: the face detection backend, the remote generator, the
//! background-removal model, and report output.

mod background;
mod face_detector;
mod generator;
mod report_sink;

pub use background::BackgroundRemover;
pub use face_detector::{DetectionProfile, FaceDetector};
pub use generator::{GeneratorError, GeneratorRequest, TryOnGenerator};
pub use report_sink::ReportSink;
