//! Try-on QC core: the quality-control pipeline that sits between a
//! generative try-on call and the value returned to a client.
//!
//! Given a source portrait and a generated image, the pipeline locates faces
//! in both, screens the generated image for disqualifying artifacts (extra
//! faces, mis-placed face, degenerate framing), optionally grafts the
//! original face region onto the output to prevent identity drift, removes
//! uniform letterbox bars, and drives a bounded retry/variant loop around
//! the external generator.
//!
//! External collaborators (the generator, the background-removal model, the
//! face detection backend, report output) are modeled as ports; see
//! [`ports`]. Adapters live in `tryon-qc-adapters`.

pub mod detect;
pub mod domain;
pub mod error;
pub mod modules;
pub mod pipeline;
pub mod ports;

pub use detect::{detect_faces, locate_primary_face};
pub use domain::{
    AttemptOutcome, AttemptRecord, Background, BlendOutcome, BlendSkip, CropOutcome, FaceBox,
    FinishReport, GateReport, GenerationOutcome, GenerationRequest, ImageDimensions, RejectReason,
    VariantReport, Verdict,
};
pub use error::PipelineError;
pub use modules::{
    ArtifactScreen, BlendConfig, FaceBlender, LetterboxConfig, LetterboxCropper, RejectPolicy,
};
pub use pipeline::{AttemptPolicy, TryOnPipeline, MAX_ATTEMPTS_PER_VARIANT, MAX_VARIANTS};
pub use ports::{
    BackgroundRemover, DetectionProfile, FaceDetector, GeneratorError, GeneratorRequest,
    ReportSink, TryOnGenerator,
};
