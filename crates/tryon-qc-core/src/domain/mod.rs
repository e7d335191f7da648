//! Core domain types for the try-on quality-control pipeline.

mod geometry;
mod outcome;
mod report;
mod request;

pub use geometry::{primary_face, FaceBox};
pub use outcome::{BlendOutcome, BlendSkip, CropOutcome, RejectReason, Verdict};
pub use report::{FinishReport, GateReport, ImageDimensions};
pub use request::{
    AttemptOutcome, AttemptRecord, Background, GenerationOutcome, GenerationRequest, VariantReport,
};
