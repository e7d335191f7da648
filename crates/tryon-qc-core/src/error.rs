//! Pipeline error types.

use thiserror::Error;

/// Fatal errors surfaced to the caller of the pipeline.
///
/// Per-attempt failures (artifact rejections, generator errors) are not
/// errors at this level; they are recorded in attempt records and consumed
/// by the retry loop.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A request input could not be decoded into an image. Surfaced before
    /// the retry loop is entered.
    #[error("invalid input image: {reason}")]
    InvalidImage {
        /// Decoder failure description.
        reason: String,
    },

    /// Every attempt for every requested variant was exhausted without
    /// producing an acceptable image.
    #[error("generation failed: no acceptable image after {max_attempts} attempt(s) across {variants} variant(s)")]
    Exhausted {
        /// Number of variants attempted.
        variants: u32,
        /// Attempt budget that was exhausted per variant.
        max_attempts: u32,
    },
}
