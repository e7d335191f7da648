//! Generation request and outcome types.

use image::RgbImage;
use serde::{Deserialize, Serialize};

use super::RejectReason;

/// Named background presets offered to the generator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Background {
    /// Plain white studio background.
    #[default]
    PlainWhite,
    /// Library interior.
    Library,
    /// Party scene.
    Party,
    /// Beach scene.
    Beach,
    /// Office interior.
    Office,
}

impl Background {
    /// Human-readable name, as passed to the generator prompt.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PlainWhite => "Plain White",
            Self::Library => "Library",
            Self::Party => "Party",
            Self::Beach => "Beach",
            Self::Office => "Office",
        }
    }
}

/// One quality-controlled generation request.
///
/// All buffers are owned by the request and released when it completes;
/// nothing is cached or shared across requests.
pub struct GenerationRequest {
    /// Source portrait of the user (background-removed or original).
    pub user: RgbImage,
    /// Garment reference image.
    pub garment: RgbImage,
    /// Background preset forwarded to the generator.
    pub background: Background,
    /// Number of independent output variants requested.
    pub variant_count: u32,
    /// Attempt budget per variant.
    pub max_attempts: u32,
}

impl GenerationRequest {
    /// Creates a request for a single variant with the default attempt budget.
    #[must_use]
    pub const fn new(user: RgbImage, garment: RgbImage, background: Background) -> Self {
        Self {
            user,
            garment,
            background,
            variant_count: 1,
            max_attempts: 3,
        }
    }

    /// Sets the requested variant count.
    #[must_use]
    pub const fn with_variants(mut self, count: u32) -> Self {
        self.variant_count = count;
        self
    }

    /// Sets the per-variant attempt budget.
    #[must_use]
    pub const fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }
}

/// Terminal state of one generation attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// The candidate passed screening and was post-processed into an output.
    Accepted,
    /// The candidate was screened out and discarded.
    RejectedArtifact {
        /// Why the screen rejected the candidate.
        reason: RejectReason,
    },
    /// The generator call failed or returned undecodable bytes.
    Errored,
}

/// Record of one attempt within a variant's budget.
///
/// The accepted buffer itself lives once in [`GenerationOutcome::images`]
/// rather than being duplicated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// 1-based attempt index.
    pub attempt: u32,
    /// Whether the generator was called with the strict prompt.
    pub strict: bool,
    /// Whether a retry-guidance note was supplied.
    pub retry_note: bool,
    /// How the attempt ended.
    pub outcome: AttemptOutcome,
}

/// Per-variant attempt history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantReport {
    /// 0-based variant index.
    pub variant: usize,
    /// Attempts in order, at most the per-variant budget.
    pub attempts: Vec<AttemptRecord>,
}

/// Successful result of a generation request.
///
/// `images` holds the accepted buffers in variant order; variants whose
/// budget was exhausted contribute nothing. An entirely empty result is
/// surfaced as [`crate::PipelineError::Exhausted`] instead.
#[derive(Debug)]
pub struct GenerationOutcome {
    /// Final post-processed images, at most one per requested variant.
    pub images: Vec<RgbImage>,
    /// Attempt history for every requested variant, accepted or not.
    pub reports: Vec<VariantReport>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_labels() {
        assert_eq!(Background::PlainWhite.label(), "Plain White");
        assert_eq!(Background::Office.label(), "Office");
    }

    #[test]
    fn test_request_builder_defaults() {
        let request = GenerationRequest::new(
            RgbImage::new(4, 4),
            RgbImage::new(4, 4),
            Background::default(),
        );
        assert_eq!(request.variant_count, 1);
        assert_eq!(request.max_attempts, 3);
    }

    #[test]
    fn test_attempt_outcome_serializes_tagged() {
        let outcome = AttemptOutcome::RejectedArtifact {
            reason: RejectReason::MultipleFaces { count: 2 },
        };
        let json = serde_json::to_value(&outcome).expect("serialize");
        assert_eq!(json["status"], "rejected_artifact");
        assert_eq!(json["reason"]["type"], "multiple_faces");
    }
}
