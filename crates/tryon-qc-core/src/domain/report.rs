//! Serializable reports emitted by the CLI and report sinks.

use serde::{Deserialize, Serialize};

use super::{BlendSkip, RejectReason, Verdict};

/// Image dimensions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ImageDimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ImageDimensions {
    /// Creates new dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Screening report for a single candidate image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateReport {
    /// Path of the screened image.
    pub path: String,
    /// Timestamp of screening (ISO 8601).
    pub timestamp: String,
    /// Candidate dimensions.
    pub dimensions: ImageDimensions,
    /// Whether the candidate should be discarded.
    pub rejectable: bool,
    /// Rejection reason, when rejectable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<RejectReason>,
}

impl GateReport {
    /// Builds a report from a screening verdict.
    #[must_use]
    pub fn from_verdict(
        path: impl Into<String>,
        timestamp: impl Into<String>,
        dimensions: ImageDimensions,
        verdict: &Verdict,
    ) -> Self {
        Self {
            path: path.into(),
            timestamp: timestamp.into(),
            dimensions,
            rejectable: verdict.is_rejectable(),
            reason: verdict.reason().cloned(),
        }
    }
}

/// Post-processing report for a single finished image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinishReport {
    /// Path the finished image was written to.
    pub path: String,
    /// Timestamp of processing (ISO 8601).
    pub timestamp: String,
    /// Output dimensions after cropping.
    pub dimensions: ImageDimensions,
    /// Whether the source face was grafted onto the output.
    pub blended: bool,
    /// Why the blend was skipped, when it was.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blend_skipped: Option<BlendSkip>,
    /// Whether letterbox bars were removed.
    pub letterbox_cropped: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_report_acceptable() {
        let report = GateReport::from_verdict(
            "candidate.png",
            "2024-01-01T00:00:00Z",
            ImageDimensions::new(512, 512),
            &Verdict::Acceptable,
        );
        assert!(!report.rejectable);
        assert!(report.reason.is_none());

        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(json["rejectable"], false);
        assert!(json.get("reason").is_none());
    }

    #[test]
    fn test_gate_report_rejected_carries_reason() {
        let verdict = Verdict::Rejected(RejectReason::FaceTooLow {
            center_fraction: 0.82,
        });
        let report = GateReport::from_verdict(
            "candidate.png",
            "2024-01-01T00:00:00Z",
            ImageDimensions::new(512, 512),
            &verdict,
        );
        assert!(report.rejectable);

        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(json["reason"]["type"], "face_too_low");
    }
}
