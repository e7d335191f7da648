//! Component outcome types.
//!
//! The blend, screen, and letterbox components never fail past their
//! contracts: every disqualifying condition degrades to an explicit
//! "unchanged" / "not rejectable" outcome instead of an error, so that
//! failure surfaces stay auditable.

use image::RgbImage;
use serde::{Deserialize, Serialize};

/// Screening verdict for a generated candidate image.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// The candidate passed all screening heuristics.
    Acceptable,
    /// The candidate shows a disqualifying artifact.
    Rejected(RejectReason),
}

impl Verdict {
    /// Whether the candidate should be discarded.
    #[must_use]
    pub const fn is_rejectable(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// The rejection reason, if any.
    #[must_use]
    pub fn reason(&self) -> Option<&RejectReason> {
        match self {
            Self::Acceptable => None,
            Self::Rejected(reason) => Some(reason),
        }
    }
}

/// Why a candidate was screened out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RejectReason {
    /// More than one face detected: collage / inset artifact.
    MultipleFaces {
        /// Number of detected faces.
        count: usize,
    },
    /// The single face sits too low in the frame, indicating it was pasted
    /// onto the torso or garment.
    FaceTooLow {
        /// Vertical center of the face box as a fraction of frame height.
        center_fraction: f64,
    },
    /// The single face covers an implausibly small or large share of the
    /// frame.
    ImplausibleFaceArea {
        /// Face box area as a fraction of frame area.
        area_fraction: f64,
    },
}

/// Why a blend fell back to the unchanged target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendSkip {
    /// No face found in the source portrait.
    NoSourceFace,
    /// No face found in the target image.
    NoTargetFace,
    /// The target face box lies partially outside the frame.
    OutOfFrame,
    /// The target face box area is outside the configured bounds.
    ImplausibleArea,
    /// The source face crop came up empty.
    EmptyCrop,
}

/// Result of a face blend.
pub enum BlendOutcome {
    /// The source face was grafted onto the target.
    Blended(RgbImage),
    /// A disqualifying condition was hit; the target is to be used as-is.
    Unchanged(BlendSkip),
}

impl BlendOutcome {
    /// Unwraps the blended image, or returns `fallback` when unchanged.
    #[must_use]
    pub fn into_image(self, fallback: RgbImage) -> RgbImage {
        match self {
            Self::Blended(image) => image,
            Self::Unchanged(_) => fallback,
        }
    }

    /// The skip reason, if the blend fell back.
    #[must_use]
    pub fn skip_reason(&self) -> Option<BlendSkip> {
        match self {
            Self::Blended(_) => None,
            Self::Unchanged(skip) => Some(*skip),
        }
    }
}

/// Result of a letterbox removal.
pub enum CropOutcome {
    /// Letterbox bars were found and removed.
    Cropped(RgbImage),
    /// No croppable bars; the input is to be used as-is.
    Unchanged,
}

impl CropOutcome {
    /// Unwraps the cropped image, or returns `fallback` when unchanged.
    #[must_use]
    pub fn into_image(self, fallback: RgbImage) -> RgbImage {
        match self {
            Self::Cropped(image) => image,
            Self::Unchanged => fallback,
        }
    }

    /// Whether bars were removed.
    #[must_use]
    pub const fn did_crop(&self) -> bool {
        matches!(self, Self::Cropped(_))
    }
}
