//! Quality-control component implementations.
//!
//! Each component degrades to an explicit "unchanged" / "acceptable" outcome
//! on any disqualifying condition instead of erroring; see
//! [`crate::domain`] for the outcome types.

mod blend;
mod letterbox;
mod screen;
pub mod seamless;

pub use blend::{BlendConfig, FaceBlender};
pub use letterbox::{LetterboxConfig, LetterboxCropper};
pub use screen::{ArtifactScreen, RejectPolicy};
