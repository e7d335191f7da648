//! External try-on generator port.

use image::RgbImage;
use thiserror::Error;

use crate::domain::Background;

/// One call to the external generator.
pub struct GeneratorRequest<'a> {
    /// Source portrait of the user.
    pub user: &'a RgbImage,
    /// Garment reference image.
    pub garment: &'a RgbImage,
    /// Background preset.
    pub background: Background,
    /// Whether to apply the strict anti-artifact prompt rules.
    pub strict: bool,
    /// Extra guidance supplied on retry attempts.
    pub retry_note: Option<&'a str>,
}

/// Failure modes of a generator call.
///
/// The orchestrator treats all of them as a failed attempt; its own retry
/// loop is the sole retry mechanism at this level. Deeper fallback behavior
/// (model rotation, transient backoff) is the collaborator's concern.
#[derive(Debug, Clone, Error)]
pub enum GeneratorError {
    /// The remote call succeeded but no image came back.
    #[error("generator returned no image")]
    NoImage,
    /// The remote service reported an error.
    #[error("generator remote error: {0}")]
    Remote(String),
    /// The call never reached the service (network, timeout).
    #[error("generator transport error: {0}")]
    Transport(String),
}

/// Port for the opaque remote image generator.
///
/// Returns the raw bytes of a single generated image; decoding happens in
/// the orchestrator so that undecodable output counts as an attempt failure.
/// Implementations own their timeout; a timed-out call is a single
/// [`GeneratorError::Transport`] failure, never a partial result.
pub trait TryOnGenerator: Send + Sync {
    /// Requests one generated candidate image.
    ///
    /// # Errors
    ///
    /// Returns a [`GeneratorError`] when the call fails or yields no image.
    fn generate(&self, request: &GeneratorRequest<'_>) -> Result<Vec<u8>, GeneratorError>;
}
