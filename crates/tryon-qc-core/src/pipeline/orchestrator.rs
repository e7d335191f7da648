//! Generation orchestrator: the bounded retry/variant loop.
//!
//! Requests one candidate per attempt from the external generator, gates it
//! through the artifact screen, post-processes accepted candidates (blend,
//! then letterbox crop), and collects at most one output per requested
//! variant. Attempt state per variant: Requesting -> Evaluating ->
//! {Accepted, Rejected, Errored}; rejected and errored attempts consume
//! budget and nothing else.

use image::RgbImage;
use tracing::{debug, warn};

use crate::domain::{
    AttemptOutcome, AttemptRecord, GenerationOutcome, GenerationRequest, VariantReport, Verdict,
};
use crate::error::PipelineError;
use crate::modules::{ArtifactScreen, BlendConfig, FaceBlender, LetterboxCropper, RejectPolicy};
use crate::ports::{FaceDetector, GeneratorRequest, TryOnGenerator};

/// Upper bound on variants per request.
pub const MAX_VARIANTS: u32 = 3;

/// Upper bound on attempts per variant.
pub const MAX_ATTEMPTS_PER_VARIANT: u32 = 3;

/// Guidance supplied to the generator on retry attempts.
const RETRY_NOTE: &str = "The previous output contained collage or overlay artifacts. \
     Render exactly one person with a single natural face; no insets, \
     frames, or picture-in-picture.";

/// Per-attempt policy, passed explicitly so the attempt loop stays free of
/// hidden coupling.
#[derive(Debug, Clone)]
pub struct AttemptPolicy {
    /// Apply the strict anti-artifact prompt rules.
    pub strict_prompt: bool,
    /// Retry-guidance note for the generator, if any.
    pub retry_note: Option<&'static str>,
    /// Run the face blender on an accepted candidate.
    pub blend: bool,
    /// Screening thresholds for this attempt.
    pub reject: RejectPolicy,
}

impl AttemptPolicy {
    /// Policy for the given 1-based attempt index.
    ///
    /// First attempts run relaxed: first-attempt images are the most likely
    /// to be well-composed, and blending risk outweighs its benefit there.
    /// Retries tighten the prompt, add the guidance note, and enable
    /// blending.
    #[must_use]
    pub fn for_attempt(attempt: u32) -> Self {
        let is_retry = attempt > 1;
        Self {
            strict_prompt: is_retry,
            retry_note: is_retry.then_some(RETRY_NOTE),
            blend: is_retry,
            reject: RejectPolicy::default(),
        }
    }
}

/// The quality-control pipeline around an external generator.
pub struct TryOnPipeline<'a> {
    detector: &'a dyn FaceDetector,
    blender: FaceBlender,
    cropper: LetterboxCropper,
}

impl<'a> TryOnPipeline<'a> {
    /// Creates a pipeline with default components.
    ///
    /// The blender uses the retry bounds, since this pipeline only blends on
    /// retry attempts.
    #[must_use]
    pub fn new(detector: &'a dyn FaceDetector) -> Self {
        Self {
            detector,
            blender: FaceBlender::new(BlendConfig::retry()),
            cropper: LetterboxCropper::default(),
        }
    }

    /// Replaces the face blender.
    #[must_use]
    pub fn with_blender(mut self, blender: FaceBlender) -> Self {
        self.blender = blender;
        self
    }

    /// Replaces the letterbox cropper.
    #[must_use]
    pub fn with_cropper(mut self, cropper: LetterboxCropper) -> Self {
        self.cropper = cropper;
        self
    }

    /// Produces up to `request.variant_count` accepted images.
    ///
    /// Variants are processed sequentially and independently; a variant that
    /// exhausts its attempts is silently dropped from the output.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Exhausted`] when no variant produced an
    /// image.
    pub fn generate_variants(
        &self,
        request: &GenerationRequest,
        generator: &dyn TryOnGenerator,
    ) -> Result<GenerationOutcome, PipelineError> {
        let variants = request.variant_count.clamp(1, MAX_VARIANTS);
        let max_attempts = request.max_attempts.clamp(1, MAX_ATTEMPTS_PER_VARIANT);

        let mut images = Vec::new();
        let mut reports = Vec::with_capacity(variants as usize);
        for variant in 0..variants {
            let (image, attempts) = self.produce_variant(request, generator, max_attempts);
            debug!(
                "variant {variant}: {} after {} attempt(s)",
                if image.is_some() { "accepted" } else { "exhausted" },
                attempts.len()
            );
            if let Some(image) = image {
                images.push(image);
            }
            reports.push(VariantReport {
                variant: variant as usize,
                attempts,
            });
        }

        if images.is_empty() {
            return Err(PipelineError::Exhausted {
                variants,
                max_attempts,
            });
        }
        Ok(GenerationOutcome { images, reports })
    }

    /// Runs the attempt loop for one variant.
    fn produce_variant(
        &self,
        request: &GenerationRequest,
        generator: &dyn TryOnGenerator,
        max_attempts: u32,
    ) -> (Option<RgbImage>, Vec<AttemptRecord>) {
        let mut records = Vec::new();
        for attempt in 1..=max_attempts {
            let policy = AttemptPolicy::for_attempt(attempt);
            let (outcome, image) = self.run_attempt(request, generator, &policy);
            let accepted = matches!(outcome, AttemptOutcome::Accepted);
            records.push(AttemptRecord {
                attempt,
                strict: policy.strict_prompt,
                retry_note: policy.retry_note.is_some(),
                outcome,
            });
            if accepted {
                return (image, records);
            }
        }
        (None, records)
    }

    /// Runs a single attempt: request, evaluate, post-process.
    fn run_attempt(
        &self,
        request: &GenerationRequest,
        generator: &dyn TryOnGenerator,
        policy: &AttemptPolicy,
    ) -> (AttemptOutcome, Option<RgbImage>) {
        let generator_request = GeneratorRequest {
            user: &request.user,
            garment: &request.garment,
            background: request.background,
            strict: policy.strict_prompt,
            retry_note: policy.retry_note,
        };
        let bytes = match generator.generate(&generator_request) {
            Ok(bytes) => bytes,
            Err(error) => {
                warn!("generator call failed: {error}");
                return (AttemptOutcome::Errored, None);
            }
        };
        let candidate = match image::load_from_memory(&bytes) {
            Ok(decoded) => decoded.to_rgb8(),
            Err(error) => {
                warn!("generated image failed to decode: {error}");
                return (AttemptOutcome::Errored, None);
            }
        };

        let screen = ArtifactScreen::new(policy.reject.clone());
        if let Verdict::Rejected(reason) = screen.evaluate(self.detector, &candidate) {
            return (AttemptOutcome::RejectedArtifact { reason }, None);
        }

        let blended = if policy.blend {
            let outcome = self.blender.blend(self.detector, &request.user, &candidate);
            if let Some(skip) = outcome.skip_reason() {
                debug!("blend skipped: {skip:?}");
            }
            outcome.into_image(candidate)
        } else {
            candidate
        };
        let finished = self.cropper.remove(&blended).into_image(blended);
        (AttemptOutcome::Accepted, Some(finished))
    }
}
