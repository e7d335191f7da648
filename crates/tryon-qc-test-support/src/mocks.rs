//! Mock implementations of core port traits.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use image::GrayImage;
use tryon_qc_core::domain::{Background, FaceBox};
use tryon_qc_core::ports::{
    DetectionProfile, FaceDetector, GeneratorError, GeneratorRequest, TryOnGenerator,
};

/// Stub implementation of `FaceDetector` for testing.
///
/// Returns scripted detection results and tracks call counts. Detection
/// results are independent of the image content.
pub struct StubFaceDetector {
    script: Mutex<VecDeque<Vec<FaceBox>>>,
    fallback: Vec<FaceBox>,
    calls: Mutex<usize>,
}

impl StubFaceDetector {
    /// A detector that never finds a face.
    #[must_use]
    pub fn never_finding() -> Self {
        Self::always_finding(vec![])
    }

    /// A detector that returns the same result on every call.
    #[must_use]
    pub fn always_finding(faces: Vec<FaceBox>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: faces,
            calls: Mutex::new(0),
        }
    }

    /// A detector that pops one scripted result per call, then returns
    /// nothing.
    #[must_use]
    pub fn sequence(script: Vec<Vec<FaceBox>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: vec![],
            calls: Mutex::new(0),
        }
    }

    /// Number of `detect` calls so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FaceDetector for StubFaceDetector {
    fn detect(&self, _gray: &GrayImage, _profile: &DetectionProfile) -> Vec<FaceBox> {
        *self.calls.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

/// One scripted generator response.
#[derive(Debug, Clone)]
pub enum ScriptedResponse {
    /// Return these image bytes.
    Image(Vec<u8>),
    /// Fail with [`GeneratorError::NoImage`].
    NoImage,
    /// Fail with [`GeneratorError::Remote`].
    RemoteError(String),
    /// Fail with [`GeneratorError::Transport`].
    TransportError(String),
}

impl ScriptedResponse {
    fn into_result(self) -> Result<Vec<u8>, GeneratorError> {
        match self {
            Self::Image(bytes) => Ok(bytes),
            Self::NoImage => Err(GeneratorError::NoImage),
            Self::RemoteError(message) => Err(GeneratorError::Remote(message)),
            Self::TransportError(message) => Err(GeneratorError::Transport(message)),
        }
    }
}

/// What a mock generator saw in one call.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// The strict flag passed by the orchestrator.
    pub strict: bool,
    /// The retry-guidance note, if one was supplied.
    pub retry_note: Option<String>,
    /// The requested background preset.
    pub background: Background,
}

/// Mock implementation of `TryOnGenerator` for testing.
///
/// Plays back a script of responses and records every request for
/// assertions. When the script runs dry, the configured default response
/// repeats indefinitely.
pub struct MockGenerator {
    script: Mutex<VecDeque<ScriptedResponse>>,
    default: ScriptedResponse,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockGenerator {
    /// A generator that returns the same bytes on every call.
    #[must_use]
    pub fn always_returning(bytes: Vec<u8>) -> Self {
        Self::with_default(ScriptedResponse::Image(bytes))
    }

    /// A generator whose every call fails with a transport error.
    #[must_use]
    pub fn always_failing(message: &str) -> Self {
        Self::with_default(ScriptedResponse::TransportError(message.to_owned()))
    }

    /// A generator that plays `script` in order, then keeps failing.
    #[must_use]
    pub fn from_script(script: Vec<ScriptedResponse>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            default: ScriptedResponse::TransportError("script exhausted".to_owned()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn with_default(default: ScriptedResponse) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every request seen so far, in call order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of `generate` calls so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl TryOnGenerator for MockGenerator {
    fn generate(&self, request: &GeneratorRequest<'_>) -> Result<Vec<u8>, GeneratorError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedRequest {
                strict: request.strict,
                retry_note: request.retry_note.map(str::to_owned),
                background: request.background,
            });
        let response = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| self.default.clone());
        response.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn any_request<'a>(user: &'a RgbImage, garment: &'a RgbImage) -> GeneratorRequest<'a> {
        GeneratorRequest {
            user,
            garment,
            background: Background::PlainWhite,
            strict: false,
            retry_note: None,
        }
    }

    #[test]
    fn test_stub_detector_sequence_then_empty() {
        let stub = StubFaceDetector::sequence(vec![vec![FaceBox::new(0, 0, 10, 10)]]);
        let gray = GrayImage::new(4, 4);
        let profile = DetectionProfile::screening();

        assert_eq!(stub.detect(&gray, &profile).len(), 1);
        assert!(stub.detect(&gray, &profile).is_empty());
        assert_eq!(stub.call_count(), 2);
    }

    #[test]
    fn test_stub_detector_always_finding_repeats() {
        let stub = StubFaceDetector::always_finding(vec![FaceBox::new(0, 0, 10, 10)]);
        let gray = GrayImage::new(4, 4);
        let profile = DetectionProfile::screening();
        for _ in 0..5 {
            assert_eq!(stub.detect(&gray, &profile).len(), 1);
        }
    }

    #[test]
    fn test_mock_generator_records_requests() {
        let generator = MockGenerator::always_returning(vec![1, 2, 3]);
        let user = RgbImage::new(2, 2);
        let garment = RgbImage::new(2, 2);

        let bytes = generator
            .generate(&any_request(&user, &garment))
            .expect("scripted success");
        assert_eq!(bytes, vec![1, 2, 3]);
        assert_eq!(generator.call_count(), 1);
        assert!(!generator.requests()[0].strict);
    }

    #[test]
    fn test_mock_generator_script_then_default_failure() {
        let generator = MockGenerator::from_script(vec![ScriptedResponse::Image(vec![9])]);
        let user = RgbImage::new(2, 2);
        let garment = RgbImage::new(2, 2);

        assert!(generator.generate(&any_request(&user, &garment)).is_ok());
        assert!(matches!(
            generator.generate(&any_request(&user, &garment)),
            Err(GeneratorError::Transport(_))
        ));
    }

    #[test]
    fn test_mock_generator_always_failing() {
        let generator = MockGenerator::always_failing("unreachable");
        let user = RgbImage::new(2, 2);
        let garment = RgbImage::new(2, 2);
        for _ in 0..3 {
            assert!(generator.generate(&any_request(&user, &garment)).is_err());
        }
        assert_eq!(generator.call_count(), 3);
    }
}
