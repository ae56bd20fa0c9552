//! Scripted backend implementation.
//!
//! Replays queued responses instead of calling the network and records every
//! call it receives. Useful for testing pipeline sequencing and session
//! transitions deterministically.

use super::{GenerativeBackend, MediaResponse, StructuredResponse};
use crate::error::{LibrettoError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// One recorded backend invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedCall {
    Analysis,
    Image,
    Audio,
}

/// Deterministic backend replaying queued responses.
#[derive(Default)]
pub struct ScriptedBackend {
    analysis_responses: Mutex<VecDeque<Result<StructuredResponse>>>,
    image_responses: Mutex<VecDeque<Result<MediaResponse>>>,
    audio_responses: Mutex<VecDeque<Result<MediaResponse>>>,
    calls: Mutex<Vec<ScriptedCall>>,
}

impl ScriptedBackend {
    /// Create a scripted backend with no queued responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next structured-analysis call.
    pub fn push_analysis(&self, response: Result<StructuredResponse>) {
        self.analysis_responses.lock().unwrap().push_back(response);
    }

    /// Queue a response for the next image call.
    pub fn push_image(&self, response: Result<MediaResponse>) {
        self.image_responses.lock().unwrap().push_back(response);
    }

    /// Queue a response for the next audio call.
    pub fn push_audio(&self, response: Result<MediaResponse>) {
        self.audio_responses.lock().unwrap().push_back(response);
    }

    /// All calls received so far, in order.
    pub fn calls(&self) -> Vec<ScriptedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls of one kind received so far.
    pub fn call_count(&self, kind: ScriptedCall) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == kind).count()
    }

    fn record(&self, call: ScriptedCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn exhausted(op: &str) -> LibrettoError {
        LibrettoError::Backend(format!("Scripted backend has no {} response queued", op))
    }
}

#[async_trait]
impl GenerativeBackend for ScriptedBackend {
    async fn generate_structured_analysis(
        &self,
        _prompt: &str,
        _schema: &serde_json::Value,
    ) -> Result<StructuredResponse> {
        self.record(ScriptedCall::Analysis);
        self.analysis_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Self::exhausted("analysis")))
    }

    async fn generate_image(&self, _prompt: &str, _aspect_ratio: &str) -> Result<MediaResponse> {
        self.record(ScriptedCall::Image);
        self.image_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Self::exhausted("image")))
    }

    async fn generate_audio(&self, _text: &str, _voice: &str) -> Result<MediaResponse> {
        self.record(ScriptedCall::Audio);
        self.audio_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Self::exhausted("audio")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_backend_replays_and_records() {
        let backend = ScriptedBackend::new();
        backend.push_analysis(Ok(StructuredResponse {
            text: "{}".to_string(),
            grounding_chunks: Vec::new(),
        }));

        let response = backend
            .generate_structured_analysis("prompt", &serde_json::json!({}))
            .await
            .unwrap();
        assert_eq!(response.text, "{}");

        // Queue exhausted
        assert!(backend
            .generate_structured_analysis("prompt", &serde_json::json!({}))
            .await
            .is_err());

        assert_eq!(
            backend.calls(),
            vec![ScriptedCall::Analysis, ScriptedCall::Analysis]
        );
        assert_eq!(backend.call_count(ScriptedCall::Image), 0);
    }
}
