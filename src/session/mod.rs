//! Session lifecycle state machine.
//!
//! Tracks the user-visible lifecycle of a single analysis request as a
//! tagged state, so illegal combinations ("ready and still generating")
//! cannot be represented. All mutation goes through the transition methods;
//! the state is never touched directly by callers.

use crate::audio::PcmAudioBuffer;
use crate::error::{LibrettoError, Result};
use crate::pipeline::{BookRequest, GenerationOutcome, GenerationPipeline};
use tracing::{debug, info, warn};

/// The lifecycle state of an analysis session.
#[derive(Debug, Clone)]
pub enum SessionState {
    /// No request submitted yet, or cleared by reset.
    Idle,
    /// A generation run is in flight.
    Running { request: BookRequest },
    /// Both pipeline stages succeeded.
    Ready { outcome: GenerationOutcome },
    /// A pipeline stage failed.
    Failed {
        request: BookRequest,
        message: String,
    },
}

/// The narration sub-state, independent of the main lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarrationState {
    NotPlaying,
    Requesting,
    Playing,
}

/// Owns the session state and drives the pipeline through its transitions.
pub struct Session {
    pipeline: GenerationPipeline,
    state: SessionState,
    narration: NarrationState,
}

impl Session {
    /// Create a new idle session.
    pub fn new(pipeline: GenerationPipeline) -> Self {
        Self {
            pipeline,
            state: SessionState::Idle,
            narration: NarrationState::NotPlaying,
        }
    }

    /// The current lifecycle state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The current narration sub-state.
    pub fn narration(&self) -> NarrationState {
        self.narration
    }

    /// The completed outcome, if the session is ready.
    pub fn outcome(&self) -> Option<&GenerationOutcome> {
        match &self.state {
            SessionState::Ready { outcome } => Some(outcome),
            _ => None,
        }
    }

    /// Submit a request and run the full generation sequence.
    ///
    /// The guard rejects requests with an empty title or author without
    /// leaving the current state. On success the previous outcome is
    /// replaced atomically; on any stage failure the session transitions
    /// to `Failed` with a single human-readable message.
    pub async fn submit(&mut self, request: BookRequest) -> Result<&GenerationOutcome> {
        if matches!(self.state, SessionState::Running { .. }) {
            return Err(LibrettoError::InvalidInput(
                "A generation run is already in progress".to_string(),
            ));
        }

        request.validate()?;

        info!("Submitting \"{}\" by {}", request.title, request.author);
        self.state = SessionState::Running {
            request: request.clone(),
        };

        match self.pipeline.generate(&request).await {
            Ok(outcome) => {
                self.state = SessionState::Ready { outcome };
                match &self.state {
                    SessionState::Ready { outcome } => Ok(outcome),
                    _ => unreachable!(),
                }
            }
            Err(e) => {
                warn!("Generation failed: {}", e);
                self.state = SessionState::Failed {
                    request,
                    message: e.to_string(),
                };
                Err(e)
            }
        }
    }

    /// Clear the outcome or error and return to idle.
    pub fn reset(&mut self) {
        self.state = SessionState::Idle;
        self.narration = NarrationState::NotPlaying;
    }

    /// Trigger narration of the executive summary.
    ///
    /// Only valid once the session is ready. A repeated trigger while a
    /// narration is requesting or playing is a no-op returning `None` and
    /// makes no backend call. Narration failures are logged and revert the
    /// sub-state without touching the main session state.
    pub async fn narrate(&mut self) -> Result<Option<PcmAudioBuffer>> {
        let summary = match &self.state {
            SessionState::Ready { outcome } => outcome.analysis.executive_summary.clone(),
            _ => {
                return Err(LibrettoError::InvalidInput(
                    "Nothing to narrate: no completed analysis".to_string(),
                ))
            }
        };

        if self.narration != NarrationState::NotPlaying {
            debug!("Narration already in flight, ignoring trigger");
            return Ok(None);
        }

        self.narration = NarrationState::Requesting;
        match self.pipeline.run_audio_narration(&summary).await {
            Ok(buffer) => {
                self.narration = NarrationState::Playing;
                Ok(Some(buffer))
            }
            Err(e) => {
                warn!("Narration failed: {}", e);
                self.narration = NarrationState::NotPlaying;
                Ok(None)
            }
        }
    }

    /// Mark the current narration as finished.
    pub fn finish_narration(&mut self) {
        self.narration = NarrationState::NotPlaying;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{
        GroundingChunk, MediaPart, MediaResponse, ScriptedBackend, ScriptedCall,
        StructuredResponse, WebReference,
    };
    use crate::codec::encode_base64;
    use crate::config::Settings;
    use std::sync::Arc;

    fn analysis_json() -> String {
        r#"{
            "executiveSummary": "A dual-process account of judgment.",
            "keyConcepts": [{"title": "System 1", "description": "Fast thinking", "importance": 95}],
            "actionableInsights": ["Slow down on hard calls"],
            "historicalContext": "Rooted in 1970s heuristics research.",
            "chapterBreakdown": [{"chapter": "Part 1", "keyTakeaway": "Two systems"}],
            "visualMetaphorPrompt": "Two rivers merging at dusk",
            "contemporaryRelevance": "Behavioral economics everywhere."
        }"#
        .to_string()
    }

    fn session_with(backend: Arc<ScriptedBackend>) -> Session {
        Session::new(GenerationPipeline::new(backend, Settings::default()))
    }

    fn push_successful_run(backend: &ScriptedBackend) {
        backend.push_analysis(Ok(StructuredResponse {
            text: analysis_json(),
            grounding_chunks: vec![GroundingChunk {
                web: Some(WebReference {
                    title: Some("Britannica".to_string()),
                    uri: "https://britannica.com/kahneman".to_string(),
                }),
            }],
        }));
        backend.push_image(Ok(MediaResponse {
            parts: vec![MediaPart {
                mime_type: Some("image/png".to_string()),
                data: Some("UE5HYnl0ZXM=".to_string()),
            }],
        }));
    }

    #[tokio::test]
    async fn test_empty_input_never_leaves_idle() {
        let backend = Arc::new(ScriptedBackend::new());
        let mut session = session_with(backend.clone());

        let result = session.submit(BookRequest::new("", "Kahneman")).await;
        assert!(matches!(result, Err(LibrettoError::InvalidInput(_))));
        assert!(matches!(session.state(), SessionState::Idle));

        let result = session.submit(BookRequest::new("Thinking", "")).await;
        assert!(matches!(result, Err(LibrettoError::InvalidInput(_))));
        assert!(matches!(session.state(), SessionState::Idle));

        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_successful_run_reaches_ready() {
        let backend = Arc::new(ScriptedBackend::new());
        push_successful_run(&backend);
        let mut session = session_with(backend.clone());

        // Submit hands back the outcome directly; callers need not re-fetch it
        let outcome = session
            .submit(BookRequest::new(
                "Thinking, Fast and Slow",
                "Daniel Kahneman",
            ))
            .await
            .unwrap();
        assert_eq!(outcome.sources.len(), 1);
        assert_eq!(outcome.sources[0].title, "Britannica");

        assert!(session.outcome().is_some());
        assert_eq!(
            backend.calls(),
            vec![ScriptedCall::Analysis, ScriptedCall::Image]
        );
    }

    #[tokio::test]
    async fn test_stage_failure_reaches_failed_and_reset_clears() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_analysis(Ok(StructuredResponse {
            text: "not json at all".to_string(),
            grounding_chunks: Vec::new(),
        }));
        let mut session = session_with(backend.clone());

        let result = session.submit(BookRequest::new("Dune", "Frank Herbert")).await;
        assert!(result.is_err());

        match session.state() {
            SessionState::Failed { request, message } => {
                assert_eq!(request.title, "Dune");
                assert!(message.contains("schema validation"));
            }
            other => panic!("expected Failed, got {:?}", other),
        }
        assert_eq!(backend.call_count(ScriptedCall::Image), 0);

        session.reset();
        assert!(matches!(session.state(), SessionState::Idle));
        assert!(session.outcome().is_none());
    }

    #[tokio::test]
    async fn test_resubmit_after_failure_replaces_outcome() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_analysis(Ok(StructuredResponse {
            text: "broken".to_string(),
            grounding_chunks: Vec::new(),
        }));
        push_successful_run(&backend);
        let mut session = session_with(backend);

        assert!(session
            .submit(BookRequest::new("Dune", "Frank Herbert"))
            .await
            .is_err());
        assert!(matches!(session.state(), SessionState::Failed { .. }));

        session
            .submit(BookRequest::new("Dune", "Frank Herbert"))
            .await
            .unwrap();
        assert!(matches!(session.state(), SessionState::Ready { .. }));
    }

    #[tokio::test]
    async fn test_repeated_narration_trigger_is_noop() {
        let backend = Arc::new(ScriptedBackend::new());
        push_successful_run(&backend);
        backend.push_audio(Ok(MediaResponse {
            parts: vec![MediaPart {
                mime_type: Some("audio/pcm".to_string()),
                data: Some(encode_base64(&vec![0u8; 4800])),
            }],
        }));
        let mut session = session_with(backend.clone());

        session
            .submit(BookRequest::new("Thinking", "Kahneman"))
            .await
            .unwrap();

        let first = session.narrate().await.unwrap();
        assert!(first.is_some());
        assert_eq!(session.narration(), NarrationState::Playing);

        // Second trigger while still playing: no-op, no extra backend call
        let second = session.narrate().await.unwrap();
        assert!(second.is_none());
        assert_eq!(backend.call_count(ScriptedCall::Audio), 1);

        session.finish_narration();
        assert_eq!(session.narration(), NarrationState::NotPlaying);
    }

    #[tokio::test]
    async fn test_narration_failure_reverts_substate_only() {
        let backend = Arc::new(ScriptedBackend::new());
        push_successful_run(&backend);
        backend.push_audio(Ok(MediaResponse::default())); // no inline audio
        let mut session = session_with(backend);

        session
            .submit(BookRequest::new("Thinking", "Kahneman"))
            .await
            .unwrap();

        let result = session.narrate().await.unwrap();
        assert!(result.is_none());
        assert_eq!(session.narration(), NarrationState::NotPlaying);
        // Main state untouched
        assert!(matches!(session.state(), SessionState::Ready { .. }));
    }

    #[tokio::test]
    async fn test_narrate_without_outcome_is_invalid() {
        let backend = Arc::new(ScriptedBackend::new());
        let mut session = session_with(backend);

        let result = session.narrate().await;
        assert!(matches!(result, Err(LibrettoError::InvalidInput(_))));
    }
}
