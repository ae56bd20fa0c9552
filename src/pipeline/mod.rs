//! The generation pipeline for Libretto.
//!
//! Runs the ordered, dependent sequence of backend calls: structured
//! analysis first, then image generation from a field of the analysis,
//! plus an independent on-demand audio narration stage.

mod models;

pub use models::{
    AnalysisResult, BookRequest, ChapterSummary, GenerationOutcome, GroundingSource, KeyConcept,
};

use crate::audio::PcmAudioBuffer;
use crate::backend::GenerativeBackend;
use crate::codec::decode_base64;
use crate::config::Settings;
use crate::error::{LibrettoError, Result};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Orchestrates the backend calls that produce a [`GenerationOutcome`].
pub struct GenerationPipeline {
    backend: Arc<dyn GenerativeBackend>,
    settings: Settings,
}

impl GenerationPipeline {
    /// Create a new pipeline.
    pub fn new(backend: Arc<dyn GenerativeBackend>, settings: Settings) -> Self {
        Self { backend, settings }
    }

    /// Run the full dependent sequence: analysis, then image.
    ///
    /// The image stage consumes `visual_metaphor_prompt` from the analysis,
    /// so it can only ever start after the analysis has parsed and validated.
    /// No partial outcome is returned.
    #[instrument(skip(self), fields(title = %request.title))]
    pub async fn generate(&self, request: &BookRequest) -> Result<GenerationOutcome> {
        let (analysis, sources) = self.run_analysis(request).await?;
        let image_uri = self.run_image_generation(&analysis).await?;

        Ok(GenerationOutcome {
            request: request.clone(),
            analysis,
            image_uri,
            sources,
        })
    }

    /// Run the structured analysis stage.
    ///
    /// Requests a JSON object conforming to the analysis schema, with web
    /// grounding and an extended reasoning budget. The raw text is parsed
    /// and validated; grounding citations referencing a web resource are
    /// kept in backend order, with missing titles defaulting to "Reference".
    #[instrument(skip(self), fields(title = %request.title))]
    pub async fn run_analysis(
        &self,
        request: &BookRequest,
    ) -> Result<(AnalysisResult, Vec<GroundingSource>)> {
        let prompt = format!(
            "Create a professional 'Pro Version' analysis of the book \"{}\" by {}. \
             Focus on executive-level insights, conceptual architecture, and actionable intelligence. \
             Use thinking to ensure deep historical and contemporary accuracy.",
            request.title, request.author
        );

        info!("Requesting structured analysis");
        let response = self
            .backend
            .generate_structured_analysis(&prompt, &analysis_schema())
            .await?;

        let analysis = parse_analysis(&response.text)?;

        let sources: Vec<GroundingSource> = response
            .grounding_chunks
            .into_iter()
            .filter_map(|chunk| chunk.web)
            .map(|web| GroundingSource {
                title: web.title.unwrap_or_else(|| "Reference".to_string()),
                uri: web.uri,
            })
            .collect();

        debug!("Analysis parsed with {} grounding sources", sources.len());
        Ok((analysis, sources))
    }

    /// Run the image stage.
    ///
    /// Takes the analysis itself rather than a free-form prompt: the stage
    /// has a data dependency on `visual_metaphor_prompt` and must not run
    /// before the analysis exists.
    #[instrument(skip(self, analysis))]
    pub async fn run_image_generation(&self, analysis: &AnalysisResult) -> Result<String> {
        let prompt = format!(
            "A high-end, professional concept art illustration of: {}. \
             Cinematic lighting, 8k, elegant design.",
            analysis.visual_metaphor_prompt
        );

        info!("Requesting illustration");
        let response = self.backend.generate_image(&prompt, "16:9").await?;

        let payload = response.first_inline_data().ok_or(LibrettoError::NoImage)?;
        Ok(format!("data:image/png;base64,{}", payload))
    }

    /// Run the narration stage.
    ///
    /// Independent of the image stage; may be triggered at any time once
    /// there is text to narrate. The returned buffer is mono PCM at the
    /// configured sample rate, decoded and assembled locally.
    #[instrument(skip(self, text))]
    pub async fn run_audio_narration(&self, text: &str) -> Result<PcmAudioBuffer> {
        let prompt = format!("Narrate this book brief professionally and calmly: {}", text);

        info!("Requesting narration");
        let response = self
            .backend
            .generate_audio(&prompt, &self.settings.backend.voice)
            .await?;

        let payload = response.first_inline_data().ok_or(LibrettoError::NoAudio)?;
        let bytes = decode_base64(payload)?;

        PcmAudioBuffer::from_pcm16(
            &bytes,
            self.settings.narration.sample_rate,
            self.settings.narration.channels,
        )
    }
}

/// Parse the analysis stage's raw text into a validated [`AnalysisResult`].
///
/// The backend is asked for pure JSON but may still wrap it in prose or a
/// code fence, so the outermost object is extracted before parsing.
fn parse_analysis(text: &str) -> Result<AnalysisResult> {
    let json_start = text.find('{');
    let json_end = text.rfind('}');

    let json_str = match (json_start, json_end) {
        (Some(start), Some(end)) if end > start => &text[start..=end],
        _ => text,
    };

    serde_json::from_str(json_str).map_err(|e| {
        LibrettoError::Schema(format!(
            "Failed to parse analysis response: {}. Response was: {}",
            e,
            text.chars().take(500).collect::<String>()
        ))
    })
}

/// JSON schema the analysis response must conform to.
fn analysis_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "executiveSummary": { "type": "STRING" },
            "keyConcepts": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "description": { "type": "STRING" },
                        "importance": { "type": "NUMBER" }
                    },
                    "required": ["title", "description", "importance"]
                }
            },
            "actionableInsights": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            },
            "historicalContext": { "type": "STRING" },
            "chapterBreakdown": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "chapter": { "type": "STRING" },
                        "keyTakeaway": { "type": "STRING" }
                    },
                    "required": ["chapter", "keyTakeaway"]
                }
            },
            "visualMetaphorPrompt": { "type": "STRING" },
            "contemporaryRelevance": { "type": "STRING" }
        },
        "required": [
            "executiveSummary", "keyConcepts", "actionableInsights",
            "historicalContext", "chapterBreakdown", "visualMetaphorPrompt",
            "contemporaryRelevance"
        ]
    })
}
