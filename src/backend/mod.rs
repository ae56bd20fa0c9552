//! Generative backend abstraction for Libretto.
//!
//! The backend is the one true external boundary: an opaque service exposing
//! structured-text generation with web grounding, image generation from a
//! prompt, and speech synthesis from text. The pipeline and session are
//! written against this trait so they can be exercised with a deterministic
//! scripted implementation instead of the network.

mod gemini;
mod scripted;

pub use gemini::GeminiBackend;
pub use scripted::{ScriptedBackend, ScriptedCall};

use crate::error::Result;
use async_trait::async_trait;

/// A citation the backend attached to generated text.
///
/// Only entries that reference a web resource are usable downstream; the
/// pipeline drops the rest.
#[derive(Debug, Clone)]
pub struct GroundingChunk {
    pub web: Option<WebReference>,
}

/// A web resource cited by the backend.
#[derive(Debug, Clone)]
pub struct WebReference {
    /// Page title, if the backend reported one.
    pub title: Option<String>,
    pub uri: String,
}

/// Raw result of the structured-text operation.
#[derive(Debug, Clone)]
pub struct StructuredResponse {
    /// The text payload, expected to contain a JSON object.
    pub text: String,
    /// Grounding citations in backend order.
    pub grounding_chunks: Vec<GroundingChunk>,
}

/// Result of an image or audio operation: an ordered sequence of content
/// parts, some of which may carry inline binary data.
#[derive(Debug, Clone, Default)]
pub struct MediaResponse {
    pub parts: Vec<MediaPart>,
}

/// One content part of a media response.
#[derive(Debug, Clone, Default)]
pub struct MediaPart {
    /// Declared content type of inline data, if any.
    pub mime_type: Option<String>,
    /// Base64-encoded inline binary payload, if this part carries one.
    pub data: Option<String>,
}

impl MediaResponse {
    /// The base64 payload of the first part carrying inline data.
    pub fn first_inline_data(&self) -> Option<&str> {
        self.parts.iter().find_map(|p| p.data.as_deref())
    }
}

/// Trait for generative backend providers.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Generate text constrained to a JSON schema, with web grounding enabled.
    async fn generate_structured_analysis(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> Result<StructuredResponse>;

    /// Generate an image from a prompt at the given aspect ratio.
    async fn generate_image(&self, prompt: &str, aspect_ratio: &str) -> Result<MediaResponse>;

    /// Synthesize speech from text using a fixed named voice.
    async fn generate_audio(&self, text: &str, voice: &str) -> Result<MediaResponse>;
}
