//! Gemini REST API backend implementation.

use super::{
    GenerativeBackend, GroundingChunk, MediaPart, MediaResponse, StructuredResponse, WebReference,
};
use crate::config::Settings;
use crate::error::{LibrettoError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, instrument};

/// Environment variable holding the API key.
const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Gemini-backed implementation of [`GenerativeBackend`].
pub struct GeminiBackend {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    analysis_model: String,
    image_model: String,
    tts_model: String,
    thinking_budget: u32,
}

impl GeminiBackend {
    /// Create a backend from settings. The API key is read from the
    /// `GEMINI_API_KEY` environment variable.
    pub fn new(settings: &Settings) -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| {
            LibrettoError::Config(format!("{} environment variable is not set", API_KEY_ENV))
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.backend.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            api_base: settings.backend.api_base.trim_end_matches('/').to_string(),
            api_key,
            analysis_model: settings.backend.analysis_model.clone(),
            image_model: settings.backend.image_model.clone(),
            tts_model: settings.backend.tts_model.clone(),
            thinking_budget: settings.backend.thinking_budget,
        })
    }

    /// POST a generateContent request for the given model and return the
    /// first candidate.
    async fn generate_content(
        &self,
        model: &str,
        body: serde_json::Value,
    ) -> Result<Candidate> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base, model
        );

        debug!("Calling {} ", url);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(LibrettoError::Backend(format!(
                "{} returned {}: {}",
                model,
                status,
                detail.chars().take(500).collect::<String>()
            )));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        parsed
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| LibrettoError::Backend(format!("{} returned no candidates", model)))
    }
}

#[async_trait]
impl GenerativeBackend for GeminiBackend {
    #[instrument(skip(self, prompt, schema))]
    async fn generate_structured_analysis(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> Result<StructuredResponse> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "tools": [{ "googleSearch": {} }],
            "generationConfig": {
                "thinkingConfig": { "thinkingBudget": self.thinking_budget },
                "responseMimeType": "application/json",
                "responseSchema": schema,
            },
        });

        let candidate = self.generate_content(&self.analysis_model, body).await?;

        let text = candidate
            .content
            .as_ref()
            .map(|c| {
                c.parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(LibrettoError::Backend(
                "Analysis response contained no text".to_string(),
            ));
        }

        let grounding_chunks = candidate
            .grounding_metadata
            .map(|m| {
                m.grounding_chunks
                    .into_iter()
                    .map(|chunk| GroundingChunk {
                        web: chunk.web.and_then(|w| {
                            w.uri.map(|uri| WebReference {
                                title: w.title,
                                uri,
                            })
                        }),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(StructuredResponse {
            text,
            grounding_chunks,
        })
    }

    #[instrument(skip(self, prompt))]
    async fn generate_image(&self, prompt: &str, aspect_ratio: &str) -> Result<MediaResponse> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "imageConfig": { "aspectRatio": aspect_ratio },
            },
        });

        let candidate = self.generate_content(&self.image_model, body).await?;
        Ok(candidate_to_media(candidate))
    }

    #[instrument(skip(self, text))]
    async fn generate_audio(&self, text: &str, voice: &str) -> Result<MediaResponse> {
        let body = json!({
            "contents": [{ "parts": [{ "text": text }] }],
            "generationConfig": {
                "responseModalities": ["AUDIO"],
                "speechConfig": {
                    "voiceConfig": {
                        "prebuiltVoiceConfig": { "voiceName": voice },
                    },
                },
            },
        });

        let candidate = self.generate_content(&self.tts_model, body).await?;
        Ok(candidate_to_media(candidate))
    }
}

fn candidate_to_media(candidate: Candidate) -> MediaResponse {
    let parts = candidate
        .content
        .map(|c| {
            c.parts
                .into_iter()
                .map(|p| match p.inline_data {
                    Some(inline) => MediaPart {
                        mime_type: inline.mime_type,
                        data: Some(inline.data),
                    },
                    None => MediaPart::default(),
                })
                .collect()
        })
        .unwrap_or_default();

    MediaResponse { parts }
}

// Wire format of the generateContent response, reduced to the fields we read.

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    text: Option<String>,
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: Option<String>,
    data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<RawGroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct RawGroundingChunk {
    web: Option<RawWebReference>,
}

#[derive(Debug, Deserialize)]
struct RawWebReference {
    title: Option<String>,
    uri: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_deserialization() {
        let raw = r#"{
            "candidates": [{
                "content": { "parts": [{ "text": "{\"ok\":true}" }] },
                "groundingMetadata": {
                    "groundingChunks": [
                        { "web": { "title": "Britannica", "uri": "https://britannica.com" } },
                        { "retrievedContext": { "uri": "corpus://1" } }
                    ]
                }
            }]
        }"#;

        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let candidate = &parsed.candidates[0];
        assert_eq!(
            candidate.content.as_ref().unwrap().parts[0].text.as_deref(),
            Some("{\"ok\":true}")
        );
        let chunks = &candidate.grounding_metadata.as_ref().unwrap().grounding_chunks;
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].web.is_some());
        assert!(chunks[1].web.is_none());
    }

    #[test]
    fn test_inline_data_deserialization() {
        let raw = r#"{
            "candidates": [{
                "content": { "parts": [
                    { "text": "here is your image" },
                    { "inlineData": { "mimeType": "image/png", "data": "aGVsbG8=" } }
                ] }
            }]
        }"#;

        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let media = candidate_to_media(parsed.candidates.into_iter().next().unwrap());
        assert_eq!(media.parts.len(), 2);
        assert_eq!(media.first_inline_data(), Some("aGVsbG8="));
        assert_eq!(media.parts[1].mime_type.as_deref(), Some("image/png"));
    }
}
