//! Data models for the generation pipeline.

use serde::{Deserialize, Serialize};

/// The user-supplied book identity. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRequest {
    pub title: String,
    pub author: String,
}

impl BookRequest {
    /// Create a new request.
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
        }
    }

    /// Check that both title and author are non-empty.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.title.trim().is_empty() || self.author.trim().is_empty() {
            return Err(crate::error::LibrettoError::InvalidInput(
                "Please enter both title and author".to_string(),
            ));
        }
        Ok(())
    }
}

/// Structured output of the analysis stage.
///
/// Every field is required; the backend response is rejected as a schema
/// failure if any is absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub executive_summary: String,
    pub key_concepts: Vec<KeyConcept>,
    pub actionable_insights: Vec<String>,
    pub historical_context: String,
    pub chapter_breakdown: Vec<ChapterSummary>,
    pub visual_metaphor_prompt: String,
    pub contemporary_relevance: String,
}

/// One key concept with a 1-100 importance rating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyConcept {
    pub title: String,
    pub description: String,
    pub importance: u8,
}

/// One chapter with its key takeaway.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterSummary {
    pub chapter: String,
    pub key_takeaway: String,
}

/// An externally retrieved reference cited by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
    pub title: String,
    pub uri: String,
}

/// Aggregate result of a completed generation run.
///
/// Only constructed after both the analysis and image stages succeed, in
/// that order; never carries partial results.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutcome {
    pub request: BookRequest,
    pub analysis: AnalysisResult,
    /// Data URI of the generated illustration.
    pub image_uri: String,
    pub sources: Vec<GroundingSource>,
}
