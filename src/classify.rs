//! Classification client — integration with the external labelling model
//!
//! Defines the client trait and response type for classifying feedback
//! rows. The model is an opaque oracle: the core validates its output
//! against the taxonomy and never assumes it obeyed the prompt.
//!
//! `MockClassifier` returns preconfigured responses for testing.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result of classifying one feedback row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    #[serde(alias = "Theme")]
    pub theme: String,
    #[serde(alias = "Impact")]
    pub impact: String,
    #[serde(default, alias = "Confidence")]
    pub confidence: f32,
}

impl Classification {
    pub fn new(theme: impl Into<String>, impact: impl Into<String>, confidence: f32) -> Self {
        Self {
            theme: theme.into(),
            impact: impact.into(),
            confidence,
        }
    }
}

/// Errors from classification client operations.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("classifier not available: {0}")]
    Unavailable(String),

    #[error("classification failed: {0}")]
    Failed(String),

    #[error("response parse error: {0}")]
    Parse(String),
}

/// Client trait for the classification model.
///
/// Abstracts over transport (HTTP, subprocess, mock) so the labelling
/// service doesn't depend on how the model is reached.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(
        &self,
        subject: &str,
        description: &str,
    ) -> Result<Classification, ClassifyError>;
}

/// Extract a JSON object from raw model reply text.
///
/// Models sometimes wrap JSON in markdown code fences or add explanation
/// text. Tries, in order: direct parse, a ```json fenced block, then the
/// first `{` to last `}` span.
fn extract_json(text: &str) -> Option<serde_json::Value> {
    let trimmed = text.trim();

    if let Ok(v) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if v.is_object() {
            return Some(v);
        }
    }

    let fenced = if let Some(start) = trimmed.find("```json") {
        let after = &trimmed[start + 7..];
        after.find("```").map(|end| &after[..end])
    } else if let Some(start) = trimmed.find("```\n") {
        let after = &trimmed[start + 4..];
        after.find("```").map(|end| &after[..end])
    } else {
        None
    };

    if let Some(block) = fenced {
        if let Ok(v) = serde_json::from_str::<serde_json::Value>(block.trim()) {
            if v.is_object() {
                return Some(v);
            }
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            if let Ok(v) = serde_json::from_str::<serde_json::Value>(&trimmed[start..=end]) {
                if v.is_object() {
                    return Some(v);
                }
            }
        }
    }

    None
}

/// Parse a raw model reply into a `Classification`.
///
/// Accepts both lowercase and capitalized key spellings, since models drift
/// on casing despite the prompt.
pub fn parse_classification(text: &str) -> Result<Classification, ClassifyError> {
    let value = extract_json(text)
        .ok_or_else(|| ClassifyError::Parse("no JSON object in response".to_string()))?;
    serde_json::from_value(value).map_err(|e| ClassifyError::Parse(e.to_string()))
}

/// Mock classifier for testing — returns preconfigured responses.
#[derive(Default)]
pub struct MockClassifier {
    /// Responses keyed by subject text
    responses: HashMap<String, Classification>,
    /// Returned when no subject-specific response is registered
    fallback: Option<Classification>,
    /// When set, every call fails with this message
    failure: Option<String>,
}

impl MockClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a response for a specific subject.
    pub fn with_response(mut self, subject: impl Into<String>, response: Classification) -> Self {
        self.responses.insert(subject.into(), response);
        self
    }

    /// Set the response returned for any unregistered subject.
    pub fn with_fallback(mut self, response: Classification) -> Self {
        self.fallback = Some(response);
        self
    }

    /// Create a classifier where every call fails.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    async fn classify(
        &self,
        subject: &str,
        _description: &str,
    ) -> Result<Classification, ClassifyError> {
        if let Some(message) = &self.failure {
            return Err(ClassifyError::Failed(message.clone()));
        }
        self.responses
            .get(subject)
            .or(self.fallback.as_ref())
            .cloned()
            .ok_or_else(|| {
                ClassifyError::Failed(format!("no mock response for subject '{}'", subject))
            })
    }
}
