//! Labelling configuration

use crate::table::MAX_BATCH;
use crate::taxonomy::Taxonomy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Configuration for a labelling run.
///
/// Confidence thresholds are advisory: the service logs sub-threshold
/// classifications but never rejects them — enforcement, if any, belongs to
/// the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub taxonomy: Taxonomy,
    /// Default extraction batch size when the caller supplies none
    pub batch_size: usize,
    /// Per-impact confidence thresholds
    pub confidence_thresholds: HashMap<String, f32>,
    /// Threshold when an impact level has no entry above
    pub default_threshold: f32,
}

impl Default for LabelConfig {
    fn default() -> Self {
        let mut confidence_thresholds = HashMap::new();
        confidence_thresholds.insert("High".to_string(), 0.8);
        confidence_thresholds.insert("Medium".to_string(), 0.7);
        confidence_thresholds.insert("Low".to_string(), 0.6);
        Self {
            taxonomy: Taxonomy::default(),
            batch_size: MAX_BATCH,
            confidence_thresholds,
            default_threshold: 0.7,
        }
    }
}

impl LabelConfig {
    /// Load configuration from a YAML file. Missing keys take defaults.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&raw)?)
    }

    /// The confidence threshold for an impact level.
    pub fn threshold_for(&self, impact: &str) -> f32 {
        self.confidence_thresholds
            .get(impact)
            .copied()
            .unwrap_or(self.default_threshold)
    }

    /// Resolve a caller-supplied batch size: unset or zero falls back to the
    /// configured default, and the result is clamped to `MAX_BATCH`.
    pub fn clamped_batch(&self, requested: Option<usize>) -> usize {
        let batch = match requested {
            Some(0) | None => self.batch_size,
            Some(n) => n,
        };
        batch.min(MAX_BATCH)
    }
}
