//! Label taxonomy
//!
//! Closed sets of valid Theme and Impact values. Anything a classifier
//! returns outside the sets is coerced to a fixed fallback before it ever
//! reaches a cell.

use serde::{Deserialize, Serialize};

/// The closed Theme and Impact vocabularies plus their fallbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Taxonomy {
    pub themes: Vec<String>,
    pub impacts: Vec<String>,
    pub fallback_theme: String,
    pub fallback_impact: String,
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self {
            themes: [
                "Feature Request",
                "Bug Report",
                "Usability",
                "Performance",
                "Integration",
                "Other",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            impacts: ["High", "Medium", "Low"].iter().map(|s| s.to_string()).collect(),
            fallback_theme: "Other".to_string(),
            fallback_impact: "Low".to_string(),
        }
    }
}

impl Taxonomy {
    /// Canonical theme for `raw`, or the fallback when `raw` is not in the
    /// closed set. Matching is case-insensitive on the trimmed input.
    pub fn coerce_theme(&self, raw: &str) -> &str {
        Self::canonical(&self.themes, raw).unwrap_or(&self.fallback_theme)
    }

    /// Canonical impact for `raw`, or the fallback.
    pub fn coerce_impact(&self, raw: &str) -> &str {
        Self::canonical(&self.impacts, raw).unwrap_or(&self.fallback_impact)
    }

    fn canonical<'a>(set: &'a [String], raw: &str) -> Option<&'a str> {
        let needle = raw.trim();
        set.iter()
            .find(|value| value.eq_ignore_ascii_case(needle))
            .map(String::as_str)
    }
}
