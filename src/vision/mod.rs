//! Vision Input
//!
//! Text observations as delivered by the OCR collaborator, and the filter
//! the scan applies before any normalization happens.

use serde::{Deserialize, Serialize};

/// Default minimum OCR confidence for a snippet to be considered
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.5;

/// Default minimum snippet length in characters
pub const DEFAULT_MIN_TEXT_LEN: usize = 2;

/// A recognized text snippet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextObservation {
    /// Recognized text content
    pub text: String,
    /// Confidence score (0.0 - 1.0)
    #[serde(default = "full_confidence")]
    pub confidence: f32,
}

fn full_confidence() -> f32 {
    1.0
}

impl TextObservation {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }
}

/// Caller-side policy for discarding weak snippets
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservationFilter {
    /// Snippets must be strictly more confident than this
    pub min_confidence: f32,
    /// Snippets must have at least this many characters
    pub min_text_len: usize,
}

impl Default for ObservationFilter {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            min_text_len: DEFAULT_MIN_TEXT_LEN,
        }
    }
}

impl ObservationFilter {
    pub fn accepts(&self, observation: &TextObservation) -> bool {
        observation.confidence > self.min_confidence
            && observation.text.chars().count() >= self.min_text_len
    }
}

/// Texts of the observations that pass the filter, in input order
pub fn filter_observations<'a>(
    observations: &'a [TextObservation],
    filter: &ObservationFilter,
) -> Vec<&'a str> {
    observations
        .iter()
        .filter(|observation| filter.accepts(observation))
        .map(|observation| observation.text.as_str())
        .collect()
}
