//! Weights, caps, and floors for the visualization pipeline.

use serde::{Deserialize, Serialize};
use sprout_core::defaults;

/// Configuration for visualization scoring.
///
/// # Weights
///
/// | Group | Weight per matching insight |
/// |-------|-----------------------------|
/// | Personality | confidence x 20 |
/// | Interests | matching keywords x confidence |
/// | Learning style | confidence x 15 |
/// | Development | confidence x 15 |
/// | Conversation patterns | confidence x 10 |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Most-recent insights considered
    pub max_insights: usize,
    /// Most-recent conversation transcripts scanned
    pub max_conversations: usize,
    /// Example titles kept per interest
    pub max_examples: usize,
    /// Interests kept after ranking
    pub max_interests: usize,

    /// Confidence used when an insight has none
    pub default_confidence: f64,
    pub personality_weight: f64,
    pub learning_style_weight: f64,
    pub development_weight: f64,
    pub conversation_pattern_weight: f64,

    /// Curiosity added per '?' in a transcript
    pub transcript_question_weight: f64,
    /// Cap on the per-transcript question bonus
    pub transcript_question_cap: f64,
    /// Creativity added per transcript mentioning create/imagine/pretend
    pub transcript_creativity_bonus: f64,

    /// Raw score mapped to 100 for the axis groups
    pub axis_max_expected: f64,
    /// Raw strength mapped to 100 for interests
    pub interest_max_expected: f64,
    /// Interests at or below this normalized strength are dropped
    pub interest_threshold: u32,

    /// Floors for cognitive, language, social, emotional, physical
    pub development_floors: [u32; 5],
    /// Floor for every learning-style axis
    pub learning_style_floor: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            max_insights: defaults::VISUALIZATION_MAX_INSIGHTS,
            max_conversations: defaults::VISUALIZATION_MAX_CONVERSATIONS,
            max_examples: defaults::VISUALIZATION_MAX_EXAMPLES,
            max_interests: defaults::VISUALIZATION_MAX_INTERESTS,
            default_confidence: defaults::DEFAULT_CONFIDENCE,
            personality_weight: 20.0,
            learning_style_weight: 15.0,
            development_weight: 15.0,
            conversation_pattern_weight: 10.0,
            transcript_question_weight: 2.0,
            transcript_question_cap: 10.0,
            transcript_creativity_bonus: 5.0,
            axis_max_expected: 100.0,
            interest_max_expected: 20.0,
            interest_threshold: 10,
            development_floors: [40, 40, 35, 35, 45],
            learning_style_floor: 25,
        }
    }
}

impl ScoringConfig {
    /// Effective confidence for scoring: absent or non-finite values use the
    /// default, everything else is clamped into [0, 1].
    pub fn confidence(&self, confidence: Option<f64>) -> f64 {
        match confidence {
            Some(c) if c.is_finite() => c.clamp(0.0, 1.0),
            _ => self.default_confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_caps() {
        let config = ScoringConfig::default();
        assert_eq!(config.max_insights, 50);
        assert_eq!(config.max_conversations, 20);
        assert_eq!(config.max_examples, 4);
        assert_eq!(config.max_interests, 8);
    }

    #[test]
    fn test_default_floors() {
        let config = ScoringConfig::default();
        assert_eq!(config.development_floors, [40, 40, 35, 35, 45]);
        assert_eq!(config.learning_style_floor, 25);
    }

    #[test]
    fn test_confidence_defaults_and_clamps() {
        let config = ScoringConfig::default();
        assert_eq!(config.confidence(None), 0.5);
        assert_eq!(config.confidence(Some(f64::NAN)), 0.5);
        assert_eq!(config.confidence(Some(1.7)), 1.0);
        assert_eq!(config.confidence(Some(-0.2)), 0.0);
        assert_eq!(config.confidence(Some(0.85)), 0.85);
    }
}
