//! Profile assembler and the pipeline entry point.

use serde::{Deserialize, Serialize};
use sprout_core::{Conversation, Insight};
use tracing::debug;

use crate::accumulator::accumulate;
use crate::config::ScoringConfig;
use crate::normalizer::{normalize_axes, rank_interests};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Personality {
    pub curiosity: u32,
    pub creativity: u32,
    pub social: u32,
    pub analytical: u32,
    pub emotional: u32,
    pub physical: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interest {
    pub category: String,
    pub strength: u32,
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Development {
    pub cognitive: u32,
    pub language: u32,
    pub social: u32,
    pub emotional: u32,
    pub physical: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningStyle {
    pub visual: u32,
    pub auditory: u32,
    pub kinesthetic: u32,
    pub reading: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationPatterns {
    pub question_asking: u32,
    pub story_telling: u32,
    pub hypothetical: u32,
    pub factual: u32,
}

/// Normalized visualization metrics for one child. Derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationProfile {
    pub personality: Personality,
    pub interests: Vec<Interest>,
    pub development: Development,
    pub learning_style: LearningStyle,
    pub conversation_patterns: ConversationPatterns,
}

/// Run the full pipeline: classify, accumulate, normalize, assemble.
///
/// Deterministic and side-effect free apart from logging. Empty input yields
/// the default interests with every floor applied.
pub fn compute_visualization(
    insights: &[Insight],
    conversations: &[Conversation],
    config: &ScoringConfig,
) -> VisualizationProfile {
    let raw = accumulate(insights, conversations, config);
    let max = config.axis_max_expected;

    let [curiosity, creativity, social, analytical, emotional, physical] =
        normalize_axes(&raw.personality, max, &[0; 6]);
    let [visual, auditory, kinesthetic, reading] =
        normalize_axes(&raw.learning_style, max, &[config.learning_style_floor; 4]);
    let [cognitive, language, dev_social, dev_emotional, dev_physical] =
        normalize_axes(&raw.development, max, &config.development_floors);
    let [question_asking, story_telling, hypothetical, factual] =
        normalize_axes(&raw.conversation_patterns, max, &[0; 4]);

    let profile = VisualizationProfile {
        personality: Personality {
            curiosity,
            creativity,
            social,
            analytical,
            emotional,
            physical,
        },
        interests: rank_interests(&raw.interests, config),
        development: Development {
            cognitive,
            language,
            social: dev_social,
            emotional: dev_emotional,
            physical: dev_physical,
        },
        learning_style: LearningStyle {
            visual,
            auditory,
            kinesthetic,
            reading,
        },
        conversation_patterns: ConversationPatterns {
            question_asking,
            story_telling,
            hypothetical,
            factual,
        },
    };

    debug!(
        subsystem = "insights",
        component = "profile",
        op = "compute_visualization",
        insight_count = insights.len().min(config.max_insights),
        conversation_count = conversations.len().min(config.max_conversations),
        interest_count = profile.interests.len(),
        "Visualization profile computed"
    );

    profile
}
