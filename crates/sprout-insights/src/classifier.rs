//! Keyword classifier: maps one insight to weighted bucket contributions.

use sprout_core::Insight;
use tracing::{trace, warn};

use crate::config::ScoringConfig;
use crate::keywords::{
    AxisRule, CONVERSATION_PATTERN_RULES, DEVELOPMENT_RULES, INTEREST_RULES,
    LEARNING_STYLE_RULES, PERSONALITY_RULES,
};

/// Weighted contributions of a single insight.
///
/// Axis arrays follow the rule order in [`crate::keywords`]. `interests`
/// holds `(rule index, strength)` for every category with at least one match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    pub personality: [f64; 6],
    pub interests: Vec<(usize, f64)>,
    pub learning_style: [f64; 4],
    pub development: [f64; 5],
    pub conversation_patterns: [f64; 4],
}

/// Lower-cased text searched for keywords: type, category and description.
pub fn haystack(insight: &Insight) -> String {
    format!(
        "{} {} {}",
        insight.insight_type, insight.category, insight.description
    )
    .to_lowercase()
}

fn score_axes<const N: usize>(
    rules: &[AxisRule; N],
    insight_type: &str,
    haystack: &str,
    weight: f64,
) -> [f64; N] {
    let mut out = [0.0; N];
    for (slot, rule) in out.iter_mut().zip(rules.iter()) {
        if rule.matches(insight_type, haystack) {
            *slot = weight;
        }
    }
    out
}

/// Classify one insight.
///
/// Returns `None` when the insight carries metadata that is not valid JSON;
/// such insights contribute nothing and the caller moves on.
pub fn classify(insight: &Insight, config: &ScoringConfig) -> Option<Classification> {
    if let Some(raw) = insight.metadata.as_deref() {
        if let Err(e) = serde_json::from_str::<serde_json::Value>(raw) {
            warn!(
                subsystem = "insights",
                component = "classifier",
                insight_id = %insight.id,
                error = %e,
                "Skipping insight with malformed metadata"
            );
            return None;
        }
    }

    let confidence = config.confidence(insight.confidence);
    let insight_type = insight.insight_type.to_lowercase();
    let text = haystack(insight);

    let interests = INTEREST_RULES
        .iter()
        .enumerate()
        .filter_map(|(idx, rule)| {
            let hits = rule.match_count(&text);
            (hits > 0).then(|| (idx, hits as f64 * confidence))
        })
        .collect();

    let classification = Classification {
        personality: score_axes(
            &PERSONALITY_RULES,
            &insight_type,
            &text,
            confidence * config.personality_weight,
        ),
        interests,
        learning_style: score_axes(
            &LEARNING_STYLE_RULES,
            &insight_type,
            &text,
            confidence * config.learning_style_weight,
        ),
        development: score_axes(
            &DEVELOPMENT_RULES,
            &insight_type,
            &text,
            confidence * config.development_weight,
        ),
        conversation_patterns: score_axes(
            &CONVERSATION_PATTERN_RULES,
            &insight_type,
            &text,
            confidence * config.conversation_pattern_weight,
        ),
    };

    trace!(
        insight_id = %insight.id,
        confidence,
        interest_hits = classification.interests.len(),
        "Insight classified"
    );

    Some(classification)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn insight(insight_type: &str, category: &str, description: &str, conf: Option<f64>) -> Insight {
        Insight {
            id: Uuid::now_v7(),
            child_id: Uuid::nil(),
            conversation_id: None,
            insight_type: insight_type.to_string(),
            category: category.to_string(),
            title: "Example".to_string(),
            description: description.to_string(),
            confidence: conf,
            metadata: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_haystack_is_lowercase_concatenation() {
        let i = insight("CURIOSITY_PATTERN", "Big Sky", "Why?", None);
        assert_eq!(haystack(&i), "curiosity_pattern big sky why?");
    }

    #[test]
    fn test_axis_counted_once_per_insight() {
        let config = ScoringConfig::default();
        // type trigger plus both keywords still add a single weight
        let i = insight("CURIOSITY_PATTERN", "", "why and how", Some(1.0));
        let c = classify(&i, &config).unwrap();
        assert_eq!(c.personality[0], 20.0);
    }

    #[test]
    fn test_interests_count_each_keyword() {
        let config = ScoringConfig::default();
        let i = insight("INTEREST_SIGNAL", "Art", "likes to draw and paint", Some(1.0));
        let c = classify(&i, &config).unwrap();
        assert_eq!(c.interests, vec![(1, 2.0)]);
    }

    #[test]
    fn test_missing_confidence_uses_default() {
        let config = ScoringConfig::default();
        let i = insight("SOCIAL_PATTERN", "", "", None);
        let c = classify(&i, &config).unwrap();
        assert_eq!(c.personality[2], 10.0);
    }

    #[test]
    fn test_malformed_metadata_is_skipped() {
        let config = ScoringConfig::default();
        let mut i = insight("CURIOSITY_PATTERN", "", "why", Some(0.9));
        i.metadata = Some("{not json".to_string());
        assert!(classify(&i, &config).is_none());
    }

    #[test]
    fn test_valid_metadata_is_accepted() {
        let config = ScoringConfig::default();
        let mut i = insight("CURIOSITY_PATTERN", "", "why", Some(0.9));
        i.metadata = Some(r#"{"academicBasis":"Piaget"}"#.to_string());
        assert!(classify(&i, &config).is_some());
    }

    #[test]
    fn test_no_matches_yields_zero_contribution() {
        let config = ScoringConfig::default();
        let i = insight("OTHER", "", "zzz", Some(1.0));
        let c = classify(&i, &config).unwrap();
        assert_eq!(c, Classification::default());
    }

    #[test]
    fn test_title_is_not_matched() {
        let config = ScoringConfig::default();
        let mut i = insight("OTHER", "", "zzz", Some(1.0));
        i.title = "Loves to paint and draw".to_string();
        assert!(!haystack(&i).contains("paint"));
        assert_eq!(classify(&i, &config).unwrap(), Classification::default());
    }
}
