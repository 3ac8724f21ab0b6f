//! Summaries of recent insights used to prompt recommendation generation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sprout_core::defaults::{RECOMMENDATION_TOP_INTERESTS, RECOMMENDATION_TOP_STRENGTHS};
use sprout_core::insight_types::COGNITIVE_STRENGTH;
use sprout_core::Insight;
use tracing::warn;

/// Developmental stage description for an age in years.
pub fn developmental_level(age: i32) -> &'static str {
    match age {
        ..=3 => "Toddler - sensory exploration and basic concepts",
        4..=5 => "Preschool - imaginative play and early learning",
        6..=8 => "Early elementary - structured learning and skill building",
        9..=12 => "Elementary - complex thinking and specialized interests",
        _ => "Pre-teen - independent exploration and identity formation",
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    let value = value.trim();
    if !value.is_empty() && !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

/// Profile passed to the recommendation prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationContext {
    pub child_name: String,
    pub child_age: i32,
    /// Titles of the most recent insights.
    pub recent_insights: Vec<String>,
    /// Distinct categories mentioning "interest".
    pub top_interests: Vec<String>,
    /// Distinct categories of cognitive-strength insights.
    pub cognitive_strengths: Vec<String>,
}

impl RecommendationContext {
    /// Build from insights ordered most-recent-first.
    pub fn from_insights(child_name: &str, child_age: i32, insights: &[Insight]) -> Self {
        let recent_insights = insights.iter().map(|i| i.title.clone()).collect();

        let mut top_interests = Vec::new();
        for insight in insights
            .iter()
            .filter(|i| i.category.to_lowercase().contains("interest"))
        {
            push_unique(&mut top_interests, &insight.category);
        }
        top_interests.truncate(RECOMMENDATION_TOP_INTERESTS);

        let mut cognitive_strengths = Vec::new();
        for insight in insights
            .iter()
            .filter(|i| i.insight_type.eq_ignore_ascii_case(COGNITIVE_STRENGTH))
        {
            push_unique(&mut cognitive_strengths, &insight.category);
        }
        cognitive_strengths.truncate(RECOMMENDATION_TOP_STRENGTHS);

        Self {
            child_name: child_name.to_string(),
            child_age,
            recent_insights,
            top_interests,
            cognitive_strengths,
        }
    }
}

/// Traits gathered from insight metadata and text for playlist prompts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightAnalysis {
    pub interests: Vec<String>,
    pub personality: Vec<String>,
    pub learning_style: Vec<String>,
    pub curiosity_topics: Vec<String>,
    pub developmental_level: String,
    pub strengths: Vec<String>,
}

/// Description keywords that imply an interest label.
const DESCRIPTION_INTERESTS: [(&[&str], &str); 6] = [
    (&["science", "experiment"], "science"),
    (&["art", "draw", "color"], "art"),
    (&["music", "song"], "music"),
    (&["nature", "animal", "outside"], "nature"),
    (&["book", "story", "read"], "reading"),
    (&["build", "construct", "create"], "building"),
];

fn extend_strings(list: &mut Vec<String>, value: Option<&Value>) {
    if let Some(Value::Array(items)) = value {
        for item in items {
            if let Some(s) = item.as_str() {
                push_unique(list, s);
            }
        }
    }
}

fn extend_keys(list: &mut Vec<String>, value: Option<&Value>) {
    if let Some(Value::Object(map)) = value {
        for key in map.keys() {
            push_unique(list, key);
        }
    }
}

impl InsightAnalysis {
    /// Collect deduplicated traits from insights of recent conversations.
    ///
    /// Metadata that fails to parse is logged and ignored; the description
    /// is still scanned.
    pub fn from_insights(insights: &[Insight], child_age: i32) -> Self {
        let mut analysis = InsightAnalysis {
            developmental_level: developmental_level(child_age).to_string(),
            ..Default::default()
        };

        for insight in insights {
            if let Some(raw) = insight.metadata.as_deref() {
                match serde_json::from_str::<Value>(raw) {
                    Ok(meta) => analysis.absorb_metadata(&meta),
                    Err(e) => warn!(
                        subsystem = "insights",
                        component = "context",
                        insight_id = %insight.id,
                        error = %e,
                        "Ignoring malformed insight metadata"
                    ),
                }
            }

            let text = insight.description.to_lowercase();
            for (keywords, label) in DESCRIPTION_INTERESTS {
                if keywords.iter().any(|kw| text.contains(kw)) {
                    push_unique(&mut analysis.interests, label);
                }
            }
        }

        analysis
    }

    fn absorb_metadata(&mut self, meta: &Value) {
        extend_strings(&mut self.interests, meta.get("interests"));
        extend_strings(&mut self.curiosity_topics, meta.get("curiosityPatterns"));
        extend_strings(&mut self.strengths, meta.get("strengths"));
        extend_strings(&mut self.personality, meta.get("personalityTraits"));
        extend_strings(&mut self.learning_style, meta.get("learningPreferences"));

        // Stored analyses keep these blocks either at the top level or under academicBasis
        for root in [Some(meta), meta.get("academicBasis")].into_iter().flatten() {
            extend_keys(&mut self.strengths, root.get("executiveFunctions"));
            extend_strings(
                &mut self.interests,
                root.get("developmentalAnalysis").and_then(|d| d.get("interests")),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn insight(insight_type: &str, category: &str, title: &str, metadata: Option<&str>) -> Insight {
        Insight {
            id: Uuid::now_v7(),
            child_id: Uuid::nil(),
            conversation_id: None,
            insight_type: insight_type.to_string(),
            category: category.to_string(),
            title: title.to_string(),
            description: String::new(),
            confidence: Some(0.8),
            metadata: metadata.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_developmental_level_bands() {
        assert!(developmental_level(2).starts_with("Toddler"));
        assert!(developmental_level(3).starts_with("Toddler"));
        assert!(developmental_level(5).starts_with("Preschool"));
        assert!(developmental_level(8).starts_with("Early elementary"));
        assert!(developmental_level(12).starts_with("Elementary"));
        assert!(developmental_level(13).starts_with("Pre-teen"));
    }

    #[test]
    fn test_recommendation_context_extraction() {
        let insights = vec![
            insight("INTEREST_SIGNAL", "space interest", "Rockets", None),
            insight("INTEREST_SIGNAL", "space interest", "Planets", None),
            insight("COGNITIVE_STRENGTH", "pattern recognition", "Sorter", None),
            insight("COGNITIVE_STRENGTH", "memory", "Rememberer", None),
            insight("CURIOSITY_PATTERN", "Interest in animals", "Zoo", None),
        ];
        let ctx = RecommendationContext::from_insights("Maya", 6, &insights);
        assert_eq!(ctx.recent_insights.len(), 5);
        assert_eq!(ctx.top_interests, vec!["space interest", "Interest in animals"]);
        assert_eq!(ctx.cognitive_strengths, vec!["pattern recognition", "memory"]);
    }

    #[test]
    fn test_recommendation_context_caps() {
        let insights: Vec<Insight> = (0..8)
            .map(|i| insight("COGNITIVE_STRENGTH", &format!("strength {i}"), "t", None))
            .collect();
        let ctx = RecommendationContext::from_insights("Sam", 7, &insights);
        assert_eq!(ctx.cognitive_strengths.len(), 3);
    }

    #[test]
    fn test_insight_analysis_reads_metadata() {
        let meta = r#"{
            "interests": ["dinosaurs", "rockets"],
            "personalityTraits": ["playful"],
            "executiveFunctions": {"workingMemory": "strong", "flexibility": "emerging"},
            "academicBasis": {"developmentalAnalysis": {"interests": ["rockets", "oceans"]}}
        }"#;
        let analysis = InsightAnalysis::from_insights(&[insight("X", "c", "t", Some(meta))], 6);
        assert_eq!(analysis.interests, vec!["dinosaurs", "rockets", "oceans"]);
        assert_eq!(analysis.personality, vec!["playful"]);
        assert!(analysis.strengths.contains(&"workingMemory".to_string()));
        assert!(analysis.strengths.contains(&"flexibility".to_string()));
        assert!(analysis.developmental_level.starts_with("Early elementary"));
    }

    #[test]
    fn test_insight_analysis_scans_description() {
        let mut i = insight("X", "c", "t", Some("not json"));
        i.description = "Loves reading a story and asks to build forts".to_string();
        let analysis = InsightAnalysis::from_insights(&[i], 4);
        assert_eq!(analysis.interests, vec!["reading", "building"]);
    }
}
