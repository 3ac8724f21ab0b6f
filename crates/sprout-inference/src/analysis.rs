//! Conversation analysis: transcript in, structured insights out.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use sprout_core::defaults::ANALYSIS_TEMPERATURE;
use sprout_core::{Error, GenerationBackend, GenerationOptions, NewInsight, Result};

use crate::json::parse_json_response;

pub const ANALYSIS_SYSTEM_PROMPT: &str = "You are an expert child development psychologist \
specializing in analyzing parent-child conversations to identify curiosity patterns and \
cognitive strengths. Always respond with valid JSON.";

/// One insight proposed by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisInsight {
    #[serde(rename = "type")]
    pub insight_type: String,
    #[serde(default)]
    pub category: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub academic_basis: Value,
    #[serde(default)]
    pub parent_recommendations: Vec<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// Full model reply. The four assessment blocks are kept verbatim and
/// stored as insight metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationAnalysis {
    #[serde(default)]
    pub curiosity_indicators: Value,
    #[serde(default)]
    pub cognitive_strengths: Value,
    #[serde(default)]
    pub executive_functions: Value,
    #[serde(default)]
    pub developmental_analysis: Value,
    #[serde(default)]
    pub insights: Vec<AnalysisInsight>,
}

impl ConversationAnalysis {
    /// Turn the proposed insights into rows for one conversation.
    pub fn to_new_insights(&self, child_id: Uuid, conversation_id: Uuid) -> Vec<NewInsight> {
        self.insights
            .iter()
            .map(|insight| {
                let metadata = json!({
                    "curiosityIndicators": self.curiosity_indicators,
                    "cognitiveStrengths": self.cognitive_strengths,
                    "executiveFunctions": self.executive_functions,
                    "developmentalAnalysis": self.developmental_analysis,
                    "academicBasis": insight.academic_basis,
                    "parentRecommendations": insight.parent_recommendations,
                });
                NewInsight {
                    child_id,
                    conversation_id: Some(conversation_id),
                    insight_type: insight.insight_type.clone(),
                    category: insight.category.clone(),
                    title: insight.title.clone(),
                    description: insight.description.clone(),
                    confidence: insight.confidence,
                    metadata: serde_json::to_string(&metadata).ok(),
                }
                .normalized()
            })
            .collect()
    }
}

/// Fixed analysis used when no API key is configured.
pub fn demo_analysis() -> ConversationAnalysis {
    let insight = |insight_type: &str, category: &str, title: &str, description: &str, c: f64| {
        AnalysisInsight {
            insight_type: insight_type.to_string(),
            category: category.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            academic_basis: Value::Null,
            parent_recommendations: Vec::new(),
            confidence: Some(c),
        }
    };

    ConversationAnalysis {
        insights: vec![
            insight(
                "CURIOSITY_PATTERN",
                "Learning Style",
                "Visual Learning Preference",
                "Shows strong interest in visual explanations and demonstrations",
                0.85,
            ),
            insight(
                "INTEREST_AREA",
                "Science",
                "Natural World Explorer",
                "Demonstrates fascination with animals, plants, and natural phenomena",
                0.90,
            ),
            insight(
                "SOCIAL_SKILL",
                "Communication",
                "Thoughtful Questioner",
                "Asks meaningful questions and listens carefully to responses",
                0.75,
            ),
        ],
        ..Default::default()
    }
}

pub fn analysis_prompt(transcript: &str, child_name: &str, child_age: i32) -> String {
    format!(
        r#"You are a child development expert with expertise in developmental psychology, analyzing a conversation between a parent and their {child_age}-year-old child named {child_name}.

Apply established psychological frameworks to analyze this conversation transcript:

{transcript}

ANALYSIS FRAMEWORK:
1. Piaget's cognitive development stages: preoperational (2-7) vs concrete operational (7-11) thinking.
2. Vygotsky's zone of proximal development: what the child does alone vs with guidance.
3. Gardner's multiple intelligences: linguistic, logical-mathematical, spatial, interpersonal, intrapersonal, naturalistic.
4. Executive function (rate 0-10): working memory, cognitive flexibility, inhibitory control.
5. Language development: syntax, vocabulary depth, pragmatics.
6. Curiosity: epistemic, diversive, specific, perceptual.
7. Social-emotional learning indicators.
8. Provide 3-4 deep insights grounded in developmental research, with parent recommendations.

Return ONLY a valid JSON object (no markdown formatting, no code blocks, no explanations) with the exact structure:
{{
  "curiosityIndicators": {{
    "questionCount": number,
    "questionTypes": ["what", "how", "why"],
    "speculativeLanguage": ["specific phrases found"],
    "persistentTopics": ["topics child returned to"],
    "epistemicCuriosity": number (0-10),
    "diversiveCuriosity": number (0-10),
    "specificCuriosity": number (0-10),
    "perceptualCuriosity": number (0-10)
  }},
  "cognitiveStrengths": {{
    "linguistic": number (0-10),
    "logicalMathematical": number (0-10),
    "spatial": number (0-10),
    "interpersonal": number (0-10),
    "intrapersonal": number (0-10),
    "naturalistic": number (0-10)
  }},
  "executiveFunctions": {{
    "workingMemory": number (0-10),
    "cognitiveFlexibility": number (0-10),
    "inhibitoryControl": number (0-10)
  }},
  "developmentalAnalysis": {{
    "piagetianStage": "preoperational|concrete operational|formal operational",
    "zpdOpportunities": ["specific learning opportunities"],
    "languageComplexity": number (0-10),
    "socialEmotionalLevel": number (0-10)
  }},
  "insights": [
    {{
      "type": "CURIOSITY_PATTERN|COGNITIVE_STRENGTH|INTEREST_SIGNAL|LEARNING_STYLE|SOCIAL_PATTERN",
      "category": "specific psychological domain",
      "title": "Research-grounded insight title",
      "description": "Deep analysis of what this reveals about child development",
      "academicBasis": "Reference to specific theory/research",
      "parentRecommendations": ["specific actionable recommendations"],
      "confidence": number (0.0-1.0)
    }}
  ]
}}"#
    )
}

/// Ask the model to analyze a transcript.
///
/// Fails with `Error::Inference` on an empty reply and
/// `Error::Serialization` when the reply is not the expected JSON.
pub async fn analyze_conversation(
    backend: &dyn GenerationBackend,
    transcript: &str,
    child_name: &str,
    child_age: i32,
) -> Result<ConversationAnalysis> {
    let start = Instant::now();
    let prompt = analysis_prompt(transcript, child_name, child_age);
    debug!(
        subsystem = "inference",
        component = "analysis",
        prompt_len = prompt.len(),
        model = backend.model_name(),
        "Analyzing conversation"
    );

    let content = backend
        .generate_with_system(
            ANALYSIS_SYSTEM_PROMPT,
            &prompt,
            GenerationOptions::new(ANALYSIS_TEMPERATURE),
        )
        .await?;

    if content.trim().is_empty() {
        return Err(Error::Inference("No response from model".to_string()));
    }

    let analysis: ConversationAnalysis = parse_json_response(&content)?;
    info!(
        subsystem = "inference",
        component = "analysis",
        insight_count = analysis.insights.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Conversation analyzed"
    );
    Ok(analysis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_analysis_has_three_insights() {
        let analysis = demo_analysis();
        assert_eq!(analysis.insights.len(), 3);
        assert_eq!(analysis.insights[1].title, "Natural World Explorer");
        assert_eq!(analysis.insights[1].confidence, Some(0.90));
    }

    #[test]
    fn test_prompt_mentions_child() {
        let prompt = analysis_prompt("Child: why?", "Maya", 6);
        assert!(prompt.contains("6-year-old child named Maya"));
        assert!(prompt.contains("Child: why?"));
        assert!(prompt.contains("\"curiosityIndicators\": {"));
    }

    #[test]
    fn test_to_new_insights_builds_metadata() {
        let raw = r#"{
            "curiosityIndicators": {"questionCount": 4},
            "cognitiveStrengths": {"spatial": 7},
            "executiveFunctions": {"workingMemory": 6},
            "developmentalAnalysis": {"piagetianStage": "preoperational"},
            "insights": [{
                "type": "curiosity_pattern",
                "category": "Scientific Wonder",
                "title": "Stargazer",
                "description": "asks why stars twinkle",
                "academicBasis": "Berlyne's epistemic curiosity",
                "parentRecommendations": ["Visit a planetarium"],
                "confidence": 1.4
            }]
        }"#;
        let analysis: ConversationAnalysis = serde_json::from_str(raw).unwrap();
        let child = Uuid::now_v7();
        let conversation = Uuid::now_v7();
        let rows = analysis.to_new_insights(child, conversation);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].insight_type, "CURIOSITY_PATTERN");
        assert_eq!(rows[0].confidence, Some(1.0));
        assert_eq!(rows[0].conversation_id, Some(conversation));

        let meta: Value = serde_json::from_str(rows[0].metadata.as_deref().unwrap()).unwrap();
        assert_eq!(meta["executiveFunctions"]["workingMemory"], 6);
        assert_eq!(meta["academicBasis"], "Berlyne's epistemic curiosity");
        assert_eq!(meta["parentRecommendations"][0], "Visit a planetarium");
    }

    #[test]
    fn test_missing_blocks_default_to_null() {
        let analysis: ConversationAnalysis =
            serde_json::from_str(r#"{"insights": []}"#).unwrap();
        assert!(analysis.curiosity_indicators.is_null());
        assert!(analysis.insights.is_empty());
    }
}
