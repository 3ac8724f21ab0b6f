//! Score accumulator: folds classifications and transcripts into raw sums.

use sprout_core::{Conversation, Insight};

use crate::classifier::{classify, Classification};
use crate::config::ScoringConfig;
use crate::keywords::{CREATIVITY, CURIOSITY, INTEREST_RULES, TRANSCRIPT_CREATIVITY_KEYWORDS};

/// Raw strength and example titles for one interest category.
#[derive(Debug, Clone, PartialEq)]
pub struct RawInterest {
    pub category: &'static str,
    pub strength: f64,
    pub examples: Vec<String>,
}

/// Unbounded sums per bucket. Interests keep first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawScores {
    pub personality: [f64; 6],
    pub interests: Vec<RawInterest>,
    pub learning_style: [f64; 4],
    pub development: [f64; 5],
    pub conversation_patterns: [f64; 4],
}

fn add_into<const N: usize>(acc: &mut [f64; N], contribution: &[f64; N]) {
    for (a, c) in acc.iter_mut().zip(contribution) {
        *a += c;
    }
}

impl RawScores {
    /// Add one insight's contribution, recording `title` as an interest example.
    pub fn add(&mut self, classification: &Classification, title: &str, config: &ScoringConfig) {
        add_into(&mut self.personality, &classification.personality);
        add_into(&mut self.learning_style, &classification.learning_style);
        add_into(&mut self.development, &classification.development);
        add_into(
            &mut self.conversation_patterns,
            &classification.conversation_patterns,
        );

        for &(rule_idx, strength) in &classification.interests {
            let category = INTEREST_RULES[rule_idx].category;
            let entry = match self.interests.iter().position(|i| i.category == category) {
                Some(pos) => &mut self.interests[pos],
                None => {
                    self.interests.push(RawInterest {
                        category,
                        strength: 0.0,
                        examples: Vec::new(),
                    });
                    let last = self.interests.len() - 1;
                    &mut self.interests[last]
                }
            };
            entry.strength += strength;
            let title = title.trim();
            if !title.is_empty()
                && entry.examples.len() < config.max_examples
                && !entry.examples.iter().any(|e| e == title)
            {
                entry.examples.push(title.to_string());
            }
        }
    }

    /// Add the curiosity and creativity bonuses from one transcript.
    pub fn add_transcript(&mut self, transcript: &str, config: &ScoringConfig) {
        let questions = transcript.matches('?').count() as f64;
        self.personality[CURIOSITY] += (questions * config.transcript_question_weight)
            .min(config.transcript_question_cap);

        let lower = transcript.to_lowercase();
        if TRANSCRIPT_CREATIVITY_KEYWORDS
            .iter()
            .any(|kw| lower.contains(kw))
        {
            self.personality[CREATIVITY] += config.transcript_creativity_bonus;
        }
    }
}

/// Accumulate raw scores for one child.
///
/// Only the first `max_insights` insights and `max_conversations`
/// conversations are read; callers pass them most-recent-first.
pub fn accumulate(
    insights: &[Insight],
    conversations: &[Conversation],
    config: &ScoringConfig,
) -> RawScores {
    let mut scores = RawScores::default();

    for insight in insights.iter().take(config.max_insights) {
        if let Some(classification) = classify(insight, config) {
            scores.add(&classification, &insight.title, config);
        }
    }

    for conversation in conversations.iter().take(config.max_conversations) {
        if let Some(transcript) = conversation.transcription.as_deref() {
            scores.add_transcript(transcript, config);
        }
    }

    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn conversation(transcript: Option<&str>) -> Conversation {
        Conversation {
            id: Uuid::now_v7(),
            child_id: Uuid::nil(),
            title: "Chat".to_string(),
            transcription: transcript.map(str::to_string),
            duration: 60,
            processed: true,
            conversation_date: Utc::now(),
            created_at: Utc::now(),
        }
    }

    fn art_insight(title: &str) -> Insight {
        Insight {
            id: Uuid::now_v7(),
            child_id: Uuid::nil(),
            conversation_id: None,
            insight_type: "INTEREST_SIGNAL".to_string(),
            category: "Art".to_string(),
            title: title.to_string(),
            description: "wants to draw".to_string(),
            confidence: Some(1.0),
            metadata: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_question_bonus_is_capped() {
        let config = ScoringConfig::default();
        let mut scores = RawScores::default();
        scores.add_transcript("Why? How? What? Where? Who? When?", &config);
        assert_eq!(scores.personality[CURIOSITY], 10.0);
    }

    #[test]
    fn test_question_bonus_per_mark() {
        let config = ScoringConfig::default();
        let mut scores = RawScores::default();
        scores.add_transcript("Is the moon cheese? No.", &config);
        assert_eq!(scores.personality[CURIOSITY], 2.0);
    }

    #[test]
    fn test_creativity_bonus_once_per_transcript() {
        let config = ScoringConfig::default();
        let mut scores = RawScores::default();
        scores.add_transcript("Let's PRETEND we imagine a castle", &config);
        assert_eq!(scores.personality[CREATIVITY], 5.0);
    }

    #[test]
    fn test_conversations_without_transcript_are_ignored() {
        let config = ScoringConfig::default();
        let scores = accumulate(&[], &[conversation(None)], &config);
        assert_eq!(scores, RawScores::default());
    }

    #[test]
    fn test_examples_deduplicated_and_capped() {
        let config = ScoringConfig::default();
        let insights: Vec<Insight> = ["A", "B", "A", "C", "D", "E"]
            .iter()
            .map(|t| art_insight(t))
            .collect();
        let scores = accumulate(&insights, &[], &config);
        let art = &scores.interests[0];
        assert_eq!(art.category, "art");
        assert_eq!(art.examples, vec!["A", "B", "C", "D"]);
        assert_eq!(art.strength, 6.0);
    }

    #[test]
    fn test_examples_compare_titles_exactly() {
        let config = ScoringConfig::default();
        let insights: Vec<Insight> = ["Drawing", "drawing", "Drawing"]
            .iter()
            .map(|t| art_insight(t))
            .collect();
        let scores = accumulate(&insights, &[], &config);
        assert_eq!(scores.interests[0].examples, vec!["Drawing", "drawing"]);
    }

    #[test]
    fn test_insight_cap_respected() {
        let config = ScoringConfig {
            max_insights: 2,
            ..ScoringConfig::default()
        };
        let insights: Vec<Insight> = (0..5).map(|i| art_insight(&i.to_string())).collect();
        let scores = accumulate(&insights, &[], &config);
        assert_eq!(scores.interests[0].strength, 2.0);
    }

    #[test]
    fn test_conversation_cap_respected() {
        let config = ScoringConfig {
            max_conversations: 1,
            ..ScoringConfig::default()
        };
        let convs = vec![conversation(Some("why?")), conversation(Some("how?"))];
        let scores = accumulate(&[], &convs, &config);
        assert_eq!(scores.personality[CURIOSITY], 2.0);
    }

    #[test]
    fn test_order_independent_sums() {
        let config = ScoringConfig::default();
        let a = art_insight("A");
        let mut b = art_insight("B");
        b.description = "why does paint dry".to_string();
        let forward = accumulate(&[a.clone(), b.clone()], &[], &config);
        let backward = accumulate(&[b, a], &[], &config);
        assert_eq!(forward.personality, backward.personality);
        assert_eq!(forward.interests[0].strength, backward.interests[0].strength);
    }
}
