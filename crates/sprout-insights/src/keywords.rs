//! Static keyword tables used by the classifier.
//!
//! Matching is plain case-insensitive substring search, so "colors" matches
//! "color" and "scientific" matches "if". Rule order within each table is the
//! field order of the corresponding output group.

/// One scored axis: fires when the insight type contains `type_trigger`
/// or the text contains any of `keywords`.
#[derive(Debug, Clone, Copy)]
pub struct AxisRule {
    pub name: &'static str,
    pub type_trigger: Option<&'static str>,
    pub keywords: &'static [&'static str],
}

impl AxisRule {
    /// True if the lower-cased type or haystack triggers this axis.
    pub fn matches(&self, insight_type: &str, haystack: &str) -> bool {
        self.type_trigger
            .is_some_and(|trigger| insight_type.contains(trigger))
            || self.keywords.iter().any(|kw| haystack.contains(kw))
    }
}

/// One interest category: strength grows with every keyword found.
#[derive(Debug, Clone, Copy)]
pub struct InterestRule {
    pub category: &'static str,
    pub keywords: &'static [&'static str],
}

impl InterestRule {
    /// Number of distinct keywords present in the haystack.
    pub fn match_count(&self, haystack: &str) -> usize {
        self.keywords
            .iter()
            .filter(|kw| haystack.contains(*kw))
            .count()
    }
}

// =============================================================================
// PERSONALITY
// =============================================================================

pub const CURIOSITY: usize = 0;
pub const CREATIVITY: usize = 1;

pub const PERSONALITY_RULES: [AxisRule; 6] = [
    AxisRule {
        name: "curiosity",
        type_trigger: Some("curiosity"),
        keywords: &["why", "how"],
    },
    AxisRule {
        name: "creativity",
        type_trigger: Some("creative"),
        keywords: &["imagine", "story"],
    },
    AxisRule {
        name: "social",
        type_trigger: Some("social"),
        keywords: &["friend", "share"],
    },
    AxisRule {
        name: "analytical",
        type_trigger: Some("analytical"),
        keywords: &["because", "think"],
    },
    AxisRule {
        name: "emotional",
        type_trigger: Some("emotional"),
        keywords: &["feel", "happy", "sad"],
    },
    AxisRule {
        name: "physical",
        type_trigger: None,
        keywords: &["move", "run", "build"],
    },
];

// =============================================================================
// INTERESTS
// =============================================================================

pub const INTEREST_RULES: [InterestRule; 8] = [
    InterestRule {
        category: "science",
        keywords: &["science", "experiment", "discover", "test", "observe"],
    },
    InterestRule {
        category: "art",
        keywords: &["draw", "paint", "color", "create", "beautiful"],
    },
    InterestRule {
        category: "nature",
        keywords: &["animal", "tree", "flower", "outside", "sky", "ocean"],
    },
    InterestRule {
        category: "music",
        keywords: &["song", "music", "sing", "dance", "sound"],
    },
    InterestRule {
        category: "technology",
        keywords: &["computer", "robot", "machine", "digital"],
    },
    InterestRule {
        category: "reading",
        keywords: &["book", "story", "read", "letter", "word"],
    },
    InterestRule {
        category: "games",
        keywords: &["play", "game", "fun", "toy", "puzzle"],
    },
    InterestRule {
        category: "sports",
        keywords: &["run", "jump", "ball", "sport", "exercise"],
    },
];

// =============================================================================
// LEARNING STYLE
// =============================================================================

pub const LEARNING_STYLE_RULES: [AxisRule; 4] = [
    AxisRule {
        name: "visual",
        type_trigger: None,
        keywords: &["see", "look", "watch"],
    },
    AxisRule {
        name: "auditory",
        type_trigger: None,
        keywords: &["hear", "listen", "sound"],
    },
    AxisRule {
        name: "kinesthetic",
        type_trigger: None,
        keywords: &["touch", "feel", "hold"],
    },
    AxisRule {
        name: "reading",
        type_trigger: None,
        keywords: &["read", "write", "letter"],
    },
];

// =============================================================================
// DEVELOPMENT
// =============================================================================

pub const DEVELOPMENT_RULES: [AxisRule; 5] = [
    AxisRule {
        name: "cognitive",
        type_trigger: Some("cognitive"),
        keywords: &["think", "understand"],
    },
    AxisRule {
        name: "language",
        type_trigger: Some("language"),
        keywords: &["word", "talk"],
    },
    AxisRule {
        name: "social",
        type_trigger: None,
        keywords: &["friend", "play", "share"],
    },
    AxisRule {
        name: "emotional",
        type_trigger: None,
        keywords: &["feel", "emotion", "happy"],
    },
    AxisRule {
        name: "physical",
        type_trigger: None,
        keywords: &["move", "run", "jump"],
    },
];

// =============================================================================
// CONVERSATION PATTERNS
// =============================================================================

pub const CONVERSATION_PATTERN_RULES: [AxisRule; 4] = [
    AxisRule {
        name: "questionAsking",
        type_trigger: None,
        keywords: &["?", "why", "what"],
    },
    AxisRule {
        name: "storyTelling",
        type_trigger: None,
        keywords: &["story", "once", "then"],
    },
    AxisRule {
        name: "hypothetical",
        type_trigger: None,
        keywords: &["if", "would", "could"],
    },
    AxisRule {
        name: "factual",
        type_trigger: None,
        keywords: &["fact", "know", "true"],
    },
];

// =============================================================================
// TRANSCRIPTS
// =============================================================================

/// Transcript words that earn the creativity bonus.
pub const TRANSCRIPT_CREATIVITY_KEYWORDS: [&str; 3] = ["create", "imagine", "pretend"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_rule_type_trigger() {
        let rule = PERSONALITY_RULES[CURIOSITY];
        assert!(rule.matches("curiosity_pattern", ""));
        assert!(!rule.matches("cognitive_strength", "stars twinkle"));
    }

    #[test]
    fn test_axis_rule_keyword_substring() {
        let rule = PERSONALITY_RULES[CURIOSITY];
        assert!(rule.matches("", "she asked how rainbows form"));
        // "show" contains "how"
        assert!(rule.matches("", "a puppet show"));
    }

    #[test]
    fn test_physical_has_no_type_trigger() {
        let rule = PERSONALITY_RULES[5];
        assert_eq!(rule.name, "physical");
        assert!(!rule.matches("physical", "sitting still"));
        assert!(rule.matches("", "likes to build towers"));
    }

    #[test]
    fn test_interest_match_count() {
        let art = INTEREST_RULES[1];
        assert_eq!(art.category, "art");
        assert_eq!(art.match_count("draw and paint"), 2);
        assert_eq!(art.match_count("bright colors to create"), 2);
        assert_eq!(art.match_count("rocket ships"), 0);
    }

    #[test]
    fn test_table_sizes() {
        assert_eq!(INTEREST_RULES.len(), 8);
        assert_eq!(DEVELOPMENT_RULES.len(), 5);
        assert_eq!(LEARNING_STYLE_RULES.len(), 4);
        assert_eq!(CONVERSATION_PATTERN_RULES.len(), 4);
        assert_eq!(PERSONALITY_RULES[CREATIVITY].name, "creativity");
    }
}
