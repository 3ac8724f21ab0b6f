//! Research-backed facilitation guidance.
//!
//! A [`ResearchLibrary`] is a plain value holding summarized child-development
//! research. Callers build one (usually [`ResearchLibrary::default`]) and
//! query it; it holds no interior state.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResearchCategory {
    ChildDevelopment,
    Psychology,
    Education,
    FamilyDynamics,
}

/// What the parent hopes to get out of the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentGoal {
    Curiosity,
    Learning,
    Bonding,
    ProblemSolving,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchDocument {
    pub id: String,
    pub title: String,
    pub source: String,
    pub category: ResearchCategory,
    pub key_topics: Vec<String>,
    /// Inclusive age range the research applies to.
    pub age_range: Option<(i32, i32)>,
}

impl ResearchDocument {
    fn applies_to(&self, query: &GuidanceQuery) -> bool {
        if let Some((min, max)) = self.age_range {
            if query.child_age < min || query.child_age > max {
                return false;
            }
        }
        let topic = query.conversation_topic.to_lowercase();
        let words: Vec<&str> = topic.split(' ').collect();
        let topical = self
            .key_topics
            .iter()
            .any(|t| words.iter().any(|w| t.to_lowercase().contains(w)));
        topical || self.category == ResearchCategory::ChildDevelopment
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuidanceQuery {
    pub child_age: i32,
    pub conversation_topic: String,
    #[serde(default)]
    pub parent_goal: Option<ParentGoal>,
    #[serde(default)]
    pub current_context: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSuggestion {
    pub question: String,
    pub rationale: String,
    pub research_source: String,
    pub follow_up_questions: Vec<String>,
    pub expected_outcome: String,
}

/// Result of checking whether the facilitator should step in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilitatorCheck {
    pub should_intervene: bool,
    pub intervention: String,
    pub research_basis: String,
}

impl FacilitatorCheck {
    fn intervene(intervention: &str, research_basis: &str) -> Self {
        Self {
            should_intervene: true,
            intervention: intervention.to_string(),
            research_basis: research_basis.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResearchLibrary {
    documents: Vec<ResearchDocument>,
}

fn doc(
    id: &str,
    title: &str,
    source: &str,
    category: ResearchCategory,
    key_topics: &[&str],
    age_range: (i32, i32),
) -> ResearchDocument {
    ResearchDocument {
        id: id.to_string(),
        title: title.to_string(),
        source: source.to_string(),
        category,
        key_topics: key_topics.iter().map(|s| s.to_string()).collect(),
        age_range: Some(age_range),
    }
}

fn follow_ups(items: [&str; 3]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for ResearchLibrary {
    fn default() -> Self {
        Self::new(vec![
            doc(
                "piaget-cognitive-dev",
                "Piaget's Stages of Cognitive Development",
                "Piaget, J. (1952). The Origins of Intelligence in Children",
                ResearchCategory::ChildDevelopment,
                &["cognitive development", "logical thinking", "abstract reasoning", "symbolic thinking"],
                (0, 18),
            ),
            doc(
                "vygotsky-zpd",
                "Vygotsky's Zone of Proximal Development",
                "Vygotsky, L. S. (1978). Mind in Society",
                ResearchCategory::ChildDevelopment,
                &["scaffolding", "social learning", "guided discovery", "collaborative learning"],
                (2, 18),
            ),
            doc(
                "curiosity-research",
                "The Science of Curiosity in Children",
                "Loewenstein, G. (1994). The Psychology of Curiosity",
                ResearchCategory::Psychology,
                &["curiosity types", "information gaps", "intrinsic motivation", "exploration"],
                (3, 18),
            ),
            doc(
                "questioning-techniques",
                "Effective Questioning Techniques for Parents",
                "Walsh, J. A., & Sattes, B. D. (2005). Quality Questioning",
                ResearchCategory::Education,
                &["open-ended questions", "wait time", "metacognition", "critical thinking"],
                (3, 18),
            ),
            doc(
                "family-conversation-research",
                "Building Strong Family Conversations",
                "Hart, B., & Risley, T. R. (1995). Meaningful Differences",
                ResearchCategory::FamilyDynamics,
                &["family communication", "active listening", "emotional safety", "turn-taking"],
                (2, 18),
            ),
        ])
    }
}

impl ResearchLibrary {
    pub fn new(documents: Vec<ResearchDocument>) -> Self {
        Self { documents }
    }

    pub fn documents(&self) -> &[ResearchDocument] {
        &self.documents
    }

    fn relevant<'a>(&'a self, query: &'a GuidanceQuery) -> impl Iterator<Item = &'a ResearchDocument> {
        self.documents.iter().filter(move |d| d.applies_to(query))
    }

    /// Up to three question suggestions, best first.
    pub fn question_suggestions(&self, query: &GuidanceQuery) -> Vec<QuestionSuggestion> {
        let mut scored: Vec<(i32, QuestionSuggestion)> = self
            .relevant(query)
            .filter_map(|d| suggestion_for(d, &query.conversation_topic))
            .map(|s| (relevance_score(&s, query), s))
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().take(3).map(|(_, s)| s).collect()
    }

    /// One sentence of coaching for the parent.
    pub fn parent_guidance(&self, child_age: i32, conversation_topic: &str, child_response: &str) -> String {
        let query = GuidanceQuery {
            child_age,
            conversation_topic: conversation_topic.to_string(),
            parent_goal: None,
            current_context: child_response.to_string(),
        };
        let piaget_applies = self.relevant(&query).any(|d| d.id == "piaget-cognitive-dev");

        if child_age <= 7 && piaget_applies {
            return "Your child is in Piaget's preoperational stage. They're developing symbolic \
                    thinking but may not yet use logical reasoning. Encourage their imaginative \
                    explanations and ask \"What do you think?\" rather than correcting \
                    misconceptions directly."
                .to_string();
        }
        if (7..=11).contains(&child_age) {
            return "At this age, your child can think logically about concrete things. Try asking \
                    them to explain their reasoning: \"How did you figure that out?\" or \"What \
                    evidence supports that idea?\""
                .to_string();
        }
        if conversation_topic.contains("curiosity") || conversation_topic.contains("wonder") {
            return "This is a perfect moment to nurture their epistemic curiosity! Follow up with: \
                    \"What would help us learn more about this?\" or \"What questions does this \
                    raise for you?\""
                .to_string();
        }
        "Keep the conversation flowing by showing genuine interest. Try: \"Tell me more about \
         that\" or \"What makes you think that?\""
            .to_string()
    }

    /// Inspect the last four exchanges (lines prefixed `Child:`/`Parent:`).
    pub fn facilitator_opportunity(&self, history: &[String]) -> FacilitatorCheck {
        let recent = &history[history.len().saturating_sub(4)..];
        let last_child = recent.iter().rev().find(|m| m.contains("Child:"));
        let last_parent = recent.iter().rev().find(|m| m.contains("Parent:"));

        if let Some(child) = last_child {
            if child.contains('?') && !last_parent.is_some_and(|p| p.contains('?')) {
                return FacilitatorCheck::intervene(
                    "I noticed a wonderful question there! This might be a perfect moment to \
                     explore that curiosity together. What do you both think?",
                    "Curiosity research shows that children's questions are windows into their \
                     thinking and should be celebrated and explored.",
                );
            }
            if child.split(' ').count() < 3 {
                return FacilitatorCheck::intervene(
                    "There seems to be more to discover here. Sometimes asking 'What makes you \
                     think that?' can help us understand the fascinating thinking happening.",
                    "Vygotsky's research shows that scaffolding questions can help children \
                     express their developing thoughts.",
                );
            }
        }

        if recent.len() < 2 {
            return FacilitatorCheck::intervene(
                "This conversation has such rich potential! Sometimes starting with 'I wonder...' \
                 can open up new pathways for exploration.",
                "Open-ended questioning techniques promote deeper engagement and sustained \
                 dialogue.",
            );
        }

        FacilitatorCheck::default()
    }
}

fn suggestion_for(doc: &ResearchDocument, topic: &str) -> Option<QuestionSuggestion> {
    let (question, rationale, follow, outcome) = match doc.id.as_str() {
        "questioning-techniques" => (
            format!("What do you notice about {topic}?"),
            "Open-ended questions promote observation and critical thinking",
            follow_ups([
                "What makes you say that?",
                "How did you figure that out?",
                "What else do you notice?",
            ]),
            "Encourages detailed observation and explanation of thinking",
        ),
        "vygotsky-zpd" => (
            format!("How might we find out more about {topic}?"),
            "Scaffolding question that guides toward next steps in learning",
            follow_ups([
                "What tools might help us investigate?",
                "Who could we ask about this?",
                "What would happen if we tried...?",
            ]),
            "Develops problem-solving skills and research thinking",
        ),
        "curiosity-research" => (
            format!("What questions does this raise for you about {topic}?"),
            "Taps into epistemic curiosity and information gap theory",
            follow_ups([
                "Which question interests you most?",
                "What would happen if...?",
                "Why do you think that happens?",
            ]),
            "Generates new avenues for exploration and sustains curiosity",
        ),
        _ => return None,
    };
    Some(QuestionSuggestion {
        question,
        rationale: rationale.to_string(),
        research_source: doc.source.clone(),
        follow_up_questions: follow,
        expected_outcome: outcome.to_string(),
    })
}

fn relevance_score(suggestion: &QuestionSuggestion, query: &GuidanceQuery) -> i32 {
    let mut score = 0;
    let q = &suggestion.question;
    match query.parent_goal {
        Some(ParentGoal::Curiosity) if q.contains("wonder") => score += 2,
        Some(ParentGoal::Learning) if q.contains("find out") => score += 2,
        Some(ParentGoal::Bonding) if q.contains("together") => score += 2,
        _ => {}
    }
    let words = q.split(' ').count();
    if query.child_age < 8 && words < 10 {
        score += 1;
    }
    if query.child_age >= 8 && words >= 8 {
        score += 1;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(age: i32, topic: &str, goal: Option<ParentGoal>) -> GuidanceQuery {
        GuidanceQuery {
            child_age: age,
            conversation_topic: topic.to_string(),
            parent_goal: goal,
            current_context: String::new(),
        }
    }

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_library_has_five_documents() {
        assert_eq!(ResearchLibrary::default().documents().len(), 5);
    }

    #[test]
    fn test_question_suggestions_limited_to_three() {
        let lib = ResearchLibrary::default();
        let suggestions = lib.question_suggestions(&query(6, "exploration questions", None));
        assert_eq!(suggestions.len(), 3);
        assert!(suggestions.iter().all(|s| s.question.contains("exploration questions")));
    }

    #[test]
    fn test_learning_goal_prefers_find_out() {
        let lib = ResearchLibrary::default();
        let suggestions =
            lib.question_suggestions(&query(9, "volcanoes", Some(ParentGoal::Learning)));
        assert!(suggestions[0].question.starts_with("How might we find out"));
    }

    #[test]
    fn test_toddler_gets_only_development_documents() {
        let lib = ResearchLibrary::default();
        // age 1 is outside every range but Piaget's, which yields no question
        assert!(lib.question_suggestions(&query(1, "blocks", None)).is_empty());
    }

    #[test]
    fn test_parent_guidance_bands() {
        let lib = ResearchLibrary::default();
        assert!(lib.parent_guidance(5, "rain", "").contains("preoperational"));
        assert!(lib.parent_guidance(9, "rain", "").contains("concrete things"));
        assert!(lib.parent_guidance(14, "wonder", "").contains("epistemic"));
        assert!(lib.parent_guidance(14, "rain", "").starts_with("Keep the conversation"));
    }

    #[test]
    fn test_facilitator_flags_unanswered_child_question() {
        let lib = ResearchLibrary::default();
        let check = lib.facilitator_opportunity(&lines(&[
            "Parent: Look at the moon.",
            "Child: Why does it follow our car?",
        ]));
        assert!(check.should_intervene);
        assert!(check.intervention.contains("wonderful question"));
    }

    #[test]
    fn test_facilitator_flags_short_reply() {
        let lib = ResearchLibrary::default();
        let check = lib.facilitator_opportunity(&lines(&[
            "Parent: What did you build today?",
            "Child: Nothing",
        ]));
        assert!(check.should_intervene);
        assert!(check.research_basis.starts_with("Vygotsky"));
    }

    #[test]
    fn test_facilitator_flags_stalled_conversation() {
        let lib = ResearchLibrary::default();
        let check = lib.facilitator_opportunity(&[]);
        assert!(check.should_intervene);
        assert!(check.intervention.contains("I wonder"));
    }

    #[test]
    fn test_facilitator_stays_quiet_in_flowing_conversation() {
        let lib = ResearchLibrary::default();
        let check = lib.facilitator_opportunity(&lines(&[
            "Child: I think the clouds are made of cotton candy",
            "Parent: What makes you think that?",
            "Child: Because they look fluffy and soft like candy",
        ]));
        assert!(!check.should_intervene);
        assert!(check.intervention.is_empty());
    }
}
