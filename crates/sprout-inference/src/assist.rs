//! Live conversation assistance: the child-facing partner, parent
//! coaching, and family facilitation.
//!
//! Every entry point returns a reply even when the model is unavailable or
//! answers with something unparseable.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use sprout_core::defaults::{
    ASSIST_MAX_TOKENS, ASSIST_TEMPERATURE, FAMILY_MAX_TOKENS, INTERACTIVE_MAX_TOKENS,
    INTERACTIVE_TEMPERATURE,
};
use sprout_core::{Error, GenerationBackend, GenerationOptions, Result};

use crate::json::parse_json_response;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

// =============================================================================
// INTERACTIVE PARTNER
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartnerMove {
    Question,
    Fact,
    Encouragement,
    Challenge,
    Wonder,
}

/// What the AI partner says next, addressed to the child.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerReply {
    #[serde(rename = "type")]
    pub reply_type: PartnerMove,
    pub content: String,
    #[serde(default)]
    pub reasoning: String,
    pub urgency: Urgency,
    #[serde(default = "speak_by_default")]
    pub should_speak: bool,
}

fn speak_by_default() -> bool {
    true
}

#[derive(Debug, Clone, Default)]
pub struct InteractiveTurn {
    pub child_name: String,
    pub child_age: i32,
    pub conversation_history: Vec<String>,
    pub conversation_phase: Option<String>,
    pub child_interaction_count: u32,
    pub user_input: Option<String>,
}

const PARTNER_SYSTEM_PROMPT: &str = "You are a friendly AI that speaks directly to children to \
encourage their curiosity and learning. Always respond as if talking TO the child, not about them.";

pub fn interactive_prompt(turn: &InteractiveTurn) -> String {
    let name = &turn.child_name;
    let age = turn.child_age;
    let history = if turn.conversation_history.is_empty() {
        "Just starting...".to_string()
    } else {
        turn.conversation_history.join("\n")
    };
    let input = turn.user_input.as_deref().filter(|s| !s.trim().is_empty());
    let just_said = input
        .map(|s| format!("\nCHILD JUST SAID: \"{s}\""))
        .unwrap_or_default();
    let respond = input
        .map(|s| {
            format!(
                "\n- RESPOND DIRECTLY to what {name} just said: \"{s}\"\
                 \n- If they asked a question, answer it in a simple, age-appropriate way\
                 \n- If they made a statement, show interest and ask a related question"
            )
        })
        .unwrap_or_default();

    format!(
        r#"You are an AI conversation partner speaking DIRECTLY to {name}, a {age}-year-old child.

CONVERSATION PHASE: {phase}
INTERACTION COUNT: {count}
CONVERSATION HISTORY: {history}{just_said}

PHASE GUIDELINES:
- INTRO (0-2 interactions): welcome warmly, ask open-ended questions about their interests
- ACTIVE (3-5): build on their topics, ask "why" and "how", share amazing related facts
- DEEPER (6-8): thought experiments, connect ideas, predict and imagine
- WRAP (8+): celebrate their thinking, reflect on discoveries

RESPONSE TYPES: question, fact, encouragement, challenge, wonder

IMPORTANT:
- Always speak TO the child, not ABOUT them
- Use age-appropriate language for {age} years old
- Keep responses to 1-2 sentences for speaking aloud{respond}

Return JSON with this structure:
{{
  "type": "question|fact|encouragement|challenge|wonder",
  "content": "What you would say directly to the child",
  "reasoning": "Why this helps the child's development",
  "urgency": "low|medium|high",
  "shouldSpeak": true
}}"#,
        phase = turn.conversation_phase.as_deref().unwrap_or("active"),
        count = turn.child_interaction_count,
    )
}

/// The fixed partner replies used on failure.
pub fn partner_fallbacks(child_name: &str) -> [PartnerReply; 5] {
    let reply = |reply_type, content: String, reasoning: &str, urgency| PartnerReply {
        reply_type,
        content,
        reasoning: reasoning.to_string(),
        urgency,
        should_speak: true,
    };
    [
        reply(
            PartnerMove::Question,
            format!("{child_name}, what's the most interesting thing you've noticed today?"),
            "Open-ended questions encourage observation and reflection",
            Urgency::Medium,
        ),
        reply(
            PartnerMove::Wonder,
            format!(
                "Wow {child_name}, I wonder what would happen if we could see with our ears like bats do!"
            ),
            "Imagination exercises develop creative thinking",
            Urgency::Medium,
        ),
        reply(
            PartnerMove::Fact,
            "Did you know butterflies taste with their feet? Nature is so amazing!".to_string(),
            "Surprising facts spark curiosity about the natural world",
            Urgency::Low,
        ),
        reply(
            PartnerMove::Encouragement,
            format!(
                "You're such a great question-asker, {child_name}! Scientists ask lots of questions too."
            ),
            "Positive reinforcement builds confidence in curiosity",
            Urgency::Low,
        ),
        reply(
            PartnerMove::Challenge,
            format!("{child_name}, if you could invent something to help animals, what would it be?"),
            "Creative challenges develop problem-solving skills",
            Urgency::Medium,
        ),
    ]
}

fn pick_random<T, const N: usize>(options: [T; N]) -> T {
    let index = rand::thread_rng().gen_range(0..N);
    Vec::from(options).swap_remove(index)
}

async fn ask<T: serde::de::DeserializeOwned>(
    backend: Option<&dyn GenerationBackend>,
    system: &str,
    prompt: &str,
    options: GenerationOptions,
) -> Result<T> {
    let backend =
        backend.ok_or_else(|| Error::Config("No generation backend configured".to_string()))?;
    let content = backend.generate_with_system(system, prompt, options).await?;
    if content.trim().is_empty() {
        return Err(Error::Inference("No response from model".to_string()));
    }
    parse_json_response(&content)
}

fn log_fallback(component: &'static str, error: &Error) {
    warn!(
        subsystem = "inference",
        component,
        fallback = true,
        error = %error,
        "Assist generation failed, using fallback"
    );
}

/// Next partner turn for the child.
pub async fn interactive_reply(
    backend: Option<&dyn GenerationBackend>,
    turn: &InteractiveTurn,
) -> PartnerReply {
    let options =
        GenerationOptions::new(INTERACTIVE_TEMPERATURE).with_max_tokens(INTERACTIVE_MAX_TOKENS);
    match ask(backend, PARTNER_SYSTEM_PROMPT, &interactive_prompt(turn), options).await {
        Ok(reply) => reply,
        Err(e) => {
            log_fallback("interactive", &e);
            pick_random(partner_fallbacks(&turn.child_name))
        }
    }
}

// =============================================================================
// PARENT COACHING
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoachingMove {
    Question,
    Fact,
    Activity,
    Encouragement,
}

/// A suggestion shown to the parent during a live conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachingSuggestion {
    #[serde(rename = "type")]
    pub suggestion_type: CoachingMove,
    pub content: String,
    #[serde(default)]
    pub reasoning: String,
    pub urgency: Urgency,
}

#[derive(Debug, Clone, Default)]
pub struct CoachingContext {
    pub child_name: String,
    pub child_age: i32,
    pub conversation_context: Vec<String>,
    pub recent_transcription: Option<String>,
}

const COACHING_SYSTEM_PROMPT: &str = "You are a child development expert providing real-time \
conversation coaching to parents. Respond with practical, research-based suggestions.";

pub fn coaching_prompt(ctx: &CoachingContext) -> String {
    let context = if ctx.conversation_context.is_empty() {
        "Beginning of conversation".to_string()
    } else {
        ctx.conversation_context.join("\n---\n")
    };
    let recent = ctx
        .recent_transcription
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("No recent speech detected");

    format!(
        r#"You are an expert child development specialist providing real-time conversation guidance to a parent talking with their {age}-year-old child named {name}.

CONVERSATION CONTEXT:
{context}

RECENT TRANSCRIPTION:
{recent}

CHILD DEVELOPMENT GOALS:
- Encourage epistemic curiosity
- Develop critical thinking and reasoning
- Build vocabulary and language complexity
- Foster social-emotional development
- Support executive function development

Consider Socratic questioning, expansion, scaffolding, open-ended questions, and wondering aloud.
Provide a SINGLE, actionable suggestion.

Return a JSON object with this structure:
{{
  "type": "question|fact|activity|encouragement",
  "content": "Specific suggestion for the parent to use",
  "reasoning": "Why this suggestion helps the child's development",
  "urgency": "low|medium|high"
}}

Urgency is high when the child asked a question or showed strong interest, medium for a good
opportunity to deepen thinking, low for general engagement."#,
        age = ctx.child_age,
        name = ctx.child_name,
    )
}

/// The fixed coaching suggestions used on failure.
pub fn coaching_fallbacks() -> [CoachingSuggestion; 5] {
    let suggestion = |suggestion_type, content: &str, reasoning: &str, urgency| CoachingSuggestion {
        suggestion_type,
        content: content.to_string(),
        reasoning: reasoning.to_string(),
        urgency,
    };
    [
        suggestion(
            CoachingMove::Question,
            "What do you think about that? Tell me more!",
            "Open-ended questions encourage elaboration and deeper thinking",
            Urgency::Medium,
        ),
        suggestion(
            CoachingMove::Question,
            "Why do you think that happens?",
            "Why questions develop causal reasoning skills",
            Urgency::Medium,
        ),
        suggestion(
            CoachingMove::Question,
            "How would you figure that out?",
            "Encourages problem-solving and scientific thinking",
            Urgency::Medium,
        ),
        suggestion(
            CoachingMove::Encouragement,
            "That's a really interesting question! You're thinking like a scientist.",
            "Positive reinforcement builds confidence in curiosity",
            Urgency::Low,
        ),
        suggestion(
            CoachingMove::Activity,
            "Let's imagine what would happen if... Can you picture it?",
            "Imagination exercises develop creative and abstract thinking",
            Urgency::Medium,
        ),
    ]
}

/// Coaching suggestion for the parent.
pub async fn real_time_suggestion(
    backend: Option<&dyn GenerationBackend>,
    ctx: &CoachingContext,
) -> CoachingSuggestion {
    let options = GenerationOptions::new(ASSIST_TEMPERATURE).with_max_tokens(ASSIST_MAX_TOKENS);
    match ask(backend, COACHING_SYSTEM_PROMPT, &coaching_prompt(ctx), options).await {
        Ok(suggestion) => suggestion,
        Err(e) => {
            log_fallback("real_time", &e);
            pick_random(coaching_fallbacks())
        }
    }
}

// =============================================================================
// FAMILY FACILITATION
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacilitationMove {
    FollowUp,
    ThemeSuggestion,
    ParentGuidance,
    Encouragement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Child,
    Parent,
}

/// Guidance for the parent; the facilitator never speaks to the child.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilySuggestion {
    #[serde(rename = "type")]
    pub suggestion_type: FacilitationMove,
    pub content: String,
    #[serde(default)]
    pub parent_guidance: String,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default = "speak_by_default")]
    pub is_for_parent: bool,
    #[serde(default)]
    pub should_speak: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FamilyContext {
    pub child_name: String,
    pub child_age: Option<i32>,
    pub conversation_history: Vec<String>,
    pub conversation_theme: Option<String>,
    pub recent_transcription: Option<String>,
    pub speaker: Option<Speaker>,
}

pub fn family_prompt(ctx: &FamilyContext) -> String {
    let name = &ctx.child_name;
    let age = ctx
        .child_age
        .map(|a| a.to_string())
        .unwrap_or_else(|| "young".to_string());
    let history = if ctx.conversation_history.is_empty() {
        "Conversation just started".to_string()
    } else {
        ctx.conversation_history.join("\n")
    };
    let theme = ctx.conversation_theme.as_deref().filter(|t| !t.trim().is_empty());
    let recent = ctx.recent_transcription.as_deref().unwrap_or("None yet");

    let (latest, strategy) = match ctx.speaker {
        Some(Speaker::Child) => (
            format!("{name} just said: \"{recent}\""),
            "CHILD JUST SPOKE - guide the parent's response:\n\
             - If the child asked a question, help the parent guide the child to think it through first\n\
             - If the child made a statement, suggest how the parent can show interest and follow up\n\
             - Deepen THIS topic with \"why\", \"how\", and \"what if\" questions",
        ),
        Some(Speaker::Parent) => (
            format!("Parent just said: \"{recent}\""),
            "PARENT JUST SPOKE - suggest the next step:\n\
             - Acknowledge the parent's good response\n\
             - Suggest deeper follow-up questions on the SAME topic",
        ),
        None => (format!("Recent input: \"{recent}\""), ""),
    };

    let theme_line = match theme {
        Some(t) => format!("Current theme: {t}\n- STAY focused on the established theme: {t}"),
        None => "Current theme: Not established yet\n- FIRST establish a conversation theme based on what interests the child most".to_string(),
    };

    format!(
        r#"You are a family conversation facilitator AI helping a parent have a meaningful conversation with their {age}-year-old child named {name}.

CRITICAL PRINCIPLES:
1. NEVER replace the parent - always suggest what the PARENT should say or ask
2. Deepen the existing conversation thread rather than changing topics
3. Provide specific, actionable guidance for the parent
4. Keep a single conversation theme around {name}'s interests

Recent conversation context:
{history}

{theme_line}

{latest}

{strategy}

RESPONSE TYPES: follow_up, theme_suggestion, parent_guidance, encouragement

Return ONLY valid JSON:
{{
  "type": "follow_up|theme_suggestion|parent_guidance|encouragement",
  "content": "Specific suggestion for what the parent should say",
  "parentGuidance": "Why this approach helps",
  "reasoning": "How this deepens the current conversation thread",
  "isForParent": true,
  "shouldSpeak": false
}}"#
    )
}

/// Returned when the model answered but the reply did not parse.
pub fn family_parse_fallback(child_name: &str) -> FamilySuggestion {
    FamilySuggestion {
        suggestion_type: FacilitationMove::ParentGuidance,
        content: format!(
            "Ask {child_name} to tell you more about what they're thinking. Try: \"What's the most interesting part about that?\""
        ),
        parent_guidance: format!(
            "Keep the conversation focused on {child_name}'s interests and ask open-ended questions."
        ),
        reasoning: "Encouraging deeper exploration of child interests".to_string(),
        is_for_parent: true,
        should_speak: false,
    }
}

/// Returned when the model is unavailable.
pub fn family_fallback() -> FamilySuggestion {
    FamilySuggestion {
        suggestion_type: FacilitationMove::ParentGuidance,
        content: "Try asking an open-ended question like \"What do you think about that?\" or \"Tell me more!\"".to_string(),
        parent_guidance: "Open-ended questions help children share their thoughts and keep conversations flowing naturally.".to_string(),
        reasoning: "Basic conversation facilitation technique".to_string(),
        is_for_parent: true,
        should_speak: false,
    }
}

/// Facilitation suggestion for the parent.
pub async fn family_suggestion(
    backend: Option<&dyn GenerationBackend>,
    ctx: &FamilyContext,
) -> FamilySuggestion {
    let options = GenerationOptions::new(ASSIST_TEMPERATURE).with_max_tokens(FAMILY_MAX_TOKENS);
    match ask::<FamilySuggestion>(backend, &family_prompt(ctx), "", options).await {
        Ok(mut suggestion) => {
            suggestion.is_for_parent = true;
            suggestion
        }
        Err(e @ Error::Serialization(_)) => {
            log_fallback("family", &e);
            family_parse_fallback(&ctx.child_name)
        }
        Err(e) => {
            log_fallback("family", &e);
            family_fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partner_reply_parses_camel_case() {
        let raw = r#"{"type":"wonder","content":"Wow!","reasoning":"r","urgency":"high","shouldSpeak":false}"#;
        let reply: PartnerReply = serde_json::from_str(raw).unwrap();
        assert_eq!(reply.reply_type, PartnerMove::Wonder);
        assert_eq!(reply.urgency, Urgency::High);
        assert!(!reply.should_speak);
    }

    #[test]
    fn test_partner_fallbacks_use_name() {
        let fallbacks = partner_fallbacks("Maya");
        assert_eq!(fallbacks.len(), 5);
        assert!(fallbacks[0].content.starts_with("Maya, what's"));
        assert!(fallbacks.iter().all(|f| f.should_speak));
    }

    #[test]
    fn test_interactive_prompt_includes_input() {
        let turn = InteractiveTurn {
            child_name: "Leo".to_string(),
            child_age: 5,
            user_input: Some("Why is the sky blue?".to_string()),
            ..Default::default()
        };
        let prompt = interactive_prompt(&turn);
        assert!(prompt.contains("CHILD JUST SAID: \"Why is the sky blue?\""));
        assert!(prompt.contains("CONVERSATION HISTORY: Just starting..."));
        assert!(prompt.contains("CONVERSATION PHASE: active"));
    }

    #[tokio::test]
    async fn test_interactive_without_backend_uses_fallback() {
        let turn = InteractiveTurn {
            child_name: "Ada".to_string(),
            child_age: 6,
            ..Default::default()
        };
        let reply = interactive_reply(None, &turn).await;
        assert!(partner_fallbacks("Ada").contains(&reply));
    }

    #[tokio::test]
    async fn test_real_time_without_backend_uses_fallback() {
        let reply = real_time_suggestion(None, &CoachingContext::default()).await;
        assert!(coaching_fallbacks().contains(&reply));
    }

    #[tokio::test]
    async fn test_family_without_backend_uses_generic_fallback() {
        let ctx = FamilyContext {
            child_name: "Ada".to_string(),
            ..Default::default()
        };
        assert_eq!(family_suggestion(None, &ctx).await, family_fallback());
    }

    #[test]
    fn test_family_prompt_speaker_branches() {
        let mut ctx = FamilyContext {
            child_name: "Ada".to_string(),
            child_age: Some(7),
            recent_transcription: Some("Why do cats purr?".to_string()),
            speaker: Some(Speaker::Child),
            ..Default::default()
        };
        let prompt = family_prompt(&ctx);
        assert!(prompt.contains("Ada just said: \"Why do cats purr?\""));
        assert!(prompt.contains("FIRST establish a conversation theme"));

        ctx.speaker = Some(Speaker::Parent);
        ctx.conversation_theme = Some("animals".to_string());
        let prompt = family_prompt(&ctx);
        assert!(prompt.contains("Parent just said:"));
        assert!(prompt.contains("STAY focused on the established theme: animals"));
    }

    #[test]
    fn test_facilitation_move_snake_case() {
        let json = serde_json::to_value(family_fallback()).unwrap();
        assert_eq!(json["type"], "parent_guidance");
        assert_eq!(json["isForParent"], true);
    }
}
