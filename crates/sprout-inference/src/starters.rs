//! Daily conversation starters.

use rand::seq::SliceRandom;
use tracing::warn;

use sprout_core::defaults::{STARTER_MAX_TOKENS, STARTER_TEMPERATURE};
use sprout_core::{GenerationBackend, GenerationOptions};

pub const STARTER_SYSTEM_PROMPT: &str = "You are a child development expert who creates \
engaging conversation starters for parents and children.";

/// Used when the model answers with nothing.
pub const EMPTY_REPLY_STARTER: &str = "What do you think would happen if we could talk to animals?";

/// Starters used in demo mode or when generation fails. `{childName}` is
/// replaced before returning.
pub const DEMO_STARTERS: [&str; 10] = [
    "What made you smile today?",
    "If you could have any superpower, what would it be and why?",
    "What's the most interesting thing you learned recently?",
    "Tell me about something that made you curious today.",
    "If you could visit any place in the world, where would you go?",
    "What's your favorite way to spend time with family?",
    "What would you like to invent to make the world better?",
    "What's something new you'd like to try or learn?",
    "Tell me about a time when you helped someone.",
    "What makes you feel proud of yourself?",
];

/// Random demo starter with the child's name substituted.
pub fn demo_starter(child_name: &str) -> String {
    DEMO_STARTERS
        .choose(&mut rand::thread_rng())
        .unwrap_or(&EMPTY_REPLY_STARTER)
        .replace("{childName}", child_name)
}

pub fn starter_prompt(child_name: &str, child_age: i32, recent_insights: &[String]) -> String {
    let insights = if recent_insights.is_empty() {
        String::new()
    } else {
        format!(
            "Recent insights about {}: {}",
            child_name,
            recent_insights.join(", ")
        )
    };
    format!(
        "Generate a conversation starter for a parent to use with their {child_age}-year-old child named {child_name}.

{insights}

The conversation starter should:
- Be age-appropriate and engaging
- Encourage curiosity and open-ended thinking
- Be suitable for daily routines (dinner, walk, bedtime)
- Avoid yes/no questions
- Be specific enough to spark interest but open enough for exploration

Return just the conversation starter text, nothing else."
    )
}

/// Produce a starter. Never fails: demo mode and generation errors fall
/// back to [`DEMO_STARTERS`], an empty reply to [`EMPTY_REPLY_STARTER`].
pub async fn generate_starter(
    backend: Option<&dyn GenerationBackend>,
    child_name: &str,
    child_age: i32,
    recent_insights: &[String],
) -> String {
    let Some(backend) = backend else {
        return demo_starter(child_name);
    };

    let options = GenerationOptions::new(STARTER_TEMPERATURE).with_max_tokens(STARTER_MAX_TOKENS);
    let prompt = starter_prompt(child_name, child_age, recent_insights);
    match backend
        .generate_with_system(STARTER_SYSTEM_PROMPT, &prompt, options)
        .await
    {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => EMPTY_REPLY_STARTER.to_string(),
        Err(e) => {
            warn!(
                subsystem = "inference",
                component = "starters",
                fallback = true,
                error = %e,
                "Starter generation failed, using demo starter"
            );
            demo_starter(child_name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_starter_is_member() {
        for _ in 0..20 {
            let starter = demo_starter("Maya");
            assert!(DEMO_STARTERS.contains(&starter.as_str()));
        }
    }

    #[test]
    fn test_prompt_lists_insights() {
        let prompt = starter_prompt("Leo", 7, &["space".to_string(), "dinosaurs".to_string()]);
        assert!(prompt.contains("7-year-old child named Leo"));
        assert!(prompt.contains("Recent insights about Leo: space, dinosaurs"));
    }

    #[test]
    fn test_prompt_without_insights() {
        let prompt = starter_prompt("Leo", 7, &[]);
        assert!(!prompt.contains("Recent insights"));
    }

    #[tokio::test]
    async fn test_demo_mode_uses_fixed_set() {
        let starter = generate_starter(None, "Ada", 5, &[]).await;
        assert!(DEMO_STARTERS.contains(&starter.as_str()));
    }
}
