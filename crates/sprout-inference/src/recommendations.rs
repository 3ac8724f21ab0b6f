//! Recommendation refresh and playlist generation.

use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use sprout_core::defaults::{
    PLAYLIST_MAX_TOKENS, PLAYLIST_TIMEOUT_SECS, RECOMMENDATION_TEMPERATURE,
};
use sprout_core::{
    Conversation, Error, GenerationBackend, GenerationOptions, NewRecommendation, Playlist, Result,
};
use sprout_insights::{InsightAnalysis, RecommendationContext};

use crate::json::parse_json_response;

pub const RECOMMENDATION_SYSTEM_PROMPT: &str = "You are a child development expert who creates \
personalized, actionable recommendations for families. Always respond with valid JSON.";

fn or_default(items: &[String], default: &str) -> String {
    if items.is_empty() {
        default.to_string()
    } else {
        items.join(", ")
    }
}

pub fn recommendation_prompt(ctx: &RecommendationContext) -> String {
    format!(
        r#"You are a child development expert creating personalized recommendations for {name}, a {age}-year-old child.

Based on their profile:
- Recent insights: {insights}
- Top interests: {interests}
- Cognitive strengths: {strengths}

Generate 8-12 diverse, age-appropriate recommendations across books, activities, classes,
experiences, educational toys and games, and educational videos.

Focus on recommendations that match the child's demonstrated interests and strengths,
encourage curiosity, are available in most communities or online, and offer different
types of engagement (hands-on, social, individual, creative).

Return as a JSON array with this structure:
[
  {{
    "type": "BOOK|ACTIVITY|CLASS|EXPERIENCE|TOY|GAME|VIDEO",
    "title": "Recommendation title",
    "description": "Why this matches the child's interests and development",
    "category": "Specific category",
    "ageGroup": "Age range",
    "tags": ["tag1", "tag2", "tag3"],
    "provider": "Provider name (optional)",
    "price": "Free|$|$$|$$$"
  }}
]"#,
        name = ctx.child_name,
        age = ctx.child_age,
        insights = ctx.recent_insights.join(", "),
        interests = ctx.top_interests.join(", "),
        strengths = ctx.cognitive_strengths.join(", "),
    )
}

/// The two recommendations stored when generation is unavailable.
pub fn fallback_recommendations(child_age: i32) -> Vec<NewRecommendation> {
    let tags = |t: &[&str]| t.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    vec![
        NewRecommendation {
            recommendation_type: "BOOK".to_string(),
            title: "The Curious Kid's Science Book".to_string(),
            description: "Perfect for children who love asking \"why\" and \"how\" questions \
                          about the world around them."
                .to_string(),
            category: "science book".to_string(),
            age_group: format!("{}-{} years", child_age, child_age + 2),
            tags: tags(&["science", "experiments", "curiosity"]),
            provider: None,
            url: None,
            location: None,
            price: Some("$".to_string()),
        },
        NewRecommendation {
            recommendation_type: "ACTIVITY".to_string(),
            title: "Nature Scavenger Hunt".to_string(),
            description: "Explore the outdoors while developing observation skills and \
                          connecting with nature."
                .to_string(),
            category: "outdoor activity".to_string(),
            age_group: format!("{}-{} years", child_age, child_age + 3),
            tags: tags(&["nature", "outdoor", "observation"]),
            provider: None,
            url: None,
            location: None,
            price: Some("Free".to_string()),
        },
    ]
}

async fn request_recommendations(
    backend: &dyn GenerationBackend,
    ctx: &RecommendationContext,
) -> Result<Vec<NewRecommendation>> {
    let content = backend
        .generate_with_system(
            RECOMMENDATION_SYSTEM_PROMPT,
            &recommendation_prompt(ctx),
            GenerationOptions::new(RECOMMENDATION_TEMPERATURE),
        )
        .await?;
    let recommendations: Vec<NewRecommendation> = parse_json_response(&content)?;
    if recommendations.is_empty() {
        return Err(Error::Inference("Model returned no recommendations".to_string()));
    }
    Ok(recommendations)
}

/// Generate a fresh recommendation set, using [`fallback_recommendations`]
/// in demo mode or when the model call or parse fails.
pub async fn generate_recommendations(
    backend: Option<&dyn GenerationBackend>,
    ctx: &RecommendationContext,
) -> Vec<NewRecommendation> {
    let Some(backend) = backend else {
        return fallback_recommendations(ctx.child_age);
    };

    match request_recommendations(backend, ctx).await {
        Ok(recommendations) => {
            info!(
                subsystem = "inference",
                component = "recommendations",
                recommendation_count = recommendations.len(),
                "Recommendations generated"
            );
            recommendations
        }
        Err(e) => {
            warn!(
                subsystem = "inference",
                component = "recommendations",
                fallback = true,
                error = %e,
                "Recommendation generation failed, using fallbacks"
            );
            fallback_recommendations(ctx.child_age)
        }
    }
}

pub fn playlist_prompt(
    child_name: &str,
    child_age: i32,
    analysis: &InsightAnalysis,
    recent: &[Conversation],
) -> String {
    let themes: Vec<String> = recent
        .iter()
        .take(3)
        .map(|c| {
            let excerpt: String = c
                .transcription
                .as_deref()
                .unwrap_or_default()
                .chars()
                .take(100)
                .collect();
            format!("- {}: {}...", c.title, excerpt)
        })
        .collect();

    let level = if analysis.developmental_level.is_empty() {
        "Age-appropriate"
    } else {
        analysis.developmental_level.as_str()
    };

    format!(
        r#"You are a child development expert creating personalized recommendations for {child_name}, age {child_age}.

CHILD ANALYSIS:
- Interests: {interests}
- Personality Traits: {personality}
- Learning Style: {learning}
- Curiosity Topics: {curiosity}
- Developmental Level: {level}
- Strengths: {strengths}

RECENT CONVERSATION THEMES:
{themes}

Create personalized recommendations that are specific, age-appropriate, and aligned with the
child's demonstrated interests and developmental needs. Provide 3-4 items per category.

Return ONLY valid JSON in this exact format:
{{
  "content": {{
    "music": [{{"title": "", "artist": "", "reason": "", "ageAppropriate": true, "mood": "happy/calm/energetic/creative"}}],
    "movies": [{{"title": "", "genre": "", "reason": "", "duration": "90 min", "rating": "G/PG"}}],
    "shows": [{{"title": "", "platform": "", "reason": "", "episodes": "", "educational": true}}],
    "anime": [{{"title": "", "reason": "", "ageRating": "All Ages/7+", "themes": []}}]
  }},
  "activities": {{
    "hobbies": [{{"name": "", "description": "", "reason": "", "difficulty": "Beginner/Intermediate", "materials": []}}],
    "lessons": [{{"name": "", "type": "Online/In-person/Workshop", "reason": "", "frequency": "Weekly/Bi-weekly", "benefits": []}}],
    "events": [{{"name": "", "location": "", "reason": "", "date": "This weekend/Next month", "familyFriendly": true}}]
  }}
}}"#,
        interests = or_default(&analysis.interests, "General exploration"),
        personality = or_default(&analysis.personality, "Curious and developing"),
        learning = or_default(&analysis.learning_style, "Visual and hands-on"),
        curiosity = or_default(&analysis.curiosity_topics, "Wide range of topics"),
        strengths = or_default(&analysis.strengths, "Problem-solving and creativity"),
        themes = themes.join("\n"),
    )
}

/// Ask the model for a playlist, bounded by a 30 second timeout.
pub async fn generate_playlist(
    backend: &dyn GenerationBackend,
    child_name: &str,
    child_age: i32,
    analysis: &InsightAnalysis,
    recent: &[Conversation],
) -> Result<Playlist> {
    let start = Instant::now();
    let prompt = playlist_prompt(child_name, child_age, analysis, recent);
    debug!(
        subsystem = "inference",
        component = "playlist",
        prompt_len = prompt.len(),
        "Requesting playlist"
    );

    let options =
        GenerationOptions::new(RECOMMENDATION_TEMPERATURE).with_max_tokens(PLAYLIST_MAX_TOKENS);
    let content = tokio::time::timeout(
        Duration::from_secs(PLAYLIST_TIMEOUT_SECS),
        backend.generate_with_system(&prompt, "", options),
    )
    .await
    .map_err(|_| {
        Error::Inference(format!(
            "Playlist generation timed out after {} seconds",
            PLAYLIST_TIMEOUT_SECS
        ))
    })??;

    let playlist: Playlist = parse_json_response(&content)?;
    debug!(
        subsystem = "inference",
        component = "playlist",
        duration_ms = start.elapsed().as_millis() as u64,
        "Playlist generated"
    );
    Ok(playlist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_fallback_age_groups() {
        let recs = fallback_recommendations(6);
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].age_group, "6-8 years");
        assert_eq!(recs[1].age_group, "6-9 years");
        assert_eq!(recs[1].title, "Nature Scavenger Hunt");
        assert_eq!(recs[1].price.as_deref(), Some("Free"));
    }

    #[test]
    fn test_recommendation_prompt_uses_context() {
        let ctx = RecommendationContext {
            child_name: "Maya".to_string(),
            child_age: 6,
            recent_insights: vec!["Stargazer".to_string()],
            top_interests: vec!["space interest".to_string()],
            cognitive_strengths: vec![],
        };
        let prompt = recommendation_prompt(&ctx);
        assert!(prompt.contains("for Maya, a 6-year-old child"));
        assert!(prompt.contains("- Top interests: space interest"));
    }

    #[test]
    fn test_playlist_prompt_defaults_and_excerpts() {
        let conversation = Conversation {
            id: Uuid::now_v7(),
            child_id: Uuid::nil(),
            title: "Moon talk".to_string(),
            transcription: Some("x".repeat(150)),
            duration: 60,
            processed: true,
            conversation_date: Utc::now(),
            created_at: Utc::now(),
        };
        let prompt = playlist_prompt("Leo", 4, &InsightAnalysis::default(), &[conversation]);
        assert!(prompt.contains("- Interests: General exploration"));
        assert!(prompt.contains("- Developmental Level: Age-appropriate"));
        assert!(prompt.contains(&format!("- Moon talk: {}...", "x".repeat(100))));
    }

    #[tokio::test]
    async fn test_demo_mode_returns_fallbacks() {
        let ctx = RecommendationContext::from_insights("Sam", 8, &[]);
        let recs = generate_recommendations(None, &ctx).await;
        assert_eq!(recs, fallback_recommendations(8));
    }
}
