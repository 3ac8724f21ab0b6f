//! Live-conversation assist: child partner turns, parent coaching, family
//! facilitation, and research-based guidance.
//!
//! The model-backed routes never fail once the request validates; generation
//! errors and demo mode both produce a fallback suggestion.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use sprout_inference::{
    family_suggestion, interactive_reply, real_time_suggestion, CoachingContext,
    CoachingSuggestion, FamilyContext, FamilySuggestion, InteractiveTurn, PartnerReply, Speaker,
};
use sprout_insights::{FacilitatorCheck, GuidanceQuery, ParentGoal, QuestionSuggestion};

use super::required;
use crate::auth::RequireAuth;
use crate::error::ApiError;
use crate::state::AppState;

const DEFAULT_PARTNER_NAME: &str = "friend";
const DEFAULT_PARTNER_AGE: i32 = 5;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InteractiveRequest {
    pub child_id: Option<String>,
    pub child_name: Option<String>,
    pub child_age: Option<i32>,
    pub conversation_history: Vec<String>,
    pub conversation_phase: Option<String>,
    pub child_interaction_count: u32,
    pub user_input: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RealTimeRequest {
    pub child_id: Option<String>,
    pub child_name: Option<String>,
    pub child_age: Option<i32>,
    pub conversation_context: Vec<String>,
    pub recent_transcription: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FamilyRequest {
    pub child_id: Option<String>,
    pub child_name: Option<String>,
    pub child_age: Option<i32>,
    pub conversation_history: Vec<String>,
    pub conversation_theme: Option<String>,
    pub recent_transcription: Option<String>,
    pub speaker_type: Option<Speaker>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GuidanceRequest {
    pub child_age: Option<i32>,
    pub conversation_topic: Option<String>,
    pub parent_goal: Option<ParentGoal>,
    pub current_context: Option<String>,
    pub child_response: Option<String>,
    pub conversation_history: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuidanceResponse {
    pub questions: Vec<QuestionSuggestion>,
    pub parent_guidance: String,
    pub facilitator: FacilitatorCheck,
}

impl InteractiveRequest {
    fn into_turn(self) -> InteractiveTurn {
        InteractiveTurn {
            child_name: self
                .child_name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| DEFAULT_PARTNER_NAME.to_string()),
            child_age: self.child_age.unwrap_or(DEFAULT_PARTNER_AGE),
            conversation_history: self.conversation_history,
            conversation_phase: self.conversation_phase,
            child_interaction_count: self.child_interaction_count,
            user_input: self.user_input,
        }
    }
}

#[utoipa::path(post, path = "/api/v1/assist/interactive", tag = "Assist",
    responses(
        (status = 200, description = "Next partner turn"),
        (status = 400, description = "childId missing")
    ))]
pub async fn interactive(
    State(state): State<AppState>,
    _auth: RequireAuth,
    Json(body): Json<InteractiveRequest>,
) -> Result<Json<PartnerReply>, ApiError> {
    required(body.child_id.clone(), "Child ID is required")?;
    let turn = body.into_turn();
    Ok(Json(interactive_reply(state.generation(), &turn).await))
}

#[utoipa::path(post, path = "/api/v1/assist/real-time", tag = "Assist",
    responses(
        (status = 200, description = "Coaching suggestion for the parent"),
        (status = 400, description = "Child information missing")
    ))]
pub async fn real_time(
    State(state): State<AppState>,
    _auth: RequireAuth,
    Json(body): Json<RealTimeRequest>,
) -> Result<Json<CoachingSuggestion>, ApiError> {
    const MISSING: &str = "Child information is required";
    required(body.child_id, MISSING)?;
    let child_name = required(body.child_name, MISSING)?;
    let child_age = body
        .child_age
        .ok_or_else(|| ApiError::BadRequest(MISSING.to_string()))?;

    let ctx = CoachingContext {
        child_name,
        child_age,
        conversation_context: body.conversation_context,
        recent_transcription: body.recent_transcription,
    };
    Ok(Json(real_time_suggestion(state.generation(), &ctx).await))
}

#[utoipa::path(post, path = "/api/v1/assist/family", tag = "Assist",
    responses(
        (status = 200, description = "Facilitation suggestion"),
        (status = 400, description = "childId or childName missing")
    ))]
pub async fn family(
    State(state): State<AppState>,
    _auth: RequireAuth,
    Json(body): Json<FamilyRequest>,
) -> Result<Json<FamilySuggestion>, ApiError> {
    const MISSING: &str = "Child ID and name are required";
    required(body.child_id, MISSING)?;
    let child_name = required(body.child_name, MISSING)?;

    let ctx = FamilyContext {
        child_name,
        child_age: body.child_age,
        conversation_history: body.conversation_history,
        conversation_theme: body.conversation_theme,
        recent_transcription: body.recent_transcription,
        speaker: body.speaker_type,
    };
    Ok(Json(family_suggestion(state.generation(), &ctx).await))
}

#[utoipa::path(post, path = "/api/v1/assist/guidance", tag = "Assist",
    responses(
        (status = 200, description = "Question suggestions, parent guidance and a facilitator check"),
        (status = 400, description = "childAge missing")
    ))]
pub async fn guidance(
    State(state): State<AppState>,
    _auth: RequireAuth,
    Json(body): Json<GuidanceRequest>,
) -> Result<Json<GuidanceResponse>, ApiError> {
    let child_age = body
        .child_age
        .ok_or_else(|| ApiError::BadRequest("Child age is required".to_string()))?;
    let topic = body.conversation_topic.unwrap_or_default();

    let query = GuidanceQuery {
        child_age,
        conversation_topic: topic.clone(),
        parent_goal: body.parent_goal,
        current_context: body.current_context.unwrap_or_default(),
    };
    let library = state.research.as_ref();

    Ok(Json(GuidanceResponse {
        questions: library.question_suggestions(&query),
        parent_guidance: library.parent_guidance(
            child_age,
            &topic,
            body.child_response.as_deref().unwrap_or_default(),
        ),
        facilitator: library.facilitator_opportunity(&body.conversation_history),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_interactive_defaults() {
        let body: InteractiveRequest =
            serde_json::from_value(json!({ "childId": "c1", "childName": "  " })).unwrap();
        let turn = body.into_turn();
        assert_eq!(turn.child_name, "friend");
        assert_eq!(turn.child_age, 5);
        assert!(turn.conversation_history.is_empty());
        assert_eq!(turn.child_interaction_count, 0);
    }

    #[test]
    fn test_family_speaker_parses_lowercase() {
        let body: FamilyRequest = serde_json::from_value(json!({
            "childId": "c1",
            "childName": "Leo",
            "speakerType": "parent"
        }))
        .unwrap();
        assert_eq!(body.speaker_type, Some(Speaker::Parent));
    }

    #[test]
    fn test_guidance_request_accepts_minimal_body() {
        let body: GuidanceRequest = serde_json::from_value(json!({ "childAge": 7 })).unwrap();
        assert_eq!(body.child_age, Some(7));
        assert!(body.parent_goal.is_none());
    }
}
