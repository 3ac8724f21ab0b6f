//! Child profiles, visualization, and playlist.

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sprout_core::defaults::{
    PROFILE_INSIGHTS, PROFILE_RECOMMENDATIONS, RECENT_CONVERSATIONS, UNTITLED_CONVERSATION_TITLE,
};
use sprout_core::{
    age_in_years, Child, ChildRepository, ChildSummary, ConversationRepository, InsightRepository,
    Playlist, RecommendationRepository,
};
use sprout_insights::{compute_visualization, VisualizationProfile};
use tracing::info;
use uuid::Uuid;

use super::{owned_child, required};
use crate::auth::RequireAuth;
use crate::error::ApiError;
use crate::services::build_playlist;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChildRequest {
    pub name: Option<String>,
    pub birth_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateChildResponse {
    pub child: Child,
}

#[derive(Debug, Serialize)]
pub struct ChildStats {
    pub conversations: i64,
    pub insights: i64,
    pub recommendations: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentConversation {
    pub id: Uuid,
    pub title: String,
    pub duration: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopInsight {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub insight_type: String,
    pub category: String,
    pub title: String,
    pub confidence: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecommendation {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub recommendation_type: String,
    pub title: String,
    pub description: String,
    pub category: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildProfile {
    pub id: Uuid,
    pub name: String,
    pub birth_date: DateTime<Utc>,
    pub age: i32,
    pub created_at: DateTime<Utc>,
    pub stats: ChildStats,
    pub recent_conversations: Vec<RecentConversation>,
    pub top_insights: Vec<TopInsight>,
    pub recommendations: Vec<ProfileRecommendation>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationResponse {
    pub child_id: Uuid,
    pub child_name: String,
    pub child_age: i32,
    pub total_insights: usize,
    #[serde(flatten)]
    pub profile: VisualizationProfile,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistResponse {
    #[serde(flatten)]
    pub playlist: Playlist,
    pub generated_at: DateTime<Utc>,
    pub child_name: String,
    pub child_age: i32,
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
fn parse_birth_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Birth date from the request body; missing, unparseable, or future dates are rejected.
fn validate_birth_date(raw: Option<String>, now: DateTime<Utc>) -> Result<DateTime<Utc>, ApiError> {
    let raw = required(raw, "Name and birth date are required")?;
    let birth_date = parse_birth_date(&raw)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid birth date: {raw}")))?;
    if birth_date > now {
        return Err(ApiError::BadRequest(
            "Birth date cannot be in the future".to_string(),
        ));
    }
    Ok(birth_date)
}

#[utoipa::path(get, path = "/api/v1/children", tag = "Children",
    responses((status = 200, description = "Caller's children, newest first")))]
pub async fn list_children(
    State(state): State<AppState>,
    auth: RequireAuth,
) -> Result<Json<Vec<ChildSummary>>, ApiError> {
    let children = state.db.children.list_for_parent(auth.user_id).await?;
    Ok(Json(children))
}

#[utoipa::path(post, path = "/api/v1/children", tag = "Children",
    responses(
        (status = 200, description = "Child created"),
        (status = 400, description = "Missing name or invalid birth date")
    ))]
pub async fn create_child(
    State(state): State<AppState>,
    auth: RequireAuth,
    Json(body): Json<CreateChildRequest>,
) -> Result<Json<CreateChildResponse>, ApiError> {
    let name = required(body.name, "Name and birth date are required")?;
    let birth_date = validate_birth_date(body.birth_date, Utc::now())?;

    let child = state
        .db
        .children
        .create(auth.user_id, &name, birth_date)
        .await?;
    info!(subsystem = "api", component = "children", child_id = %child.id, "Child created");
    Ok(Json(CreateChildResponse { child }))
}

#[utoipa::path(get, path = "/api/v1/children/{id}", tag = "Children",
    params(("id" = Uuid, Path, description = "Child id")),
    responses(
        (status = 200, description = "Child profile with recent activity"),
        (status = 404, description = "Child not found")
    ))]
pub async fn get_child(
    State(state): State<AppState>,
    auth: RequireAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<ChildProfile>, ApiError> {
    let summary = state
        .db
        .children
        .list_for_parent(auth.user_id)
        .await?
        .into_iter()
        .find(|c| c.id == id)
        .ok_or_else(|| ApiError::NotFound("Child not found".to_string()))?;

    let (conversations, insights, recommendations) = tokio::try_join!(
        state.db.conversations.recent_for_child(id, RECENT_CONVERSATIONS),
        state.db.insights.recent_for_child(id, PROFILE_INSIGHTS),
        state
            .db
            .recommendations
            .list_active(id, Some(PROFILE_RECOMMENDATIONS)),
    )?;

    Ok(Json(ChildProfile {
        id: summary.id,
        name: summary.name,
        birth_date: summary.birth_date,
        age: age_in_years(summary.birth_date),
        created_at: summary.created_at,
        stats: ChildStats {
            conversations: summary.conversation_count,
            insights: summary.insight_count,
            recommendations: summary.recommendation_count,
        },
        recent_conversations: conversations
            .into_iter()
            .map(|c| RecentConversation {
                id: c.id,
                title: if c.title.is_empty() {
                    UNTITLED_CONVERSATION_TITLE.to_string()
                } else {
                    c.title
                },
                duration: c.duration,
                created_at: c.created_at,
            })
            .collect(),
        top_insights: insights
            .into_iter()
            .map(|i| TopInsight {
                id: i.id,
                insight_type: i.insight_type,
                category: i.category,
                title: i.title,
                confidence: i.confidence,
            })
            .collect(),
        recommendations: recommendations
            .into_iter()
            .map(|r| ProfileRecommendation {
                id: r.id,
                recommendation_type: r.recommendation_type,
                title: r.title,
                description: r.description,
                category: r.category,
            })
            .collect(),
    }))
}

#[utoipa::path(delete, path = "/api/v1/children/{id}", tag = "Children",
    params(("id" = Uuid, Path, description = "Child id")),
    responses(
        (status = 200, description = "Child and related records deleted"),
        (status = 404, description = "Child not found")
    ))]
pub async fn delete_child(
    State(state): State<AppState>,
    auth: RequireAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !state.db.children.delete_owned(auth.user_id, id).await? {
        return Err(ApiError::NotFound("Child not found".to_string()));
    }
    info!(subsystem = "api", component = "children", child_id = %id, "Child deleted");
    Ok(Json(serde_json::json!({ "success": true })))
}

#[utoipa::path(get, path = "/api/v1/children/{id}/visualization", tag = "Children",
    params(("id" = Uuid, Path, description = "Child id")),
    responses(
        (status = 200, description = "Normalized personality, interest, development, learning-style and conversation-pattern scores"),
        (status = 404, description = "Child not found")
    ))]
pub async fn get_visualization(
    State(state): State<AppState>,
    auth: RequireAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<VisualizationResponse>, ApiError> {
    let child = owned_child(&state, auth.user_id, id).await?;
    let config = state.scoring.as_ref();

    let (insights, conversations) = tokio::try_join!(
        state
            .db
            .insights
            .recent_for_child(id, config.max_insights as i64),
        state
            .db
            .conversations
            .recent_for_child(id, config.max_conversations as i64),
    )?;

    let profile = compute_visualization(&insights, &conversations, config);

    Ok(Json(VisualizationResponse {
        child_id: child.id,
        child_name: child.name,
        child_age: age_in_years(child.birth_date),
        total_insights: insights.len(),
        profile,
        generated_at: Utc::now(),
    }))
}

#[utoipa::path(get, path = "/api/v1/children/{id}/playlist", tag = "Children",
    params(("id" = Uuid, Path, description = "Child id")),
    responses(
        (status = 200, description = "Content and activity playlist"),
        (status = 404, description = "Child not found")
    ))]
pub async fn get_playlist(
    State(state): State<AppState>,
    auth: RequireAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<PlaylistResponse>, ApiError> {
    let child = owned_child(&state, auth.user_id, id).await?;
    let playlist = build_playlist(&state, &child).await?;

    Ok(Json(PlaylistResponse {
        playlist,
        generated_at: Utc::now(),
        child_age: age_in_years(child.birth_date),
        child_name: child.name,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Duration};

    #[test]
    fn test_parse_birth_date_formats() {
        let date = parse_birth_date("2019-06-01").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2019, 6, 1));
        assert!(parse_birth_date("2019-06-01T08:30:00Z").is_some());
        assert!(parse_birth_date("2019-06-01T08:30:00+02:00").is_some());
        assert!(parse_birth_date("June 1st").is_none());
    }

    #[test]
    fn test_validate_birth_date_rejects_future_and_missing() {
        let now = Utc::now();
        let tomorrow = (now + Duration::days(1)).format("%Y-%m-%d").to_string();
        assert!(matches!(
            validate_birth_date(Some(tomorrow), now),
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(
            validate_birth_date(None, now),
            Err(ApiError::BadRequest(_))
        ));
        assert!(validate_birth_date(Some("2020-02-29".into()), now).is_ok());
    }
}
