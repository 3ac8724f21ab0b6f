//! Recommendation listing and refresh.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use sprout_core::{Recommendation, RecommendationRepository};
use uuid::Uuid;

use super::{owned_child, required_id};
use crate::auth::RequireAuth;
use crate::error::ApiError;
use crate::services::refresh_recommendations;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildIdParam {
    pub child_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationList {
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub success: bool,
    /// Number of recommendations stored.
    pub recommendations: usize,
}

#[utoipa::path(get, path = "/api/v1/recommendations", tag = "Recommendations",
    params(("childId" = Uuid, Query, description = "Child id")),
    responses(
        (status = 200, description = "Active recommendations, newest first"),
        (status = 400, description = "childId missing"),
        (status = 404, description = "Child not found")
    ))]
pub async fn list_recommendations(
    State(state): State<AppState>,
    auth: RequireAuth,
    Query(query): Query<ChildIdParam>,
) -> Result<Json<RecommendationList>, ApiError> {
    let child_id = required_id(query.child_id, "Child ID is required")?;
    let child = owned_child(&state, auth.user_id, child_id).await?;
    let recommendations = state.db.recommendations.list_active(child.id, None).await?;
    Ok(Json(RecommendationList { recommendations }))
}

#[utoipa::path(post, path = "/api/v1/recommendations", tag = "Recommendations",
    responses(
        (status = 200, description = "Active set replaced"),
        (status = 400, description = "childId missing"),
        (status = 404, description = "Child not found")
    ))]
pub async fn generate_recommendations(
    State(state): State<AppState>,
    auth: RequireAuth,
    Json(body): Json<ChildIdParam>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let child_id = required_id(body.child_id, "Child ID is required")?;
    let child = owned_child(&state, auth.user_id, child_id).await?;
    let stored = refresh_recommendations(&state, &child).await?;
    Ok(Json(RefreshResponse {
        success: true,
        recommendations: stored,
    }))
}
