//! Insight listing across the caller's children.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use sprout_core::{InsightListItem, InsightRepository};
use uuid::Uuid;

use crate::auth::RequireAuth;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsQuery {
    pub child_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InsightList {
    pub insights: Vec<InsightListItem>,
}

/// Optional child filter; a present but malformed id is a 400.
fn child_filter(raw: Option<String>) -> Result<Option<Uuid>, ApiError> {
    match raw.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(id) => Uuid::parse_str(id)
            .map(Some)
            .map_err(|_| ApiError::BadRequest(format!("Invalid childId: {id}"))),
        None => Ok(None),
    }
}

#[utoipa::path(get, path = "/api/v1/insights", tag = "Insights",
    params(("childId" = Option<Uuid>, Query, description = "Restrict to one child")),
    responses((status = 200, description = "Caller's insights, newest first")))]
pub async fn list_insights(
    State(state): State<AppState>,
    auth: RequireAuth,
    Query(query): Query<InsightsQuery>,
) -> Result<Json<InsightList>, ApiError> {
    let child_id = child_filter(query.child_id)?;
    let insights = state
        .db
        .insights
        .list_for_parent(auth.user_id, child_id)
        .await?;
    Ok(Json(InsightList { insights }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_filter() {
        assert_eq!(child_filter(None).ok(), Some(None));
        assert_eq!(child_filter(Some(String::new())).ok(), Some(None));
        let id = Uuid::now_v7();
        assert_eq!(child_filter(Some(id.to_string())).ok(), Some(Some(id)));
        assert!(child_filter(Some("abc".into())).is_err());
    }
}
