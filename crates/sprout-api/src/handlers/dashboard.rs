//! Parent dashboard: totals, recent conversations, today's starter.

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sprout_core::defaults::{RECENT_CONVERSATIONS, STARTER_INSIGHT_CATEGORIES};
use sprout_core::{ChildRepository, ConversationRepository, InsightRepository};
use sprout_inference::generate_starter;
use sprout_inference::starters::EMPTY_REPLY_STARTER;
use uuid::Uuid;

use crate::auth::RequireAuth;
use crate::error::ApiError;
use crate::state::AppState;

/// Placeholder child used when the starter spans all of a parent's children.
const GENERIC_CHILD_NAME: &str = "your child";
const GENERIC_CHILD_AGE: i32 = 6;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardConversation {
    pub id: Uuid,
    pub title: String,
    pub child_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub children_count: i64,
    pub total_conversations: i64,
    pub total_insights: i64,
    pub recent_conversations: Vec<DashboardConversation>,
    pub today_starter: String,
}

#[utoipa::path(get, path = "/api/v1/dashboard", tag = "Dashboard",
    responses((status = 200, description = "Totals, recent conversations and a conversation starter")))]
pub async fn get_dashboard(
    State(state): State<AppState>,
    auth: RequireAuth,
) -> Result<Json<Dashboard>, ApiError> {
    let parent = auth.user_id;
    let (children_count, total_conversations, total_insights, recent, categories) = tokio::try_join!(
        state.db.children.count_for_parent(parent),
        state.db.conversations.count_for_parent(parent),
        state.db.insights.count_for_parent(parent),
        state
            .db
            .conversations
            .list_for_parent(parent, Some(RECENT_CONVERSATIONS)),
        state
            .db
            .insights
            .recent_categories_for_parent(parent, STARTER_INSIGHT_CATEGORIES),
    )?;

    let today_starter = if categories.is_empty() {
        EMPTY_REPLY_STARTER.to_string()
    } else {
        generate_starter(
            state.generation(),
            GENERIC_CHILD_NAME,
            GENERIC_CHILD_AGE,
            &categories,
        )
        .await
    };

    Ok(Json(Dashboard {
        children_count,
        total_conversations,
        total_insights,
        recent_conversations: recent
            .into_iter()
            .map(|c| DashboardConversation {
                id: c.id,
                title: c.title,
                child_name: c.child_name,
                created_at: c.created_at,
            })
            .collect(),
        today_starter,
    }))
}
