//! Recommendation refresh.

use sprout_core::defaults::RECOMMENDATION_CONTEXT_INSIGHTS;
use sprout_core::{age_in_years, Child, InsightRepository, RecommendationRepository, Result};
use sprout_inference::generate_recommendations;
use sprout_insights::RecommendationContext;
use tracing::info;

use crate::state::AppState;

/// Replace the child's active recommendations with a freshly generated set
/// (or the fixed fallback set). Returns how many were stored.
pub async fn refresh_recommendations(state: &AppState, child: &Child) -> Result<usize> {
    let insights = state
        .db
        .insights
        .recent_for_child(child.id, RECOMMENDATION_CONTEXT_INSIGHTS)
        .await?;
    let ctx =
        RecommendationContext::from_insights(&child.name, age_in_years(child.birth_date), &insights);

    let recommendations = generate_recommendations(state.generation(), &ctx).await;
    let stored = state
        .db
        .recommendations
        .replace_active(child.id, recommendations)
        .await?;

    info!(
        subsystem = "api",
        component = "recommendation_service",
        child_id = %child.id,
        recommendation_count = stored,
        "Recommendations refreshed"
    );
    Ok(stored)
}
