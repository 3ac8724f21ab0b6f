//! Playlist assembly: stored recommendations when fresh, otherwise a
//! model-generated playlist, with stored or fixed fallbacks.

use chrono::{Duration, Utc};
use sprout_core::defaults::{
    PLAYLIST_CONTEXT_CONVERSATIONS, PLAYLIST_MIN_STORED, RECOMMENDATION_FRESH_DAYS,
};
use sprout_core::{
    age_in_years, Child, ConversationRepository, InsightRepository, Playlist,
    RecommendationRepository, Result,
};
use sprout_inference::generate_playlist;
use sprout_insights::{fallback_playlist, playlist_from_recommendations, InsightAnalysis};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::state::AppState;

/// Where a playlist came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistSource {
    Stored,
    Generated,
    StoredFallback,
    FixedFallback,
}

/// Pick the playlist source given the stored state and the generation outcome.
///
/// `generated` is only consulted when the stored set is not fresh enough.
pub fn choose_source(fresh_count: usize, stored_count: usize, generated: bool) -> PlaylistSource {
    if fresh_count >= PLAYLIST_MIN_STORED {
        PlaylistSource::Stored
    } else if generated {
        PlaylistSource::Generated
    } else if stored_count > 0 {
        PlaylistSource::StoredFallback
    } else {
        PlaylistSource::FixedFallback
    }
}

/// Build the playlist for a child.
pub async fn build_playlist(state: &AppState, child: &Child) -> Result<Playlist> {
    let age = age_in_years(child.birth_date);
    let stored = state.db.recommendations.list_active(child.id, None).await?;
    let fresh_since = Utc::now() - Duration::days(RECOMMENDATION_FRESH_DAYS);
    let fresh_count = stored.iter().filter(|r| r.created_at > fresh_since).count();

    if choose_source(fresh_count, stored.len(), false) == PlaylistSource::Stored {
        debug!(
            subsystem = "api",
            component = "playlist_service",
            child_id = %child.id,
            "Using stored recommendations"
        );
        return Ok(playlist_from_recommendations(&stored));
    }

    let generated = match state.generation() {
        Some(backend) => {
            let recent = state
                .db
                .conversations
                .recent_for_child(child.id, PLAYLIST_CONTEXT_CONVERSATIONS)
                .await?;
            let ids: Vec<Uuid> = recent.iter().map(|c| c.id).collect();
            let insights = state.db.insights.for_conversations(&ids).await?;
            let analysis = InsightAnalysis::from_insights(&insights, age);

            match generate_playlist(backend, &child.name, age, &analysis, &recent).await {
                Ok(playlist) => Some(playlist),
                Err(e) => {
                    warn!(
                        subsystem = "api",
                        component = "playlist_service",
                        child_id = %child.id,
                        error = %e,
                        "Playlist generation failed, falling back"
                    );
                    None
                }
            }
        }
        None => None,
    };

    let source = choose_source(fresh_count, stored.len(), generated.is_some());
    Ok(match (source, generated) {
        (PlaylistSource::Generated, Some(playlist)) => playlist,
        (PlaylistSource::StoredFallback, _) => playlist_from_recommendations(&stored),
        _ => fallback_playlist(age),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_stored_set_wins() {
        assert_eq!(choose_source(4, 6, true), PlaylistSource::Stored);
        assert_eq!(choose_source(4, 4, false), PlaylistSource::Stored);
    }

    #[test]
    fn test_generation_used_when_stored_set_is_stale() {
        assert_eq!(choose_source(3, 10, true), PlaylistSource::Generated);
    }

    #[test]
    fn test_failures_fall_back_in_order() {
        assert_eq!(choose_source(1, 2, false), PlaylistSource::StoredFallback);
        assert_eq!(choose_source(0, 0, false), PlaylistSource::FixedFallback);
    }
}
