//! Domain models shared across sprout crates.
//!
//! Records read from storage serialize with camelCase field names because
//! they are returned as-is by the HTTP API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// PARENTS & AUTH
// =============================================================================

/// A parent account. Created on first sign-in.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Authenticated caller resolved from a bearer token.
#[derive(Debug, Clone)]
pub enum AuthPrincipal {
    User { user_id: Uuid, email: String },
    Anonymous,
}

impl AuthPrincipal {
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, AuthPrincipal::Anonymous)
    }

    /// Parent id for authenticated callers.
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            AuthPrincipal::User { user_id, .. } => Some(*user_id),
            AuthPrincipal::Anonymous => None,
        }
    }
}

// =============================================================================
// CHILDREN
// =============================================================================

/// A child profile owned by one parent.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Child {
    pub id: Uuid,
    pub parent_id: Uuid,
    pub name: String,
    pub birth_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Child listing row with related-record counts.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChildSummary {
    pub id: Uuid,
    pub name: String,
    pub birth_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub conversation_count: i64,
    pub insight_count: i64,
    pub recommendation_count: i64,
}

// =============================================================================
// CONVERSATIONS
// =============================================================================

/// A recorded or AI-assisted conversation with a child.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: Uuid,
    pub child_id: Uuid,
    pub title: String,
    pub transcription: Option<String>,
    /// Length in seconds.
    pub duration: i32,
    /// True once analysis has produced insights.
    pub processed: bool,
    pub conversation_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Conversation listing row.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub id: Uuid,
    pub child_id: Uuid,
    pub child_name: String,
    pub title: String,
    pub duration: i32,
    pub processed: bool,
    pub conversation_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub insight_count: i64,
}

// =============================================================================
// INSIGHTS
// =============================================================================

/// Well-known insight types. Stored upper-cased; other values are accepted.
pub mod insight_types {
    pub const CURIOSITY_PATTERN: &str = "CURIOSITY_PATTERN";
    pub const COGNITIVE_STRENGTH: &str = "COGNITIVE_STRENGTH";
    pub const INTEREST_SIGNAL: &str = "INTEREST_SIGNAL";
    pub const LEARNING_STYLE: &str = "LEARNING_STYLE";
    pub const SOCIAL_PATTERN: &str = "SOCIAL_PATTERN";
}

/// A single observation about a child derived from a conversation.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub id: Uuid,
    pub child_id: Uuid,
    pub conversation_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub insight_type: String,
    pub category: String,
    pub title: String,
    /// The insight's content text.
    pub description: String,
    /// In [0, 1]; absent values are treated as 0.5 when scoring.
    pub confidence: Option<f64>,
    /// Opaque JSON payload stored as text.
    pub metadata: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insight listing row with the names of its parents.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsightListItem {
    #[serde(flatten)]
    pub insight: Insight,
    pub child_name: String,
    pub conversation_title: Option<String>,
}

/// Insight to be inserted.
#[derive(Debug, Clone)]
pub struct NewInsight {
    pub child_id: Uuid,
    pub conversation_id: Option<Uuid>,
    pub insight_type: String,
    pub category: String,
    pub title: String,
    pub description: String,
    pub confidence: Option<f64>,
    pub metadata: Option<String>,
}

impl NewInsight {
    /// Upper-case the type and clamp confidence into [0, 1].
    pub fn normalized(mut self) -> Self {
        self.insight_type = self.insight_type.trim().to_uppercase();
        self.confidence = self
            .confidence
            .filter(|c| c.is_finite())
            .map(|c| c.clamp(0.0, 1.0));
        self
    }
}

// =============================================================================
// RECOMMENDATIONS
// =============================================================================

/// A stored content or activity recommendation.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: Uuid,
    pub child_id: Uuid,
    #[serde(rename = "type")]
    pub recommendation_type: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub age_group: String,
    pub tags: Vec<String>,
    pub provider: Option<String>,
    pub url: Option<String>,
    pub location: Option<String>,
    pub price: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Recommendation produced by generation (or fallback), before storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewRecommendation {
    #[serde(rename = "type")]
    pub recommendation_type: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub age_group: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
}

// =============================================================================
// PLAYLIST
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct MusicItem {
    pub title: String,
    pub artist: String,
    pub reason: String,
    pub age_appropriate: bool,
    pub mood: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct MovieItem {
    pub title: String,
    pub genre: String,
    pub reason: String,
    pub duration: String,
    pub rating: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ShowItem {
    pub title: String,
    pub platform: String,
    pub reason: String,
    pub episodes: String,
    pub educational: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AnimeItem {
    pub title: String,
    pub reason: String,
    pub age_rating: String,
    pub themes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct HobbyItem {
    pub name: String,
    pub description: String,
    pub reason: String,
    pub difficulty: String,
    pub materials: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct LessonItem {
    pub name: String,
    /// Online, in-person, or workshop.
    #[serde(rename = "type")]
    pub lesson_type: String,
    pub reason: String,
    pub frequency: String,
    pub benefits: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct EventItem {
    pub name: String,
    pub location: String,
    pub reason: String,
    pub date: String,
    pub family_friendly: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct PlaylistContent {
    pub music: Vec<MusicItem>,
    pub movies: Vec<MovieItem>,
    pub shows: Vec<ShowItem>,
    pub anime: Vec<AnimeItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct PlaylistActivities {
    pub hobbies: Vec<HobbyItem>,
    pub lessons: Vec<LessonItem>,
    pub events: Vec<EventItem>,
}

/// Personalized content and activity playlist for one child.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct Playlist {
    pub content: PlaylistContent,
    pub activities: PlaylistActivities,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_insight_normalized_uppercases_type() {
        let insight = NewInsight {
            child_id: Uuid::nil(),
            conversation_id: None,
            insight_type: " curiosity_pattern ".to_string(),
            category: "Scientific Wonder".to_string(),
            title: "Stars".to_string(),
            description: "why do stars twinkle".to_string(),
            confidence: Some(1.4),
            metadata: None,
        }
        .normalized();
        assert_eq!(insight.insight_type, "CURIOSITY_PATTERN");
        assert_eq!(insight.confidence, Some(1.0));
    }

    #[test]
    fn test_new_insight_normalized_drops_nan_confidence() {
        let insight = NewInsight {
            child_id: Uuid::nil(),
            conversation_id: None,
            insight_type: "x".to_string(),
            category: String::new(),
            title: String::new(),
            description: String::new(),
            confidence: Some(f64::NAN),
            metadata: None,
        }
        .normalized();
        assert_eq!(insight.confidence, None);
    }

    #[test]
    fn test_insight_serializes_type_field() {
        let insight = Insight {
            id: Uuid::nil(),
            child_id: Uuid::nil(),
            conversation_id: None,
            insight_type: "INTEREST_SIGNAL".to_string(),
            category: "Art".to_string(),
            title: "Painter".to_string(),
            description: "loves to paint".to_string(),
            confidence: Some(0.7),
            metadata: None,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&insight).unwrap();
        assert_eq!(json["type"], "INTEREST_SIGNAL");
        assert_eq!(json["childId"], Uuid::nil().to_string());
        assert!(json.get("insightType").is_none());
    }

    #[test]
    fn test_new_recommendation_tolerates_missing_optional_fields() {
        let rec: NewRecommendation = serde_json::from_str(
            r#"{"type":"BOOK","title":"Rocks","description":"A book about rocks"}"#,
        )
        .unwrap();
        assert_eq!(rec.recommendation_type, "BOOK");
        assert!(rec.tags.is_empty());
        assert!(rec.url.is_none());
    }

    #[test]
    fn test_playlist_partial_json_fills_defaults() {
        let playlist: Playlist =
            serde_json::from_str(r#"{"content":{"music":[{"title":"Songs"}]}}"#).unwrap();
        assert_eq!(playlist.content.music.len(), 1);
        assert_eq!(playlist.content.music[0].title, "Songs");
        assert!(!playlist.content.music[0].age_appropriate);
        assert!(playlist.activities.hobbies.is_empty());
    }

    #[test]
    fn test_auth_principal() {
        let anon = AuthPrincipal::Anonymous;
        assert!(!anon.is_authenticated());
        assert_eq!(anon.user_id(), None);

        let id = Uuid::now_v7();
        let user = AuthPrincipal::User {
            user_id: id,
            email: "parent@example.com".to_string(),
        };
        assert!(user.is_authenticated());
        assert_eq!(user.user_id(), Some(id));
    }
}
