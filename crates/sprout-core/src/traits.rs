//! Core traits for sprout abstractions.
//!
//! These traits define the interfaces that storage and model backends
//! implement, keeping handlers testable against mocks.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// PARENT & TOKEN REPOSITORIES
// =============================================================================

/// Repository for parent accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Return the user with this email, creating it if absent. New users
    /// without a name take the email's local part.
    async fn find_or_create(&self, email: &str, name: Option<&str>) -> Result<User>;

    /// Fetch a user by id.
    async fn get(&self, id: Uuid) -> Result<Option<User>>;
}

/// Repository for opaque bearer tokens.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Issue a new token for the user. Only its digest is stored.
    async fn issue(&self, user_id: Uuid) -> Result<String>;

    /// Resolve a presented token to its owner, touching `last_used_at`.
    async fn validate(&self, token: &str) -> Result<Option<User>>;
}

// =============================================================================
// CHILD REPOSITORY
// =============================================================================

/// Repository for child profiles. Every read is scoped to the owning parent.
#[async_trait]
pub trait ChildRepository: Send + Sync {
    /// Create a child for the parent.
    async fn create(&self, parent_id: Uuid, name: &str, birth_date: DateTime<Utc>)
        -> Result<Child>;

    /// Fetch a child owned by the parent.
    async fn get_owned(&self, parent_id: Uuid, child_id: Uuid) -> Result<Option<Child>>;

    /// List the parent's children, newest first, with related counts.
    async fn list_for_parent(&self, parent_id: Uuid) -> Result<Vec<ChildSummary>>;

    /// Count the parent's children.
    async fn count_for_parent(&self, parent_id: Uuid) -> Result<i64>;

    /// Delete a child and everything attached to it. Returns false if not owned.
    async fn delete_owned(&self, parent_id: Uuid, child_id: Uuid) -> Result<bool>;
}

// =============================================================================
// CONVERSATION REPOSITORY
// =============================================================================

/// Request for creating a conversation.
#[derive(Debug, Clone)]
pub struct CreateConversationRequest {
    pub child_id: Uuid,
    pub title: String,
    pub transcription: Option<String>,
    pub duration: i32,
}

/// Repository for conversations.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Insert an unprocessed conversation.
    async fn create(&self, req: CreateConversationRequest) -> Result<Conversation>;

    /// Fetch a conversation whose child belongs to the parent.
    async fn get_owned(&self, parent_id: Uuid, conversation_id: Uuid)
        -> Result<Option<Conversation>>;

    /// List the parent's conversations, newest first.
    async fn list_for_parent(
        &self,
        parent_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<ConversationSummary>>;

    /// Most recent conversations of one child.
    async fn recent_for_child(&self, child_id: Uuid, limit: i64) -> Result<Vec<Conversation>>;

    /// Count the parent's conversations.
    async fn count_for_parent(&self, parent_id: Uuid) -> Result<i64>;

    /// Set the processed flag.
    async fn set_processed(&self, conversation_id: Uuid, processed: bool) -> Result<()>;
}

// =============================================================================
// INSIGHT REPOSITORY
// =============================================================================

/// Repository for insights.
#[async_trait]
pub trait InsightRepository: Send + Sync {
    /// Insert insights in one transaction.
    async fn insert_many(&self, insights: Vec<NewInsight>) -> Result<Vec<Insight>>;

    /// Delete all insights of a conversation. Returns the number removed.
    async fn delete_for_conversation(&self, conversation_id: Uuid) -> Result<u64>;

    /// Most recent insights of one child.
    async fn recent_for_child(&self, child_id: Uuid, limit: i64) -> Result<Vec<Insight>>;

    /// Insights attached to the given conversations.
    async fn for_conversations(&self, conversation_ids: &[Uuid]) -> Result<Vec<Insight>>;

    /// List the parent's insights, optionally for one child, newest first.
    async fn list_for_parent(
        &self,
        parent_id: Uuid,
        child_id: Option<Uuid>,
    ) -> Result<Vec<InsightListItem>>;

    /// Count the parent's insights.
    async fn count_for_parent(&self, parent_id: Uuid) -> Result<i64>;

    /// Categories of the parent's most recent insights.
    async fn recent_categories_for_parent(&self, parent_id: Uuid, limit: i64)
        -> Result<Vec<String>>;
}

// =============================================================================
// RECOMMENDATION REPOSITORY
// =============================================================================

/// Repository for recommendations.
#[async_trait]
pub trait RecommendationRepository: Send + Sync {
    /// Active recommendations of one child, newest first.
    async fn list_active(&self, child_id: Uuid, limit: Option<i64>)
        -> Result<Vec<Recommendation>>;

    /// Deactivate the child's active set and insert `recommendations` as the new one.
    async fn replace_active(
        &self,
        child_id: Uuid,
        recommendations: Vec<NewRecommendation>,
    ) -> Result<usize>;
}

// =============================================================================
// GENERATION BACKEND
// =============================================================================

/// Sampling options for a single generation call.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GenerationOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl GenerationOptions {
    pub fn new(temperature: f32) -> Self {
        Self {
            temperature: Some(temperature),
            max_tokens: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Backend for text generation (chat completion).
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate text with system context.
    async fn generate_with_system(
        &self,
        system: &str,
        prompt: &str,
        options: GenerationOptions,
    ) -> Result<String>;

    /// Generate text given only a user prompt.
    async fn generate(&self, prompt: &str, options: GenerationOptions) -> Result<String> {
        self.generate_with_system("", prompt, options).await
    }

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}
