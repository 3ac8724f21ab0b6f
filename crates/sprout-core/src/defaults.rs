//! Centralized default constants for sprout.
//!
//! **This module is the single source of truth** for shared default values.
//! Crates reference these constants instead of defining their own magic
//! numbers. Organized by domain area.

// =============================================================================
// VISUALIZATION
// =============================================================================

/// Most-recent insights fed into the scoring pipeline.
pub const VISUALIZATION_MAX_INSIGHTS: usize = 50;

/// Most-recent conversations whose transcripts are scanned.
pub const VISUALIZATION_MAX_CONVERSATIONS: usize = 20;

/// Example titles kept per interest.
pub const VISUALIZATION_MAX_EXAMPLES: usize = 4;

/// Interests kept after sorting by strength.
pub const VISUALIZATION_MAX_INTERESTS: usize = 8;

/// Confidence used when an insight carries none.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

// =============================================================================
// LISTS
// =============================================================================

/// Recent conversations shown on the dashboard and child profile.
pub const RECENT_CONVERSATIONS: i64 = 5;

/// Recent insights shown on the child profile.
pub const PROFILE_INSIGHTS: i64 = 10;

/// Active recommendations shown on the child profile.
pub const PROFILE_RECOMMENDATIONS: i64 = 8;

/// Insights used to build recommendation context.
pub const RECOMMENDATION_CONTEXT_INSIGHTS: i64 = 10;

/// Insight categories passed to the daily conversation starter.
pub const STARTER_INSIGHT_CATEGORIES: i64 = 3;

/// Recent conversations whose insights feed the playlist context.
pub const PLAYLIST_CONTEXT_CONVERSATIONS: i64 = 10;

// =============================================================================
// RECOMMENDATIONS
// =============================================================================

/// Stored recommendations younger than this many days are reused for playlists.
pub const RECOMMENDATION_FRESH_DAYS: i64 = 7;

/// Minimum fresh recommendations needed before the playlist skips the model.
pub const PLAYLIST_MIN_STORED: usize = 4;

/// Distinct interest categories passed to the recommendation prompt.
pub const RECOMMENDATION_TOP_INTERESTS: usize = 5;

/// Distinct cognitive-strength categories passed to the recommendation prompt.
pub const RECOMMENDATION_TOP_STRENGTHS: usize = 3;

// =============================================================================
// CONVERSATIONS
// =============================================================================

/// Title for conversations created from AI sessions when none is supplied.
pub const AI_CONVERSATION_TITLE: &str = "AI Conversation";

/// Title for uploaded recordings when none is supplied.
pub const UNTITLED_CONVERSATION_TITLE: &str = "Untitled Conversation";

/// Duration in seconds assumed for text-mode conversations.
pub const TEXT_CONVERSATION_DURATION_SECS: i32 = 60;

/// Bytes per second used to estimate the duration of uploaded audio.
pub const AUDIO_BYTES_PER_SEC: usize = 16_000;

// =============================================================================
// INFERENCE
// =============================================================================

/// Default OpenAI-compatible API base URL.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default chat completion model.
pub const OPENAI_GEN_MODEL: &str = "gpt-4o-mini";

/// Default transcription model.
pub const OPENAI_TRANSCRIBE_MODEL: &str = "whisper-1";

/// Language hint sent with transcription requests.
pub const TRANSCRIBE_LANGUAGE: &str = "en";

/// HTTP timeout for generation requests, in seconds.
pub const GEN_TIMEOUT_SECS: u64 = 120;

/// HTTP timeout for transcription requests, in seconds.
pub const TRANSCRIBE_TIMEOUT_SECS: u64 = 300;

/// Timeout for playlist generation, in seconds.
pub const PLAYLIST_TIMEOUT_SECS: u64 = 30;

/// Temperature for transcript analysis.
pub const ANALYSIS_TEMPERATURE: f32 = 0.3;

/// Temperature for conversation starters.
pub const STARTER_TEMPERATURE: f32 = 0.7;

/// Token cap for conversation starters.
pub const STARTER_MAX_TOKENS: u32 = 150;

/// Temperature for recommendation and playlist generation.
pub const RECOMMENDATION_TEMPERATURE: f32 = 0.7;

/// Token cap for playlist generation.
pub const PLAYLIST_MAX_TOKENS: u32 = 2000;

/// Temperature for the child-facing conversation partner.
pub const INTERACTIVE_TEMPERATURE: f32 = 0.8;

/// Token cap for the child-facing conversation partner.
pub const INTERACTIVE_MAX_TOKENS: u32 = 300;

/// Temperature for parent coaching and family facilitation.
pub const ASSIST_TEMPERATURE: f32 = 0.7;

/// Token cap for parent coaching.
pub const ASSIST_MAX_TOKENS: u32 = 500;

/// Token cap for family facilitation.
pub const FAMILY_MAX_TOKENS: u32 = 300;

/// Values of `OPENAI_API_KEY` that mean "no real key configured".
pub const DEMO_API_KEY: &str = "demo-mode";

/// Placeholder marker shipped in sample environment files.
pub const PLACEHOLDER_API_KEY_MARKER: &str = "PLEASE_ADD";

// =============================================================================
// AUTH
// =============================================================================

/// Prefix of issued bearer tokens.
pub const TOKEN_PREFIX: &str = "sp_key_";

/// Random bytes in an issued bearer token (hex encoded after the prefix).
pub const TOKEN_BYTES: usize = 32;

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 3000;

/// Default rate limit: max requests per period.
pub const RATE_LIMIT_REQUESTS: u64 = 100;

/// Default rate limit: period in seconds.
pub const RATE_LIMIT_PERIOD_SECS: u64 = 60;

/// Default request body limit (audio uploads included).
pub const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

// =============================================================================
// DATABASE POOL
// =============================================================================

/// Maximum pool connections.
pub const POOL_MAX_CONNECTIONS: u32 = 20;

/// Minimum idle pool connections.
pub const POOL_MIN_CONNECTIONS: u32 = 2;

/// Seconds to wait for a pooled connection.
pub const POOL_ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// Seconds before an idle connection is closed.
pub const POOL_IDLE_TIMEOUT_SECS: u64 = 600;

/// Seconds before a connection is recycled.
pub const POOL_MAX_LIFETIME_SECS: u64 = 1800;
