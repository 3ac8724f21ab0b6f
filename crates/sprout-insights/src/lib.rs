//! # sprout-insights
//!
//! Pure, synchronous computation over stored insights.
//!
//! This crate provides:
//! - The visualization scoring pipeline: keyword classification, score
//!   accumulation, normalization with floors, and profile assembly
//! - Recommendation context extraction from recent insights
//! - Playlist conversion and age-banded fallbacks
//! - A research-backed guidance library for conversation facilitation
//!
//! ## Example
//!
//! ```ignore
//! use sprout_insights::{compute_visualization, ScoringConfig};
//!
//! let insights = db.insights.recent_for_child(child_id, 50).await?;
//! let conversations = db.conversations.recent_for_child(child_id, 20).await?;
//! let profile = compute_visualization(&insights, &conversations, &ScoringConfig::default());
//! assert!(profile.interests.len() >= 2);
//! ```

pub mod accumulator;
pub mod classifier;
pub mod config;
pub mod context;
pub mod guidance;
pub mod keywords;
pub mod normalizer;
pub mod playlist;
pub mod profile;

pub use accumulator::{accumulate, RawInterest, RawScores};
pub use classifier::{classify, Classification};
pub use config::ScoringConfig;
pub use context::{developmental_level, InsightAnalysis, RecommendationContext};
pub use guidance::{
    FacilitatorCheck, GuidanceQuery, ParentGoal, QuestionSuggestion, ResearchCategory,
    ResearchDocument, ResearchLibrary,
};
pub use normalizer::{normalize, rank_interests};
pub use playlist::{fallback_playlist, playlist_from_recommendations, AgeBand};
pub use profile::{
    compute_visualization, ConversationPatterns, Development, Interest, LearningStyle,
    Personality, VisualizationProfile,
};
