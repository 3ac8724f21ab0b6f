//! # sprout-inference
//!
//! Language-model plumbing for the sprout service.
//!
//! This crate provides:
//! - An OpenAI chat-completions backend implementing `GenerationBackend`
//! - A Whisper transcription backend for uploaded conversation audio
//! - Conversation analysis into structured insights
//! - Conversation starters, recommendation refresh, and playlist generation
//! - Live assistance for children, parents, and family conversations
//!
//! Every caller-facing generator except analysis and playlist generation
//! degrades to a fixed fallback when the backend is absent (demo mode) or
//! fails.
//!
//! # Feature Flags
//!
//! - `mock`: expose [`mock::MockGenerationBackend`] to dependent crates' tests

pub mod analysis;
pub mod assist;
pub mod json;
pub mod openai;
pub mod recommendations;
pub mod starters;
pub mod transcription;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use analysis::{analyze_conversation, demo_analysis, AnalysisInsight, ConversationAnalysis};
pub use assist::{
    family_suggestion, interactive_reply, real_time_suggestion, CoachingContext,
    CoachingSuggestion, FamilyContext, FamilySuggestion, InteractiveTurn, PartnerReply, Speaker,
};
pub use json::{clean_json_response, parse_json_response};
pub use openai::{OpenAIBackend, OpenAIConfig};
pub use recommendations::{
    fallback_recommendations, generate_playlist, generate_recommendations,
};
pub use starters::{demo_starter, generate_starter, DEMO_STARTERS};
pub use transcription::{TranscriptionBackend, TranscriptionResult, WhisperBackend};
