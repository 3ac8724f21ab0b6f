//! Structured logging schema and field name constants for sprout.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation can query by the same field names in every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), operation completions |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-item iteration (per-insight scoring contributions) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated from the HTTP request.
/// Format: UUIDv7 (time-ordered).
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "api", "insights", "db", "inference"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "classifier", "openai", "whisper", "pool", "analysis"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "compute_visualization", "analyze", "transcribe", "refresh"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Parent (user) UUID.
pub const USER_ID: &str = "user_id";

/// Child UUID being operated on.
pub const CHILD_ID: &str = "child_id";

/// Conversation UUID being operated on.
pub const CONVERSATION_ID: &str = "conversation_id";

/// Insight UUID being operated on.
pub const INSIGHT_ID: &str = "insight_id";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of insights read or produced.
pub const INSIGHT_COUNT: &str = "insight_count";

/// Number of conversations read.
pub const CONVERSATION_COUNT: &str = "conversation_count";

/// Number of recommendations produced.
pub const RECOMMENDATION_COUNT: &str = "recommendation_count";

/// Byte length of a prompt.
pub const PROMPT_LEN: &str = "prompt_len";

/// Byte length of a model response.
pub const RESPONSE_LEN: &str = "response_len";

/// Byte length of uploaded audio.
pub const AUDIO_BYTES: &str = "audio_bytes";

// ─── Database fields ───────────────────────────────────────────────────────

/// Number of active connections in the pool.
pub const POOL_SIZE: &str = "pool_size";

/// Number of idle connections in the pool.
pub const POOL_IDLE: &str = "pool_idle";

/// Database table or entity affected.
pub const DB_TABLE: &str = "db_table";

// ─── Inference fields ──────────────────────────────────────────────────────

/// Model name used for inference.
pub const MODEL: &str = "model";

/// Whether a fixed fallback was served instead of model output.
pub const FALLBACK: &str = "fallback";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
