//! # sprout-api
//!
//! HTTP surface of the sprout service: bearer-token auth, child and
//! conversation management, insight visualization, recommendations,
//! playlists, and live-conversation assist.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod router;
pub mod services;
pub mod state;

pub use error::ApiError;
pub use router::{build_router, parse_allowed_origins, ApiDoc};
pub use state::AppState;
