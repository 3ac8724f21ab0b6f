//! Service layer between handlers and the storage/inference crates.

pub mod analysis_service;
pub mod playlist_service;
pub mod recommendation_service;

pub use analysis_service::{analyze_and_store, extract_insights};
pub use playlist_service::build_playlist;
pub use recommendation_service::refresh_recommendations;
