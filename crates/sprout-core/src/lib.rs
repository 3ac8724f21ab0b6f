//! # sprout-core
//!
//! Core types, traits, and abstractions for the sprout conversation-insights
//! service.
//!
//! This crate provides the domain models (parents, children, conversations,
//! insights, recommendations), the shared error type, and the repository and
//! generation traits that the storage, inference, and HTTP crates implement.

pub mod age;
pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use age::{age_at, age_in_years};
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
