//! OpenAI-compatible generation backend.
//!
//! ```rust,no_run
//! use sprout_core::{GenerationBackend, GenerationOptions};
//! use sprout_inference::openai::{OpenAIBackend, OpenAIConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = OpenAIConfig {
//!         api_key: Some("sk-...".to_string()),
//!         ..Default::default()
//!     };
//!     let backend = OpenAIBackend::new(config).unwrap();
//!     let reply = backend
//!         .generate("Say hello", GenerationOptions::new(0.7))
//!         .await
//!         .unwrap();
//!     println!("{reply}");
//! }
//! ```

mod backend;
mod error;
mod types;

pub use backend::{is_demo_key, OpenAIBackend, OpenAIConfig};
pub use error::{to_sprout_error, OpenAIErrorCode};
pub use types::*;
