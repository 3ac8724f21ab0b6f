//! Scripted generation backend for tests.
//!
//! ```ignore
//! use sprout_inference::mock::MockGenerationBackend;
//!
//! let backend = MockGenerationBackend::new().with_fixed_response(r#"{"insights": []}"#);
//! assert_eq!(backend.call_count(), 0);
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use sprout_core::{Error, GenerationBackend, GenerationOptions, Result};

/// One recorded call.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub system: String,
    pub prompt: String,
    pub options: GenerationOptions,
}

#[derive(Debug, Default)]
struct MockState {
    queued: VecDeque<Result<String>>,
    calls: Vec<MockCall>,
}

/// Returns queued replies in order, then the fixed response.
#[derive(Clone)]
pub struct MockGenerationBackend {
    default_response: Arc<String>,
    fail_by_default: bool,
    state: Arc<Mutex<MockState>>,
}

impl Default for MockGenerationBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGenerationBackend {
    pub fn new() -> Self {
        Self {
            default_response: Arc::new("Mock response".to_string()),
            fail_by_default: false,
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Reply used once the queue is empty.
    pub fn with_fixed_response(mut self, response: impl Into<String>) -> Self {
        self.default_response = Arc::new(response.into());
        self
    }

    /// Fail every call once the queue is empty.
    pub fn failing(mut self) -> Self {
        self.fail_by_default = true;
        self
    }

    /// Queue a reply for the next call.
    pub fn push_response(&self, response: impl Into<String>) {
        self.lock().queued.push_back(Ok(response.into()));
    }

    /// Queue a failure for the next call.
    pub fn push_error(&self, message: impl Into<String>) {
        self.lock()
            .queued
            .push_back(Err(Error::Inference(message.into())));
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl GenerationBackend for MockGenerationBackend {
    async fn generate_with_system(
        &self,
        system: &str,
        prompt: &str,
        options: GenerationOptions,
    ) -> Result<String> {
        let mut state = self.lock();
        state.calls.push(MockCall {
            system: system.to_string(),
            prompt: prompt.to_string(),
            options,
        });
        match state.queued.pop_front() {
            Some(reply) => reply,
            None if self.fail_by_default => {
                Err(Error::Inference("Mock backend failure".to_string()))
            }
            None => Ok(self.default_response.to_string()),
        }
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_queue_then_default() {
        let backend = MockGenerationBackend::new().with_fixed_response("fixed");
        backend.push_response("first");
        backend.push_error("boom");

        let options = GenerationOptions::new(0.5);
        assert_eq!(backend.generate("a", options).await.unwrap(), "first");
        assert!(backend.generate("b", options).await.is_err());
        assert_eq!(backend.generate("c", options).await.unwrap(), "fixed");

        let calls = backend.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[2].prompt, "c");
        assert_eq!(calls[0].options.temperature, Some(0.5));
    }

    #[tokio::test]
    async fn test_failing_backend() {
        let backend = MockGenerationBackend::new().failing();
        let err = backend
            .generate("x", GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Inference(_)));
    }
}
