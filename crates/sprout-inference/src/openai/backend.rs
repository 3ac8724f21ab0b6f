//! OpenAI chat-completions backend.

use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use sprout_core::defaults::{
    DEMO_API_KEY, GEN_TIMEOUT_SECS, OPENAI_BASE_URL, OPENAI_GEN_MODEL, OPENAI_TRANSCRIBE_MODEL,
    PLACEHOLDER_API_KEY_MARKER,
};
use sprout_core::{Error, GenerationBackend, GenerationOptions, Result};

use super::error::{to_sprout_error, OpenAIErrorCode};
use super::types::*;

/// Whether a configured key means "run without the API".
pub fn is_demo_key(api_key: Option<&str>) -> bool {
    match api_key.map(str::trim) {
        None | Some("") => true,
        Some(key) => key == DEMO_API_KEY || key.contains(PLACEHOLDER_API_KEY_MARKER),
    }
}

/// Configuration for the OpenAI backend.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// Base URL for the API endpoint.
    pub base_url: String,
    pub api_key: Option<String>,
    /// Chat model used for analysis, starters, and suggestions.
    pub gen_model: String,
    /// Whisper model used for audio uploads.
    pub transcribe_model: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            base_url: OPENAI_BASE_URL.to_string(),
            api_key: None,
            gen_model: OPENAI_GEN_MODEL.to_string(),
            transcribe_model: OPENAI_TRANSCRIBE_MODEL.to_string(),
            timeout_seconds: GEN_TIMEOUT_SECS,
        }
    }
}

impl OpenAIConfig {
    /// Read `OPENAI_*` environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| OPENAI_BASE_URL.to_string()),
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            gen_model: std::env::var("OPENAI_GEN_MODEL")
                .unwrap_or_else(|_| OPENAI_GEN_MODEL.to_string()),
            transcribe_model: std::env::var("OPENAI_TRANSCRIBE_MODEL")
                .unwrap_or_else(|_| OPENAI_TRANSCRIBE_MODEL.to_string()),
            timeout_seconds: std::env::var("OPENAI_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(GEN_TIMEOUT_SECS),
        }
    }

    /// True when no usable API key is configured.
    pub fn is_demo(&self) -> bool {
        is_demo_key(self.api_key.as_deref())
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Chat-completions client implementing `GenerationBackend`.
pub struct OpenAIBackend {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIBackend {
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Inference(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            subsystem = "inference",
            component = "openai",
            model = %config.gen_model,
            "Initializing OpenAI backend: url={}",
            config.base_url
        );

        Ok(Self { client, config })
    }

    /// Build from the environment. Returns `Ok(None)` in demo mode.
    pub fn from_env() -> Result<Option<Self>> {
        let config = OpenAIConfig::from_env();
        if config.is_demo() {
            warn!(
                subsystem = "inference",
                component = "openai",
                "No usable OPENAI_API_KEY; running in demo mode"
            );
            return Ok(None);
        }
        Self::new(config).map(Some)
    }

    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    fn build_request(&self, path: &str) -> reqwest::RequestBuilder {
        let mut req = self.client.post(self.config.endpoint(path));
        if let Some(ref api_key) = self.config.api_key {
            req = req.bearer_auth(api_key);
        }
        req
    }
}

#[async_trait]
impl GenerationBackend for OpenAIBackend {
    async fn generate_with_system(
        &self,
        system: &str,
        prompt: &str,
        options: GenerationOptions,
    ) -> Result<String> {
        let start = Instant::now();
        debug!(
            subsystem = "inference",
            component = "openai",
            op = "chat",
            model = %self.config.gen_model,
            prompt_len = prompt.len(),
            "Sending chat completion"
        );

        let mut messages = Vec::with_capacity(2);
        if !system.is_empty() {
            messages.push(ChatMessage::system(system));
        }
        if !prompt.is_empty() {
            messages.push(ChatMessage::user(prompt));
        }

        let request = ChatCompletionRequest {
            model: self.config.gen_model.clone(),
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        let response = self
            .build_request("/chat/completions")
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Inference(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body: Option<OpenAIErrorResponse> = response.json().await.ok();
            let (message, error_type) = body
                .map(|b| (b.error.message, b.error.error_type))
                .unwrap_or_else(|| ("Unknown error".to_string(), String::new()));
            warn!(
                subsystem = "inference",
                component = "openai",
                status = status.as_u16(),
                error = %message,
                "Chat completion failed"
            );
            let code = OpenAIErrorCode::from_response(status.as_u16(), &error_type);
            return Err(to_sprout_error(code, &message));
        }

        let result: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Inference(format!("Failed to parse response: {}", e)))?;

        let content = result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        debug!(
            subsystem = "inference",
            component = "openai",
            op = "chat",
            response_len = content.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Chat completion finished"
        );
        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.config.gen_model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OpenAIConfig::default();
        assert_eq!(config.base_url, OPENAI_BASE_URL);
        assert_eq!(config.gen_model, OPENAI_GEN_MODEL);
        assert_eq!(config.transcribe_model, OPENAI_TRANSCRIBE_MODEL);
        assert_eq!(config.timeout_seconds, GEN_TIMEOUT_SECS);
        assert!(config.api_key.is_none());
        assert!(config.is_demo());
    }

    #[test]
    fn test_demo_key_detection() {
        assert!(is_demo_key(None));
        assert!(is_demo_key(Some("")));
        assert!(is_demo_key(Some("demo-mode")));
        assert!(is_demo_key(Some("sk-PLEASE_ADD_YOUR_KEY")));
        assert!(!is_demo_key(Some("sk-live-123")));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let config = OpenAIConfig {
            base_url: "http://localhost:8080/v1/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.endpoint("/chat/completions"),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn test_model_name_accessor() {
        let config = OpenAIConfig {
            gen_model: "test-gen".to_string(),
            api_key: Some("k".to_string()),
            ..Default::default()
        };
        let backend = OpenAIBackend::new(config).unwrap();
        assert_eq!(backend.model_name(), "test-gen");
    }
}
