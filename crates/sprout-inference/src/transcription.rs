//! Audio-to-text via the OpenAI Whisper endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use sprout_core::defaults::{TRANSCRIBE_LANGUAGE, TRANSCRIBE_TIMEOUT_SECS};
use sprout_core::{Error, Result};

use crate::openai::OpenAIConfig;

/// Result of audio transcription.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranscriptionResult {
    pub full_text: String,
    /// Detected language (ISO 639-1 code).
    pub language: Option<String>,
    /// Total audio duration in seconds, when reported.
    pub duration_secs: Option<f64>,
}

/// Backend for transcribing uploaded conversation audio.
#[async_trait]
pub trait TranscriptionBackend: Send + Sync {
    async fn transcribe(
        &self,
        audio_data: &[u8],
        mime_type: &str,
        language: Option<&str>,
    ) -> Result<TranscriptionResult>;

    fn model_name(&self) -> &str;
}

/// Whisper client sharing the chat backend's base URL and key.
pub struct WhisperBackend {
    config: OpenAIConfig,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl WhisperBackend {
    pub fn new(config: OpenAIConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
            timeout_secs: TRANSCRIBE_TIMEOUT_SECS,
        }
    }

    /// Returns None in demo mode.
    pub fn from_env() -> Option<Self> {
        let config = OpenAIConfig::from_env();
        if config.is_demo() {
            return None;
        }
        Some(Self::new(config))
    }
}

#[derive(Deserialize)]
struct WhisperResponse {
    text: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
}

fn extension_for(mime_type: &str) -> &'static str {
    // strip parameters such as "audio/webm;codecs=opus"
    match mime_type.split(';').next().unwrap_or_default().trim() {
        "audio/mpeg" | "audio/mp3" => "mp3",
        "audio/mp4" | "audio/m4a" | "audio/x-m4a" => "m4a",
        "audio/ogg" => "ogg",
        "audio/flac" => "flac",
        "audio/webm" => "webm",
        _ => "wav",
    }
}

#[async_trait]
impl TranscriptionBackend for WhisperBackend {
    async fn transcribe(
        &self,
        audio_data: &[u8],
        mime_type: &str,
        language: Option<&str>,
    ) -> Result<TranscriptionResult> {
        if audio_data.is_empty() {
            return Err(Error::Transcription("Audio file is empty".to_string()));
        }

        debug!(
            subsystem = "inference",
            component = "whisper",
            op = "transcribe",
            audio_bytes = audio_data.len(),
            model = %self.config.transcribe_model,
            "Transcribing audio"
        );

        let file_part = reqwest::multipart::Part::bytes(audio_data.to_vec())
            .file_name(format!("audio.{}", extension_for(mime_type)))
            .mime_str(mime_type)
            .map_err(|e| Error::Transcription(format!("Failed to create multipart: {}", e)))?;

        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("model", self.config.transcribe_model.clone())
            .text("response_format", "verbose_json")
            .text(
                "language",
                language.unwrap_or(TRANSCRIBE_LANGUAGE).to_string(),
            );

        let mut request = self
            .client
            .post(self.config.endpoint("/audio/transcriptions"))
            .multipart(form)
            .timeout(Duration::from_secs(self.timeout_secs));
        if let Some(ref key) = self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Transcription(format!("Transcription request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(
                subsystem = "inference",
                component = "whisper",
                status = status.as_u16(),
                "Transcription failed"
            );
            return Err(Error::Transcription(format!(
                "Whisper API returned {}: {}",
                status, body
            )));
        }

        let result: WhisperResponse = response.json().await.map_err(|e| {
            Error::Transcription(format!("Failed to parse whisper response: {}", e))
        })?;

        Ok(TranscriptionResult {
            full_text: result.text,
            language: result.language,
            duration_secs: result.duration,
        })
    }

    fn model_name(&self) -> &str {
        &self.config.transcribe_model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_for_mime() {
        assert_eq!(extension_for("audio/mpeg"), "mp3");
        assert_eq!(extension_for("audio/webm;codecs=opus"), "webm");
        assert_eq!(extension_for("audio/wav"), "wav");
        assert_eq!(extension_for("application/octet-stream"), "wav");
    }

    #[tokio::test]
    async fn test_empty_audio_rejected() {
        let backend = WhisperBackend::new(OpenAIConfig::default());
        let err = backend.transcribe(&[], "audio/wav", None).await.unwrap_err();
        assert!(matches!(err, Error::Transcription(_)));
    }

    #[test]
    fn test_model_name() {
        let backend = WhisperBackend::new(OpenAIConfig::default());
        assert_eq!(backend.model_name(), "whisper-1");
    }
}
