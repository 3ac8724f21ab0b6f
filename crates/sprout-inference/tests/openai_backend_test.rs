//! OpenAI backend and LLM-driven services against a mocked HTTP API.

use serde_json::json;
use sprout_core::{Error, GenerationBackend, GenerationOptions};
use sprout_inference::assist::{
    family_parse_fallback, family_suggestion, interactive_reply, FacilitationMove, FamilyContext,
    InteractiveTurn, PartnerMove,
};
use sprout_inference::openai::{OpenAIBackend, OpenAIConfig};
use sprout_inference::{
    analyze_conversation, generate_playlist, generate_starter, TranscriptionBackend,
    WhisperBackend,
};
use sprout_insights::InsightAnalysis;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer) -> OpenAIConfig {
    OpenAIConfig {
        base_url: server.uri(),
        api_key: Some("test-key".to_string()),
        gen_model: "gpt-test".to_string(),
        timeout_seconds: 5,
        ..Default::default()
    }
}

fn backend(server: &MockServer) -> OpenAIBackend {
    OpenAIBackend::new(config(server)).expect("backend")
}

fn chat_reply(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": "chatcmpl-1",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
    }))
}

#[tokio::test]
async fn test_chat_sends_auth_model_and_options() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "gpt-test",
            "temperature": 0.7,
            "max_tokens": 150
        })))
        .respond_with(chat_reply("  Hello there  "))
        .expect(1)
        .mount(&server)
        .await;

    let reply = backend(&server)
        .generate_with_system(
            "system",
            "prompt",
            GenerationOptions::new(0.7).with_max_tokens(150),
        )
        .await
        .unwrap();
    assert_eq!(reply, "  Hello there  ");
}

#[tokio::test]
async fn test_unauthorized_maps_to_config_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}
        })))
        .mount(&server)
        .await;

    let err = backend(&server)
        .generate("hi", GenerationOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert!(err.to_string().contains("Incorrect API key"));
}

#[tokio::test]
async fn test_server_error_without_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = backend(&server)
        .generate("hi", GenerationOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Inference(_)));
}

#[tokio::test]
async fn test_analysis_parses_fenced_reply() {
    let server = MockServer::start().await;
    let analysis = json!({
        "curiosityIndicators": {"questionCount": 3},
        "cognitiveStrengths": {"naturalistic": 8},
        "executiveFunctions": {"workingMemory": 6},
        "developmentalAnalysis": {"piagetianStage": "preoperational"},
        "insights": [{
            "type": "CURIOSITY_PATTERN",
            "category": "Scientific Wonder",
            "title": "Stargazer",
            "description": "Asked why stars twinkle",
            "academicBasis": "Epistemic curiosity",
            "parentRecommendations": ["Look at the night sky together"],
            "confidence": 0.85
        }]
    });
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({"temperature": 0.3})))
        .respond_with(chat_reply(&format!("```json\n{}\n```", analysis)))
        .mount(&server)
        .await;

    let result = analyze_conversation(&backend(&server), "Child: why?", "Maya", 6)
        .await
        .unwrap();
    assert_eq!(result.insights.len(), 1);
    assert_eq!(result.insights[0].title, "Stargazer");
    assert_eq!(result.cognitive_strengths["naturalistic"], 8);
}

#[tokio::test]
async fn test_analysis_rejects_prose() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(chat_reply("I'm sorry, I can't help with that."))
        .mount(&server)
        .await;

    let err = analyze_conversation(&backend(&server), "t", "Maya", 6)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Serialization(_)));
}

#[tokio::test]
async fn test_starter_empty_reply_uses_fixed_question() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(chat_reply("   "))
        .mount(&server)
        .await;

    let backend = backend(&server);
    let starter = generate_starter(Some(&backend as &dyn GenerationBackend), "Leo", 6, &[]).await;
    assert_eq!(
        starter,
        "What do you think would happen if we could talk to animals?"
    );
}

#[tokio::test]
async fn test_playlist_partial_reply_fills_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"max_tokens": 2000})))
        .respond_with(chat_reply(
            r#"{"content": {"music": [{"title": "Baby Beluga", "artist": "Raffi"}]}}"#,
        ))
        .mount(&server)
        .await;

    let playlist = generate_playlist(&backend(&server), "Leo", 4, &InsightAnalysis::default(), &[])
        .await
        .unwrap();
    assert_eq!(playlist.content.music[0].title, "Baby Beluga");
    assert!(playlist.content.movies.is_empty());
    assert!(playlist.activities.events.is_empty());
}

#[tokio::test]
async fn test_interactive_reply_parsed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"temperature": 0.8, "max_tokens": 300})))
        .respond_with(chat_reply(
            r#"{"type": "fact", "content": "Octopuses have three hearts!", "reasoning": "wonder", "urgency": "low", "shouldSpeak": true}"#,
        ))
        .mount(&server)
        .await;

    let backend = backend(&server);
    let turn = InteractiveTurn {
        child_name: "Ada".to_string(),
        child_age: 6,
        ..Default::default()
    };
    let reply = interactive_reply(Some(&backend as &dyn GenerationBackend), &turn).await;
    assert_eq!(reply.reply_type, PartnerMove::Fact);
    assert_eq!(reply.content, "Octopuses have three hearts!");
}

#[tokio::test]
async fn test_family_unparseable_reply_uses_named_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(chat_reply("Ask her about cats."))
        .mount(&server)
        .await;

    let backend = backend(&server);
    let ctx = FamilyContext {
        child_name: "Ada".to_string(),
        ..Default::default()
    };
    let suggestion = family_suggestion(Some(&backend as &dyn GenerationBackend), &ctx).await;
    assert_eq!(suggestion, family_parse_fallback("Ada"));
    assert_eq!(suggestion.suggestion_type, FacilitationMove::ParentGuidance);
}

#[tokio::test]
async fn test_whisper_multipart_upload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "text": "Why is the moon following us?",
            "language": "en",
            "duration": 2.5
        })))
        .expect(1)
        .mount(&server)
        .await;

    let whisper = WhisperBackend::new(config(&server));
    let result = whisper
        .transcribe(b"RIFF....WAVEfmt ", "audio/wav", None)
        .await
        .unwrap();
    assert_eq!(result.full_text, "Why is the moon following us?");
    assert_eq!(result.duration_secs, Some(2.5));
}

#[tokio::test]
async fn test_whisper_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad audio"))
        .mount(&server)
        .await;

    let whisper = WhisperBackend::new(config(&server));
    let err = whisper
        .transcribe(b"abc", "audio/wav", Some("en"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transcription(_)));
    assert!(err.to_string().contains("bad audio"));
}
