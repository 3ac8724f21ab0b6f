//! Conversations: listing, creation from text or audio, detail, reprocessing.

use axum::extract::{FromRequest, Multipart, Path, Request, State};
use axum::http::header;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sprout_core::defaults::{
    AI_CONVERSATION_TITLE, AUDIO_BYTES_PER_SEC, TEXT_CONVERSATION_DURATION_SECS,
    TRANSCRIBE_LANGUAGE, UNTITLED_CONVERSATION_TITLE,
};
use sprout_core::{
    age_at, ConversationRepository, ConversationSummary, CreateConversationRequest,
    InsightRepository,
};
use tracing::{info, warn};
use uuid::Uuid;

use super::{owned_child, required_id};
use crate::auth::RequireAuth;
use crate::error::ApiError;
use crate::services::analyze_and_store;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ConversationList {
    pub conversations: Vec<ConversationSummary>,
}

/// JSON body for a text conversation. `duration` may be a number or a numeric string.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConversationBody {
    pub child_id: Option<String>,
    pub title: Option<String>,
    pub transcription: Option<String>,
    pub duration: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedConversation {
    pub id: Uuid,
    pub title: String,
    pub transcription: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CreateConversationResponse {
    pub success: bool,
    pub conversation: CreatedConversation,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailInsight {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub insight_type: String,
    pub category: String,
    pub title: String,
    pub description: String,
    pub confidence: Option<f64>,
    pub metadata: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationDetail {
    pub id: Uuid,
    pub title: String,
    pub child_name: String,
    pub child_age: i32,
    pub transcription: Option<String>,
    pub duration: i32,
    pub processed: bool,
    pub conversation_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub insights: Vec<DetailInsight>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReprocessResponse {
    pub success: bool,
    pub insight_count: usize,
    pub message: String,
}

/// Conversation fields gathered from either request format.
#[derive(Debug, Default)]
struct ConversationInput {
    child_id: Option<String>,
    title: Option<String>,
    transcription: Option<String>,
    duration: Option<i32>,
}

/// Whole seconds, never negative.
fn parse_duration(value: &Value) -> Option<i32> {
    let seconds = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    Some((seconds.round() as i32).max(0))
}

/// Seconds of audio implied by an upload of `bytes` bytes.
fn audio_duration(bytes: usize) -> i32 {
    (bytes as f64 / AUDIO_BYTES_PER_SEC as f64).round() as i32
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"))
}

/// Read `childId`, `title`, `duration`, and the `audio` file, then transcribe it.
async fn read_audio_upload(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<ConversationInput, ApiError> {
    let mut input = ConversationInput::default();
    let mut audio: Option<(Vec<u8>, String)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "audio" => {
                let mime = field
                    .content_type()
                    .unwrap_or("audio/webm")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;
                audio = Some((data.to_vec(), mime));
            }
            "childId" | "title" | "duration" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;
                match name.as_str() {
                    "childId" => input.child_id = Some(text),
                    "title" => input.title = Some(text),
                    _ => input.duration = parse_duration(&Value::String(text)),
                }
            }
            _ => {}
        }
    }

    let Some((data, mime)) = audio.filter(|(data, _)| !data.is_empty()) else {
        return Err(ApiError::BadRequest(
            "Child ID and audio file are required".to_string(),
        ));
    };
    if non_blank(input.child_id.clone()).is_none() {
        return Err(ApiError::BadRequest(
            "Child ID and audio file are required".to_string(),
        ));
    }

    let backend = state.transcription.as_deref().ok_or_else(|| {
        ApiError::ServiceUnavailable("Audio transcription is not configured".to_string())
    })?;
    let result = backend
        .transcribe(&data, &mime, Some(TRANSCRIBE_LANGUAGE))
        .await?;

    input.duration = input.duration.or_else(|| Some(audio_duration(data.len())));
    input.transcription = Some(result.full_text);
    Ok(input)
}

#[utoipa::path(get, path = "/api/v1/conversations", tag = "Conversations",
    responses((status = 200, description = "Caller's conversations, newest first")))]
pub async fn list_conversations(
    State(state): State<AppState>,
    auth: RequireAuth,
) -> Result<Json<ConversationList>, ApiError> {
    let conversations = state
        .db
        .conversations
        .list_for_parent(auth.user_id, None)
        .await?;
    Ok(Json(ConversationList { conversations }))
}

/// Accepts JSON `{childId, title?, duration?, transcription}` or a multipart
/// upload with `childId`, `title`, `duration` and an `audio` file.
#[utoipa::path(post, path = "/api/v1/conversations", tag = "Conversations",
    responses(
        (status = 200, description = "Conversation stored; analysis attempted"),
        (status = 400, description = "Missing childId or content"),
        (status = 404, description = "Child not found"),
        (status = 503, description = "Audio upload without transcription configured")
    ))]
pub async fn create_conversation(
    State(state): State<AppState>,
    auth: RequireAuth,
    request: Request,
) -> Result<Json<CreateConversationResponse>, ApiError> {
    let from_audio = is_multipart(&request);
    let input = if from_audio {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        read_audio_upload(&state, multipart).await?
    } else {
        let Json(body) = Json::<CreateConversationBody>::from_request(request, &state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        ConversationInput {
            child_id: body.child_id,
            title: body.title,
            transcription: body.transcription,
            duration: body.duration.as_ref().and_then(parse_duration),
        }
    };

    let child_id = required_id(input.child_id, "Child ID is required")?;
    let child = owned_child(&state, auth.user_id, child_id).await?;

    let default_title = if from_audio {
        UNTITLED_CONVERSATION_TITLE
    } else {
        AI_CONVERSATION_TITLE
    };
    let conversation = state
        .db
        .conversations
        .create(CreateConversationRequest {
            child_id: child.id,
            title: non_blank(input.title).unwrap_or_else(|| default_title.to_string()),
            transcription: input.transcription,
            duration: input.duration.unwrap_or(TEXT_CONVERSATION_DURATION_SECS),
        })
        .await?;

    info!(
        subsystem = "api",
        component = "conversations",
        child_id = %child.id,
        conversation_id = %conversation.id,
        from_audio,
        "Conversation stored"
    );

    if let Err(e) = analyze_and_store(&state, &child, &conversation).await {
        warn!(
            subsystem = "api",
            component = "conversations",
            conversation_id = %conversation.id,
            error = %e,
            "Analysis failed; conversation left unprocessed"
        );
    }

    Ok(Json(CreateConversationResponse {
        success: true,
        conversation: CreatedConversation {
            id: conversation.id,
            title: conversation.title,
            transcription: conversation.transcription,
            created_at: conversation.created_at,
        },
    }))
}

#[utoipa::path(get, path = "/api/v1/conversations/{id}", tag = "Conversations",
    params(("id" = Uuid, Path, description = "Conversation id")),
    responses(
        (status = 200, description = "Conversation with its insights"),
        (status = 404, description = "Conversation not found")
    ))]
pub async fn get_conversation(
    State(state): State<AppState>,
    auth: RequireAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<ConversationDetail>, ApiError> {
    let conversation = state
        .db
        .conversations
        .get_owned(auth.user_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Conversation not found".to_string()))?;
    let child = owned_child(&state, auth.user_id, conversation.child_id).await?;
    let insights = state.db.insights.for_conversations(&[conversation.id]).await?;

    Ok(Json(ConversationDetail {
        id: conversation.id,
        title: conversation.title,
        child_age: age_at(child.birth_date, conversation.conversation_date),
        child_name: child.name,
        transcription: conversation.transcription,
        duration: conversation.duration,
        processed: conversation.processed,
        conversation_date: conversation.conversation_date,
        created_at: conversation.created_at,
        insights: insights
            .into_iter()
            .map(|i| DetailInsight {
                metadata: i
                    .metadata
                    .as_deref()
                    .and_then(|raw| serde_json::from_str(raw).ok()),
                id: i.id,
                insight_type: i.insight_type,
                category: i.category,
                title: i.title,
                description: i.description,
                confidence: i.confidence,
            })
            .collect(),
    }))
}

#[utoipa::path(post, path = "/api/v1/conversations/{id}/reprocess", tag = "Conversations",
    params(("id" = Uuid, Path, description = "Conversation id")),
    responses(
        (status = 200, description = "Insights regenerated"),
        (status = 404, description = "Conversation not found"),
        (status = 502, description = "Analysis failed")
    ))]
pub async fn reprocess_conversation(
    State(state): State<AppState>,
    auth: RequireAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<ReprocessResponse>, ApiError> {
    let conversation = state
        .db
        .conversations
        .get_owned(auth.user_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Conversation not found".to_string()))?;
    let child = owned_child(&state, auth.user_id, conversation.child_id).await?;

    let removed = state.db.insights.delete_for_conversation(id).await?;
    state.db.conversations.set_processed(id, false).await?;

    let insight_count = analyze_and_store(&state, &child, &conversation)
        .await
        .map_err(|e| {
            warn!(
                subsystem = "api",
                component = "conversations",
                conversation_id = %id,
                error = %e,
                "Reprocessing failed"
            );
            reprocess_error(e)
        })?;

    info!(
        subsystem = "api",
        component = "conversations",
        conversation_id = %id,
        removed,
        insight_count,
        "Conversation reprocessed"
    );
    Ok(Json(ReprocessResponse {
        success: true,
        insight_count,
        message: "Conversation reprocessed successfully".to_string(),
    }))
}

/// Model failures surface as 502; storage and ownership errors keep their usual status.
fn reprocess_error(err: sprout_core::Error) -> ApiError {
    match err {
        sprout_core::Error::Inference(_) | sprout_core::Error::Serialization(_) => {
            ApiError::BadGateway("Failed to analyze conversation. Please try again.".to_string())
        }
        other => ApiError::from(other),
    }
}
