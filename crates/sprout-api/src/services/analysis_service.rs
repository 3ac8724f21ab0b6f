//! Conversation analysis: model call (or demo insights), storage, processed flag.

use std::time::Instant;

use sprout_core::{
    age_in_years, Child, Conversation, ConversationRepository, GenerationBackend,
    InsightRepository, NewInsight, Result,
};
use sprout_inference::{analyze_conversation, demo_analysis};
use tracing::info;
use uuid::Uuid;

use crate::state::AppState;

/// Turn a transcript into insights ready for storage.
///
/// Without a backend the fixed demo analysis is used.
pub async fn extract_insights(
    generation: Option<&dyn GenerationBackend>,
    transcript: &str,
    child: &Child,
    conversation_id: Uuid,
) -> Result<Vec<NewInsight>> {
    let analysis = match generation {
        Some(backend) => {
            analyze_conversation(backend, transcript, &child.name, age_in_years(child.birth_date))
                .await?
        }
        None => demo_analysis(),
    };
    Ok(analysis.to_new_insights(child.id, conversation_id))
}

/// Analyze a stored conversation, persist its insights and mark it processed.
/// Returns the number of insights stored.
pub async fn analyze_and_store(
    state: &AppState,
    child: &Child,
    conversation: &Conversation,
) -> Result<usize> {
    let start = Instant::now();
    let transcript = conversation.transcription.as_deref().unwrap_or_default();

    let insights =
        extract_insights(state.generation(), transcript, child, conversation.id).await?;
    let stored = state.db.insights.insert_many(insights).await?;
    state
        .db
        .conversations
        .set_processed(conversation.id, true)
        .await?;

    info!(
        subsystem = "api",
        component = "analysis_service",
        op = "analyze_and_store",
        child_id = %child.id,
        conversation_id = %conversation.id,
        insight_count = stored.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Conversation analyzed"
    );
    Ok(stored.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use sprout_inference::mock::MockGenerationBackend;

    fn child() -> Child {
        let now = Utc::now();
        Child {
            id: Uuid::now_v7(),
            parent_id: Uuid::now_v7(),
            name: "Maya".to_string(),
            birth_date: now - Duration::days(365 * 6 + 10),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_demo_mode_produces_demo_insights() {
        let child = child();
        let conversation_id = Uuid::now_v7();
        let insights = extract_insights(None, "Why is the sky blue?", &child, conversation_id)
            .await
            .unwrap();

        assert_eq!(insights.len(), 3);
        assert!(insights.iter().all(|i| i.child_id == child.id));
        assert!(insights.iter().all(|i| i.conversation_id == Some(conversation_id)));
    }

    #[tokio::test]
    async fn test_model_reply_becomes_insights() {
        let reply = r#"```json
{"curiosityIndicators":{},"cognitiveStrengths":{},"executiveFunctions":{},"developmentalAnalysis":{},
 "insights":[{"type":"interest_signal","category":"Space","title":"Moon questions",
 "description":"Asked why the moon changes shape","confidence":0.9}]}
```"#;
        let backend = MockGenerationBackend::new().with_fixed_response(reply);
        let backend_ref = &backend as &dyn GenerationBackend;
        let insights = extract_insights(Some(backend_ref), "transcript", &child(), Uuid::now_v7())
            .await
            .unwrap();

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].insight_type, "INTEREST_SIGNAL");
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_unparseable_reply_is_an_error() {
        let backend = MockGenerationBackend::new().with_fixed_response("I cannot help with that.");
        let backend_ref = &backend as &dyn GenerationBackend;
        let result =
            extract_insights(Some(backend_ref), "transcript", &child(), Uuid::now_v7()).await;
        assert!(result.is_err());
    }
}
