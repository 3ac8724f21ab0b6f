//! Conversation repository.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgRow, Pool, Postgres, Row};
use uuid::Uuid;

use sprout_core::{
    Conversation, ConversationRepository, ConversationSummary, CreateConversationRequest, Error,
    Result,
};

fn conversation_from_row(r: &PgRow) -> Conversation {
    Conversation {
        id: r.get("id"),
        child_id: r.get("child_id"),
        title: r.get("title"),
        transcription: r.get("transcription"),
        duration: r.get("duration"),
        processed: r.get("processed"),
        conversation_date: r.get("conversation_date"),
        created_at: r.get("created_at"),
    }
}

const CONVERSATION_COLUMNS: &str =
    "v.id, v.child_id, v.title, v.transcription, v.duration, v.processed, \
     v.conversation_date, v.created_at";

/// PostgreSQL implementation of ConversationRepository.
pub struct PgConversationRepository {
    pool: Pool<Postgres>,
}

impl PgConversationRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationRepository for PgConversationRepository {
    async fn create(&self, req: CreateConversationRequest) -> Result<Conversation> {
        let now = Utc::now();
        let conversation = Conversation {
            id: Uuid::now_v7(),
            child_id: req.child_id,
            title: req.title,
            transcription: req.transcription,
            duration: req.duration.max(0),
            processed: false,
            conversation_date: now,
            created_at: now,
        };

        sqlx::query(
            r#"INSERT INTO conversation
                   (id, child_id, title, transcription, duration, processed, conversation_date, created_at)
               VALUES ($1, $2, $3, $4, $5, false, $6, $7)"#,
        )
        .bind(conversation.id)
        .bind(conversation.child_id)
        .bind(&conversation.title)
        .bind(&conversation.transcription)
        .bind(conversation.duration)
        .bind(conversation.conversation_date)
        .bind(conversation.created_at)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(conversation)
    }

    async fn get_owned(
        &self,
        parent_id: Uuid,
        conversation_id: Uuid,
    ) -> Result<Option<Conversation>> {
        let query = format!(
            "SELECT {CONVERSATION_COLUMNS} FROM conversation v \
             JOIN child c ON c.id = v.child_id \
             WHERE v.id = $1 AND c.parent_id = $2"
        );
        let row = sqlx::query(&query)
            .bind(conversation_id)
            .bind(parent_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(row.as_ref().map(conversation_from_row))
    }

    async fn list_for_parent(
        &self,
        parent_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<ConversationSummary>> {
        // NULL limit means no limit in PostgreSQL
        let rows = sqlx::query(
            r#"
            SELECT v.id, v.child_id, c.name AS child_name, v.title, v.duration,
                   v.processed, v.conversation_date, v.created_at,
                   (SELECT COUNT(*) FROM insight i WHERE i.conversation_id = v.id) AS insight_count
            FROM conversation v
            JOIN child c ON c.id = v.child_id
            WHERE c.parent_id = $1
            ORDER BY v.created_at DESC, v.id DESC
            LIMIT $2
            "#,
        )
        .bind(parent_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows
            .into_iter()
            .map(|r| ConversationSummary {
                id: r.get("id"),
                child_id: r.get("child_id"),
                child_name: r.get("child_name"),
                title: r.get("title"),
                duration: r.get("duration"),
                processed: r.get("processed"),
                conversation_date: r.get("conversation_date"),
                created_at: r.get("created_at"),
                insight_count: r.get("insight_count"),
            })
            .collect())
    }

    async fn recent_for_child(&self, child_id: Uuid, limit: i64) -> Result<Vec<Conversation>> {
        let query = format!(
            "SELECT {CONVERSATION_COLUMNS} FROM conversation v \
             WHERE v.child_id = $1 ORDER BY v.created_at DESC, v.id DESC LIMIT $2"
        );
        let rows = sqlx::query(&query)
            .bind(child_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(rows.iter().map(conversation_from_row).collect())
    }

    async fn count_for_parent(&self, parent_id: Uuid) -> Result<i64> {
        let row = sqlx::query(
            r#"SELECT COUNT(*) AS n FROM conversation v
               JOIN child c ON c.id = v.child_id WHERE c.parent_id = $1"#,
        )
        .bind(parent_id)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(row.get("n"))
    }

    async fn set_processed(&self, conversation_id: Uuid, processed: bool) -> Result<()> {
        let result = sqlx::query("UPDATE conversation SET processed = $2 WHERE id = $1")
            .bind(conversation_id)
            .bind(processed)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::ConversationNotFound(conversation_id));
        }
        Ok(())
    }
}
