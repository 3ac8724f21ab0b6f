//! Insight repository.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgRow, Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use sprout_core::{Error, Insight, InsightListItem, InsightRepository, NewInsight, Result};

const INSIGHT_COLUMNS: &str = "i.id, i.child_id, i.conversation_id, i.type, i.category, i.title, \
     i.description, i.confidence, i.metadata, i.created_at";

fn insight_from_row(r: &PgRow) -> Insight {
    Insight {
        id: r.get("id"),
        child_id: r.get("child_id"),
        conversation_id: r.get("conversation_id"),
        insight_type: r.get("type"),
        category: r.get("category"),
        title: r.get("title"),
        description: r.get("description"),
        confidence: r.get("confidence"),
        metadata: r.get("metadata"),
        created_at: r.get("created_at"),
    }
}

/// PostgreSQL implementation of InsightRepository.
pub struct PgInsightRepository {
    pool: Pool<Postgres>,
}

impl PgInsightRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InsightRepository for PgInsightRepository {
    async fn insert_many(&self, insights: Vec<NewInsight>) -> Result<Vec<Insight>> {
        if insights.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        let mut stored = Vec::with_capacity(insights.len());

        for new in insights {
            let new = new.normalized();
            let insight = Insight {
                id: Uuid::now_v7(),
                child_id: new.child_id,
                conversation_id: new.conversation_id,
                insight_type: new.insight_type,
                category: new.category,
                title: new.title,
                description: new.description,
                confidence: new.confidence,
                metadata: new.metadata,
                created_at: Utc::now(),
            };

            sqlx::query(
                r#"INSERT INTO insight
                       (id, child_id, conversation_id, type, category, title,
                        description, confidence, metadata, created_at)
                   VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)"#,
            )
            .bind(insight.id)
            .bind(insight.child_id)
            .bind(insight.conversation_id)
            .bind(&insight.insight_type)
            .bind(&insight.category)
            .bind(&insight.title)
            .bind(&insight.description)
            .bind(insight.confidence)
            .bind(&insight.metadata)
            .bind(insight.created_at)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

            stored.push(insight);
        }

        tx.commit().await.map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "insights",
            op = "insert_many",
            count = stored.len(),
            "Stored insights"
        );
        Ok(stored)
    }

    async fn delete_for_conversation(&self, conversation_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM insight WHERE conversation_id = $1")
            .bind(conversation_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(result.rows_affected())
    }

    async fn recent_for_child(&self, child_id: Uuid, limit: i64) -> Result<Vec<Insight>> {
        let query = format!(
            "SELECT {INSIGHT_COLUMNS} FROM insight i \
             WHERE i.child_id = $1 ORDER BY i.created_at DESC, i.id DESC LIMIT $2"
        );
        let rows = sqlx::query(&query)
            .bind(child_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(rows.iter().map(insight_from_row).collect())
    }

    async fn for_conversations(&self, conversation_ids: &[Uuid]) -> Result<Vec<Insight>> {
        if conversation_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {INSIGHT_COLUMNS} FROM insight i \
             WHERE i.conversation_id = ANY($1) ORDER BY i.created_at DESC, i.id DESC"
        );
        let rows = sqlx::query(&query)
            .bind(conversation_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(rows.iter().map(insight_from_row).collect())
    }

    async fn list_for_parent(
        &self,
        parent_id: Uuid,
        child_id: Option<Uuid>,
    ) -> Result<Vec<InsightListItem>> {
        let query = format!(
            "SELECT {INSIGHT_COLUMNS}, c.name AS child_name, v.title AS conversation_title \
             FROM insight i \
             JOIN child c ON c.id = i.child_id \
             LEFT JOIN conversation v ON v.id = i.conversation_id \
             WHERE c.parent_id = $1 AND ($2::uuid IS NULL OR i.child_id = $2) \
             ORDER BY i.created_at DESC, i.id DESC"
        );
        let rows = sqlx::query(&query)
            .bind(parent_id)
            .bind(child_id)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(rows
            .iter()
            .map(|r| InsightListItem {
                insight: insight_from_row(r),
                child_name: r.get("child_name"),
                conversation_title: r.get("conversation_title"),
            })
            .collect())
    }

    async fn count_for_parent(&self, parent_id: Uuid) -> Result<i64> {
        let row = sqlx::query(
            r#"SELECT COUNT(*) AS n FROM insight i
               JOIN child c ON c.id = i.child_id WHERE c.parent_id = $1"#,
        )
        .bind(parent_id)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(row.get("n"))
    }

    async fn recent_categories_for_parent(
        &self,
        parent_id: Uuid,
        limit: i64,
    ) -> Result<Vec<String>> {
        let rows = sqlx::query(
            r#"SELECT i.category FROM insight i
               JOIN child c ON c.id = i.child_id
               WHERE c.parent_id = $1
               ORDER BY i.created_at DESC, i.id DESC LIMIT $2"#,
        )
        .bind(parent_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(rows.iter().map(|r| r.get("category")).collect())
    }
}
