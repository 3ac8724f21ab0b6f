//! Child profile repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use sprout_core::{Child, ChildRepository, ChildSummary, Error, Result};

/// PostgreSQL implementation of ChildRepository.
pub struct PgChildRepository {
    pool: Pool<Postgres>,
}

impl PgChildRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChildRepository for PgChildRepository {
    async fn create(
        &self,
        parent_id: Uuid,
        name: &str,
        birth_date: DateTime<Utc>,
    ) -> Result<Child> {
        let now = Utc::now();
        let child = Child {
            id: Uuid::now_v7(),
            parent_id,
            name: name.trim().to_string(),
            birth_date,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"INSERT INTO child (id, parent_id, name, birth_date, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6)"#,
        )
        .bind(child.id)
        .bind(child.parent_id)
        .bind(&child.name)
        .bind(child.birth_date)
        .bind(child.created_at)
        .bind(child.updated_at)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(child)
    }

    async fn get_owned(&self, parent_id: Uuid, child_id: Uuid) -> Result<Option<Child>> {
        let row = sqlx::query(
            r#"SELECT id, parent_id, name, birth_date, created_at, updated_at
               FROM child WHERE id = $1 AND parent_id = $2"#,
        )
        .bind(child_id)
        .bind(parent_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(|r| Child {
            id: r.get("id"),
            parent_id: r.get("parent_id"),
            name: r.get("name"),
            birth_date: r.get("birth_date"),
            created_at: r.get("created_at"),
            updated_at: r.get("updated_at"),
        }))
    }

    async fn list_for_parent(&self, parent_id: Uuid) -> Result<Vec<ChildSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.name, c.birth_date, c.created_at,
                   (SELECT COUNT(*) FROM conversation v WHERE v.child_id = c.id) AS conversation_count,
                   (SELECT COUNT(*) FROM insight i WHERE i.child_id = c.id) AS insight_count,
                   (SELECT COUNT(*) FROM recommendation r
                     WHERE r.child_id = c.id) AS recommendation_count
            FROM child c
            WHERE c.parent_id = $1
            ORDER BY c.created_at DESC, c.id DESC
            "#,
        )
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows
            .into_iter()
            .map(|r| ChildSummary {
                id: r.get("id"),
                name: r.get("name"),
                birth_date: r.get("birth_date"),
                created_at: r.get("created_at"),
                conversation_count: r.get("conversation_count"),
                insight_count: r.get("insight_count"),
                recommendation_count: r.get("recommendation_count"),
            })
            .collect())
    }

    async fn count_for_parent(&self, parent_id: Uuid) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM child WHERE parent_id = $1")
            .bind(parent_id)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(row.get("n"))
    }

    async fn delete_owned(&self, parent_id: Uuid, child_id: Uuid) -> Result<bool> {
        // conversations, insights and recommendations cascade
        let result = sqlx::query("DELETE FROM child WHERE id = $1 AND parent_id = $2")
            .bind(child_id)
            .bind(parent_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(result.rows_affected() > 0)
    }
}
