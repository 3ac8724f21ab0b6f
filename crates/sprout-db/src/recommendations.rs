//! Recommendation repository. Each child has at most one active set.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgRow, Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use sprout_core::{Error, NewRecommendation, Recommendation, RecommendationRepository, Result};

fn recommendation_from_row(r: &PgRow) -> Recommendation {
    Recommendation {
        id: r.get("id"),
        child_id: r.get("child_id"),
        recommendation_type: r.get("type"),
        title: r.get("title"),
        description: r.get("description"),
        category: r.get("category"),
        age_group: r.get("age_group"),
        tags: r.get("tags"),
        provider: r.get("provider"),
        url: r.get("url"),
        location: r.get("location"),
        price: r.get("price"),
        is_active: r.get("is_active"),
        created_at: r.get("created_at"),
    }
}

/// PostgreSQL implementation of RecommendationRepository.
pub struct PgRecommendationRepository {
    pool: Pool<Postgres>,
}

impl PgRecommendationRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecommendationRepository for PgRecommendationRepository {
    async fn list_active(
        &self,
        child_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<Recommendation>> {
        let rows = sqlx::query(
            r#"SELECT id, child_id, type, title, description, category, age_group, tags,
                      provider, url, location, price, is_active, created_at
               FROM recommendation
               WHERE child_id = $1 AND is_active
               ORDER BY created_at DESC, id DESC
               LIMIT $2"#,
        )
        .bind(child_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(rows.iter().map(recommendation_from_row).collect())
    }

    async fn replace_active(
        &self,
        child_id: Uuid,
        recommendations: Vec<NewRecommendation>,
    ) -> Result<usize> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let retired =
            sqlx::query("UPDATE recommendation SET is_active = false WHERE child_id = $1 AND is_active")
                .bind(child_id)
                .execute(&mut *tx)
                .await
                .map_err(Error::Database)?
                .rows_affected();

        let count = recommendations.len();
        for rec in recommendations {
            sqlx::query(
                r#"INSERT INTO recommendation
                       (id, child_id, type, title, description, category, age_group, tags,
                        provider, url, location, price, is_active, created_at)
                   VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, true, $13)"#,
            )
            .bind(Uuid::now_v7())
            .bind(child_id)
            .bind(rec.recommendation_type.trim().to_uppercase())
            .bind(&rec.title)
            .bind(&rec.description)
            .bind(&rec.category)
            .bind(&rec.age_group)
            .bind(&rec.tags)
            .bind(&rec.provider)
            .bind(&rec.url)
            .bind(&rec.location)
            .bind(&rec.price)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;
        }

        tx.commit().await.map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "recommendations",
            op = "replace_active",
            child_id = %child_id,
            retired,
            inserted = count,
            "Replaced active recommendation set"
        );
        Ok(count)
    }
}
