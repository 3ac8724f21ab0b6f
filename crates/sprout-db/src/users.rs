//! Parent accounts and their bearer tokens.

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::{postgres::PgRow, Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use sprout_core::defaults::{TOKEN_BYTES, TOKEN_PREFIX};
use sprout_core::{Error, Result, TokenRepository, User, UserRepository};

fn user_from_row(r: &PgRow) -> User {
    User {
        id: r.get("id"),
        email: r.get("email"),
        name: r.get("name"),
        created_at: r.get("created_at"),
    }
}

/// PostgreSQL implementation of UserRepository.
pub struct PgUserRepository {
    pool: Pool<Postgres>,
}

impl PgUserRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_or_create(&self, email: &str, name: Option<&str>) -> Result<User> {
        let email = email.trim().to_lowercase();
        // new accounts default to the email's local part; existing names
        // change only when a new one is supplied
        let initial_name = name
            .map(str::to_string)
            .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());

        let row = sqlx::query(
            r#"
            INSERT INTO app_user (id, email, name, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO UPDATE
                SET name = COALESCE($5, app_user.name)
            RETURNING id, email, name, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&email)
        .bind(&initial_name)
        .bind(Utc::now())
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(user_from_row(&row))
    }

    async fn get(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query("SELECT id, email, name, created_at FROM app_user WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(row.as_ref().map(user_from_row))
    }
}

/// PostgreSQL implementation of TokenRepository. Tokens are stored as
/// SHA-256 digests; the plaintext is returned once at issue time.
pub struct PgTokenRepository {
    pool: Pool<Postgres>,
}

impl PgTokenRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn generate_secret(length: usize) -> String {
        const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
        let mut rng = rand::thread_rng();
        (0..length)
            .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
            .collect()
    }

    pub(crate) fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[async_trait]
impl TokenRepository for PgTokenRepository {
    async fn issue(&self, user_id: Uuid) -> Result<String> {
        let token = format!("{}{}", TOKEN_PREFIX, Self::generate_secret(TOKEN_BYTES));
        let token_prefix: String = token.chars().take(12).collect();

        sqlx::query(
            r#"INSERT INTO api_token (id, user_id, token_hash, token_prefix, created_at)
               VALUES ($1, $2, $3, $4, $5)"#,
        )
        .bind(Uuid::now_v7())
        .bind(user_id)
        .bind(Self::hash_token(&token))
        .bind(&token_prefix)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "tokens",
            user_id = %user_id,
            "Issued bearer token {}…",
            token_prefix
        );
        Ok(token)
    }

    async fn validate(&self, token: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            UPDATE api_token t SET last_used_at = $2
            FROM app_user u
            WHERE t.token_hash = $1 AND u.id = t.user_id
            RETURNING u.id, u.email, u.name, u.created_at
            "#,
        )
        .bind(Self::hash_token(token))
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.as_ref().map(user_from_row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_secret() {
        let a = PgTokenRepository::generate_secret(32);
        let b = PgTokenRepository::generate_secret(32);
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_hash_token_is_stable_hex() {
        let hash = PgTokenRepository::hash_token("sp_key_abc");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, PgTokenRepository::hash_token("sp_key_abc"));
        assert_ne!(hash, PgTokenRepository::hash_token("sp_key_abd"));
    }
}
