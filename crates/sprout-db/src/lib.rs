//! # sprout-db
//!
//! PostgreSQL storage for the sprout service.
//!
//! Each table gets a `Pg*Repository` implementing the matching trait from
//! `sprout-core`. [`Database`] bundles them over one shared pool.

pub mod children;
pub mod conversations;
pub mod insights;
pub mod pool;
pub mod recommendations;
pub mod test_fixtures;
pub mod users;

pub use sprout_core::*;

pub use children::PgChildRepository;
pub use conversations::PgConversationRepository;
pub use insights::PgInsightRepository;
pub use pool::{create_lazy_pool, create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};
pub use recommendations::PgRecommendationRepository;
pub use users::{PgTokenRepository, PgUserRepository};

/// Database connection and repositories.
pub struct Database {
    pub pool: sqlx::Pool<sqlx::Postgres>,
    pub users: PgUserRepository,
    pub tokens: PgTokenRepository,
    pub children: PgChildRepository,
    pub conversations: PgConversationRepository,
    pub insights: PgInsightRepository,
    pub recommendations: PgRecommendationRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            users: PgUserRepository::new(pool.clone()),
            tokens: PgTokenRepository::new(pool.clone()),
            children: PgChildRepository::new(pool.clone()),
            conversations: PgConversationRepository::new(pool.clone()),
            insights: PgInsightRepository::new(pool.clone()),
            recommendations: PgRecommendationRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Connect to the test database.
    pub async fn connect_test() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| test_fixtures::DEFAULT_TEST_DATABASE_URL.to_string());
        Self::connect(&database_url).await
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}
