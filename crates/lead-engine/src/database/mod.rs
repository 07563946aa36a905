//! SQLite-backed entity store for the lead distributor.
//!
//! All persistence goes through [`Database`], a thin handle over a
//! `sqlx::SqlitePool`. Entity operations live in per-entity modules
//! ([`operators`], [`leads`], [`sources`], [`assignments`], [`contacts`]);
//! the schema is created idempotently at startup by [`schema`].

pub mod schema;
pub mod operators;
pub mod leads;
pub mod sources;
pub mod assignments;
pub mod contacts;

use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{debug, error, info};

use crate::config::DatabaseConfig;
use crate::error::Result;

/// Lead distribution database
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (or create) the database described by the configuration.
    ///
    /// An empty `database_path` yields an in-memory database.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        if config.database_path.is_empty() {
            return Self::connect_in_memory().await;
        }

        info!("🗄️ Opening lead database at: {}", config.database_path);

        let options = SqliteConnectOptions::new()
            .filename(&config.database_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            // `REFERENCES` clauses are declarative only (see `schema`); the
            // distribution path commits unassigned contacts for unknown
            // sources and validates assignment referents in code.
            .foreign_keys(false)
            .busy_timeout(Duration::from_millis(config.busy_timeout_ms));

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        let database = Self { pool };
        database.initialize_schema().await?;

        info!("✅ Lead database ready");
        Ok(database)
    }

    /// Create an in-memory database, primarily for testing.
    pub async fn connect_in_memory() -> Result<Self> {
        info!("🗄️ Creating in-memory lead database");

        // `REFERENCES` clauses are declarative only (see `schema`); keep
        // enforcement off to match the file-backed path.
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(false);

        // Each pooled `:memory:` connection owns a separate database, and a
        // recycled connection drops its contents. Pin the pool to a single
        // connection that is never retired.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await?;

        let database = Self { pool };
        database.initialize_schema().await?;

        info!("✅ In-memory database created");
        Ok(database)
    }

    /// Initialize the database schema
    async fn initialize_schema(&self) -> Result<()> {
        debug!("📋 Creating lead distribution schema");

        schema::create_operators_table(&self.pool).await?;
        schema::create_leads_table(&self.pool).await?;
        schema::create_sources_table(&self.pool).await?;
        schema::create_assignments_table(&self.pool).await?;
        schema::create_contacts_table(&self.pool).await?;
        schema::create_indexes(&self.pool).await?;

        debug!("✅ Schema created");
        Ok(())
    }

    /// The underlying connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Execute a health check query
    pub async fn health_check(&self) -> Result<bool> {
        match sqlx::query("SELECT 1").execute(&self.pool).await {
            Ok(_) => Ok(true),
            Err(e) => {
                error!("❌ Database health check failed: {}", e);
                Ok(false)
            }
        }
    }
}

/// Aggregate counters over the whole store
#[derive(Debug, Clone, Serialize)]
pub struct DistributionStats {
    pub total_operators: i64,
    pub active_operators: i64,
    pub available_operators: i64,
    pub total_leads: i64,
    pub total_contacts: i64,
    pub assigned_contacts: i64,
    pub unassigned_contacts: i64,
}

impl Database {
    /// Get distribution statistics
    pub async fn get_distribution_stats(&self) -> Result<DistributionStats> {
        let total_operators =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM operators")
                .fetch_one(&self.pool)
                .await?;
        let active_operators =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM operators WHERE is_active = 1")
                .fetch_one(&self.pool)
                .await?;
        let available_operators = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM operators WHERE is_active = 1 AND current_load < max_load",
        )
        .fetch_one(&self.pool)
        .await?;
        let total_leads = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM leads")
            .fetch_one(&self.pool)
            .await?;
        let total_contacts = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM contacts")
            .fetch_one(&self.pool)
            .await?;
        let assigned_contacts = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM contacts WHERE operator_id IS NOT NULL",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(DistributionStats {
            total_operators,
            active_operators,
            available_operators,
            total_leads,
            total_contacts,
            assigned_contacts,
            unassigned_contacts: total_contacts - assigned_contacts,
        })
    }
}
