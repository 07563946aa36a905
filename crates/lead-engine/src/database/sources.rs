//! Source-related database operations

use serde::{Deserialize, Serialize};
use tracing::info;

use super::Database;
use crate::error::{DistributionError, Result};

/// Source record: the channel or campaign a lead arrives through
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Source {
    pub id: i64,
    pub name: String,
}

impl Database {
    /// Create a new source with a unique name
    pub async fn create_source(&self, name: &str) -> Result<Source> {
        if name.is_empty() {
            return Err(DistributionError::invalid_input("source name cannot be empty"));
        }

        let result = sqlx::query("INSERT INTO sources (name) VALUES (?1)")
            .bind(name)
            .execute(self.pool())
            .await;

        let result = match result {
            Ok(result) => result,
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                return Err(DistributionError::already_exists(format!("source '{}'", name)));
            }
            Err(e) => return Err(e.into()),
        };

        let id = result.last_insert_rowid();
        info!("📣 Source '{}' created (id {})", name, id);

        self.get_source(id)
            .await?
            .ok_or_else(|| DistributionError::internal(format!("source {} missing after insert", id)))
    }

    /// Get a specific source
    pub async fn get_source(&self, id: i64) -> Result<Option<Source>> {
        let source = sqlx::query_as::<_, Source>("SELECT id, name FROM sources WHERE id = ?1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        Ok(source)
    }

    /// List sources ordered by id
    pub async fn list_sources(&self, skip: i64, limit: i64) -> Result<Vec<Source>> {
        let sources = sqlx::query_as::<_, Source>(
            "SELECT id, name FROM sources ORDER BY id LIMIT ?1 OFFSET ?2",
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(self.pool())
        .await?;

        Ok(sources)
    }
}
