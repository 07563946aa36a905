//! Contact-related database operations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Database;
use crate::error::Result;

/// Contact record: one distribution event for a lead arriving via a source.
///
/// A NULL `operator_id` means no eligible operator existed when the contact
/// was created. That is a valid terminal state, not an error.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub lead_id: i64,
    pub source_id: i64,
    pub operator_id: Option<i64>,
    pub message: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl Database {
    /// Get a specific contact
    pub async fn get_contact(&self, id: i64) -> Result<Option<Contact>> {
        let contact = sqlx::query_as::<_, Contact>(
            "SELECT id, lead_id, source_id, operator_id, message, status, created_at
             FROM contacts WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(contact)
    }

    /// List contacts ordered by id
    pub async fn list_contacts(&self, skip: i64, limit: i64) -> Result<Vec<Contact>> {
        let contacts = sqlx::query_as::<_, Contact>(
            "SELECT id, lead_id, source_id, operator_id, message, status, created_at
             FROM contacts ORDER BY id LIMIT ?1 OFFSET ?2",
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(self.pool())
        .await?;

        Ok(contacts)
    }
}

/// Insert a contact row.
///
/// Executor-generic so the distribution engine can run it inside the same
/// transaction as the operator load increment; the two must commit together
/// or not at all.
pub(crate) async fn insert_contact<'e, E>(
    executor: E,
    lead_id: i64,
    source_id: i64,
    operator_id: Option<i64>,
    message: Option<&str>,
    status: &str,
    created_at: DateTime<Utc>,
) -> Result<i64>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let result = sqlx::query(
        "INSERT INTO contacts (lead_id, source_id, operator_id, message, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(lead_id)
    .bind(source_id)
    .bind(operator_id)
    .bind(message)
    .bind(status)
    .bind(created_at)
    .execute(executor)
    .await?;

    Ok(result.last_insert_rowid())
}
