//! Lead-related database operations
//!
//! Leads are created lazily on first contact and identified by a
//! caller-owned `external_id`. The unique constraint on that column is the
//! source of truth under concurrent first contact.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::Database;
use crate::error::{DistributionError, Result};

/// Lead record
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Lead {
    pub id: i64,
    pub external_id: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Database {
    /// Look up a lead by its external identifier
    pub async fn find_lead_by_external_id(&self, external_id: &str) -> Result<Option<Lead>> {
        let lead = sqlx::query_as::<_, Lead>(
            "SELECT id, external_id, email, phone, created_at
             FROM leads WHERE external_id = ?1",
        )
        .bind(external_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(lead)
    }

    /// Find or create the lead for `external_id`.
    ///
    /// First write wins: an existing lead is returned unchanged, and the
    /// incoming email/phone are ignored. Two concurrent calls for a new
    /// `external_id` both resolve to the single surviving row: the losing
    /// insert is a no-op (`ON CONFLICT DO NOTHING`) and its re-read finds
    /// the winner.
    pub async fn resolve_lead(
        &self,
        external_id: &str,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Lead> {
        if external_id.is_empty() {
            return Err(DistributionError::invalid_input("external_id cannot be empty"));
        }

        if let Some(lead) = self.find_lead_by_external_id(external_id).await? {
            debug!("🔁 Lead '{}' already known (id {})", external_id, lead.id);
            return Ok(lead);
        }

        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO leads (external_id, email, phone, created_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(external_id) DO NOTHING",
        )
        .bind(external_id)
        .bind(email)
        .bind(phone)
        .bind(now)
        .execute(self.pool())
        .await?;

        match self.find_lead_by_external_id(external_id).await? {
            Some(lead) => {
                if result.rows_affected() > 0 {
                    info!("🆕 Lead '{}' registered (id {})", external_id, lead.id);
                } else {
                    debug!("🔁 Lead '{}' creation raced, using id {}", external_id, lead.id);
                }
                Ok(lead)
            }
            None => Err(DistributionError::internal(format!(
                "lead '{}' missing after insert",
                external_id
            ))),
        }
    }

    /// List leads ordered by id
    pub async fn list_leads(&self, skip: i64, limit: i64) -> Result<Vec<Lead>> {
        let leads = sqlx::query_as::<_, Lead>(
            "SELECT id, external_id, email, phone, created_at
             FROM leads ORDER BY id LIMIT ?1 OFFSET ?2",
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(self.pool())
        .await?;

        Ok(leads)
    }
}
