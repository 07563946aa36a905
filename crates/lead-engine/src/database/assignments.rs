//! Assignment-related database operations
//!
//! An assignment links one operator to one source with an integer weight
//! controlling its share of that source's traffic. The eligibility query
//! below is the distribution engine's candidate feed.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::Database;
use crate::distributor::selection::Candidate;
use crate::error::{DistributionError, Result};

/// Operator-source assignment record
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Assignment {
    pub id: i64,
    pub operator_id: i64,
    pub source_id: i64,
    pub weight: i64,
}

impl Database {
    /// Create an assignment after validating that both referents exist
    pub async fn create_assignment(
        &self,
        operator_id: i64,
        source_id: i64,
        weight: i64,
    ) -> Result<Assignment> {
        if self.get_operator(operator_id).await?.is_none() {
            return Err(DistributionError::not_found(format!("operator {}", operator_id)));
        }
        if self.get_source(source_id).await?.is_none() {
            return Err(DistributionError::not_found(format!("source {}", source_id)));
        }

        let result = sqlx::query(
            "INSERT INTO assignments (operator_id, source_id, weight)
             VALUES (?1, ?2, ?3)",
        )
        .bind(operator_id)
        .bind(source_id)
        .bind(weight)
        .execute(self.pool())
        .await?;

        let id = result.last_insert_rowid();
        info!(
            "🔗 Operator {} assigned to source {} with weight {} (assignment {})",
            operator_id, source_id, weight, id
        );

        let assignment = sqlx::query_as::<_, Assignment>(
            "SELECT id, operator_id, source_id, weight FROM assignments WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        assignment
            .ok_or_else(|| DistributionError::internal(format!("assignment {} missing after insert", id)))
    }

    /// List assignments for a source ordered by id
    pub async fn list_assignments_for_source(&self, source_id: i64) -> Result<Vec<Assignment>> {
        let assignments = sqlx::query_as::<_, Assignment>(
            "SELECT id, operator_id, source_id, weight
             FROM assignments WHERE source_id = ?1 ORDER BY id",
        )
        .bind(source_id)
        .fetch_all(self.pool())
        .await?;

        Ok(assignments)
    }

    /// List the operators eligible to take a contact from `source_id`,
    /// paired with their assignment weight.
    ///
    /// Retains assigned operators that are active and under capacity. The
    /// ordering (assignment id) carries no routing meaning but is stable
    /// for a given store state. An unknown source yields an empty list,
    /// the same as a source with no qualifying operators.
    pub async fn list_eligible_operators(&self, source_id: i64) -> Result<Vec<Candidate>> {
        let candidates = sqlx::query_as::<_, Candidate>(
            "SELECT a.operator_id, a.weight
             FROM assignments a
             JOIN operators o ON o.id = a.operator_id
             WHERE a.source_id = ?1
               AND o.is_active = 1
               AND o.current_load < o.max_load
             ORDER BY a.id",
        )
        .bind(source_id)
        .fetch_all(self.pool())
        .await?;

        debug!(
            "🔍 Source {}: {} eligible operator(s)",
            source_id,
            candidates.len()
        );

        Ok(candidates)
    }
}
