//! Operator-related database operations

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::Database;
use crate::error::{DistributionError, Result};

/// Operator record
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Operator {
    pub id: i64,
    pub name: String,
    pub is_active: bool,
    pub max_load: i64,
    pub current_load: i64,
}

impl Operator {
    /// Whether this operator can take one more contact
    pub fn has_capacity(&self) -> bool {
        self.is_active && self.current_load < self.max_load
    }
}

impl Database {
    /// Create a new operator with zero load
    pub async fn create_operator(
        &self,
        name: &str,
        is_active: bool,
        max_load: i64,
    ) -> Result<Operator> {
        if name.is_empty() {
            return Err(DistributionError::invalid_input("operator name cannot be empty"));
        }
        if max_load <= 0 {
            return Err(DistributionError::invalid_input("max_load must be greater than 0"));
        }

        let result = sqlx::query(
            "INSERT INTO operators (name, is_active, max_load, current_load)
             VALUES (?1, ?2, ?3, 0)",
        )
        .bind(name)
        .bind(is_active)
        .bind(max_load)
        .execute(self.pool())
        .await?;

        let id = result.last_insert_rowid();
        info!("👤 Operator '{}' created (id {}, max load {})", name, id, max_load);

        self.get_operator(id)
            .await?
            .ok_or_else(|| DistributionError::internal(format!("operator {} missing after insert", id)))
    }

    /// Get a specific operator
    pub async fn get_operator(&self, id: i64) -> Result<Option<Operator>> {
        let operator = sqlx::query_as::<_, Operator>(
            "SELECT id, name, is_active, max_load, current_load
             FROM operators WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(operator)
    }

    /// List operators ordered by id
    pub async fn list_operators(&self, skip: i64, limit: i64) -> Result<Vec<Operator>> {
        let operators = sqlx::query_as::<_, Operator>(
            "SELECT id, name, is_active, max_load, current_load
             FROM operators ORDER BY id LIMIT ?1 OFFSET ?2",
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(self.pool())
        .await?;

        Ok(operators)
    }

    /// Partially update an operator; unset fields keep their current value
    pub async fn update_operator(
        &self,
        id: i64,
        name: Option<&str>,
        is_active: Option<bool>,
        max_load: Option<i64>,
    ) -> Result<Operator> {
        if let Some(max_load) = max_load {
            if max_load <= 0 {
                return Err(DistributionError::invalid_input("max_load must be greater than 0"));
            }
        }

        let result = sqlx::query(
            "UPDATE operators
             SET name = COALESCE(?1, name),
                 is_active = COALESCE(?2, is_active),
                 max_load = COALESCE(?3, max_load)
             WHERE id = ?4",
        )
        .bind(name)
        .bind(is_active)
        .bind(max_load)
        .bind(id)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(DistributionError::not_found(format!("operator {}", id)));
        }

        debug!("👤 Operator {} updated", id);

        self.get_operator(id)
            .await?
            .ok_or_else(|| DistributionError::internal(format!("operator {} missing after update", id)))
    }
}

/// Atomically claim one unit of an operator's capacity.
///
/// The guard re-checks activity and load inside the UPDATE itself, so the
/// caller never trusts an earlier eligibility read. Returns `false` when a
/// concurrent attempt consumed the last slot (or the operator was
/// deactivated) between that read and this write.
pub(crate) async fn try_acquire_operator_slot<'e, E>(executor: E, operator_id: i64) -> Result<bool>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let result = sqlx::query(
        "UPDATE operators
         SET current_load = current_load + 1
         WHERE id = ?1 AND is_active = 1 AND current_load < max_load",
    )
    .bind(operator_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}
