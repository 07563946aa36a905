//! The distribution engine.
//!
//! One inbound contact event runs: resolve lead → list eligible operators
//! for the event's source → weighted selection → persist the contact and
//! bump the chosen operator's load, the last two inside one transaction.
//!
//! `Operator.current_load` is the single contention point between
//! concurrent attempts. The engine never trusts its eligibility read;
//! the increment is a conditional UPDATE re-checking `is_active` and
//! `current_load < max_load`, and a zero-row result rolls the whole
//! attempt back (discarding the contact row) and re-runs selection
//! against fresh state. `max_load` is therefore a hard ceiling.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::DistributionConfig;
use crate::database::contacts::{insert_contact, Contact};
use crate::database::leads::Lead;
use crate::database::operators::try_acquire_operator_slot;
use crate::database::{Database, DistributionStats};
use crate::error::{DistributionError, Result};

use super::selection::{select_weighted, Candidate};

/// An inbound contact event, as handed over by the request layer
#[derive(Debug, Clone)]
pub struct NewContact {
    /// Caller-owned idempotency key identifying the lead
    pub external_id: String,
    /// The source the contact arrived through
    pub source_id: i64,
    /// Free-text message
    pub message: Option<String>,
    /// Lead email, used only on first contact
    pub email: Option<String>,
    /// Lead phone, used only on first contact
    pub phone: Option<String>,
}

/// Lead distribution engine
#[derive(Clone)]
pub struct DistributionEngine {
    config: DistributionConfig,
    database: Database,
}

impl DistributionEngine {
    /// Create a new engine over the given store
    pub fn new(config: DistributionConfig, database: Database) -> Self {
        Self { config, database }
    }

    /// The underlying store
    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Find or create the lead for an external id (first write wins)
    pub async fn resolve_lead(
        &self,
        external_id: &str,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Lead> {
        self.database.resolve_lead(external_id, email, phone).await
    }

    /// The operators currently eligible for a source, with weights
    pub async fn list_eligible(&self, source_id: i64) -> Result<Vec<Candidate>> {
        self.database.list_eligible_operators(source_id).await
    }

    /// Distribute one inbound contact event.
    ///
    /// Creates exactly one contact row and increments at most one
    /// operator's load by exactly one; the two changes commit together or
    /// not at all. A contact with no operator is a valid outcome when
    /// nothing is eligible (including an unknown source).
    pub async fn create_contact(&self, request: NewContact) -> Result<Contact> {
        let lead = self
            .database
            .resolve_lead(
                &request.external_id,
                request.email.as_deref(),
                request.phone.as_deref(),
            )
            .await?;

        for attempt in 1..=self.config.max_selection_retries {
            let candidates = self.database.list_eligible_operators(request.source_id).await?;
            let chosen = select_weighted(&candidates, &mut rand::thread_rng());

            match chosen {
                Some(operator_id) => debug!(
                    "🎯 Attempt {}: operator {} selected from {} candidate(s) for source {}",
                    attempt,
                    operator_id,
                    candidates.len(),
                    request.source_id
                ),
                None => debug!(
                    "📭 Attempt {}: no eligible operator for source {}",
                    attempt, request.source_id
                ),
            }

            if let Some(contact) = self.try_commit(&lead, &request, chosen).await? {
                match contact.operator_id {
                    Some(operator_id) => info!(
                        "📇 Contact {} routed to operator {} (lead {}, source {})",
                        contact.id, operator_id, lead.id, request.source_id
                    ),
                    None => info!(
                        "📇 Contact {} created unassigned (lead {}, source {})",
                        contact.id, lead.id, request.source_id
                    ),
                }
                return Ok(contact);
            }

            warn!(
                "⚔️ Attempt {}: lost operator slot to a concurrent contact, re-running selection",
                attempt
            );
        }

        Err(DistributionError::contention(format!(
            "gave up distributing contact for source {} after {} attempts",
            request.source_id, self.config.max_selection_retries
        )))
    }

    /// One transactional distribution attempt.
    ///
    /// Returns `Ok(None)` when the selected operator's slot was gone by
    /// commit time, in which case nothing was persisted.
    async fn try_commit(
        &self,
        lead: &Lead,
        request: &NewContact,
        chosen: Option<i64>,
    ) -> Result<Option<Contact>> {
        let mut tx = self.database.pool().begin().await?;

        // The insert comes first so the transaction's opening statement is
        // a write: SQLite takes the write lock up front instead of failing
        // a read-to-write upgrade under contention.
        let created_at = Utc::now();
        let contact_id = insert_contact(
            &mut *tx,
            lead.id,
            request.source_id,
            chosen,
            request.message.as_deref(),
            &self.config.new_contact_status,
            created_at,
        )
        .await?;

        if let Some(operator_id) = chosen {
            if !try_acquire_operator_slot(&mut *tx, operator_id).await? {
                tx.rollback().await?;
                return Ok(None);
            }
        }

        tx.commit().await?;

        let contact = self
            .database
            .get_contact(contact_id)
            .await?
            .ok_or_else(|| {
                DistributionError::internal(format!("contact {} missing after commit", contact_id))
            })?;

        Ok(Some(contact))
    }

    /// Aggregate distribution statistics
    pub async fn stats(&self) -> Result<DistributionStats> {
        self.database.get_distribution_stats().await
    }
}
