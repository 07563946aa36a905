//! Contact ingestion and read-side listings.
//!
//! `POST /contacts` is the inbound event boundary: it deserializes a
//! contact event, hands it to the distribution engine, and serializes the
//! committed contact back out.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::database::contacts::Contact;
use crate::database::leads::Lead;
use crate::database::DistributionStats;
use crate::distributor::NewContact;

use super::{ApiResult, ApiState, PageParams};

/// Request body for an inbound contact event
#[derive(Debug, Deserialize)]
pub struct CreateContactRequest {
    pub external_id: String,
    pub source_id: i64,
    pub message: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// `POST /contacts`
pub async fn create_contact(
    State(state): State<ApiState>,
    Json(request): Json<CreateContactRequest>,
) -> ApiResult<Contact> {
    let contact = state
        .engine
        .create_contact(NewContact {
            external_id: request.external_id,
            source_id: request.source_id,
            message: request.message,
            email: request.email,
            phone: request.phone,
        })
        .await?;
    Ok(Json(contact))
}

/// `GET /contacts`
pub async fn list_contacts(
    State(state): State<ApiState>,
    Query(page): Query<PageParams>,
) -> ApiResult<Vec<Contact>> {
    let (skip, limit) = page.resolve(&state.config);
    let contacts = state.engine.database().list_contacts(skip, limit).await?;
    Ok(Json(contacts))
}

/// `GET /leads`
pub async fn list_leads(
    State(state): State<ApiState>,
    Query(page): Query<PageParams>,
) -> ApiResult<Vec<Lead>> {
    let (skip, limit) = page.resolve(&state.config);
    let leads = state.engine.database().list_leads(skip, limit).await?;
    Ok(Json(leads))
}

/// `GET /stats`
pub async fn stats(State(state): State<ApiState>) -> ApiResult<DistributionStats> {
    let stats = state.engine.stats().await?;
    Ok(Json(stats))
}
