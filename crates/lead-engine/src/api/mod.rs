//! HTTP API for the lead distributor.
//!
//! Thin axum handlers over the store and the distribution engine:
//! [`admin`] carries the operator/source/assignment CRUD surface,
//! [`contacts`] carries contact ingestion and the read-side listings.

pub mod admin;
pub mod contacts;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, warn};

use crate::config::DistributorConfig;
use crate::distributor::DistributionEngine;
use crate::error::DistributionError;

/// Shared state for API handlers
#[derive(Clone)]
pub struct ApiState {
    pub engine: Arc<DistributionEngine>,
    pub config: Arc<DistributorConfig>,
}

impl ApiState {
    /// Create API state from an engine and its configuration
    pub fn new(engine: Arc<DistributionEngine>, config: Arc<DistributorConfig>) -> Self {
        Self { engine, config }
    }
}

/// Build the full API router
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/operators", post(admin::create_operator).get(admin::list_operators))
        .route("/operators/:id", patch(admin::update_operator))
        .route("/sources", post(admin::create_source).get(admin::list_sources))
        .route("/assignments", post(admin::create_assignment))
        .route("/contacts", post(contacts::create_contact).get(contacts::list_contacts))
        .route("/leads", get(contacts::list_leads))
        .route("/stats", get(contacts::stats))
        .with_state(state)
}

/// Pagination query parameters for listing endpoints
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub skip: i64,
    pub limit: Option<i64>,
}

impl PageParams {
    /// Resolve the effective (skip, limit) under the configured caps
    pub fn resolve(&self, config: &DistributorConfig) -> (i64, i64) {
        let skip = self.skip.max(0);
        let limit = self
            .limit
            .unwrap_or(i64::from(config.general.default_page_size))
            .clamp(1, i64::from(config.general.max_page_size));
        (skip, limit)
    }
}

/// API error wrapper mapping engine errors onto HTTP statuses
pub struct ApiError(pub DistributionError);

impl From<DistributionError> for ApiError {
    fn from(err: DistributionError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            DistributionError::NotFound(_) => StatusCode::NOT_FOUND,
            DistributionError::AlreadyExists(_) => StatusCode::CONFLICT,
            DistributionError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            DistributionError::Contention(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if self.0.is_retryable() {
            warn!("⏳ Retryable failure: {}", self.0);
        } else if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("❌ Request failed: {}", self.0);
        }

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = std::result::Result<Json<T>, ApiError>;
