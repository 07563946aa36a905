//! Administrative API: operators, sources and assignments.
//!
//! Plain CRUD over the store. The distribution path never goes through
//! these handlers; they exist so the routing topology (who serves which
//! source, at what weight and capacity) can be managed over HTTP.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::database::assignments::Assignment;
use crate::database::operators::Operator;
use crate::database::sources::Source;

use super::{ApiResult, ApiState, PageParams};

fn default_true() -> bool {
    true
}

/// Request body for creating an operator
#[derive(Debug, Deserialize)]
pub struct CreateOperatorRequest {
    pub name: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub max_load: Option<i64>,
}

/// Request body for partially updating an operator
#[derive(Debug, Deserialize)]
pub struct UpdateOperatorRequest {
    pub name: Option<String>,
    pub is_active: Option<bool>,
    pub max_load: Option<i64>,
}

/// Request body for creating a source
#[derive(Debug, Deserialize)]
pub struct CreateSourceRequest {
    pub name: String,
}

/// Request body for creating an assignment
#[derive(Debug, Deserialize)]
pub struct CreateAssignmentRequest {
    pub operator_id: i64,
    pub source_id: i64,
    pub weight: Option<i64>,
}

/// `POST /operators`
pub async fn create_operator(
    State(state): State<ApiState>,
    Json(request): Json<CreateOperatorRequest>,
) -> ApiResult<Operator> {
    let max_load = request
        .max_load
        .unwrap_or(state.config.distribution.default_max_load);
    let operator = state
        .engine
        .database()
        .create_operator(&request.name, request.is_active, max_load)
        .await?;
    Ok(Json(operator))
}

/// `GET /operators`
pub async fn list_operators(
    State(state): State<ApiState>,
    Query(page): Query<PageParams>,
) -> ApiResult<Vec<Operator>> {
    let (skip, limit) = page.resolve(&state.config);
    let operators = state.engine.database().list_operators(skip, limit).await?;
    Ok(Json(operators))
}

/// `PATCH /operators/{id}`
pub async fn update_operator(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateOperatorRequest>,
) -> ApiResult<Operator> {
    let operator = state
        .engine
        .database()
        .update_operator(id, request.name.as_deref(), request.is_active, request.max_load)
        .await?;
    Ok(Json(operator))
}

/// `POST /sources`
pub async fn create_source(
    State(state): State<ApiState>,
    Json(request): Json<CreateSourceRequest>,
) -> ApiResult<Source> {
    let source = state.engine.database().create_source(&request.name).await?;
    Ok(Json(source))
}

/// `GET /sources`
pub async fn list_sources(
    State(state): State<ApiState>,
    Query(page): Query<PageParams>,
) -> ApiResult<Vec<Source>> {
    let (skip, limit) = page.resolve(&state.config);
    let sources = state.engine.database().list_sources(skip, limit).await?;
    Ok(Json(sources))
}

/// `POST /assignments`
pub async fn create_assignment(
    State(state): State<ApiState>,
    Json(request): Json<CreateAssignmentRequest>,
) -> ApiResult<Assignment> {
    let weight = request
        .weight
        .unwrap_or(state.config.distribution.default_weight);
    let assignment = state
        .engine
        .database()
        .create_assignment(request.operator_id, request.source_id, weight)
        .await?;
    Ok(Json(assignment))
}
