//! Estate API endpoints.
//!
//! Creates estates, plants trees, and serves stats and drone plans.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use estate_core::{
    CreateEstateRequest, CreateTreeRequest, CreatedResponse, DronePlanResponse, EstateRecord,
    EstateStatsResponse, RouteResponse,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::patrol_service::{self, PlantTreeError};
use crate::state::AppState;

type ApiError = (StatusCode, Json<Value>);

const INVALID_INPUT: &str = "invalid value or format";
const NOT_FOUND: &str = "resource not found";

fn error(status: StatusCode, message: &str) -> ApiError {
    (status, Json(json!({ "message": message })))
}

/// Query params for the drone plan.
#[derive(Debug, Deserialize)]
pub struct DronePlanQuery {
    /// Battery range; when set the response includes where the drone rests
    pub max_distance: Option<u64>,
}

/// Create a new estate.
/// POST /estate
pub async fn create_estate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateEstateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let Json(request) = payload.map_err(|err| bad_payload("CreateEstate", err))?;
    let dimensions = state
        .config()
        .rules
        .validate_estate(request.width, request.length)
        .map_err(|err| {
            tracing::warn!("[CreateEstate] {}", err);
            error(StatusCode::BAD_REQUEST, INVALID_INPUT)
        })?;

    let estate = state.create_estate(dimensions).await.map_err(|err| {
        tracing::error!("[CreateEstate] failed to persist estate: {}", err);
        error(StatusCode::BAD_REQUEST, "failed to create resource")
    })?;

    tracing::info!(
        "Created estate {} ({}x{})",
        estate.id,
        estate.width,
        estate.length
    );
    Ok((StatusCode::CREATED, Json(CreatedResponse { id: estate.id })))
}

/// Plant a tree in an estate and recompute its patrol.
/// POST /estate/:id/tree
pub async fn create_tree(
    State(state): State<Arc<AppState>>,
    Path(estate_id): Path<String>,
    payload: Result<Json<CreateTreeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let estate_id = load_estate(&state, &estate_id).await?.id;
    let Json(request) = payload.map_err(|err| bad_payload("CreateTree", err))?;

    match patrol_service::plant_tree(&state, &estate_id, request).await {
        Ok(tree) => Ok((StatusCode::CREATED, Json(CreatedResponse { id: tree.id }))),
        Err(PlantTreeError::EstateNotFound(_)) => Err(error(StatusCode::NOT_FOUND, NOT_FOUND)),
        Err(err @ (PlantTreeError::Invalid(_) | PlantTreeError::Occupied { .. })) => {
            tracing::warn!("[CreateTree] estate {}: {}", estate_id, err);
            Err(error(StatusCode::BAD_REQUEST, INVALID_INPUT))
        }
        Err(err) => {
            tracing::error!("[CreateTree] estate {}: {}", estate_id, err);
            Err(error(StatusCode::BAD_REQUEST, INVALID_INPUT))
        }
    }
}

/// Tree count and height statistics.
/// GET /estate/:id/stats
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    Path(estate_id): Path<String>,
) -> Result<Json<EstateStatsResponse>, ApiError> {
    let estate = load_estate(&state, &estate_id).await?;
    Ok(Json(estate.stats()))
}

/// Total patrol distance, and the rest plot for a limited range.
/// GET /estate/:id/drone-plan
pub async fn get_drone_plan(
    State(state): State<Arc<AppState>>,
    Path(estate_id): Path<String>,
    query: Result<Query<DronePlanQuery>, QueryRejection>,
) -> Result<Json<DronePlanResponse>, ApiError> {
    let Query(query) = query.map_err(|err| bad_payload("DronePlan", err))?;
    if query.max_distance == Some(0) {
        return Err(error(StatusCode::BAD_REQUEST, INVALID_INPUT));
    }
    let estate = load_estate(&state, &estate_id).await?;

    patrol_service::drone_plan(&estate, query.max_distance)
        .map(Json)
        .map_err(|err| {
            tracing::error!(
                "[DronePlan] stored route for estate {} is corrupt: {}",
                estate.id,
                err
            );
            error(StatusCode::INTERNAL_SERVER_ERROR, "failed to read patrol route")
        })
}

/// Full stored patrol route.
/// GET /estate/:id/route
pub async fn get_route(
    State(state): State<Arc<AppState>>,
    Path(estate_id): Path<String>,
) -> Result<Json<RouteResponse>, ApiError> {
    let estate = load_estate(&state, &estate_id).await?;

    patrol_service::route(&estate).map(Json).map_err(|err| {
        tracing::error!("[Route] stored route for estate {} is corrupt: {}", estate.id, err);
        error(StatusCode::INTERNAL_SERVER_ERROR, "failed to read patrol route")
    })
}

fn bad_payload(operation: &str, rejection: impl std::fmt::Display) -> ApiError {
    tracing::warn!("[{}] failed to read payload: {}", operation, rejection);
    error(StatusCode::BAD_REQUEST, INVALID_INPUT)
}

fn parse_estate_id(raw: &str) -> Result<String, ApiError> {
    uuid::Uuid::parse_str(raw)
        .map(|id| id.to_string())
        .map_err(|_| error(StatusCode::NOT_FOUND, NOT_FOUND))
}

async fn load_estate(state: &AppState, raw_id: &str) -> Result<EstateRecord, ApiError> {
    let estate_id = parse_estate_id(raw_id)?;
    match state.get_estate(&estate_id).await {
        Ok(Some(estate)) => Ok(estate),
        Ok(None) => Err(error(StatusCode::NOT_FOUND, NOT_FOUND)),
        Err(err) => {
            tracing::error!("failed to read estate {}: {}", estate_id, err);
            Err(error(StatusCode::INTERNAL_SERVER_ERROR, "failed to read estate"))
        }
    }
}
