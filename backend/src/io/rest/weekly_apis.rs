//! # REST API for Weekly Selections
//!
//! Endpoints for reading, shuffling, customizing, and committing a plan's
//! rotation for the current week.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use tracing::{error, info, warn};

use crate::domain::models::PlanId;
use crate::domain::SelectionError;
use crate::io::rest::mappers::{AllocationMapper, WeeklyMapper};
use crate::AppState;
use shared::{CommitWeekRequest, CustomizeSelectionRequest};

/// Create a router for weekly selection APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/history", get(get_history))
        .route("/commit", post(commit_week))
        .route("/:plan", get(get_current_selection))
        .route("/:plan/shuffle", post(shuffle_selection))
        .route("/:plan/customize", post(customize_selection))
        .route("/:plan/allocation", get(get_selection_allocation))
}

fn error_status(e: &SelectionError) -> StatusCode {
    match e {
        SelectionError::UnknownPlan(_) | SelectionError::NoSelection { .. } => StatusCode::NOT_FOUND,
        SelectionError::UnknownVegetable(_)
        | SelectionError::DuplicateVegetable(_)
        | SelectionError::CountOutOfRange { .. }
        | SelectionError::InvalidWeek(_) => StatusCode::BAD_REQUEST,
        SelectionError::CustomizationClosed { .. } => StatusCode::CONFLICT,
        SelectionError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(context: &str, e: SelectionError) -> Response {
    let status = error_status(&e);
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!("{}: {:?}", context, e);
    } else {
        warn!("{}: {}", context, e);
    }
    (status, e.to_string()).into_response()
}

fn parse_plan(plan: &str) -> Result<PlanId, Response> {
    plan.parse::<PlanId>()
        .map_err(|message| (StatusCode::NOT_FOUND, message).into_response())
}

/// This week's selection for a plan, generated on first request
pub async fn get_current_selection(State(state): State<AppState>, Path(plan): Path<String>) -> Response {
    info!("GET /api/weekly/{}", plan);

    let plan = match parse_plan(&plan) {
        Ok(plan) => plan,
        Err(response) => return response,
    };

    match state.weekly_service.current_selection(plan).await {
        Ok(selection) => (StatusCode::OK, Json(WeeklyMapper::to_dto(selection))).into_response(),
        Err(e) => error_response("Failed to get weekly selection", e),
    }
}

pub async fn shuffle_selection(State(state): State<AppState>, Path(plan): Path<String>) -> Response {
    info!("POST /api/weekly/{}/shuffle", plan);

    let plan = match parse_plan(&plan) {
        Ok(plan) => plan,
        Err(response) => return response,
    };

    match state.weekly_service.shuffle(plan).await {
        Ok(selection) => (StatusCode::OK, Json(WeeklyMapper::to_dto(selection))).into_response(),
        Err(e) => error_response("Failed to shuffle weekly selection", e),
    }
}

pub async fn customize_selection(
    State(state): State<AppState>,
    Path(plan): Path<String>,
    Json(request): Json<CustomizeSelectionRequest>,
) -> Response {
    info!("POST /api/weekly/{}/customize - request: {:?}", plan, request);

    let plan = match parse_plan(&plan) {
        Ok(plan) => plan,
        Err(response) => return response,
    };

    let command = WeeklyMapper::to_customize_command(request);
    match state.weekly_service.customize(plan, command).await {
        Ok(selection) => (StatusCode::OK, Json(WeeklyMapper::to_dto(selection))).into_response(),
        Err(e) => error_response("Failed to customize weekly selection", e),
    }
}

/// Append a stored selection to the rotation history
pub async fn commit_week(State(state): State<AppState>, Json(request): Json<CommitWeekRequest>) -> Response {
    info!("POST /api/weekly/commit - request: {:?}", request);

    let command = match WeeklyMapper::to_commit_command(request) {
        Ok(command) => command,
        Err(e) => return error_response("Failed to parse week", e.into()),
    };

    match state.weekly_service.commit(command).await {
        Ok(result) => (StatusCode::OK, Json(WeeklyMapper::to_commit_dto(result))).into_response(),
        Err(e) => error_response("Failed to commit week", e),
    }
}

pub async fn get_history(State(state): State<AppState>) -> Response {
    info!("GET /api/weekly/history");

    match state.weekly_service.history().await {
        Ok(history) => (StatusCode::OK, Json(WeeklyMapper::to_history_dto(history))).into_response(),
        Err(e) => error_response("Failed to load history", e),
    }
}

/// The plan's vegetable budget spread over this week's selection
pub async fn get_selection_allocation(State(state): State<AppState>, Path(plan): Path<String>) -> Response {
    info!("GET /api/weekly/{}/allocation", plan);

    let plan = match parse_plan(&plan) {
        Ok(plan) => plan,
        Err(response) => return response,
    };

    match state.weekly_service.allocation(plan).await {
        Ok((_, result)) => (StatusCode::OK, Json(AllocationMapper::to_dto(result))).into_response(),
        Err(e) => error_response("Failed to allocate weekly selection", e),
    }
}
