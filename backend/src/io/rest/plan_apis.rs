//! # REST API for Plans and the Customization Window

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tracing::info;

use crate::io::rest::mappers::WeeklyMapper;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/plans", get(list_plans))
        .route("/window", get(get_window_status))
}

/// Configured subscription tiers
pub async fn list_plans(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/plans");

    let response = WeeklyMapper::to_plan_list_dto(state.weekly_service.plans());
    (StatusCode::OK, Json(response)).into_response()
}

/// Whether customization is open now, with deadline and countdown
pub async fn get_window_status(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/window");

    let response = WeeklyMapper::to_window_dto(state.weekly_service.window_status());
    (StatusCode::OK, Json(response)).into_response()
}
