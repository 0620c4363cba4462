//! # REST API for Ad-hoc Budget Allocation

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::post,
    Router,
};
use tracing::{error, info, warn};

use crate::io::rest::mappers::AllocationMapper;
use crate::AppState;
use shared::AllocationRequest;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(allocate))
}

/// Split a positive budget over vegetable ids; unknown ids are skipped
pub async fn allocate(State(state): State<AppState>, Json(request): Json<AllocationRequest>) -> impl IntoResponse {
    info!("POST /api/allocation - request: {:?}", request);

    if request.budget == 0 {
        warn!("Rejected allocation with a zero budget");
        return (StatusCode::BAD_REQUEST, "Budget must be positive").into_response();
    }

    let command = AllocationMapper::to_command(request);
    match state.allocation_service.allocate(command).await {
        Ok(result) => (StatusCode::OK, Json(AllocationMapper::to_dto(result))).into_response(),
        Err(e) => {
            error!("Failed to allocate budget: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error allocating budget").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::rest::test_support::{read_json, send, setup_test_state, thursday_morning};
    use axum::http::Method;
    use serde_json::json;
    use shared::{AllocationResponse, VegetableCategory};

    #[tokio::test]
    async fn test_allocate_budget() {
        let (state, _) = setup_test_state(thursday_morning(), 3).await;
        let app = router().with_state(state);

        let body = json!({ "budget": 4000, "vegetable_ids": ["carrots", "gotukola", "bandakka", "ghost"] });
        let response = send(&app, Method::POST, "/", Some(body)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let allocation: AllocationResponse = read_json(response).await;
        assert_eq!(allocation.lines.len(), 3);
        assert_eq!(allocation.allocated_total, 4000);
        let carrots = &allocation.lines[0];
        assert_eq!(carrots.vegetable_id, "carrots");
        assert_eq!(carrots.allocated_budget, 1778);
        assert_eq!(carrots.allocated_weight, 500);
        assert_eq!(allocation.breakdown.total_weight, 1000);
        let root = allocation
            .breakdown
            .categories
            .iter()
            .find(|c| c.category == VegetableCategory::Root)
            .expect("Failed to find root breakdown");
        assert_eq!(root.percentage, 50);
    }

    #[tokio::test]
    async fn test_allocate_nothing() {
        let (state, _) = setup_test_state(thursday_morning(), 3).await;
        let app = router().with_state(state);

        let response = send(&app, Method::POST, "/", Some(json!({ "budget": 2200, "vegetable_ids": [] }))).await;
        let allocation: AllocationResponse = read_json(response).await;
        assert!(allocation.lines.is_empty());
        assert_eq!(allocation.allocated_total, 0);
    }

    #[tokio::test]
    async fn test_zero_budget_is_rejected() {
        let (state, _) = setup_test_state(thursday_morning(), 3).await;
        let app = router().with_state(state);

        let body = json!({ "budget": 0, "vegetable_ids": ["carrots"] });
        let response = send(&app, Method::POST, "/", Some(body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
