//! # REST API for the Vegetable Catalog
//!
//! Listing, CRUD, availability toggling, statistics, the à la carte price
//! list, and JSON export/import of the whole catalog.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::domain::models::Category;
use crate::domain::CatalogError;
use crate::io::rest::mappers::VegetableMapper;
use crate::AppState;
use shared::{
    CreateVegetableRequest, DeleteVegetableResponse, ImportCatalogRequest, ImportCatalogResponse,
    UpdateVegetableRequest,
};

/// Create a router for catalog related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vegetables).post(create_vegetable))
        .route("/available", get(list_available))
        .route("/category/:category", get(list_by_category))
        .route("/stats", get(get_statistics))
        .route("/prices", get(get_market_prices))
        .route("/export", get(export_catalog))
        .route("/import", post(import_catalog))
        .route(
            "/:id",
            get(get_vegetable).put(update_vegetable).delete(delete_vegetable),
        )
        .route("/:id/toggle", post(toggle_availability))
}

fn error_status(e: &CatalogError) -> StatusCode {
    match e {
        CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
        CatalogError::Invalid(_) => StatusCode::BAD_REQUEST,
        CatalogError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(context: &str, e: CatalogError) -> axum::response::Response {
    let status = error_status(&e);
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!("{}: {:?}", context, e);
    } else {
        warn!("{}: {}", context, e);
    }
    (status, e.to_string()).into_response()
}

#[derive(Deserialize, Debug, Default)]
pub struct CategoryQuery {
    #[serde(default)]
    pub include_unavailable: bool,
}

/// Every catalog entry, ordered by id
pub async fn list_vegetables(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/catalog");

    match state.catalog_service.list_vegetables().await {
        Ok(vegetables) => (StatusCode::OK, Json(VegetableMapper::to_list_dto(vegetables))).into_response(),
        Err(e) => error_response("Failed to list vegetables", e),
    }
}

pub async fn list_available(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/catalog/available");

    match state.catalog_service.list_available().await {
        Ok(vegetables) => (StatusCode::OK, Json(VegetableMapper::to_list_dto(vegetables))).into_response(),
        Err(e) => error_response("Failed to list available vegetables", e),
    }
}

pub async fn list_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Query(query): Query<CategoryQuery>,
) -> impl IntoResponse {
    info!("GET /api/catalog/category/{} - query: {:?}", category, query);

    let category = match category.parse::<Category>() {
        Ok(category) => category,
        Err(message) => return (StatusCode::BAD_REQUEST, message).into_response(),
    };

    match state
        .catalog_service
        .list_by_category(category, query.include_unavailable)
        .await
    {
        Ok(vegetables) => (StatusCode::OK, Json(VegetableMapper::to_list_dto(vegetables))).into_response(),
        Err(e) => error_response("Failed to list vegetables by category", e),
    }
}

pub async fn get_vegetable(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("GET /api/catalog/{}", id);

    match state.catalog_service.get_vegetable(&id).await {
        Ok(Some(vegetable)) => (StatusCode::OK, Json(VegetableMapper::to_dto(vegetable))).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, format!("Vegetable not found: {}", id)).into_response(),
        Err(e) => error_response("Failed to get vegetable", e),
    }
}

pub async fn create_vegetable(
    State(state): State<AppState>,
    Json(request): Json<CreateVegetableRequest>,
) -> impl IntoResponse {
    info!("POST /api/catalog - request: {:?}", request);

    let command = VegetableMapper::to_create_command(request);
    match state.catalog_service.create_vegetable(command).await {
        Ok(vegetable) => (StatusCode::CREATED, Json(VegetableMapper::to_dto(vegetable))).into_response(),
        Err(e) => error_response("Failed to create vegetable", e),
    }
}

pub async fn update_vegetable(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateVegetableRequest>,
) -> impl IntoResponse {
    info!("PUT /api/catalog/{} - request: {:?}", id, request);

    let command = VegetableMapper::to_update_command(request);
    match state.catalog_service.update_vegetable(&id, command).await {
        Ok(vegetable) => (StatusCode::OK, Json(VegetableMapper::to_dto(vegetable))).into_response(),
        Err(e) => error_response("Failed to update vegetable", e),
    }
}

pub async fn delete_vegetable(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("DELETE /api/catalog/{}", id);

    match state.catalog_service.delete_vegetable(&id).await {
        Ok(()) => {
            let response = DeleteVegetableResponse {
                success_message: format!("Vegetable {} deleted", id),
                id,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("Failed to delete vegetable", e),
    }
}

pub async fn toggle_availability(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("POST /api/catalog/{}/toggle", id);

    match state.catalog_service.toggle_availability(&id).await {
        Ok(vegetable) => (StatusCode::OK, Json(VegetableMapper::to_dto(vegetable))).into_response(),
        Err(e) => error_response("Failed to toggle availability", e),
    }
}

pub async fn get_statistics(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/catalog/stats");

    match state.catalog_service.statistics().await {
        Ok(stats) => (StatusCode::OK, Json(VegetableMapper::to_stats_dto(stats))).into_response(),
        Err(e) => error_response("Failed to compute catalog statistics", e),
    }
}

pub async fn get_market_prices(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/catalog/prices");

    match state.catalog_service.market_prices().await {
        Ok(lines) => (StatusCode::OK, Json(VegetableMapper::to_price_list_dto(lines))).into_response(),
        Err(e) => error_response("Failed to list market prices", e),
    }
}

pub async fn export_catalog(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/catalog/export");

    match state.catalog_service.export_catalog().await {
        Ok(vegetables) => (StatusCode::OK, Json(VegetableMapper::to_list_dto(vegetables))).into_response(),
        Err(e) => error_response("Failed to export catalog", e),
    }
}

/// Replace the whole catalog; nothing is written if any entry is invalid
pub async fn import_catalog(
    State(state): State<AppState>,
    Json(request): Json<ImportCatalogRequest>,
) -> impl IntoResponse {
    info!("POST /api/catalog/import - {} vegetables", request.vegetables.len());

    let entries = request.vegetables.into_iter().map(VegetableMapper::to_import).collect();
    match state.catalog_service.import_catalog(entries).await {
        Ok(imported) => {
            let response = ImportCatalogResponse {
                imported,
                success_message: format!("Imported {} vegetables", imported),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("Failed to import catalog", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::rest::test_support::{read_json, send, setup_test_state, thursday_morning};
    use axum::http::Method;
    use serde_json::json;
    use shared::{CatalogStatsResponse, MarketPriceListResponse, Vegetable, VegetableCategory, VegetableListResponse};

    async fn setup_test_app() -> Router {
        let (state, _) = setup_test_state(thursday_morning(), 7).await;
        router().with_state(state)
    }

    #[tokio::test]
    async fn test_list_vegetables() {
        let app = setup_test_app().await;
        let response = send(&app, Method::GET, "/", None).await;

        assert_eq!(response.status(), StatusCode::OK);
        let list: VegetableListResponse = read_json(response).await;
        assert_eq!(list.vegetables.len(), 8);
        let ids: Vec<&str> = list.vegetables.iter().map(|v| v.id.as_str()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[tokio::test]
    async fn test_category_listing_honours_query() {
        let app = setup_test_app().await;

        let response = send(&app, Method::GET, "/category/leafy", None).await;
        let available: VegetableListResponse = read_json(response).await;
        assert!(available.vegetables.iter().all(|v| v.is_available));

        let response = send(&app, Method::GET, "/category/leafy?include_unavailable=true", None).await;
        let all: VegetableListResponse = read_json(response).await;
        assert_eq!(all.vegetables.len(), available.vegetables.len() + 1);
        assert!(all.vegetables.iter().all(|v| v.category == VegetableCategory::Leafy));

        let response = send(&app, Method::GET, "/category/fruity", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_get_and_delete_vegetable() {
        let app = setup_test_app().await;
        let body = json!({
            "name": "Organic Carrots!",
            "category": "root",
            "weight_per_value_point": 125,
            "market_price": 110
        });

        let response = send(&app, Method::POST, "/", Some(body)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created: Vegetable = read_json(response).await;
        assert_eq!(created.id, "organiccarrots");
        assert_eq!(created.base_value, 4);
        assert!(created.is_available);

        let response = send(&app, Method::GET, "/organiccarrots", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(&app, Method::DELETE, "/organiccarrots", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let response = send(&app, Method::GET, "/organiccarrots", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let response = send(&app, Method::DELETE, "/organiccarrots", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_vegetable() {
        let app = setup_test_app().await;
        let body = json!({
            "name": "   ",
            "category": "leafy",
            "weight_per_value_point": 100,
            "market_price": 90
        });

        let response = send(&app, Method::POST, "/", Some(body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_and_toggle() {
        let app = setup_test_app().await;

        let response = send(&app, Method::PUT, "/carrots", Some(json!({"market_price": 125}))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let updated: Vegetable = read_json(response).await;
        assert_eq!(updated.market_price, 125);
        assert_eq!(updated.id, "carrots");

        let response = send(&app, Method::POST, "/carrots/toggle", None).await;
        let toggled: Vegetable = read_json(response).await;
        assert!(!toggled.is_available);

        let response = send(&app, Method::PUT, "/missing", Some(json!({"market_price": 1}))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_stats_and_prices_cover_available_items() {
        let app = setup_test_app().await;

        let response = send(&app, Method::GET, "/stats", None).await;
        let stats: CatalogStatsResponse = read_json(response).await;
        assert_eq!(stats.total, 8);
        assert_eq!(stats.inactive, 1);
        assert_eq!(stats.active, 7);
        assert_eq!(
            stats.by_category.root + stats.by_category.leafy + stats.by_category.bushy,
            stats.active
        );

        let response = send(&app, Method::GET, "/prices", None).await;
        let prices: MarketPriceListResponse = read_json(response).await;
        assert_eq!(prices.prices.len(), 7);
        assert!(prices.prices.iter().all(|p| p.unit == "250g" && p.min_order_grams == 250));
    }

    #[tokio::test]
    async fn test_export_then_import_round_trip() {
        let app = setup_test_app().await;

        let response = send(&app, Method::GET, "/export", None).await;
        let exported: VegetableListResponse = read_json(response).await;
        let mut subset = exported.vegetables.clone();
        subset.truncate(3);

        let response = send(&app, Method::POST, "/import", Some(json!({ "vegetables": subset }))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let imported: ImportCatalogResponse = read_json(response).await;
        assert_eq!(imported.imported, 3);

        let response = send(&app, Method::GET, "/", None).await;
        let list: VegetableListResponse = read_json(response).await;
        assert_eq!(list.vegetables.len(), 3);
    }

    #[tokio::test]
    async fn test_import_with_invalid_entry_writes_nothing() {
        let app = setup_test_app().await;
        let bad = json!({
            "vegetables": [{
                "id": "broken",
                "name": "Broken",
                "category": "bushy",
                "base_value": 0,
                "weight_per_value_point": 100,
                "market_price": 100,
                "is_available": true,
                "created_at": "",
                "updated_at": ""
            }]
        });

        let response = send(&app, Method::POST, "/import", Some(bad)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(&app, Method::GET, "/", None).await;
        let list: VegetableListResponse = read_json(response).await;
        assert_eq!(list.vegetables.len(), 8);
    }
}
