//! # Veggie Box Backend
//!
//! Allocation and weekly rotation engine for a vegetable subscription box.
//!
//! The backend brings together:
//! - **Domain**: budget allocation, balanced rotation, the customization
//!   window, and the services that run them
//! - **Storage**: catalog and weekly selection persistence (SQLite or in-memory)
//! - **IO**: the REST interface consumed by the web frontend
//! - **Config**: YAML settings for the server, plans, and rotation
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST API, mappers)
//!     ↓
//! Domain Layer (engines, services)
//!     ↓
//! Storage Layer (SQLite key-value documents)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use std::sync::Arc;

use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use rand::{rngs::StdRng, SeedableRng};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::{load_catalog_seed, AppConfig};
use crate::domain::{
    AllocationService, CatalogService, Clock, RotationSelector, SystemClock, WeeklyPlanner,
    WeeklySelectionService, WeeklyWindow,
};
use crate::io::rest::{allocation_apis, catalog_apis, plan_apis, weekly_apis};
use crate::storage::{
    CatalogStorage, DbConnection, SqliteCatalogRepository, SqliteWeeklySelectionRepository,
    WeeklySelectionStorage,
};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub catalog_service: CatalogService,
    pub allocation_service: AllocationService,
    pub weekly_service: WeeklySelectionService,
}

impl AppState {
    /// Wire the services over the given storage, clock, and random source
    pub fn from_parts(
        catalog: Arc<dyn CatalogStorage>,
        selections: Arc<dyn WeeklySelectionStorage>,
        planner: WeeklyPlanner,
        clock: Arc<dyn Clock>,
        rng: StdRng,
    ) -> Self {
        Self {
            catalog_service: CatalogService::new(catalog.clone(), clock.clone()),
            allocation_service: AllocationService::new(catalog.clone()),
            weekly_service: WeeklySelectionService::new(catalog, selections, planner, clock, rng),
        }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up database at {}", config.database.url);
    let db_conn = DbConnection::new(&config.database.url).await?;
    let catalog: Arc<dyn CatalogStorage> = Arc::new(SqliteCatalogRepository::new(db_conn.clone()));
    let selections: Arc<dyn WeeklySelectionStorage> = Arc::new(SqliteWeeklySelectionRepository::new(db_conn));

    info!("Setting up domain model");
    let planner = WeeklyPlanner::new(
        WeeklyWindow::new(config.window.rule),
        RotationSelector::new(config.rotation.lookback_weeks),
        config.plans.clone(),
    );
    info!(
        "Window rule {:?}, rotation lookback {} weeks",
        planner.window().rule(),
        config.rotation.lookback_weeks
    );

    info!("Setting up application state");
    let app_state = AppState::from_parts(
        catalog,
        selections,
        planner,
        Arc::new(SystemClock),
        StdRng::from_entropy(),
    );

    if let Some(seed_file) = &config.catalog.seed_file {
        let entries = load_catalog_seed(seed_file)?;
        let seeded = app_state.catalog_service.seed_if_empty(entries).await?;
        if seeded > 0 {
            info!("Seeded catalog with {} vegetables", seeded);
        }
    }

    Ok(app_state)
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, allowed_origin: &str) -> Router {
    // CORS setup to allow the frontend to make requests
    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);
    match allowed_origin.parse::<HeaderValue>() {
        Ok(origin) => cors = cors.allow_origin(origin),
        Err(e) => warn!("Ignoring invalid CORS origin {:?}: {}", allowed_origin, e),
    }

    let api_routes = Router::new()
        .nest("/catalog", catalog_apis::router())
        .nest("/weekly", weekly_apis::router())
        .nest("/allocation", allocation_apis::router())
        .merge(plan_apis::router());

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
