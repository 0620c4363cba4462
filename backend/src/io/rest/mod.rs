//! # REST API Interface Layer
//!
//! HTTP endpoints for the vegetable box service, all nested under `/api`:
//!
//! - `/api/catalog`: catalog listing, CRUD, stats, prices, export/import
//! - `/api/plans`, `/api/window`: plan tiers and customization window status
//! - `/api/weekly`: per-plan weekly selections, customization, commit, history
//! - `/api/allocation`: ad-hoc budget allocation
//!
//! Handlers log the request, translate DTOs through the mappers, and turn
//! domain errors into status codes: missing resources are 404, rule
//! violations 400, a closed window 409, and storage failures 500.

pub mod allocation_apis;
pub mod catalog_apis;
pub mod mappers;
pub mod plan_apis;
pub mod weekly_apis;
