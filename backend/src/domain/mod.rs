//! # Domain Module
//!
//! The allocation and weekly-rotation engine plus the services that run it
//! against storage.
//!
//! ## Module Organization
//!
//! - **allocation**: budget and weight split over a selection (pure)
//! - **weekly_window**: customization window state machine (pure)
//! - **rotation**: category-balanced, recency-aware weekly selection (pure)
//! - **weekly_planner**: plan lookup, selection wrapping, customization rules
//! - **catalog_service**: admin catalog operations
//! - **allocation_service**: allocation against the stored catalog
//! - **weekly_selection_service**: persisted weekly selections and history
//!
//! The pure modules take the clock reading and random source as arguments
//! and never touch storage; services inject both.

pub mod allocation;
pub mod allocation_service;
pub mod catalog_service;
pub mod clock;
pub mod commands;
pub mod errors;
pub mod models;
pub mod rotation;
pub mod weekly_planner;
pub mod weekly_selection_service;
pub mod weekly_window;

pub use allocation_service::AllocationService;
pub use catalog_service::CatalogService;
pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::{CatalogError, SelectionError};
pub use rotation::RotationSelector;
pub use weekly_planner::WeeklyPlanner;
pub use weekly_selection_service::WeeklySelectionService;
pub use weekly_window::{WeeklyWindow, WindowRule, WindowState, WindowStatus};
