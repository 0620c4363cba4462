//! # SQLite Storage
//!
//! A single `key_values` table holding JSON documents. Each repository owns
//! a key prefix:
//!
//! - `vegetable::{id}` - catalog records
//! - `weekly_selection::{week}::{plan}` - persisted selections
//! - `weekly_history::{week}` - ids committed for a week

pub mod catalog_repository;
pub mod connection;
pub mod weekly_repository;

pub use catalog_repository::CatalogRepository as SqliteCatalogRepository;
pub use connection::{DbConnection, DEFAULT_DATABASE_URL};
pub use weekly_repository::WeeklySelectionRepository as SqliteWeeklySelectionRepository;
