//! # Storage Module
//!
//! Persistence for the catalog and weekly selections. The domain layer only
//! sees the traits; `memory` backs tests and `sqlite` backs the server.

pub mod memory;
pub mod sqlite;
pub mod traits;

pub use memory::InMemoryStore;
pub use sqlite::{DbConnection, SqliteCatalogRepository, SqliteWeeklySelectionRepository};
pub use traits::{CatalogStorage, WeeklySelectionStorage};
