//! # Storage Traits
//!
//! Persistence ports for the catalog and the weekly selection store. The
//! domain services hold these as trait objects so the in-memory and SQLite
//! backends can be swapped without touching the domain layer.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::{PlanId, Vegetable, WeekId, WeeklyHistory, WeeklySelection};

/// Catalog of vegetable records
#[async_trait]
pub trait CatalogStorage: Send + Sync {
    /// All records, available or not, ordered by id
    async fn list_vegetables(&self) -> Result<Vec<Vegetable>>;

    async fn get_vegetable(&self, id: &str) -> Result<Option<Vegetable>>;

    /// Insert or overwrite the record with the same id
    async fn upsert_vegetable(&self, vegetable: &Vegetable) -> Result<()>;

    /// Returns true if the record existed
    async fn delete_vegetable(&self, id: &str) -> Result<bool>;

    /// Drop every record and store `vegetables` in their place
    async fn replace_all(&self, vegetables: &[Vegetable]) -> Result<()>;
}

/// Committed weekly selections and the rolling history read by rotation
#[async_trait]
pub trait WeeklySelectionStorage: Send + Sync {
    async fn load_selection(&self, week_id: WeekId, plan: PlanId) -> Result<Option<WeeklySelection>>;

    /// Keyed by the selection's own week and plan; last write wins
    async fn save_selection(&self, selection: &WeeklySelection) -> Result<()>;

    async fn load_history(&self) -> Result<WeeklyHistory>;

    /// Record the ids used in a week, replacing any earlier entry for it
    async fn append_history(&self, week_id: WeekId, vegetable_ids: &[String]) -> Result<()>;
}
