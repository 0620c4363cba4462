//! In-memory storage, used by tests and when no database is configured.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::traits::{CatalogStorage, WeeklySelectionStorage};
use crate::domain::models::{PlanId, Vegetable, WeekId, WeeklyHistory, WeeklySelection};

#[derive(Clone, Default)]
pub struct InMemoryStore {
    vegetables: Arc<RwLock<BTreeMap<String, Vegetable>>>,
    selections: Arc<RwLock<HashMap<(WeekId, PlanId), WeeklySelection>>>,
    history: Arc<RwLock<WeeklyHistory>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStorage for InMemoryStore {
    async fn list_vegetables(&self) -> Result<Vec<Vegetable>> {
        let vegetables = self.vegetables.read().await;
        Ok(vegetables.values().cloned().collect())
    }

    async fn get_vegetable(&self, id: &str) -> Result<Option<Vegetable>> {
        let vegetables = self.vegetables.read().await;
        Ok(vegetables.get(id).cloned())
    }

    async fn upsert_vegetable(&self, vegetable: &Vegetable) -> Result<()> {
        let mut vegetables = self.vegetables.write().await;
        vegetables.insert(vegetable.id.clone(), vegetable.clone());
        Ok(())
    }

    async fn delete_vegetable(&self, id: &str) -> Result<bool> {
        let mut vegetables = self.vegetables.write().await;
        Ok(vegetables.remove(id).is_some())
    }

    async fn replace_all(&self, replacement: &[Vegetable]) -> Result<()> {
        let mut vegetables = self.vegetables.write().await;
        *vegetables = replacement.iter().map(|v| (v.id.clone(), v.clone())).collect();
        Ok(())
    }
}

#[async_trait]
impl WeeklySelectionStorage for InMemoryStore {
    async fn load_selection(&self, week_id: WeekId, plan: PlanId) -> Result<Option<WeeklySelection>> {
        let selections = self.selections.read().await;
        Ok(selections.get(&(week_id, plan)).cloned())
    }

    async fn save_selection(&self, selection: &WeeklySelection) -> Result<()> {
        let mut selections = self.selections.write().await;
        selections.insert((selection.week_id, selection.plan), selection.clone());
        Ok(())
    }

    async fn load_history(&self) -> Result<WeeklyHistory> {
        let history = self.history.read().await;
        Ok(history.clone())
    }

    async fn append_history(&self, week_id: WeekId, vegetable_ids: &[String]) -> Result<()> {
        let mut history = self.history.write().await;
        history.record(week_id, vegetable_ids.to_vec());
        Ok(())
    }
}
