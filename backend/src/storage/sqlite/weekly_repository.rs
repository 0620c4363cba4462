use anyhow::{Context, Result};
use async_trait::async_trait;

use super::connection::DbConnection;
use crate::domain::models::{PlanId, WeekId, WeeklyHistory, WeeklySelection};
use crate::storage::traits::WeeklySelectionStorage;

const SELECTION_PREFIX: &str = "weekly_selection::";
const HISTORY_PREFIX: &str = "weekly_history::";

fn selection_key(week_id: WeekId, plan: PlanId) -> String {
    format!("{}{}::{}", SELECTION_PREFIX, week_id, plan)
}

fn history_key(week_id: WeekId) -> String {
    format!("{}{}", HISTORY_PREFIX, week_id)
}

/// Weekly selections under `weekly_selection::{week}::{plan}` and history
/// entries under `weekly_history::{week}`, both as JSON
#[derive(Clone)]
pub struct WeeklySelectionRepository {
    db: DbConnection,
}

impl WeeklySelectionRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WeeklySelectionStorage for WeeklySelectionRepository {
    async fn load_selection(&self, week_id: WeekId, plan: PlanId) -> Result<Option<WeeklySelection>> {
        let key = selection_key(week_id, plan);
        match self.db.get_value(&key).await? {
            Some(value) => {
                let selection = serde_json::from_str(&value)
                    .with_context(|| format!("Corrupt weekly selection at {}", key))?;
                Ok(Some(selection))
            }
            None => Ok(None),
        }
    }

    async fn save_selection(&self, selection: &WeeklySelection) -> Result<()> {
        let value = serde_json::to_string(selection).context("Failed to serialize weekly selection")?;
        self.db
            .put_value(&selection_key(selection.week_id, selection.plan), &value)
            .await
    }

    async fn load_history(&self) -> Result<WeeklyHistory> {
        let rows = self.db.list_values_with_prefix(HISTORY_PREFIX).await?;
        rows.iter()
            .map(|(key, value)| {
                let week_id: WeekId = key[HISTORY_PREFIX.len()..]
                    .parse()
                    .with_context(|| format!("Bad history key {}", key))?;
                let ids: Vec<String> = serde_json::from_str(value)
                    .with_context(|| format!("Corrupt history entry at {}", key))?;
                Ok((week_id, ids))
            })
            .collect()
    }

    async fn append_history(&self, week_id: WeekId, vegetable_ids: &[String]) -> Result<()> {
        let value = serde_json::to_string(vegetable_ids)?;
        self.db.put_value(&history_key(week_id), &value).await
    }
}
