use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use super::connection::DbConnection;
use crate::domain::models::Vegetable;
use crate::storage::traits::CatalogStorage;

const VEGETABLE_PREFIX: &str = "vegetable::";

fn vegetable_key(id: &str) -> String {
    format!("{}{}", VEGETABLE_PREFIX, id)
}

/// Catalog records stored as JSON documents under `vegetable::{id}`
#[derive(Clone)]
pub struct CatalogRepository {
    db: DbConnection,
}

impl CatalogRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn encode(vegetable: &Vegetable) -> Result<String> {
        serde_json::to_string(vegetable)
            .with_context(|| format!("Failed to serialize vegetable {}", vegetable.id))
    }

    fn decode(key: &str, value: &str) -> Result<Vegetable> {
        serde_json::from_str(value).with_context(|| format!("Corrupt catalog record at {}", key))
    }
}

#[async_trait]
impl CatalogStorage for CatalogRepository {
    async fn list_vegetables(&self) -> Result<Vec<Vegetable>> {
        let rows = self.db.list_values_with_prefix(VEGETABLE_PREFIX).await?;
        debug!("Loaded {} catalog records", rows.len());
        rows.iter().map(|(key, value)| Self::decode(key, value)).collect()
    }

    async fn get_vegetable(&self, id: &str) -> Result<Option<Vegetable>> {
        let key = vegetable_key(id);
        match self.db.get_value(&key).await? {
            Some(value) => Ok(Some(Self::decode(&key, &value)?)),
            None => Ok(None),
        }
    }

    async fn upsert_vegetable(&self, vegetable: &Vegetable) -> Result<()> {
        self.db
            .put_value(&vegetable_key(&vegetable.id), &Self::encode(vegetable)?)
            .await
    }

    async fn delete_vegetable(&self, id: &str) -> Result<bool> {
        self.db.delete_value(&vegetable_key(id)).await
    }

    async fn replace_all(&self, vegetables: &[Vegetable]) -> Result<()> {
        let entries = vegetables
            .iter()
            .map(|v| Ok((vegetable_key(&v.id), Self::encode(v)?)))
            .collect::<Result<Vec<_>>>()?;
        self.db.replace_prefix(VEGETABLE_PREFIX, &entries).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Category;

    async fn setup_test() -> CatalogRepository {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        CatalogRepository::new(db)
    }

    fn veg(id: &str, category: Category) -> Vegetable {
        Vegetable {
            id: id.to_string(),
            name: format!("Fresh {}", id),
            category,
            base_value: category.default_base_value(),
            weight_per_value_point: 100,
            market_price: 120,
            is_available: true,
            created_at: "2024-06-01T09:00:00".to_string(),
            updated_at: "2024-06-01T09:00:00".to_string(),
        }
    }

    #[tokio::test]
    async fn test_upsert_get_and_list() {
        let repo = setup_test().await;
        repo.upsert_vegetable(&veg("radish", Category::Root)).await.expect("Failed to store");
        repo.upsert_vegetable(&veg("kankun", Category::Leafy)).await.expect("Failed to store");

        let fetched = repo.get_vegetable("radish").await.expect("Failed to get").unwrap();
        assert_eq!(fetched, veg("radish", Category::Root));

        let mut updated = fetched.clone();
        updated.is_available = false;
        repo.upsert_vegetable(&updated).await.expect("Failed to update");
        assert!(!repo.get_vegetable("radish").await.unwrap().unwrap().is_available);

        let ids: Vec<String> = repo.list_vegetables().await.unwrap().into_iter().map(|v| v.id).collect();
        assert_eq!(ids, vec!["kankun", "radish"]);
    }

    #[tokio::test]
    async fn test_delete_and_replace_all() {
        let repo = setup_test().await;
        repo.upsert_vegetable(&veg("radish", Category::Root)).await.unwrap();

        assert!(repo.delete_vegetable("radish").await.unwrap());
        assert!(!repo.delete_vegetable("radish").await.unwrap());
        assert!(repo.get_vegetable("radish").await.unwrap().is_none());

        repo.upsert_vegetable(&veg("stale", Category::Bushy)).await.unwrap();
        repo.replace_all(&[veg("beans", Category::Bushy), veg("leeks", Category::Leafy)])
            .await
            .expect("Failed to replace catalog");
        let ids: Vec<String> = repo.list_vegetables().await.unwrap().into_iter().map(|v| v.id).collect();
        assert_eq!(ids, vec!["beans", "leeks"]);
    }
}
