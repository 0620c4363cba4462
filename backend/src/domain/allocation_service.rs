use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use super::allocation::{allocate, weight_breakdown_by_category};
use super::commands::allocation::{AllocationCommand, AllocationResult};
use super::models::Vegetable;
use crate::storage::CatalogStorage;

/// Runs the allocation calculator against a fresh catalog snapshot
#[derive(Clone)]
pub struct AllocationService {
    catalog: Arc<dyn CatalogStorage>,
}

impl AllocationService {
    pub fn new(catalog: Arc<dyn CatalogStorage>) -> Self {
        Self { catalog }
    }

    pub async fn catalog_snapshot(&self) -> anyhow::Result<HashMap<String, Vegetable>> {
        let vegetables = self.catalog.list_vegetables().await?;
        Ok(vegetables.into_iter().map(|v| (v.id.clone(), v)).collect())
    }

    pub async fn allocate(&self, command: AllocationCommand) -> anyhow::Result<AllocationResult> {
        info!(
            "Allocating budget {} over {} vegetables",
            command.budget,
            command.vegetable_ids.len()
        );
        let catalog = self.catalog_snapshot().await?;
        Ok(Self::allocate_with(&catalog, command))
    }

    /// Allocation over an already loaded catalog
    pub fn allocate_with(catalog: &HashMap<String, Vegetable>, command: AllocationCommand) -> AllocationResult {
        let lines = allocate(command.budget, &command.vegetable_ids, catalog);
        let breakdown = weight_breakdown_by_category(&command.vegetable_ids, catalog);
        let allocated_total = lines.iter().fold(0u32, |total, l| total.saturating_add(l.allocated_budget));

        AllocationResult {
            budget: command.budget,
            lines,
            allocated_total,
            breakdown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Category;
    use crate::storage::InMemoryStore;

    fn veg(id: &str, category: Category, base_value: u32, wpvp: u32) -> Vegetable {
        Vegetable {
            id: id.to_string(),
            name: id.to_string(),
            category,
            base_value,
            weight_per_value_point: wpvp,
            market_price: 100,
            is_available: true,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    async fn setup_test() -> AllocationService {
        let store = Arc::new(InMemoryStore::new());
        store
            .replace_all(&[
                veg("carrot", Category::Root, 4, 125),
                veg("gotukola", Category::Leafy, 2, 100),
                veg("bandakka", Category::Bushy, 3, 100),
            ])
            .await
            .expect("Failed to seed catalog");
        AllocationService::new(store)
    }

    #[tokio::test]
    async fn test_allocate_against_stored_catalog() {
        let service = setup_test().await;
        let result = service
            .allocate(AllocationCommand {
                budget: 4000,
                vegetable_ids: vec!["carrot".into(), "gotukola".into(), "bandakka".into(), "ghost".into()],
            })
            .await
            .expect("Failed to allocate");

        assert_eq!(result.lines.len(), 3);
        assert_eq!(result.allocated_total, 4000);
        assert_eq!(result.breakdown.total_weight, 1000);
        assert_eq!(result.breakdown.category(Category::Root).weight, 500);
    }

    #[test]
    fn test_allocated_total_saturates_at_budget_limit() {
        let catalog: HashMap<String, Vegetable> = [
            veg("a", Category::Root, u32::MAX, u32::MAX),
            veg("b", Category::Leafy, u32::MAX, u32::MAX),
        ]
        .into_iter()
        .map(|v| (v.id.clone(), v))
        .collect();

        let result = AllocationService::allocate_with(
            &catalog,
            AllocationCommand {
                budget: u32::MAX,
                vegetable_ids: vec!["a".into(), "b".into()],
            },
        );
        assert_eq!(result.lines.len(), 2);
        assert_eq!(result.allocated_total, u32::MAX);
        assert_eq!(result.breakdown.total_weight, u32::MAX);
    }

    #[tokio::test]
    async fn test_allocate_empty_selection() {
        let service = setup_test().await;
        let result = service
            .allocate(AllocationCommand {
                budget: 1000,
                vegetable_ids: vec![],
            })
            .await
            .unwrap();
        assert!(result.lines.is_empty());
        assert_eq!(result.allocated_total, 0);
        assert_eq!(result.breakdown.total_weight, 0);
    }
}
