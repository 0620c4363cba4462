use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::{info, warn};

use super::clock::Clock;
use super::commands::catalog::{
    CatalogStats, CreateVegetableCommand, ImportVegetable, MarketPriceLine, UpdateVegetableCommand,
};
use super::errors::CatalogError;
use super::models::{Category, Vegetable, VegetableValidationError};
use crate::storage::CatalogStorage;

/// Reference unit for market prices
pub const PRICE_UNIT: &str = "250g";
pub const MIN_ORDER_GRAMS: u32 = 250;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Admin operations on the vegetable catalog plus the read queries the
/// weekly engine depends on
#[derive(Clone)]
pub struct CatalogService {
    storage: Arc<dyn CatalogStorage>,
    clock: Arc<dyn Clock>,
}

impl CatalogService {
    pub fn new(storage: Arc<dyn CatalogStorage>, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    fn timestamp(&self) -> String {
        self.clock.now().format(TIMESTAMP_FORMAT).to_string()
    }

    pub async fn list_vegetables(&self) -> Result<Vec<Vegetable>, CatalogError> {
        let vegetables = self.storage.list_vegetables().await?;
        info!("Found {} vegetables", vegetables.len());
        Ok(vegetables)
    }

    pub async fn list_available(&self) -> Result<Vec<Vegetable>, CatalogError> {
        let vegetables: Vec<Vegetable> = self
            .storage
            .list_vegetables()
            .await?
            .into_iter()
            .filter(|v| v.is_available)
            .collect();
        info!("Found {} available vegetables", vegetables.len());
        Ok(vegetables)
    }

    pub async fn list_by_category(
        &self,
        category: Category,
        include_unavailable: bool,
    ) -> Result<Vec<Vegetable>, CatalogError> {
        let vegetables: Vec<Vegetable> = self
            .storage
            .list_vegetables()
            .await?
            .into_iter()
            .filter(|v| v.category == category && (include_unavailable || v.is_available))
            .collect();
        info!(
            "Found {} vegetables in category {} (include_unavailable: {})",
            vegetables.len(),
            category,
            include_unavailable
        );
        Ok(vegetables)
    }

    pub async fn get_vegetable(&self, id: &str) -> Result<Option<Vegetable>, CatalogError> {
        let vegetable = self.storage.get_vegetable(id).await?;
        if vegetable.is_none() {
            warn!("Vegetable not found: {}", id);
        }
        Ok(vegetable)
    }

    async fn require(&self, id: &str) -> Result<Vegetable, CatalogError> {
        self.storage
            .get_vegetable(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    /// Create a record. The id is the name's lowercase alphanumerics
    /// (at most 20), with `1`, `2`, ... appended on collision.
    pub async fn create_vegetable(&self, command: CreateVegetableCommand) -> Result<Vegetable, CatalogError> {
        info!("Creating vegetable: name={}, category={}", command.name, command.category);

        let name = command.name.trim().to_string();
        if name.is_empty() {
            return Err(VegetableValidationError::EmptyName.into());
        }
        let base = Vegetable::id_base(&name);
        if base.is_empty() {
            return Err(VegetableValidationError::NameWithoutId.into());
        }

        let taken: HashSet<String> = self
            .storage
            .list_vegetables()
            .await?
            .into_iter()
            .map(|v| v.id)
            .collect();
        let mut id = base.clone();
        let mut counter = 1;
        while taken.contains(&id) {
            id = format!("{}{}", base, counter);
            counter += 1;
        }

        let now = self.timestamp();
        let vegetable = Vegetable {
            id,
            name,
            category: command.category,
            base_value: command
                .base_value
                .unwrap_or_else(|| command.category.default_base_value()),
            weight_per_value_point: command.weight_per_value_point,
            market_price: command.market_price,
            is_available: command.is_available.unwrap_or(true),
            created_at: now.clone(),
            updated_at: now,
        };
        vegetable.validate()?;

        self.storage.upsert_vegetable(&vegetable).await?;
        info!("Created vegetable {} with ID: {}", vegetable.name, vegetable.id);
        Ok(vegetable)
    }

    /// Apply the fields present in `command`; the id never changes
    pub async fn update_vegetable(
        &self,
        id: &str,
        command: UpdateVegetableCommand,
    ) -> Result<Vegetable, CatalogError> {
        info!("Updating vegetable: {}", id);
        let mut vegetable = self.require(id).await?;

        if let Some(name) = command.name {
            vegetable.name = name.trim().to_string();
        }
        if let Some(category) = command.category {
            vegetable.category = category;
        }
        if let Some(base_value) = command.base_value {
            vegetable.base_value = base_value;
        }
        if let Some(wpvp) = command.weight_per_value_point {
            vegetable.weight_per_value_point = wpvp;
        }
        if let Some(price) = command.market_price {
            vegetable.market_price = price;
        }
        if let Some(available) = command.is_available {
            vegetable.is_available = available;
        }
        vegetable.validate()?;
        vegetable.updated_at = self.timestamp();

        self.storage.upsert_vegetable(&vegetable).await?;
        info!("Updated vegetable: {}", id);
        Ok(vegetable)
    }

    pub async fn delete_vegetable(&self, id: &str) -> Result<(), CatalogError> {
        info!("Deleting vegetable: {}", id);
        if !self.storage.delete_vegetable(id).await? {
            warn!("Cannot delete missing vegetable: {}", id);
            return Err(CatalogError::NotFound(id.to_string()));
        }
        Ok(())
    }

    pub async fn toggle_availability(&self, id: &str) -> Result<Vegetable, CatalogError> {
        let mut vegetable = self.require(id).await?;
        vegetable.is_available = !vegetable.is_available;
        vegetable.updated_at = self.timestamp();
        self.storage.upsert_vegetable(&vegetable).await?;

        info!("Toggled {} availability to {}", id, vegetable.is_available);
        Ok(vegetable)
    }

    pub async fn statistics(&self) -> Result<CatalogStats, CatalogError> {
        let all = self.storage.list_vegetables().await?;
        let active: Vec<&Vegetable> = all.iter().filter(|v| v.is_available).collect();

        let active_by_category = Category::ALL
            .iter()
            .map(|c| (*c, active.iter().filter(|v| v.category == *c).count()))
            .collect();

        Ok(CatalogStats {
            total: all.len(),
            active: active.len(),
            inactive: all.len() - active.len(),
            active_by_category,
        })
    }

    /// À la carte prices of available items
    pub async fn market_prices(&self) -> Result<Vec<MarketPriceLine>, CatalogError> {
        let prices = self
            .list_available()
            .await?
            .into_iter()
            .map(|v| MarketPriceLine {
                vegetable_id: v.id,
                name: v.name,
                category: v.category,
                price: v.market_price,
                unit: PRICE_UNIT,
                min_order_grams: MIN_ORDER_GRAMS,
            })
            .collect();
        Ok(prices)
    }

    pub async fn export_catalog(&self) -> Result<Vec<Vegetable>, CatalogError> {
        self.list_vegetables().await
    }

    /// Replace the whole catalog. Every record is validated before anything
    /// is written; a repeated id keeps its last occurrence.
    pub async fn import_catalog(&self, entries: Vec<ImportVegetable>) -> Result<usize, CatalogError> {
        info!("Importing {} vegetables", entries.len());
        let now = self.timestamp();

        let mut by_id: BTreeMap<String, Vegetable> = BTreeMap::new();
        for entry in entries {
            if entry.id.trim().is_empty() {
                return Err(CatalogError::Invalid(format!("Vegetable {} has an empty id", entry.name)));
            }
            let vegetable = Vegetable {
                id: entry.id,
                name: entry.name,
                category: entry.category,
                base_value: entry.base_value,
                weight_per_value_point: entry.weight_per_value_point,
                market_price: entry.market_price,
                is_available: entry.is_available,
                created_at: entry.created_at.unwrap_or_else(|| now.clone()),
                updated_at: now.clone(),
            };
            vegetable
                .validate()
                .map_err(|e| CatalogError::Invalid(format!("{}: {}", vegetable.id, e)))?;
            by_id.insert(vegetable.id.clone(), vegetable);
        }

        let vegetables: Vec<Vegetable> = by_id.into_values().collect();
        self.storage.replace_all(&vegetables).await?;
        info!("Imported {} vegetables", vegetables.len());
        Ok(vegetables.len())
    }

    /// Import `entries` only when the catalog is empty. Returns how many
    /// records were written.
    pub async fn seed_if_empty(&self, entries: Vec<ImportVegetable>) -> Result<usize, CatalogError> {
        if !self.storage.list_vegetables().await?.is_empty() {
            info!("Catalog already populated, skipping seed");
            return Ok(0);
        }
        self.import_catalog(entries).await
    }
}
