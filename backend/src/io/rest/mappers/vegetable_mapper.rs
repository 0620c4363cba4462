use shared::{
    CatalogStatsResponse, CategoryCounts, CreateVegetableRequest, MarketPrice, MarketPriceListResponse,
    UpdateVegetableRequest, Vegetable as SharedVegetable, VegetableCategory, VegetableListResponse,
};

use crate::domain::commands::catalog::{
    CatalogStats, CreateVegetableCommand, ImportVegetable, MarketPriceLine, UpdateVegetableCommand,
};
use crate::domain::models::{Category, Vegetable as DomainVegetable};

/// Mapper between the shared catalog DTOs and domain types
pub struct VegetableMapper;

impl VegetableMapper {
    pub fn category_to_dto(category: Category) -> VegetableCategory {
        match category {
            Category::Root => VegetableCategory::Root,
            Category::Leafy => VegetableCategory::Leafy,
            Category::Bushy => VegetableCategory::Bushy,
        }
    }

    pub fn category_to_domain(category: VegetableCategory) -> Category {
        match category {
            VegetableCategory::Root => Category::Root,
            VegetableCategory::Leafy => Category::Leafy,
            VegetableCategory::Bushy => Category::Bushy,
        }
    }

    pub fn to_dto(domain: DomainVegetable) -> SharedVegetable {
        SharedVegetable {
            id: domain.id,
            name: domain.name,
            category: Self::category_to_dto(domain.category),
            base_value: domain.base_value,
            weight_per_value_point: domain.weight_per_value_point,
            market_price: domain.market_price,
            is_available: domain.is_available,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }

    pub fn to_list_dto(domain: Vec<DomainVegetable>) -> VegetableListResponse {
        VegetableListResponse {
            vegetables: domain.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_create_command(request: CreateVegetableRequest) -> CreateVegetableCommand {
        CreateVegetableCommand {
            name: request.name,
            category: Self::category_to_domain(request.category),
            base_value: request.base_value,
            weight_per_value_point: request.weight_per_value_point,
            market_price: request.market_price,
            is_available: request.is_available,
        }
    }

    pub fn to_update_command(request: UpdateVegetableRequest) -> UpdateVegetableCommand {
        UpdateVegetableCommand {
            name: request.name,
            category: request.category.map(Self::category_to_domain),
            base_value: request.base_value,
            weight_per_value_point: request.weight_per_value_point,
            market_price: request.market_price,
            is_available: request.is_available,
        }
    }

    /// Exported records come back in as imports; `updated_at` is restamped
    pub fn to_import(dto: SharedVegetable) -> ImportVegetable {
        ImportVegetable {
            id: dto.id,
            name: dto.name,
            category: Self::category_to_domain(dto.category),
            base_value: dto.base_value,
            weight_per_value_point: dto.weight_per_value_point,
            market_price: dto.market_price,
            is_available: dto.is_available,
            created_at: Some(dto.created_at).filter(|s| !s.is_empty()),
        }
    }

    pub fn to_stats_dto(stats: CatalogStats) -> CatalogStatsResponse {
        let mut by_category = CategoryCounts::default();
        for (category, count) in stats.active_by_category {
            match category {
                Category::Root => by_category.root = count,
                Category::Leafy => by_category.leafy = count,
                Category::Bushy => by_category.bushy = count,
            }
        }
        CatalogStatsResponse {
            total: stats.total,
            active: stats.active,
            inactive: stats.inactive,
            by_category,
        }
    }

    pub fn to_price_list_dto(lines: Vec<MarketPriceLine>) -> MarketPriceListResponse {
        MarketPriceListResponse {
            prices: lines
                .into_iter()
                .map(|line| MarketPrice {
                    vegetable_id: line.vegetable_id,
                    name: line.name,
                    category: Self::category_to_dto(line.category),
                    price: line.price,
                    unit: line.unit.to_string(),
                    min_order_grams: line.min_order_grams,
                })
                .collect(),
        }
    }
}
