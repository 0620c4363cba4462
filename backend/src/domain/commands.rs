//! Domain-level command and result types.
//!
//! Services take and return these; the REST layer maps the public DTOs in
//! the `shared` crate to and from them.

pub mod catalog {
    use serde::Deserialize;

    use crate::domain::models::Category;

    /// Input for creating a catalog entry. The id is derived from the name.
    #[derive(Debug, Clone)]
    pub struct CreateVegetableCommand {
        pub name: String,
        pub category: Category,
        /// Falls back to the category's conventional value
        pub base_value: Option<u32>,
        pub weight_per_value_point: u32,
        pub market_price: u32,
        pub is_available: Option<bool>,
    }

    /// Partial update; `None` leaves a field unchanged.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateVegetableCommand {
        pub name: Option<String>,
        pub category: Option<Category>,
        pub base_value: Option<u32>,
        pub weight_per_value_point: Option<u32>,
        pub market_price: Option<u32>,
        pub is_available: Option<bool>,
    }

    /// A full record with an explicit id, as found in seed files and exports.
    #[derive(Debug, Clone, Deserialize)]
    pub struct ImportVegetable {
        pub id: String,
        pub name: String,
        pub category: Category,
        pub base_value: u32,
        pub weight_per_value_point: u32,
        pub market_price: u32,
        #[serde(default = "default_available")]
        pub is_available: bool,
        #[serde(default)]
        pub created_at: Option<String>,
    }

    fn default_available() -> bool {
        true
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct CatalogStats {
        pub total: usize,
        pub active: usize,
        pub inactive: usize,
        /// Available items only, in `Category::ALL` order
        pub active_by_category: Vec<(Category, usize)>,
    }

    /// À la carte price of an available item
    #[derive(Debug, Clone, PartialEq)]
    pub struct MarketPriceLine {
        pub vegetable_id: String,
        pub name: String,
        pub category: Category,
        pub price: u32,
        pub unit: &'static str,
        pub min_order_grams: u32,
    }
}

pub mod weekly {
    use crate::domain::models::{PlanId, WeekId};

    #[derive(Debug, Clone, Default)]
    pub struct CustomizeSelectionCommand {
        pub remove: Vec<String>,
        pub add: Vec<String>,
    }

    /// Commit a week's selection to history; `week_id` defaults to the current week
    #[derive(Debug, Clone)]
    pub struct CommitWeekCommand {
        pub week_id: Option<WeekId>,
        pub plan: PlanId,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct CommitWeekResult {
        pub week_id: WeekId,
        pub vegetables: Vec<String>,
    }
}

pub mod allocation {
    use crate::domain::allocation::{AllocationLine, WeightBreakdown};

    #[derive(Debug, Clone)]
    pub struct AllocationCommand {
        pub budget: u32,
        pub vegetable_ids: Vec<String>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct AllocationResult {
        pub budget: u32,
        pub lines: Vec<AllocationLine>,
        /// Sum of line budgets, which may drift from `budget` by one unit per line
        pub allocated_total: u32,
        pub breakdown: WeightBreakdown,
    }
}
