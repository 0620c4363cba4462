use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Vegetable category used for value weighting and balanced rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VegetableCategory {
    /// Grows underground (carrots, radish, sweet potato)
    Root,
    /// Light leafy greens (gotukola, mukunuwenna, kankun)
    Leafy,
    /// Grows on bushes or vines (okra, eggplant, beans)
    Bushy,
}

impl fmt::Display for VegetableCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VegetableCategory::Root => "root",
            VegetableCategory::Leafy => "leafy",
            VegetableCategory::Bushy => "bushy",
        };
        write!(f, "{}", name)
    }
}

/// Catalog entry as exposed to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vegetable {
    /// Stable identifier, derived from the name on creation
    pub id: String,
    pub name: String,
    pub category: VegetableCategory,
    /// Value points used for budget allocation
    pub base_value: u32,
    /// Grams of product represented by one value point
    pub weight_per_value_point: u32,
    /// Price per 250g reference unit
    pub market_price: u32,
    pub is_available: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VegetableListResponse {
    pub vegetables: Vec<Vegetable>,
}

/// Request for creating a catalog entry. `base_value` defaults to the category convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateVegetableRequest {
    pub name: String,
    pub category: VegetableCategory,
    pub base_value: Option<u32>,
    pub weight_per_value_point: u32,
    pub market_price: u32,
    pub is_available: Option<bool>,
}

/// Partial update of a catalog entry; absent fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateVegetableRequest {
    pub name: Option<String>,
    pub category: Option<VegetableCategory>,
    pub base_value: Option<u32>,
    pub weight_per_value_point: Option<u32>,
    pub market_price: Option<u32>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteVegetableResponse {
    pub id: String,
    pub success_message: String,
}

/// Counts of available items per category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub root: usize,
    pub leafy: usize,
    pub bushy: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogStatsResponse {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub by_category: CategoryCounts,
}

/// À la carte price line for an available vegetable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketPrice {
    pub vegetable_id: String,
    pub name: String,
    pub category: VegetableCategory,
    pub price: u32,
    pub unit: String,
    pub min_order_grams: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketPriceListResponse {
    pub prices: Vec<MarketPrice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportCatalogRequest {
    pub vegetables: Vec<Vegetable>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportCatalogResponse {
    pub imported: usize,
    pub success_message: String,
}

/// Ad-hoc allocation of a budget over a set of vegetable ids. `budget` must be positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRequest {
    pub budget: u32,
    pub vegetable_ids: Vec<String>,
}

/// Per-item share of a budget and its derived weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationLine {
    pub vegetable_id: String,
    pub name: String,
    pub category: VegetableCategory,
    pub allocated_budget: u32,
    /// Grams
    pub allocated_weight: u32,
    /// 0-100, rounded per line
    pub value_percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeight {
    pub category: VegetableCategory,
    pub count: usize,
    pub weight: u32,
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightBreakdown {
    pub categories: Vec<CategoryWeight>,
    pub total_weight: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationResponse {
    pub budget: u32,
    pub lines: Vec<AllocationLine>,
    /// Sum of the per-line budgets; may drift from `budget` by one unit per line
    pub allocated_total: u32,
    pub breakdown: WeightBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeRemaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub is_expired: bool,
}

/// Snapshot of the weekly customization window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowStatusResponse {
    pub is_open: bool,
    /// Local timestamp, `YYYY-MM-DDTHH:MM:SS.sss`
    pub deadline: String,
    pub time_remaining: TimeRemaining,
    pub next_opening: String,
    pub delivery_date: String,
}

/// Plan tier identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    Small,
    Medium,
    Large,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanTier,
    pub name: String,
    pub vegetable_count: usize,
    pub monthly_price: u32,
    pub vegetable_budget: u32,
    pub handling_fee: u32,
    pub min_count: usize,
    pub max_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanListResponse {
    pub plans: Vec<Plan>,
}

/// Committed or candidate set of vegetables for one week and plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySelection {
    /// `YYYY-WW`
    pub week_id: String,
    pub plan: PlanTier,
    /// Monday of the week (`YYYY-MM-DD`)
    pub start_date: String,
    /// Sunday of the week (`YYYY-MM-DD`)
    pub end_date: String,
    pub vegetables: Vec<String>,
    pub is_customization_open: bool,
    pub customization_deadline: String,
    pub delivery_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomizeSelectionRequest {
    #[serde(default)]
    pub remove: Vec<String>,
    #[serde(default)]
    pub add: Vec<String>,
}

/// Commit a plan's stored selection to history; `week_id` defaults to the current week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitWeekRequest {
    #[serde(default)]
    pub week_id: Option<String>,
    pub plan: PlanTier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitWeekResponse {
    pub week_id: String,
    pub vegetables: Vec<String>,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyHistoryResponse {
    pub weeks: BTreeMap<String, Vec<String>>,
}
