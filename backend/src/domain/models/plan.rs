use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Subscription tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanId {
    Small,
    Medium,
    Large,
}

impl PlanId {
    pub const ALL: [PlanId; 3] = [PlanId::Small, PlanId::Medium, PlanId::Large];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanId::Small => "small",
            PlanId::Medium => "medium",
            PlanId::Large => "large",
        }
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "small" => Ok(PlanId::Small),
            "medium" => Ok(PlanId::Medium),
            "large" => Ok(PlanId::Large),
            _ => Err(format!("Unknown plan: {}", s)),
        }
    }
}

/// Pricing and sizing of a plan tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanConfig {
    pub name: String,
    /// Distinct vegetables in the weekly bucket
    pub vegetable_count: usize,
    pub monthly_price: u32,
    /// Share of the price allocated across vegetables
    pub vegetable_budget: u32,
    pub handling_fee: u32,
    /// Allowed bucket size while customizing
    pub min_count: usize,
    pub max_count: usize,
}

impl PlanConfig {
    pub fn allows_count(&self, count: usize) -> bool {
        count >= self.min_count && count <= self.max_count
    }
}

/// Plan id to configuration lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanTable(BTreeMap<PlanId, PlanConfig>);

impl PlanTable {
    pub fn new(plans: BTreeMap<PlanId, PlanConfig>) -> Self {
        Self(plans)
    }

    pub fn get(&self, plan: PlanId) -> Option<&PlanConfig> {
        self.0.get(&plan)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PlanId, &PlanConfig)> {
        self.0.iter()
    }
}

impl Default for PlanTable {
    fn default() -> Self {
        let mut plans = BTreeMap::new();
        plans.insert(
            PlanId::Small,
            PlanConfig {
                name: "Small Family".to_string(),
                vegetable_count: 4,
                monthly_price: 2900,
                vegetable_budget: 2200,
                handling_fee: 700,
                min_count: 3,
                max_count: 5,
            },
        );
        plans.insert(
            PlanId::Medium,
            PlanConfig {
                name: "Medium Family".to_string(),
                vegetable_count: 7,
                monthly_price: 4900,
                vegetable_budget: 4000,
                handling_fee: 900,
                min_count: 6,
                max_count: 8,
            },
        );
        plans.insert(
            PlanId::Large,
            PlanConfig {
                name: "Large Family".to_string(),
                vegetable_count: 10,
                monthly_price: 6900,
                vegetable_budget: 5700,
                handling_fee: 1200,
                min_count: 8,
                max_count: 12,
            },
        );
        Self(plans)
    }
}
