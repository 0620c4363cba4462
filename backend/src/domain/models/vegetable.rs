use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed vegetable taxonomy used for value weighting and balanced rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Root,
    Leafy,
    Bushy,
}

impl Category {
    /// Iteration order used everywhere categories are listed
    pub const ALL: [Category; 3] = [Category::Root, Category::Leafy, Category::Bushy];

    /// Conventional value points for the category (root 4, leafy 2, bushy 3)
    pub fn default_base_value(&self) -> u32 {
        match self {
            Category::Root => 4,
            Category::Leafy => 2,
            Category::Bushy => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Root => "root",
            Category::Leafy => "leafy",
            Category::Bushy => "bushy",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "root" => Ok(Category::Root),
            "leafy" => Ok(Category::Leafy),
            "bushy" => Ok(Category::Bushy),
            _ => Err(format!("Invalid vegetable category: {}", s)),
        }
    }
}

/// Catalog record. Read-only to the allocation and rotation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vegetable {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub base_value: u32,
    /// Grams per value point
    pub weight_per_value_point: u32,
    /// Price per 250g reference unit
    pub market_price: u32,
    pub is_available: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Vegetable {
    /// Base of a catalog id derived from a display name: lowercase ASCII
    /// alphanumerics, at most 20 characters.
    pub fn id_base(name: &str) -> String {
        name.chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .take(20)
            .collect()
    }

    pub fn validate(&self) -> Result<(), VegetableValidationError> {
        if self.name.trim().is_empty() {
            return Err(VegetableValidationError::EmptyName);
        }
        if self.base_value == 0 {
            return Err(VegetableValidationError::NonPositiveBaseValue);
        }
        if self.weight_per_value_point == 0 {
            return Err(VegetableValidationError::NonPositiveWeightPerValuePoint);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VegetableValidationError {
    #[error("Name cannot be empty")]
    EmptyName,
    #[error("Name must contain at least one letter or digit")]
    NameWithoutId,
    #[error("Base value must be positive")]
    NonPositiveBaseValue,
    #[error("Weight per value point must be positive")]
    NonPositiveWeightPerValuePoint,
}
