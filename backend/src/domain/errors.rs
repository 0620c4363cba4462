//! Failures the domain layer surfaces to callers.
//!
//! Engine functions (allocation, rotation, window) never fail; these cover
//! catalog mutations, customization rules, and storage underneath them.

use chrono::NaiveDateTime;
use thiserror::Error;

use super::models::{PlanId, VegetableValidationError, WeekId, WeekIdError};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Vegetable not found: {0}")]
    NotFound(String),
    #[error("Invalid vegetable: {0}")]
    Invalid(String),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl From<VegetableValidationError> for CatalogError {
    fn from(err: VegetableValidationError) -> Self {
        CatalogError::Invalid(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("Customization is closed until {next_opening}")]
    CustomizationClosed { next_opening: NaiveDateTime },
    #[error("Vegetable {0} is not in the catalog or not available")]
    UnknownVegetable(String),
    #[error("Vegetable {0} is already in the selection")]
    DuplicateVegetable(String),
    #[error("Selection would hold {count} vegetables, plan allows {min}-{max}")]
    CountOutOfRange { count: usize, min: usize, max: usize },
    #[error("Unknown plan: {0}")]
    UnknownPlan(String),
    #[error("No selection stored for week {week_id} on the {plan} plan")]
    NoSelection { week_id: WeekId, plan: PlanId },
    #[error(transparent)]
    InvalidWeek(#[from] WeekIdError),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}
