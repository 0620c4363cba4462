pub mod plan;
pub mod vegetable;
pub mod week;
pub mod weekly;

pub use plan::{PlanConfig, PlanId, PlanTable};
pub use vegetable::{Category, Vegetable, VegetableValidationError};
pub use week::{WeekId, WeekIdError, WeekRange};
pub use weekly::{WeeklyHistory, WeeklySelection};
