pub mod allocation_mapper;
pub mod vegetable_mapper;
pub mod weekly_mapper;

pub use allocation_mapper::AllocationMapper;
pub use vegetable_mapper::VegetableMapper;
pub use weekly_mapper::WeeklyMapper;
