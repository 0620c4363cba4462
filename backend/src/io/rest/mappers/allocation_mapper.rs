use shared::{
    AllocationLine as SharedAllocationLine, AllocationRequest, AllocationResponse,
    CategoryWeight as SharedCategoryWeight, WeightBreakdown as SharedWeightBreakdown,
};

use super::vegetable_mapper::VegetableMapper;
use crate::domain::allocation::{AllocationLine, WeightBreakdown};
use crate::domain::commands::allocation::{AllocationCommand, AllocationResult};

pub struct AllocationMapper;

impl AllocationMapper {
    pub fn to_command(request: AllocationRequest) -> AllocationCommand {
        AllocationCommand {
            budget: request.budget,
            vegetable_ids: request.vegetable_ids,
        }
    }

    fn line_to_dto(line: AllocationLine) -> SharedAllocationLine {
        SharedAllocationLine {
            vegetable_id: line.vegetable_id,
            name: line.name,
            category: VegetableMapper::category_to_dto(line.category),
            allocated_budget: line.allocated_budget,
            allocated_weight: line.allocated_weight,
            value_percentage: line.value_percentage,
        }
    }

    fn breakdown_to_dto(breakdown: WeightBreakdown) -> SharedWeightBreakdown {
        SharedWeightBreakdown {
            categories: breakdown
                .categories
                .into_iter()
                .map(|(category, weight)| SharedCategoryWeight {
                    category: VegetableMapper::category_to_dto(category),
                    count: weight.count,
                    weight: weight.weight,
                    percentage: weight.percentage,
                })
                .collect(),
            total_weight: breakdown.total_weight,
        }
    }

    pub fn to_dto(result: AllocationResult) -> AllocationResponse {
        AllocationResponse {
            budget: result.budget,
            lines: result.lines.into_iter().map(Self::line_to_dto).collect(),
            allocated_total: result.allocated_total,
            breakdown: Self::breakdown_to_dto(result.breakdown),
        }
    }
}
