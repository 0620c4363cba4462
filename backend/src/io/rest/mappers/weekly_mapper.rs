use chrono::NaiveDateTime;
use std::collections::BTreeMap;

use shared::{
    CommitWeekRequest, CommitWeekResponse, CustomizeSelectionRequest, Plan, PlanListResponse, PlanTier,
    TimeRemaining as SharedTimeRemaining, WeeklyHistoryResponse, WeeklySelection as SharedWeeklySelection,
    WindowStatusResponse,
};

use crate::domain::commands::weekly::{CommitWeekCommand, CommitWeekResult, CustomizeSelectionCommand};
use crate::domain::models::{PlanConfig, PlanId, WeekId, WeekIdError, WeeklyHistory, WeeklySelection};
use crate::domain::{WindowState, WindowStatus};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Mapper between the shared weekly DTOs and domain types
pub struct WeeklyMapper;

impl WeeklyMapper {
    pub fn plan_to_dto(plan: PlanId) -> PlanTier {
        match plan {
            PlanId::Small => PlanTier::Small,
            PlanId::Medium => PlanTier::Medium,
            PlanId::Large => PlanTier::Large,
        }
    }

    pub fn plan_to_domain(plan: PlanTier) -> PlanId {
        match plan {
            PlanTier::Small => PlanId::Small,
            PlanTier::Medium => PlanId::Medium,
            PlanTier::Large => PlanId::Large,
        }
    }

    pub fn to_dto(domain: WeeklySelection) -> SharedWeeklySelection {
        SharedWeeklySelection {
            week_id: domain.week_id.to_string(),
            plan: Self::plan_to_dto(domain.plan),
            start_date: domain.start_date.format(DATE_FORMAT).to_string(),
            end_date: domain.end_date.format(DATE_FORMAT).to_string(),
            vegetables: domain.vegetables,
            is_customization_open: domain.is_customization_open,
            customization_deadline: format_timestamp(domain.customization_deadline),
            delivery_date: format_timestamp(domain.delivery_date),
        }
    }

    pub fn to_window_dto(status: WindowStatus) -> WindowStatusResponse {
        WindowStatusResponse {
            is_open: status.state == WindowState::Open,
            deadline: format_timestamp(status.deadline),
            time_remaining: SharedTimeRemaining {
                days: status.time_remaining.days,
                hours: status.time_remaining.hours,
                minutes: status.time_remaining.minutes,
                is_expired: status.time_remaining.expired,
            },
            next_opening: format_timestamp(status.next_opening),
            delivery_date: format_timestamp(status.delivery_date),
        }
    }

    pub fn to_plan_list_dto(plans: Vec<(PlanId, PlanConfig)>) -> PlanListResponse {
        PlanListResponse {
            plans: plans
                .into_iter()
                .map(|(id, config)| Plan {
                    id: Self::plan_to_dto(id),
                    name: config.name,
                    vegetable_count: config.vegetable_count,
                    monthly_price: config.monthly_price,
                    vegetable_budget: config.vegetable_budget,
                    handling_fee: config.handling_fee,
                    min_count: config.min_count,
                    max_count: config.max_count,
                })
                .collect(),
        }
    }

    pub fn to_history_dto(history: WeeklyHistory) -> WeeklyHistoryResponse {
        let weeks: BTreeMap<String, Vec<String>> = history
            .iter()
            .map(|(week_id, ids)| (week_id.to_string(), ids.clone()))
            .collect();
        WeeklyHistoryResponse { weeks }
    }

    pub fn to_customize_command(request: CustomizeSelectionRequest) -> CustomizeSelectionCommand {
        CustomizeSelectionCommand {
            remove: request.remove,
            add: request.add,
        }
    }

    pub fn to_commit_command(request: CommitWeekRequest) -> Result<CommitWeekCommand, WeekIdError> {
        let week_id = request.week_id.map(|s| s.parse::<WeekId>()).transpose()?;
        Ok(CommitWeekCommand {
            week_id,
            plan: Self::plan_to_domain(request.plan),
        })
    }

    pub fn to_commit_dto(result: CommitWeekResult) -> CommitWeekResponse {
        CommitWeekResponse {
            success_message: format!(
                "Committed {} vegetables for week {}",
                result.vegetables.len(),
                result.week_id
            ),
            week_id: result.week_id.to_string(),
            vegetables: result.vegetables,
        }
    }
}
