use rand::rngs::StdRng;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

use super::allocation_service::AllocationService;
use super::clock::Clock;
use super::commands::allocation::{AllocationCommand, AllocationResult};
use super::commands::weekly::{CommitWeekCommand, CommitWeekResult, CustomizeSelectionCommand};
use super::errors::SelectionError;
use super::models::{PlanConfig, PlanId, Vegetable, WeekId, WeeklyHistory, WeeklySelection};
use super::weekly_planner::WeeklyPlanner;
use super::weekly_window::WindowStatus;
use crate::storage::{CatalogStorage, WeeklySelectionStorage};

/// Storage-backed weekly selection workflow: load or generate this week's
/// selection per plan, shuffle and customize it while the window is open,
/// and commit it to history.
#[derive(Clone)]
pub struct WeeklySelectionService {
    catalog: Arc<dyn CatalogStorage>,
    selections: Arc<dyn WeeklySelectionStorage>,
    planner: Arc<WeeklyPlanner>,
    clock: Arc<dyn Clock>,
    rng: Arc<Mutex<StdRng>>,
}

impl WeeklySelectionService {
    pub fn new(
        catalog: Arc<dyn CatalogStorage>,
        selections: Arc<dyn WeeklySelectionStorage>,
        planner: WeeklyPlanner,
        clock: Arc<dyn Clock>,
        rng: StdRng,
    ) -> Self {
        Self {
            catalog,
            selections,
            planner: Arc::new(planner),
            clock,
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    pub fn window_status(&self) -> WindowStatus {
        self.planner.window().status(self.clock.now())
    }

    pub fn plans(&self) -> Vec<(PlanId, PlanConfig)> {
        self.planner
            .plans()
            .iter()
            .map(|(id, config)| (*id, config.clone()))
            .collect()
    }

    pub fn current_week(&self) -> WeekId {
        self.planner.current_week(self.clock.now())
    }

    /// This week's selection for `plan`, generated and stored on first request
    pub async fn current_selection(&self, plan: PlanId) -> Result<WeeklySelection, SelectionError> {
        let now = self.clock.now();
        self.planner.plan(plan)?;
        let week_id = self.planner.current_week(now);

        if let Some(stored) = self.selections.load_selection(week_id, plan).await? {
            info!("Loaded stored {} selection for week {}", plan, week_id);
            return Ok(self.planner.refresh_window(stored, now));
        }

        info!("No {} selection for week {}, generating", plan, week_id);
        let (catalog, history) = self.load_inputs().await?;
        let selection = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            self.planner
                .generate(plan, &catalog, &history, Some(week_id), now, &mut *rng)?
        };
        self.store(&selection).await?;
        Ok(selection)
    }

    /// Replace this week's selection with a fresh draw; open window only
    pub async fn shuffle(&self, plan: PlanId) -> Result<WeeklySelection, SelectionError> {
        let now = self.clock.now();
        let week_id = self.planner.current_week(now);
        let (catalog, history) = self.load_inputs().await?;
        let selection = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            self.planner
                .shuffle(plan, &catalog, &history, week_id, now, &mut *rng)?
        };
        info!("Shuffled {} selection for week {}", plan, week_id);
        self.store(&selection).await?;
        Ok(selection)
    }

    pub async fn customize(
        &self,
        plan: PlanId,
        command: CustomizeSelectionCommand,
    ) -> Result<WeeklySelection, SelectionError> {
        info!(
            "Customizing {} selection: remove {:?}, add {:?}",
            plan, command.remove, command.add
        );
        let current = self.current_selection(plan).await?;
        let catalog = self.catalog_map().await?;

        let updated = self
            .planner
            .customize(&current, &command, &catalog, self.clock.now())?;
        self.selections.save_selection(&updated).await?;
        Ok(updated)
    }

    /// Record a stored selection in the history read by future rotations
    pub async fn commit(&self, command: CommitWeekCommand) -> Result<CommitWeekResult, SelectionError> {
        let week_id = command.week_id.unwrap_or_else(|| self.current_week());
        let selection = self
            .selections
            .load_selection(week_id, command.plan)
            .await?
            .ok_or(SelectionError::NoSelection {
                week_id,
                plan: command.plan,
            })?;

        self.selections
            .append_history(week_id, &selection.vegetables)
            .await?;
        info!(
            "Committed {} vegetables to history for week {}",
            selection.vegetables.len(),
            week_id
        );

        Ok(CommitWeekResult {
            week_id,
            vegetables: selection.vegetables,
        })
    }

    pub async fn history(&self) -> Result<WeeklyHistory, SelectionError> {
        Ok(self.selections.load_history().await?)
    }

    /// This week's selection allocated against the plan's vegetable budget
    pub async fn allocation(&self, plan: PlanId) -> Result<(WeeklySelection, AllocationResult), SelectionError> {
        let budget = self.planner.plan(plan)?.vegetable_budget;
        let selection = self.current_selection(plan).await?;
        let catalog = self.catalog_map().await?;

        let result = AllocationService::allocate_with(
            &catalog,
            AllocationCommand {
                budget,
                vegetable_ids: selection.vegetables.clone(),
            },
        );
        Ok((selection, result))
    }

    async fn load_inputs(&self) -> Result<(Vec<Vegetable>, WeeklyHistory), SelectionError> {
        let catalog = self.catalog.list_vegetables().await?;
        let history = self.selections.load_history().await?;
        if catalog.iter().all(|v| !v.is_available) {
            warn!("Catalog has no available vegetables");
        }
        Ok((catalog, history))
    }

    async fn catalog_map(&self) -> Result<HashMap<String, Vegetable>, SelectionError> {
        let vegetables = self.catalog.list_vegetables().await?;
        Ok(vegetables.into_iter().map(|v| (v.id.clone(), v)).collect())
    }

    /// Empty selections are returned but never stored
    async fn store(&self, selection: &WeeklySelection) -> Result<(), SelectionError> {
        if selection.vegetables.is_empty() {
            warn!(
                "Not storing empty {} selection for week {}",
                selection.plan, selection.week_id
            );
            return Ok(());
        }
        self.selections.save_selection(selection).await?;
        Ok(())
    }
}
