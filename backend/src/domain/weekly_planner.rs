//! Builds and edits weekly selections.
//!
//! Combines the plan table, the rotation selector and the customization
//! window. Everything here is synchronous and works on snapshots the caller
//! has already loaded; persisting the result is the caller's job.

use chrono::NaiveDateTime;
use rand::Rng;
use std::collections::HashMap;
use tracing::{debug, warn};

use super::commands::weekly::CustomizeSelectionCommand;
use super::errors::SelectionError;
use super::models::{PlanConfig, PlanId, PlanTable, Vegetable, WeekId, WeeklyHistory, WeeklySelection};
use super::rotation::RotationSelector;
use super::weekly_window::WeeklyWindow;

#[derive(Debug, Clone)]
pub struct WeeklyPlanner {
    window: WeeklyWindow,
    selector: RotationSelector,
    plans: PlanTable,
}

impl WeeklyPlanner {
    pub fn new(window: WeeklyWindow, selector: RotationSelector, plans: PlanTable) -> Self {
        Self {
            window,
            selector,
            plans,
        }
    }

    pub fn window(&self) -> &WeeklyWindow {
        &self.window
    }

    pub fn plans(&self) -> &PlanTable {
        &self.plans
    }

    pub fn plan(&self, plan: PlanId) -> Result<&PlanConfig, SelectionError> {
        self.plans
            .get(plan)
            .ok_or_else(|| SelectionError::UnknownPlan(plan.to_string()))
    }

    /// Week holding `now` under the storefront week-number convention
    pub fn current_week(&self, now: NaiveDateTime) -> WeekId {
        WeekId::containing(now.date())
    }

    /// Fresh candidate selection for `plan`. Under-fills rather than fails
    /// when the catalog is short.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        plan: PlanId,
        catalog: &[Vegetable],
        history: &WeeklyHistory,
        week_id: Option<WeekId>,
        now: NaiveDateTime,
        rng: &mut R,
    ) -> Result<WeeklySelection, SelectionError> {
        let config = self.plan(plan)?;
        let week_id = week_id.unwrap_or_else(|| self.current_week(now));
        let range = week_id.date_range();

        let vegetables =
            self.selector
                .select_for_week(catalog, config.vegetable_count, history, week_id, rng);

        debug!(
            "Generated {} plan selection for week {}: {:?}",
            plan, week_id, vegetables
        );

        let status = self.window.status(now);
        Ok(WeeklySelection {
            week_id,
            plan,
            start_date: range.monday,
            end_date: range.sunday,
            vegetables,
            is_customization_open: self.window.is_open(now),
            customization_deadline: status.deadline,
            delivery_date: status.delivery_date,
        })
    }

    /// Regenerate the selection; only allowed while the window is open
    pub fn shuffle<R: Rng + ?Sized>(
        &self,
        plan: PlanId,
        catalog: &[Vegetable],
        history: &WeeklyHistory,
        week_id: WeekId,
        now: NaiveDateTime,
        rng: &mut R,
    ) -> Result<WeeklySelection, SelectionError> {
        self.ensure_open(now)?;
        self.generate(plan, catalog, history, Some(week_id), now, rng)
    }

    /// Remove then add ids on an existing selection. Added ids must be
    /// available and not already present; the resulting count must fit the
    /// plan's customization range. Removing an absent id is a no-op.
    pub fn customize(
        &self,
        selection: &WeeklySelection,
        command: &CustomizeSelectionCommand,
        catalog: &HashMap<String, Vegetable>,
        now: NaiveDateTime,
    ) -> Result<WeeklySelection, SelectionError> {
        self.ensure_open(now)?;
        let config = self.plan(selection.plan)?;

        for id in command.remove.iter().filter(|id| !selection.contains(id)) {
            debug!("Ignoring removal of {}, not in the {} selection", id, selection.plan);
        }

        let mut vegetables: Vec<String> = selection
            .vegetables
            .iter()
            .filter(|id| !command.remove.contains(id))
            .cloned()
            .collect();

        for id in &command.add {
            if vegetables.contains(id) {
                return Err(SelectionError::DuplicateVegetable(id.clone()));
            }
            match catalog.get(id) {
                Some(veg) if veg.is_available => vegetables.push(id.clone()),
                _ => return Err(SelectionError::UnknownVegetable(id.clone())),
            }
        }

        if !config.allows_count(vegetables.len()) {
            return Err(SelectionError::CountOutOfRange {
                count: vegetables.len(),
                min: config.min_count,
                max: config.max_count,
            });
        }

        let mut updated = self.refresh_window(selection.clone(), now);
        updated.vegetables = vegetables;
        Ok(updated)
    }

    /// Recompute the window-derived fields of a stored selection for `now`
    pub fn refresh_window(&self, mut selection: WeeklySelection, now: NaiveDateTime) -> WeeklySelection {
        let status = self.window.status(now);
        selection.is_customization_open = self.window.is_open(now);
        selection.customization_deadline = status.deadline;
        selection.delivery_date = status.delivery_date;
        selection
    }

    fn ensure_open(&self, now: NaiveDateTime) -> Result<(), SelectionError> {
        if self.window.is_open(now) {
            return Ok(());
        }
        let next_opening = self.window.next_opening(now);
        warn!("Selection change rejected at {}, window opens {}", now, next_opening);
        Err(SelectionError::CustomizationClosed { next_opening })
    }
}

impl Default for WeeklyPlanner {
    fn default() -> Self {
        Self::new(WeeklyWindow::default(), RotationSelector::default(), PlanTable::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Category;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn veg(id: &str, category: Category) -> Vegetable {
        Vegetable {
            id: id.to_string(),
            name: id.to_string(),
            category,
            base_value: category.default_base_value(),
            weight_per_value_point: 100,
            market_price: 100,
            is_available: true,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn catalog() -> Vec<Vegetable> {
        let mut items = Vec::new();
        for i in 0..4 {
            items.push(veg(&format!("root{}", i), Category::Root));
        }
        for i in 0..5 {
            items.push(veg(&format!("leafy{}", i), Category::Leafy));
        }
        for i in 0..7 {
            items.push(veg(&format!("bushy{}", i), Category::Bushy));
        }
        items
    }

    fn catalog_map() -> HashMap<String, Vegetable> {
        catalog().into_iter().map(|v| (v.id.clone(), v)).collect()
    }

    // 2024-06-13 is a Thursday (open), 2024-06-15 a Saturday (closed)
    fn thursday() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 13).unwrap().and_hms_opt(10, 0, 0).unwrap()
    }

    fn saturday() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap().and_hms_opt(10, 0, 0).unwrap()
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_generate_wraps_selection_with_week_and_window() {
        let planner = WeeklyPlanner::default();
        let mut rng = StdRng::seed_from_u64(11);
        let selection = planner
            .generate(PlanId::Medium, &catalog(), &WeeklyHistory::new(), None, thursday(), &mut rng)
            .expect("Failed to generate selection");

        assert_eq!(selection.plan, PlanId::Medium);
        assert_eq!(selection.vegetables.len(), 7);
        assert_eq!(selection.week_id, WeekId::containing(thursday().date()));
        assert_eq!(selection.week_id.date_range().monday, selection.start_date);
        assert_eq!(selection.week_id.date_range().sunday, selection.end_date);
        assert!(selection.is_customization_open);
        assert_eq!(
            selection.delivery_date,
            NaiveDate::from_ymd_opt(2024, 6, 16).unwrap().and_hms_opt(8, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_generate_uses_configured_counts() {
        let planner = WeeklyPlanner::default();
        for (plan, expected) in [(PlanId::Small, 4), (PlanId::Medium, 7), (PlanId::Large, 10)] {
            let mut rng = StdRng::seed_from_u64(2);
            let selection = planner
                .generate(plan, &catalog(), &WeeklyHistory::new(), None, saturday(), &mut rng)
                .unwrap();
            assert_eq!(selection.vegetables.len(), expected, "plan {}", plan);
        }
    }

    #[test]
    fn test_generate_unknown_plan() {
        let planner = WeeklyPlanner::new(
            WeeklyWindow::default(),
            RotationSelector::default(),
            PlanTable::new(Default::default()),
        );
        let mut rng = StdRng::seed_from_u64(2);
        let result = planner.generate(PlanId::Small, &catalog(), &WeeklyHistory::new(), None, thursday(), &mut rng);
        assert!(matches!(result, Err(SelectionError::UnknownPlan(_))));
    }

    #[test]
    fn test_shuffle_rejected_while_closed() {
        let planner = WeeklyPlanner::default();
        let mut rng = StdRng::seed_from_u64(3);
        let week = WeekId::containing(saturday().date());
        let result = planner.shuffle(PlanId::Small, &catalog(), &WeeklyHistory::new(), week, saturday(), &mut rng);

        match result {
            Err(SelectionError::CustomizationClosed { next_opening }) => {
                assert_eq!(
                    next_opening,
                    NaiveDate::from_ymd_opt(2024, 6, 19).unwrap().and_hms_opt(0, 1, 0).unwrap()
                );
            }
            other => panic!("expected closed window, got {:?}", other),
        }
    }

    #[test]
    fn test_customize_swaps_items() {
        let planner = WeeklyPlanner::default();
        let mut rng = StdRng::seed_from_u64(4);
        let selection = planner
            .generate(PlanId::Medium, &catalog(), &WeeklyHistory::new(), None, thursday(), &mut rng)
            .unwrap();

        let removed = selection.vegetables[0].clone();
        let added = catalog()
            .into_iter()
            .map(|v| v.id)
            .find(|id| !selection.contains(id))
            .unwrap();

        let command = CustomizeSelectionCommand {
            remove: vec![removed.clone()],
            add: vec![added.clone()],
        };
        let updated = planner
            .customize(&selection, &command, &catalog_map(), thursday())
            .expect("Failed to customize");

        assert_eq!(updated.vegetables.len(), 7);
        assert!(!updated.contains(&removed));
        assert!(updated.contains(&added));
    }

    #[test]
    fn test_removing_an_absent_item_changes_nothing() {
        let planner = WeeklyPlanner::default();
        let mut rng = StdRng::seed_from_u64(6);
        let selection = planner
            .generate(PlanId::Small, &catalog(), &WeeklyHistory::new(), None, thursday(), &mut rng)
            .unwrap();

        let command = CustomizeSelectionCommand {
            remove: ids(&["ghost"]),
            add: vec![],
        };
        let updated = planner
            .customize(&selection, &command, &catalog_map(), thursday())
            .expect("Failed to customize");
        assert_eq!(updated.vegetables, selection.vegetables);
    }

    #[test]
    fn test_customize_rejections() {
        let planner = WeeklyPlanner::default();
        let mut rng = StdRng::seed_from_u64(5);
        let selection = planner
            .generate(PlanId::Small, &catalog(), &WeeklyHistory::new(), None, thursday(), &mut rng)
            .unwrap();
        let present = selection.vegetables[0].clone();
        let mut map = catalog_map();

        let duplicate = CustomizeSelectionCommand {
            remove: vec![],
            add: vec![present.clone()],
        };
        assert!(matches!(
            planner.customize(&selection, &duplicate, &map, thursday()),
            Err(SelectionError::DuplicateVegetable(id)) if id == present
        ));

        let unknown = CustomizeSelectionCommand {
            remove: vec![],
            add: ids(&["ghost"]),
        };
        assert!(matches!(
            planner.customize(&selection, &unknown, &map, thursday()),
            Err(SelectionError::UnknownVegetable(_))
        ));

        let spare = catalog()
            .into_iter()
            .map(|v| v.id)
            .find(|id| !selection.contains(id))
            .unwrap();
        map.get_mut(&spare).unwrap().is_available = false;
        let unavailable = CustomizeSelectionCommand {
            remove: vec![],
            add: vec![spare],
        };
        assert!(matches!(
            planner.customize(&selection, &unavailable, &map, thursday()),
            Err(SelectionError::UnknownVegetable(_))
        ));

        // Small plan allows 3-5; dropping two of four leaves 2
        let too_few = CustomizeSelectionCommand {
            remove: selection.vegetables[..2].to_vec(),
            add: vec![],
        };
        assert!(matches!(
            planner.customize(&selection, &too_few, &map, thursday()),
            Err(SelectionError::CountOutOfRange { count: 2, min: 3, max: 5 })
        ));

        let closed = CustomizeSelectionCommand::default();
        assert!(matches!(
            planner.customize(&selection, &closed, &map, saturday()),
            Err(SelectionError::CustomizationClosed { .. })
        ));
    }

    #[test]
    fn test_refresh_window_updates_stale_flags() {
        let planner = WeeklyPlanner::default();
        let mut rng = StdRng::seed_from_u64(6);
        let selection = planner
            .generate(PlanId::Small, &catalog(), &WeeklyHistory::new(), None, thursday(), &mut rng)
            .unwrap();
        assert!(selection.is_customization_open);

        let refreshed = planner.refresh_window(selection.clone(), saturday());
        assert!(!refreshed.is_customization_open);
        assert_eq!(refreshed.vegetables, selection.vegetables);
    }
}
