//! Weekly rotation selector.
//!
//! Picks a week's candidate vegetables: a fixed per-category quota filled
//! from each category's priority order (items unused in the lookback window
//! first, ties broken by a random permutation), then topped up from the
//! pooled leftovers when a category runs short. The random source is a
//! parameter so callers control determinism; each call with a fresh draw
//! is a valid "shuffle".

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use tracing::debug;

use super::models::{Category, Vegetable, WeekId, WeeklyHistory};

pub const DEFAULT_LOOKBACK_WEEKS: u32 = 4;

/// Per-category quota for a bucket size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryTargets {
    pub root: usize,
    pub leafy: usize,
    pub bushy: usize,
}

impl CategoryTargets {
    /// Breakpoints: up to 4 items take one root and one leafy, up to 7 take
    /// two of each, larger buckets take three of each; bushy gets the rest.
    pub fn for_count(required_count: usize) -> Self {
        let (root, leafy) = match required_count {
            0..=4 => (1, 1),
            5..=7 => (2, 2),
            _ => (3, 3),
        };
        Self {
            root,
            leafy,
            bushy: required_count.saturating_sub(root + leafy),
        }
    }

    pub fn get(&self, category: Category) -> usize {
        match category {
            Category::Root => self.root,
            Category::Leafy => self.leafy,
            Category::Bushy => self.bushy,
        }
    }
}

/// Fresh ids (not recently used) before used ones, each tier randomly permuted
pub fn prioritize_by_recency<R: Rng + ?Sized>(
    ids: &[String],
    recently_used: &HashSet<String>,
    rng: &mut R,
) -> Vec<String> {
    let (mut fresh, mut used): (Vec<String>, Vec<String>) = ids
        .iter()
        .cloned()
        .partition(|id| !recently_used.contains(id));

    fresh.shuffle(rng);
    used.shuffle(rng);
    fresh.extend(used);
    fresh
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationSelector {
    lookback_weeks: u32,
}

impl Default for RotationSelector {
    fn default() -> Self {
        Self::new(DEFAULT_LOOKBACK_WEEKS)
    }
}

impl RotationSelector {
    pub fn new(lookback_weeks: u32) -> Self {
        Self { lookback_weeks }
    }

    pub fn lookback_weeks(&self) -> u32 {
        self.lookback_weeks
    }

    /// Candidate ids for `week_id`. Returns fewer than `required_count` ids
    /// only when the available catalog is smaller than that.
    pub fn select_for_week<R: Rng + ?Sized>(
        &self,
        catalog: &[Vegetable],
        required_count: usize,
        history: &WeeklyHistory,
        week_id: WeekId,
        rng: &mut R,
    ) -> Vec<String> {
        let available: Vec<&Vegetable> = catalog.iter().filter(|v| v.is_available).collect();
        if available.is_empty() || required_count == 0 {
            return Vec::new();
        }

        let recently_used = history.recently_used(week_id, self.lookback_weeks);
        let targets = CategoryTargets::for_count(required_count);

        let mut selected: Vec<String> = Vec::with_capacity(required_count);
        for category in Category::ALL {
            let ids: Vec<String> = available
                .iter()
                .filter(|v| v.category == category)
                .map(|v| v.id.clone())
                .collect();
            let prioritized = prioritize_by_recency(&ids, &recently_used, rng);
            selected.extend(prioritized.into_iter().take(targets.get(category)));
        }

        if selected.len() < required_count {
            let chosen: HashSet<&String> = selected.iter().collect();
            let leftovers: Vec<String> = available
                .iter()
                .map(|v| &v.id)
                .filter(|id| !chosen.contains(id))
                .cloned()
                .collect();
            let missing = required_count - selected.len();
            let fill = prioritize_by_recency(&leftovers, &recently_used, rng);
            selected.extend(fill.into_iter().take(missing));
        }

        selected.truncate(required_count);

        debug!(
            "Selected {} of {} required vegetables for week {} ({} recently used)",
            selected.len(),
            required_count,
            week_id,
            recently_used.len()
        );

        selected
    }
}
