//! Allocation calculator.
//!
//! Splits a budget across a selection in proportion to each item's value
//! points and derives physical weight from `weight_per_value_point`.
//! Every function here is total: unknown ids, unavailable items and empty
//! selections produce empty or zeroed results, never errors.
//!
//! Each line rounds half-up on its own, so the line budgets can drift from
//! the requested budget by up to one unit per line. No residual pass
//! redistributes the difference.

use std::collections::{HashMap, HashSet};

use super::models::{Category, Vegetable};

/// Derived per-item share of a budget. Recomputed on every request.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationLine {
    pub vegetable_id: String,
    pub name: String,
    pub category: Category,
    pub allocated_budget: u32,
    /// Grams
    pub allocated_weight: u32,
    /// 0-100
    pub value_percentage: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CategoryWeight {
    pub count: usize,
    pub weight: u32,
    pub percentage: u32,
}

/// Weight per category for a selection, in `Category::ALL` order
#[derive(Debug, Clone, PartialEq)]
pub struct WeightBreakdown {
    pub categories: Vec<(Category, CategoryWeight)>,
    pub total_weight: u32,
}

impl WeightBreakdown {
    pub fn category(&self, category: Category) -> CategoryWeight {
        self.categories
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, w)| *w)
            .unwrap_or_default()
    }
}

/// `round(numerator / denominator)` with halves rounded up, clamped to `u32`.
/// Widened to `u128` so `u32 × u32` numerators cannot overflow.
fn round_half_up(numerator: u128, denominator: u128) -> u32 {
    let rounded = (2 * numerator + denominator) / (2 * denominator);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

fn saturating_total(weights: impl Iterator<Item = u32>) -> u32 {
    weights.fold(0, u32::saturating_add)
}

/// Grams represented by an item: `weight_per_value_point × base_value`.
/// Independent of any budget.
pub fn item_weight(vegetable: &Vegetable) -> u32 {
    vegetable
        .weight_per_value_point
        .saturating_mul(vegetable.base_value)
}

/// Selected ids present and available in the catalog, first occurrence wins
fn resolve_selection<'a>(
    selected_ids: &[String],
    catalog: &'a HashMap<String, Vegetable>,
) -> Vec<&'a Vegetable> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut selection = Vec::new();
    for id in selected_ids {
        if !seen.insert(id.as_str()) {
            continue;
        }
        if let Some(veg) = catalog.get(id).filter(|veg| veg.is_available) {
            selection.push(veg);
        }
    }
    selection
}

/// Split `budget` across the selected items by value points
pub fn allocate(
    budget: u32,
    selected_ids: &[String],
    catalog: &HashMap<String, Vegetable>,
) -> Vec<AllocationLine> {
    let selection = resolve_selection(selected_ids, catalog);
    let total_value: u128 = selection.iter().map(|v| v.base_value as u128).sum();

    if total_value == 0 {
        return Vec::new();
    }

    selection
        .into_iter()
        .map(|veg| {
            let value = veg.base_value as u128;
            AllocationLine {
                vegetable_id: veg.id.clone(),
                name: veg.name.clone(),
                category: veg.category,
                allocated_budget: round_half_up(value * budget as u128, total_value),
                allocated_weight: item_weight(veg),
                value_percentage: round_half_up(value * 100, total_value),
            }
        })
        .collect()
}

/// Total grams of a selection; a weight-only query with no budget involved
pub fn total_weight(selected_ids: &[String], catalog: &HashMap<String, Vegetable>) -> u32 {
    saturating_total(resolve_selection(selected_ids, catalog).into_iter().map(item_weight))
}

/// Count and weight per category, with percentages of the total weight
/// (all zero when the selection weighs nothing)
pub fn weight_breakdown_by_category(
    selected_ids: &[String],
    catalog: &HashMap<String, Vegetable>,
) -> WeightBreakdown {
    let selection = resolve_selection(selected_ids, catalog);

    let mut categories: Vec<(Category, CategoryWeight)> = Category::ALL
        .iter()
        .map(|c| (*c, CategoryWeight::default()))
        .collect();

    for veg in &selection {
        if let Some((_, entry)) = categories.iter_mut().find(|(c, _)| *c == veg.category) {
            entry.count += 1;
            entry.weight = entry.weight.saturating_add(item_weight(veg));
        }
    }

    let total_weight = saturating_total(categories.iter().map(|(_, w)| w.weight));
    // Percentages use the exact sum; the reported total saturates
    let exact_total: u128 = categories.iter().map(|(_, w)| w.weight as u128).sum();
    if exact_total > 0 {
        for (_, entry) in categories.iter_mut() {
            entry.percentage = round_half_up(entry.weight as u128 * 100, exact_total);
        }
    }

    WeightBreakdown {
        categories,
        total_weight,
    }
}
