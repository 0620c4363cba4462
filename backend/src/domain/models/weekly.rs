use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::plan::PlanId;
use super::week::WeekId;

/// The set of vegetables chosen for a given week and plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySelection {
    pub week_id: WeekId,
    pub plan: PlanId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Membership matters, order does not; never holds duplicates
    pub vegetables: Vec<String>,
    pub is_customization_open: bool,
    pub customization_deadline: NaiveDateTime,
    pub delivery_date: NaiveDateTime,
}

impl WeeklySelection {
    pub fn contains(&self, vegetable_id: &str) -> bool {
        self.vegetables.iter().any(|id| id == vegetable_id)
    }
}

/// Vegetable ids used per week, read as a lookback for rotation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeeklyHistory(BTreeMap<WeekId, Vec<String>>);

impl WeeklyHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, week_id: &WeekId) -> Option<&[String]> {
        self.0.get(week_id).map(Vec::as_slice)
    }

    /// Record the ids used in a week, replacing any earlier entry for it
    pub fn record(&mut self, week_id: WeekId, vegetable_ids: Vec<String>) {
        self.0.insert(week_id, vegetable_ids);
    }

    /// Union of ids used in the `lookback_weeks` weeks before `week_id`
    pub fn recently_used(&self, week_id: WeekId, lookback_weeks: u32) -> HashSet<String> {
        week_id
            .recent(lookback_weeks)
            .iter()
            .filter_map(|week| self.get(week))
            .flatten()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&WeekId, &Vec<String>)> {
        self.0.iter()
    }
}

impl FromIterator<(WeekId, Vec<String>)> for WeeklyHistory {
    fn from_iter<T: IntoIterator<Item = (WeekId, Vec<String>)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn week(s: &str) -> WeekId {
        s.parse().unwrap()
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_recently_used_reads_only_lookback_window() {
        let history: WeeklyHistory = vec![
            (week("2024-01"), ids(&["carrots", "gotukola"])),
            (week("2024-02"), ids(&["radish"])),
            (week("2024-05"), ids(&["beans"])),
            (week("2024-06"), ids(&["pumpkin"])),
        ]
        .into_iter()
        .collect();

        let recent = history.recently_used(week("2024-06"), 4);
        // 2024-05..2024-02 are in range; 2024-06 itself and 2024-01 are not
        assert!(recent.contains("beans"));
        assert!(recent.contains("radish"));
        assert!(!recent.contains("pumpkin"));
        assert!(!recent.contains("carrots"));
    }

    #[test]
    fn test_recently_used_crosses_year_boundary() {
        let history: WeeklyHistory = vec![(week("2023-52"), ids(&["leeks"]))].into_iter().collect();
        let recent = history.recently_used(week("2024-01"), 1);
        assert!(recent.contains("leeks"));
    }

    #[test]
    fn test_history_serializes_as_map() {
        let mut history = WeeklyHistory::new();
        history.record(week("2024-03"), ids(&["kankun"]));
        let json = serde_json::to_string(&history).unwrap();
        assert_eq!(json, r#"{"2024-03":["kankun"]}"#);
        let back: WeeklyHistory = serde_json::from_str(&json).unwrap();
        assert_eq!(back, history);
    }
}
