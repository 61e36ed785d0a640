//! Published roster: staff → day → code.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::shift_code::ShiftCode;

/// A month of assignments as handed back to callers.
///
/// Only days 1..=days_in_month appear; the day-0 continuity anchor is
/// internal to a run. A timed-out run may omit trailing days.
///
/// # Example
///
/// ```
/// use roster_engine::models::{Roster, ShiftCode};
///
/// let mut roster = Roster::new();
/// roster.set("n_001", 1, ShiftCode::new("D"));
/// roster.set("n_001", 2, ShiftCode::requested_rest());
///
/// let row = roster.sequence("n_001", 3);
/// assert_eq!(row, vec![Some(ShiftCode::new("D")), Some(ShiftCode::requested_rest()), None]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster(BTreeMap<String, BTreeMap<u32, ShiftCode>>);

impl Roster {
    /// Creates an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the code for `staff_id` on `day`.
    pub fn set(&mut self, staff_id: impl Into<String>, day: u32, code: ShiftCode) {
        self.0.entry(staff_id.into()).or_default().insert(day, code);
    }

    /// Registers a staff member with no assigned days yet.
    pub fn ensure_staff(&mut self, staff_id: impl Into<String>) {
        self.0.entry(staff_id.into()).or_default();
    }

    /// Returns the code for `staff_id` on `day`.
    pub fn get(&self, staff_id: &str, day: u32) -> Option<&ShiftCode> {
        self.0.get(staff_id).and_then(|row| row.get(&day))
    }

    /// Returns one staff member's row.
    pub fn row(&self, staff_id: &str) -> Option<&BTreeMap<u32, ShiftCode>> {
        self.0.get(staff_id)
    }

    /// Returns a dense sequence for days 1..=days (index 0 holds day 1).
    pub fn sequence(&self, staff_id: &str, days: u32) -> Vec<Option<ShiftCode>> {
        (1..=days)
            .map(|day| self.get(staff_id, day).cloned())
            .collect()
    }

    /// Iterates rows in staff identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeMap<u32, ShiftCode>)> {
        self.0.iter()
    }

    /// Number of staff rows.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when no staff row holds any assignment.
    pub fn is_empty(&self) -> bool {
        self.0.values().all(BTreeMap::is_empty)
    }

    /// Counts how many cells across the roster hold `code` on `day`.
    pub fn headcount(&self, day: u32, code: &ShiftCode) -> u32 {
        self.0
            .values()
            .filter(|row| row.get(&day) == Some(code))
            .count() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_rows_count_as_empty_roster() {
        let mut roster = Roster::new();
        assert!(roster.is_empty());
        roster.ensure_staff("n_001");
        assert_eq!(roster.len(), 1);
        assert!(roster.is_empty());
        roster.set("n_001", 1, ShiftCode::new("D"));
        assert!(!roster.is_empty());
    }

    #[test]
    fn test_headcount_counts_matching_cells() {
        let mut roster = Roster::new();
        roster.set("a", 1, ShiftCode::new("D"));
        roster.set("b", 1, ShiftCode::new("D"));
        roster.set("c", 1, ShiftCode::new("N"));
        assert_eq!(roster.headcount(1, &ShiftCode::new("D")), 2);
        assert_eq!(roster.headcount(1, &ShiftCode::new("N")), 1);
        assert_eq!(roster.headcount(2, &ShiftCode::new("D")), 0);
    }

    #[test]
    fn test_roster_serializes_as_nested_map() {
        let mut roster = Roster::new();
        roster.set("n_001", 1, ShiftCode::new("E"));
        let json = serde_json::to_value(&roster).unwrap();
        assert_eq!(json, serde_json::json!({ "n_001": { "1": "E" } }));

        let back: Roster = serde_json::from_value(json).unwrap();
        assert_eq!(back, roster);
    }
}
