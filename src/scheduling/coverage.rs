//! Daily coverage checks against weekday staffing minimums.

use std::collections::BTreeMap;

use crate::config::UnitSettings;
use crate::models::{CoverageShortfall, Period, Roster};

/// Compares each day's headcount per shift with the weekday minimum.
///
/// Weekdays come from the real calendar (Sunday = 0). A shift whose
/// requirement is 0 never produces a shortfall. An invalid period yields an
/// empty result.
///
/// # Example
///
/// ```
/// use roster_engine::config::{StaffingRequirements, UnitSettings};
/// use roster_engine::models::{Period, Roster, ShiftCode};
/// use roster_engine::scheduling::validate_daily_coverage;
///
/// let mut requirements = StaffingRequirements::default();
/// requirements.set("N", [1; 7]);
/// let settings = UnitSettings::three_shift("ward").with_requirements(requirements);
///
/// let mut roster = Roster::new();
/// roster.set("n_001", 1, ShiftCode::new("N"));
///
/// let issues = validate_daily_coverage(&roster, Period::new(2026, 3), &settings);
/// assert!(!issues.contains_key(&1));
/// assert_eq!(issues[&2][0].actual, 0);
/// ```
pub fn validate_daily_coverage(
    roster: &Roster,
    period: Period,
    settings: &UnitSettings,
) -> BTreeMap<u32, Vec<CoverageShortfall>> {
    let mut issues = BTreeMap::new();
    let Some(days) = period.days_in_month() else {
        return issues;
    };

    for day in 1..=days {
        let Some(weekday) = period.weekday_index(day) else {
            continue;
        };

        let shortfalls: Vec<CoverageShortfall> = settings
            .shifts()
            .iter()
            .filter_map(|shift| {
                let required = settings.requirements().required(&shift.code, weekday);
                if required == 0 {
                    return None;
                }
                let actual = roster.headcount(day, &shift.code);
                (actual < required).then(|| CoverageShortfall {
                    code: shift.code.clone(),
                    required,
                    actual,
                })
            })
            .collect();

        if !shortfalls.is_empty() {
            issues.insert(day, shortfalls);
        }
    }

    issues
}
