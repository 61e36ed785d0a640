//! Hard-constraint validation of one staff member's day sequence.
//!
//! The validator is stateless: it scans days 1..=up_to_day once, keeping
//! running counters, and reports every rule broken on each day. The solver
//! calls it incrementally (up to the day being filled); auditing callers call
//! it over the full month, which additionally enables the rolling 7-day
//! diversity rule.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::config::{ShiftCatalog, UnitSettings};
use crate::models::{
    Period, PriorSubmissions, Roster, ShiftCode, ShiftKind, StaffConstraints, StaffMember,
    StaffViolations, ValidationReport, Violation,
};

use super::coverage::validate_daily_coverage;

/// Length of the rolling diversity window, in days.
pub const DIVERSITY_WINDOW_DAYS: u32 = 7;

/// Unit-level rule parameters plus the code-to-kind lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRules {
    /// Default cap on consecutive work days.
    pub max_consecutive_work_days: u32,
    /// Unit cap on consecutive nights.
    pub max_consecutive_nights: u32,
    /// Minimum run of one work code before switching to another.
    pub min_run_length: u32,
    /// Maximum distinct work codes in a 7-day window.
    pub max_distinct_shifts_per_week: u32,
    /// Which kind each code denotes.
    pub catalog: ShiftCatalog,
}

impl ValidationRules {
    /// Extracts the rule parameters from unit settings.
    pub fn from_settings(settings: &UnitSettings) -> Self {
        let rules = settings.rules();
        Self {
            max_consecutive_work_days: rules.max_consecutive_work_days,
            max_consecutive_nights: rules.max_consecutive_nights,
            min_run_length: rules.min_run_length,
            max_distinct_shifts_per_week: rules.max_distinct_shifts_per_week,
            catalog: settings.catalog(),
        }
    }
}

/// The last day of the previous period, as seen by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    /// Code held on day 0.
    pub code: ShiftCode,
    /// How many days the day-0 code had already been held, day 0 included.
    pub run_length: u32,
}

impl Default for Anchor {
    fn default() -> Self {
        Self {
            code: ShiftCode::requested_rest(),
            run_length: 0,
        }
    }
}

impl Anchor {
    /// Derives the anchor from the previous period's trailing days (oldest first).
    ///
    /// # Example
    ///
    /// ```
    /// use roster_engine::models::ShiftCode;
    /// use roster_engine::scheduling::Anchor;
    ///
    /// let tail = ["D", "N", "N", "N"].map(ShiftCode::new);
    /// let anchor = Anchor::from_tail(&tail);
    /// assert_eq!(anchor.code, ShiftCode::new("N"));
    /// assert_eq!(anchor.run_length, 3);
    ///
    /// assert_eq!(Anchor::from_tail(&[]), Anchor::default());
    /// ```
    pub fn from_tail(tail: &[ShiftCode]) -> Self {
        match tail.last() {
            None => Self::default(),
            Some(last) => Self {
                code: last.clone(),
                run_length: tail.iter().rev().take_while(|code| *code == last).count() as u32,
            },
        }
    }
}

/// How much of a sequence to check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationWindow {
    /// Last day (1-based, inclusive) to check.
    pub up_to_day: u32,
    /// Whether month-level rules (7-day diversity) apply.
    pub full_month: bool,
}

impl ValidationWindow {
    /// An incremental check as used during search.
    pub fn through(day: u32) -> Self {
        Self {
            up_to_day: day,
            full_month: false,
        }
    }

    /// A full-month audit.
    pub fn full_month(days: u32) -> Self {
        Self {
            up_to_day: days,
            full_month: true,
        }
    }
}

/// Checks one staff member's sequence against the hard rules.
///
/// `sequence[0]` holds day 1. Empty cells count as rest. Days beyond the
/// sequence are ignored, so malformed input degrades to fewer checks rather
/// than a failure.
///
/// # Rules
///
/// - consecutive work days above the personal cap (or the unit default)
/// - consecutive nights above min(unit cap, personal cap)
/// - evening or night work for protected staff
/// - day work directly after evening work
/// - night work directly after non-night work
/// - a run of one work code shorter than the minimum before switching to
///   another work code
/// - full month only: more than the allowed distinct work codes in any
///   7-day window, reported on the window's last day
///
/// # Example
///
/// ```
/// use roster_engine::config::UnitSettings;
/// use roster_engine::models::{ShiftCode, StaffConstraints, Violation};
/// use roster_engine::scheduling::{validate_staff, Anchor, ValidationRules, ValidationWindow};
///
/// let rules = ValidationRules::from_settings(&UnitSettings::three_shift("ward"));
/// let sequence: Vec<_> = ["E", "E", "D"].iter().map(|c| Some(ShiftCode::new(*c))).collect();
///
/// let errors = validate_staff(
///     &sequence,
///     ValidationWindow::through(3),
///     &rules,
///     &StaffConstraints::default(),
///     &Anchor::default(),
/// );
/// assert!(matches!(errors[&3][0], Violation::InsufficientRest { .. }));
/// ```
pub fn validate_staff(
    sequence: &[Option<ShiftCode>],
    window: ValidationWindow,
    rules: &ValidationRules,
    constraints: &StaffConstraints,
    anchor: &Anchor,
) -> StaffViolations {
    let mut errors = StaffViolations::new();
    let up_to_day = window.up_to_day.min(sequence.len() as u32);

    let work_cap = constraints
        .max_consecutive_work_days
        .unwrap_or(rules.max_consecutive_work_days);
    let night_cap = constraints
        .max_consecutive_nights
        .map_or(rules.max_consecutive_nights, |personal| {
            personal.min(rules.max_consecutive_nights)
        });

    let catalog = &rules.catalog;
    let anchor_kind = catalog.kind_of(&anchor.code);
    let anchor_run = if anchor_kind.is_work() {
        anchor.run_length.max(1)
    } else {
        0
    };

    let mut work_run = anchor_run;
    let mut night_run = if anchor_kind == ShiftKind::Night {
        anchor_run
    } else {
        0
    };
    let mut same_run = anchor_run;
    let mut previous: Option<&ShiftCode> = Some(&anchor.code);
    let mut previous_kind = anchor_kind;

    for day in 1..=up_to_day {
        let cell = sequence[(day - 1) as usize].as_ref();
        let kind = catalog.kind_of_cell(cell);
        let mut found = Vec::new();

        if kind.is_work() {
            work_run += 1;
            if work_run > work_cap {
                found.push(Violation::ConsecutiveWorkDays {
                    run: work_run,
                    cap: work_cap,
                });
            }
        } else {
            work_run = 0;
        }

        if kind == ShiftKind::Night {
            night_run += 1;
            if night_run > night_cap {
                found.push(Violation::ConsecutiveNights {
                    run: night_run,
                    cap: night_cap,
                });
            }
        } else {
            night_run = 0;
        }

        if let Some(code) = cell {
            if constraints.protected && matches!(kind, ShiftKind::Evening | ShiftKind::Night) {
                found.push(Violation::ProtectedStaff { code: code.clone() });
            }

            if let Some(prev) = previous {
                if previous_kind == ShiftKind::Evening && kind == ShiftKind::Day {
                    found.push(Violation::InsufficientRest {
                        previous: prev.clone(),
                        code: code.clone(),
                    });
                }

                if kind == ShiftKind::Night
                    && previous_kind.is_work()
                    && previous_kind != ShiftKind::Night
                {
                    found.push(Violation::NightEntry {
                        previous: prev.clone(),
                        code: code.clone(),
                    });
                }

                if previous_kind.is_work()
                    && kind.is_work()
                    && prev != code
                    && same_run < rules.min_run_length
                {
                    found.push(Violation::ShortRun {
                        previous: prev.clone(),
                        code: code.clone(),
                        run: same_run,
                        min: rules.min_run_length,
                    });
                }
            }
        }

        same_run = match (kind.is_work(), previous == cell) {
            (false, _) => 0,
            (true, true) => same_run + 1,
            (true, false) => 1,
        };
        previous = cell;
        previous_kind = kind;

        if !found.is_empty() {
            errors.insert(day, found);
        }
    }

    if window.full_month {
        check_weekly_diversity(sequence, up_to_day, rules, &mut errors);
    }

    errors
}

fn check_weekly_diversity(
    sequence: &[Option<ShiftCode>],
    up_to_day: u32,
    rules: &ValidationRules,
    errors: &mut StaffViolations,
) {
    for end in DIVERSITY_WINDOW_DAYS..=up_to_day {
        let start = end + 1 - DIVERSITY_WINDOW_DAYS;
        let distinct: BTreeSet<&ShiftCode> = (start..=end)
            .filter_map(|day| sequence[(day - 1) as usize].as_ref())
            .filter(|code| rules.catalog.kind_of(code).is_work())
            .collect();

        let distinct = distinct.len() as u32;
        if distinct > rules.max_distinct_shifts_per_week {
            errors
                .entry(end)
                .or_default()
                .push(Violation::WeeklyDiversity {
                    distinct,
                    cap: rules.max_distinct_shifts_per_week,
                });
        }
    }
}

/// Full-month audit of a roster: every staff member's hard rules plus daily
/// coverage.
///
/// Anchors come from each staff member's `previous_tail` submission. An
/// invalid period yields an empty report.
pub fn validate_roster(
    roster: &Roster,
    period: Period,
    staff: &[StaffMember],
    settings: &UnitSettings,
    submissions: &PriorSubmissions,
) -> ValidationReport {
    let Some(days) = period.days_in_month() else {
        return ValidationReport::default();
    };

    let rules = ValidationRules::from_settings(settings);
    let mut report = ValidationReport {
        coverage_issues: validate_daily_coverage(roster, period, settings),
        ..Default::default()
    };

    for member in staff {
        let anchor = submissions
            .get(&member.id)
            .map(|submission| Anchor::from_tail(&submission.previous_tail))
            .unwrap_or_default();
        let sequence = roster.sequence(&member.id, days);
        let errors = validate_staff(
            &sequence,
            ValidationWindow::full_month(days),
            &rules,
            &member.constraints,
            &anchor,
        );
        if !errors.is_empty() {
            report.staff_errors.insert(member.id.clone(), errors);
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> ValidationRules {
        ValidationRules::from_settings(&UnitSettings::three_shift("ward"))
    }

    fn seq(codes: &[&str]) -> Vec<Option<ShiftCode>> {
        codes
            .iter()
            .map(|code| match *code {
                "" => None,
                other => Some(ShiftCode::new(other)),
            })
            .collect()
    }

    fn check(codes: &[&str], constraints: &StaffConstraints) -> StaffViolations {
        let sequence = seq(codes);
        validate_staff(
            &sequence,
            ValidationWindow::full_month(sequence.len() as u32),
            &rules(),
            constraints,
            &Anchor::default(),
        )
    }

    #[test]
    fn test_clean_sequence_has_no_errors() {
        let errors = check(
            &["D", "D", "OFF", "E", "E", "OFF", "OFF", "OFF", "N", "N"],
            &StaffConstraints::default(),
        );
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    }

    #[test]
    fn test_revalidation_is_idempotent() {
        let sequence = seq(&["D", "D", "D", "OFF", "N", "N", "OFF"]);
        let window = ValidationWindow::full_month(7);
        let first = validate_staff(
            &sequence,
            window,
            &rules(),
            &StaffConstraints::default(),
            &Anchor::default(),
        );
        let second = validate_staff(
            &sequence,
            window,
            &rules(),
            &StaffConstraints::default(),
            &Anchor::default(),
        );
        assert!(first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn test_seventh_consecutive_work_day_is_flagged() {
        let errors = check(
            &["D", "D", "D", "D", "D", "D", "D"],
            &StaffConstraints::default(),
        );
        assert_eq!(
            errors.get(&7),
            Some(&vec![Violation::ConsecutiveWorkDays { run: 7, cap: 6 }])
        );
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_personal_work_cap_overrides_unit_default() {
        let constraints = StaffConstraints {
            max_consecutive_work_days: Some(3),
            ..Default::default()
        };
        let errors = check(&["D", "D", "D", "D"], &constraints);
        assert_eq!(
            errors.get(&4),
            Some(&vec![Violation::ConsecutiveWorkDays { run: 4, cap: 3 }])
        );
    }

    #[test]
    fn test_night_cap_is_minimum_of_unit_and_personal() {
        let errors = check(&["N", "N", "N", "N", "N"], &StaffConstraints::default());
        assert_eq!(
            errors.get(&5),
            Some(&vec![Violation::ConsecutiveNights { run: 5, cap: 4 }])
        );

        let constraints = StaffConstraints {
            max_consecutive_nights: Some(2),
            ..Default::default()
        };
        let errors = check(&["N", "N", "N"], &constraints);
        assert!(errors.contains_key(&3));

        // a personal cap above the unit cap does not loosen it
        let constraints = StaffConstraints {
            max_consecutive_nights: Some(9),
            ..Default::default()
        };
        let errors = check(&["N", "N", "N", "N", "N"], &constraints);
        assert!(errors.contains_key(&5));
    }

    #[test]
    fn test_protected_staff_cannot_work_evenings_or_nights() {
        let constraints = StaffConstraints {
            protected: true,
            ..Default::default()
        };
        let errors = check(&["D", "D", "OFF", "E", "E", "OFF", "N"], &constraints);
        assert!(!errors.contains_key(&1));
        for day in [4, 5, 7] {
            assert!(
                errors[&day]
                    .iter()
                    .any(|v| matches!(v, Violation::ProtectedStaff { .. })),
                "day {day} should be flagged"
            );
        }
    }

    #[test]
    fn test_day_after_evening_is_insufficient_rest() {
        let errors = check(&["E", "E", "D", "D"], &StaffConstraints::default());
        assert!(
            errors[&3]
                .iter()
                .any(|v| matches!(v, Violation::InsufficientRest { .. }))
        );
    }

    #[test]
    fn test_night_must_follow_rest_or_night() {
        let errors = check(&["D", "D", "N", "N"], &StaffConstraints::default());
        assert!(
            errors[&3]
                .iter()
                .any(|v| matches!(v, Violation::NightEntry { .. }))
        );
        assert!(!errors.contains_key(&4));
    }

    #[test]
    fn test_short_run_flagged_on_transition_day() {
        let errors = check(&["D", "E", "E"], &StaffConstraints::default());
        assert_eq!(
            errors.get(&2),
            Some(&vec![Violation::ShortRun {
                previous: ShiftCode::new("D"),
                code: ShiftCode::new("E"),
                run: 1,
                min: 2,
            }])
        );
    }

    #[test]
    fn test_single_work_day_followed_by_rest_is_allowed() {
        let errors = check(&["D", "OFF", "E", "OFF"], &StaffConstraints::default());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_anchor_carries_runs_across_months() {
        let sequence = seq(&["N", "N"]);
        let anchor = Anchor {
            code: ShiftCode::new("N"),
            run_length: 3,
        };
        let errors = validate_staff(
            &sequence,
            ValidationWindow::through(2),
            &rules(),
            &StaffConstraints::default(),
            &anchor,
        );
        assert_eq!(
            errors.get(&2),
            Some(&vec![Violation::ConsecutiveNights { run: 5, cap: 4 }])
        );
    }

    #[test]
    fn test_anchor_evening_blocks_day_one_day_shift() {
        let sequence = seq(&["D"]);
        let anchor = Anchor {
            code: ShiftCode::new("E"),
            run_length: 2,
        };
        let errors = validate_staff(
            &sequence,
            ValidationWindow::through(1),
            &rules(),
            &StaffConstraints::default(),
            &anchor,
        );
        assert!(
            errors[&1]
                .iter()
                .any(|v| matches!(v, Violation::InsufficientRest { .. }))
        );
    }

    #[test]
    fn test_diversity_only_checked_for_full_month() {
        let sequence = seq(&["D", "D", "OFF", "E", "E", "OFF", "OFF", "N", "N"]);
        let incremental = validate_staff(
            &sequence,
            ValidationWindow::through(9),
            &rules(),
            &StaffConstraints::default(),
            &Anchor::default(),
        );
        assert!(incremental.is_empty());

        let full = validate_staff(
            &sequence,
            ValidationWindow::full_month(9),
            &rules(),
            &StaffConstraints::default(),
            &Anchor::default(),
        );
        // window 2..=8 holds D, E and N
        assert_eq!(
            full.get(&8),
            Some(&vec![Violation::WeeklyDiversity { distinct: 3, cap: 2 }])
        );
        // window 3..=9 is back to two codes
        assert!(!full.contains_key(&9));
        assert!(!full.contains_key(&7));
    }

    #[test]
    fn test_diversity_cap_is_configurable() {
        let mut rules = rules();
        rules.max_distinct_shifts_per_week = 3;
        let sequence = seq(&["D", "D", "OFF", "E", "E", "OFF", "OFF", "N", "N"]);
        let errors = validate_staff(
            &sequence,
            ValidationWindow::full_month(9),
            &rules,
            &StaffConstraints::default(),
            &Anchor::default(),
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn test_empty_cells_count_as_rest() {
        let errors = check(&["D", "D", "", "N", "N"], &StaffConstraints::default());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_window_beyond_sequence_is_clamped() {
        let sequence = seq(&["D", "D"]);
        let errors = validate_staff(
            &sequence,
            ValidationWindow::full_month(31),
            &rules(),
            &StaffConstraints::default(),
            &Anchor::default(),
        );
        assert!(errors.is_empty());
        assert!(
            validate_staff(
                &[],
                ValidationWindow::full_month(31),
                &rules(),
                &StaffConstraints::default(),
                &Anchor::default(),
            )
            .is_empty()
        );
    }

    #[test]
    fn test_anchor_from_rest_tail() {
        let tail = [ShiftCode::new("N"), ShiftCode::requested_rest()];
        let anchor = Anchor::from_tail(&tail);
        assert_eq!(anchor.code, ShiftCode::requested_rest());
        assert_eq!(anchor.run_length, 1);
    }

    #[test]
    fn test_validate_roster_reports_staff_and_coverage() {
        let period = Period::new(2026, 3);
        let mut requirements = crate::config::StaffingRequirements::default();
        requirements.set("D", [1; 7]);
        let settings = UnitSettings::three_shift("ward").with_requirements(requirements);

        let protected = StaffMember::new("p", "Protected").with_constraints(StaffConstraints {
            protected: true,
            ..Default::default()
        });
        let mut roster = Roster::new();
        for day in 1..=31 {
            let code = if day % 2 == 0 { "OFF" } else { "E" };
            roster.set("p", day, ShiftCode::new(code));
        }

        let report = validate_roster(
            &roster,
            period,
            &[protected],
            &settings,
            &PriorSubmissions::new(),
        );
        assert!(report.staff_errors["p"].contains_key(&1));
        assert!(!report.staff_errors["p"].contains_key(&2));
        assert_eq!(report.coverage_issues.len(), 31);
    }

    #[test]
    fn test_validate_roster_with_invalid_period_is_empty() {
        let report = validate_roster(
            &Roster::new(),
            Period::new(2026, 13),
            &[StaffMember::new("a", "A")],
            &UnitSettings::three_shift("ward"),
            &PriorSubmissions::new(),
        );
        assert!(report.is_clean());
    }
}
