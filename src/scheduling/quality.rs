//! Post-hoc quality scoring of a completed roster.
//!
//! Four weighted categories, each scaled to its configured maximum:
//!
//! | Category     | Measures                                           |
//! |--------------|----------------------------------------------------|
//! | coverage     | requirement units met across every day and shift   |
//! | satisfaction | non-mandatory wishes honored                       |
//! | fairness     | spread of requested-rest days between staff        |
//! | health       | evening/night shifts followed directly by a day    |
//!
//! A category with weight 0 reports 0/0. Scores are rounded to two places.

use rust_decimal::{Decimal, MathematicalOps};

use crate::config::{ShiftCatalog, UnitSettings};
use crate::models::{
    CategoryScore, Period, PriorSubmissions, Roster, ScoreBreakdown, ScoreCategory, ShiftKind,
    Wish,
};

/// Share of the maximum a roster must reach to pass (60%).
pub const PASS_RATIO: Decimal = Decimal::from_parts(6, 0, 0, false, 1);

/// Rest-day standard deviation at which fairness reaches zero.
pub const FAIRNESS_STDEV_CAP: Decimal = Decimal::from_parts(25, 0, 0, false, 1);

/// Share of the health maximum lost per turnaround hazard (10%).
pub const HEALTH_HAZARD_PENALTY: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

/// Scores a roster for `period` against the unit's weights.
///
/// An empty roster or an invalid period yields [`ScoreBreakdown::zero`].
pub fn calculate(
    roster: &Roster,
    period: Period,
    settings: &UnitSettings,
    submissions: &PriorSubmissions,
) -> ScoreBreakdown {
    let Some(days) = period.days_in_month() else {
        return ScoreBreakdown::zero();
    };
    if roster.is_empty() {
        return ScoreBreakdown::zero();
    }

    let weights = settings.scoring().weights();
    let catalog = settings.catalog();

    let mut breakdown = ScoreBreakdown::zero();
    for category in ScoreCategory::ALL {
        let weight = match category {
            ScoreCategory::Coverage => weights.coverage,
            ScoreCategory::Satisfaction => weights.satisfaction,
            ScoreCategory::Fairness => weights.fairness,
            ScoreCategory::Health => weights.health,
        };
        if weight == 0 {
            continue;
        }

        let max_score = Decimal::from(weight);
        let score = match category {
            ScoreCategory::Coverage => max_score * coverage_ratio(roster, period, days, settings),
            ScoreCategory::Satisfaction => {
                max_score * satisfaction_ratio(roster, days, submissions)
            }
            ScoreCategory::Fairness => max_score * fairness_ratio(roster, days),
            ScoreCategory::Health => health_score(max_score, roster, days, &catalog),
        };

        let result = CategoryScore {
            score: score.round_dp(2),
            max_score,
        };
        breakdown.total += result.score;
        breakdown.total_max += result.max_score;
        breakdown.categories.insert(category, result);
    }

    breakdown.pass =
        breakdown.total_max > Decimal::ZERO && breakdown.total >= breakdown.total_max * PASS_RATIO;

    tracing::debug!(
        period = %period,
        total = %breakdown.total,
        total_max = %breakdown.total_max,
        pass = breakdown.pass,
        "Roster scored"
    );

    breakdown
}

/// Met requirement units over total requirement units; 1 when nothing is required.
fn coverage_ratio(roster: &Roster, period: Period, days: u32, settings: &UnitSettings) -> Decimal {
    let mut required_total = 0u32;
    let mut met = 0u32;

    for day in 1..=days {
        let Some(weekday) = period.weekday_index(day) else {
            continue;
        };
        for shift in settings.shifts() {
            let required = settings.requirements().required(&shift.code, weekday);
            required_total += required;
            met += roster.headcount(day, &shift.code).min(required);
        }
    }

    if required_total == 0 {
        Decimal::ONE
    } else {
        Decimal::from(met) / Decimal::from(required_total)
    }
}

/// Honored non-mandatory wishes over all non-mandatory wishes; 1 when none.
fn satisfaction_ratio(roster: &Roster, days: u32, submissions: &PriorSubmissions) -> Decimal {
    let mut total = 0u32;
    let mut honored = 0u32;

    for (staff_id, submission) in submissions.iter() {
        if roster.row(staff_id).is_none() {
            continue;
        }
        for (&day, wish) in &submission.wishes {
            if wish.is_mandatory() || day == 0 || day > days {
                continue;
            }
            total += 1;
            let satisfied = match roster.get(staff_id, day) {
                Some(actual) => wish.is_honored_by(actual),
                None => matches!(wish, Wish::Avoid(_)),
            };
            if satisfied {
                honored += 1;
            }
        }
    }

    if total == 0 {
        Decimal::ONE
    } else {
        Decimal::from(honored) / Decimal::from(total)
    }
}

/// `1 - min(1, stdev / 2.5)` over each staff member's requested-rest count.
fn fairness_ratio(roster: &Roster, days: u32) -> Decimal {
    let counts: Vec<Decimal> = roster
        .iter()
        .map(|(_, row)| {
            let rests = row
                .range(1..=days)
                .filter(|(_, code)| code.is_requested_rest())
                .count();
            Decimal::from(rests as u64)
        })
        .collect();

    let stdev = population_stdev(&counts);
    Decimal::ONE - (stdev / FAIRNESS_STDEV_CAP).min(Decimal::ONE)
}

fn population_stdev(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    let n = Decimal::from(values.len() as u64);
    let mean = values.iter().sum::<Decimal>() / n;
    let variance = values
        .iter()
        .map(|value| (*value - mean) * (*value - mean))
        .sum::<Decimal>()
        / n;
    variance.sqrt().unwrap_or(Decimal::ZERO)
}

/// Deducts 10% of the maximum per evening-to-day or night-to-day adjacency.
fn health_score(max_score: Decimal, roster: &Roster, days: u32, catalog: &ShiftCatalog) -> Decimal {
    let hazards: u32 = roster
        .iter()
        .map(|(_, row)| {
            (2..=days)
                .filter(|&day| {
                    let previous = catalog.kind_of_cell(row.get(&(day - 1)));
                    let current = catalog.kind_of_cell(row.get(&day));
                    current == ShiftKind::Day
                        && matches!(previous, ShiftKind::Evening | ShiftKind::Night)
                })
                .count() as u32
        })
        .sum();

    let penalty = max_score * HEALTH_HAZARD_PENALTY * Decimal::from(hazards);
    (max_score - penalty).max(Decimal::ZERO)
}
