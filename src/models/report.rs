//! Validation and quality report models.
//!
//! These are the outputs of the stateless auditing functions: hard-rule
//! violations per staff member and day, coverage shortfalls per day, and the
//! weighted quality breakdown of a completed roster.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::shift_code::ShiftCode;

/// A hard-rule violation on one day of one staff member's sequence.
///
/// # Example
///
/// ```
/// use roster_engine::models::{ShiftCode, Violation};
///
/// let violation = Violation::ProtectedStaff { code: ShiftCode::new("N") };
/// assert_eq!(violation.to_string(), "protected staff cannot work N");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Violation {
    /// Too many work days in a row.
    #[error("{run} consecutive work days exceeds the limit of {cap}")]
    ConsecutiveWorkDays {
        /// Length of the run ending on this day.
        run: u32,
        /// Effective cap.
        cap: u32,
    },

    /// Too many nights in a row.
    #[error("{run} consecutive nights exceeds the limit of {cap}")]
    ConsecutiveNights {
        /// Length of the night run ending on this day.
        run: u32,
        /// Effective cap.
        cap: u32,
    },

    /// Evening or night work for a protected staff member.
    #[error("protected staff cannot work {code}")]
    ProtectedStaff {
        /// The offending code.
        code: ShiftCode,
    },

    /// Day work straight after evening work.
    #[error("insufficient rest between {previous} and {code}")]
    InsufficientRest {
        /// The previous day's evening code.
        previous: ShiftCode,
        /// This day's day-shift code.
        code: ShiftCode,
    },

    /// Night work entered directly from non-night work.
    #[error("night shift {code} must follow rest or another night, not {previous}")]
    NightEntry {
        /// The previous day's work code.
        previous: ShiftCode,
        /// This day's night code.
        code: ShiftCode,
    },

    /// A run of one code ended before reaching the minimum length.
    #[error("run of {run} x {previous} before switching to {code} is shorter than {min}")]
    ShortRun {
        /// The code whose run ended.
        previous: ShiftCode,
        /// The code that replaced it.
        code: ShiftCode,
        /// Length of the ended run.
        run: u32,
        /// Configured minimum run length.
        min: u32,
    },

    /// Too many distinct work codes in the 7-day window ending on this day.
    #[error("{distinct} distinct shifts in 7 days exceeds the limit of {cap}")]
    WeeklyDiversity {
        /// Distinct work codes in the window.
        distinct: u32,
        /// Configured cap.
        cap: u32,
    },
}

/// Day (1-based) to the violations found on that day.
pub type StaffViolations = BTreeMap<u32, Vec<Violation>>;

/// A shift on a day staffed below its weekday minimum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageShortfall {
    /// The under-staffed shift code.
    pub code: ShiftCode,
    /// Required headcount for this weekday.
    pub required: u32,
    /// Actual headcount.
    pub actual: u32,
}

impl std::fmt::Display for CoverageShortfall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} staffed {} of {} required",
            self.code, self.actual, self.required
        )
    }
}

/// Full-month audit of a roster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Staff identifier to that staff member's violations. Clean staff are omitted.
    pub staff_errors: BTreeMap<String, StaffViolations>,
    /// Day to the shifts that fell short on that day. Fully staffed days are omitted.
    pub coverage_issues: BTreeMap<u32, Vec<CoverageShortfall>>,
}

impl ValidationReport {
    /// Returns true when neither rule violations nor shortfalls were found.
    pub fn is_clean(&self) -> bool {
        self.staff_errors.is_empty() && self.coverage_issues.is_empty()
    }

    /// Total number of individual rule violations.
    pub fn violation_count(&self) -> usize {
        self.staff_errors
            .values()
            .flat_map(BTreeMap::values)
            .map(Vec::len)
            .sum()
    }
}

/// The four quality categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreCategory {
    /// Requirement units met across the month.
    Coverage,
    /// Wishes honored.
    Satisfaction,
    /// Spread of rest days between staff.
    Fairness,
    /// Adjacency hazards avoided.
    Health,
}

impl ScoreCategory {
    /// All categories in reporting order.
    pub const ALL: [ScoreCategory; 4] = [
        ScoreCategory::Coverage,
        ScoreCategory::Satisfaction,
        ScoreCategory::Fairness,
        ScoreCategory::Health,
    ];
}

/// Points earned in one category out of its maximum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScore {
    /// Points earned, rounded to two places.
    pub score: Decimal,
    /// Category weight.
    pub max_score: Decimal,
}

/// Weighted multi-category quality of a completed roster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Per-category results. Zero-weight categories report 0/0.
    pub categories: BTreeMap<ScoreCategory, CategoryScore>,
    /// Sum of category scores.
    pub total: Decimal,
    /// Sum of category maxima.
    pub total_max: Decimal,
    /// Whether `total` reaches 60% of `total_max`.
    pub pass: bool,
}

impl ScoreBreakdown {
    /// A breakdown with every category at 0/0.
    pub fn zero() -> Self {
        Self {
            categories: ScoreCategory::ALL
                .iter()
                .map(|category| (*category, CategoryScore::default()))
                .collect(),
            total: Decimal::ZERO,
            total_max: Decimal::ZERO,
            pass: false,
        }
    }

    /// Returns the result for one category.
    pub fn category(&self, category: ScoreCategory) -> CategoryScore {
        self.categories.get(&category).copied().unwrap_or_default()
    }
}
