//! Scheduling period model.
//!
//! A [`Period`] names the calendar month being rostered. Roster days are
//! numbered 1..=days_in_month; day 0 is the continuity anchor taken from the
//! previous period and never belongs to the published calendar.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The month being scheduled.
///
/// # Example
///
/// ```
/// use roster_engine::models::Period;
///
/// let period = Period::new(2024, 2);
/// assert_eq!(period.days_in_month(), Some(29));
/// // 2024-02-01 was a Thursday (Sunday = 0)
/// assert_eq!(period.weekday_index(1), Some(4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u32,
}

impl Period {
    /// Creates a period without checking it.
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Returns the first calendar date of the period, if the period is valid.
    pub fn first_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Returns the number of days in the month, if the period is valid.
    pub fn days_in_month(&self) -> Option<u32> {
        let first = self.first_date()?;
        let next = if self.month == 12 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)?
        };
        u32::try_from((next - first).num_days()).ok()
    }

    /// Returns the calendar date of roster day `day` (1-based).
    pub fn date_of(&self, day: u32) -> Option<NaiveDate> {
        if day == 0 {
            return None;
        }
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }

    /// Returns the weekday index of roster day `day`, Sunday = 0 through Saturday = 6.
    pub fn weekday_index(&self, day: u32) -> Option<usize> {
        self.date_of(day)
            .map(|date| date.weekday().num_days_from_sunday() as usize)
    }

    /// Checks the period and returns its day count.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPeriod`] if the year/month pair does not
    /// name a real calendar month.
    pub fn ensure_valid(&self) -> EngineResult<u32> {
        self.days_in_month().ok_or(EngineError::InvalidPeriod {
            year: self.year,
            month: self.month,
        })
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}
