//! Candidate scoring strategies.
//!
//! A strategy only orders the codes the solver tries; legality is always the
//! validator's call. Every candidate starts at [`BASE_SCORE`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::ShiftCode;

use super::context::RunContext;

/// Starting score of every candidate.
pub const BASE_SCORE: i32 = 100;
/// Wish-priority bonus for the top-ranked preference.
pub const TOP_PRIORITY_BONUS: i32 = 500;
/// Wish-priority bonus for the second-ranked preference.
pub const SECOND_PRIORITY_BONUS: i32 = 300;
/// Regularity bonus for continuing yesterday's work code.
pub const CONTINUITY_BONUS: i32 = 200;
/// Balance penalty per earlier day with the same code.
pub const REPETITION_PENALTY: i32 = 10;
/// Bonus under every strategy for the top-ranked preference.
pub const BASELINE_PREFERENCE_BONUS: i32 = 50;
/// Penalty under every strategy for a code the staff asked to avoid that day.
pub const AVOIDED_CODE_PENALTY: i32 = 500;

/// The three candidate-ordering heuristics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Spread each code across the month.
    #[default]
    Balance,
    /// Favour each staff member's ranked preferences.
    WishPriority,
    /// Favour continuing runs of the same work code.
    Regularity,
}

impl Strategy {
    /// All strategies, for side-by-side comparison runs.
    pub const ALL: [Strategy; 3] = [
        Strategy::Balance,
        Strategy::WishPriority,
        Strategy::Regularity,
    ];
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Balance => write!(f, "balance"),
            Strategy::WishPriority => write!(f, "wish_priority"),
            Strategy::Regularity => write!(f, "regularity"),
        }
    }
}

impl FromStr for Strategy {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "balance" => Ok(Strategy::Balance),
            "wish_priority" => Ok(Strategy::WishPriority),
            "regularity" => Ok(Strategy::Regularity),
            _ => Err(EngineError::UnknownStrategy {
                name: s.to_string(),
            }),
        }
    }
}

/// Scores one candidate code for `staff_id` on `day`.
///
/// - wish priority: +500 for the top preference, +300 for the second
/// - regularity: +200 when repeating yesterday's work code
/// - balance: -10 for each earlier day this month with the same code
/// - every strategy: +50 for the top preference, -500 for a code the staff
///   asked to avoid on this day
pub fn score_candidate(
    context: &RunContext<'_>,
    staff_id: &str,
    day: u32,
    candidate: &ShiftCode,
) -> i32 {
    let priorities = context.priorities.get(staff_id);
    let top = priorities.and_then(|p| p.first());
    let second = priorities.and_then(|p| p.get(1));

    let mut score = BASE_SCORE;

    match context.strategy {
        Strategy::WishPriority => {
            if top == Some(candidate) {
                score += TOP_PRIORITY_BONUS;
            } else if second == Some(candidate) {
                score += SECOND_PRIORITY_BONUS;
            }
        }
        Strategy::Regularity => {
            let previous = context.assignment.get(staff_id, day.saturating_sub(1));
            let previous_is_work =
                previous.is_some_and(|code| context.rules.catalog.kind_of(code).is_work());
            if previous_is_work && previous == Some(candidate) {
                score += CONTINUITY_BONUS;
            }
        }
        Strategy::Balance => {
            let prior_uses = context.assignment.count_before(staff_id, candidate, day);
            score -= REPETITION_PENALTY * prior_uses as i32;
        }
    }

    if top == Some(candidate) {
        score += BASELINE_PREFERENCE_BONUS;
    }

    let avoided = context
        .submission(staff_id)
        .and_then(|submission| submission.avoided_on(day));
    if avoided == Some(candidate) {
        score -= AVOIDED_CODE_PENALTY;
    }

    score
}

/// The staff member's whitelist, best-scored first. Ties keep whitelist order.
pub fn ranked_candidates(context: &RunContext<'_>, staff_id: &str, day: u32) -> Vec<ShiftCode> {
    let mut scored: Vec<(i32, &ShiftCode)> = context
        .whitelist(staff_id)
        .iter()
        .map(|code| (score_candidate(context, staff_id, day, code), code))
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, code)| code.clone()).collect()
}
