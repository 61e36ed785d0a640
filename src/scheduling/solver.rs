//! Day-by-day backtracking search.
//!
//! Days are filled in order. Within a day, the staff still open are visited
//! in a shuffled order; each tries its whitelist best-scored first and keeps
//! the first code the validator accepts for that day. When nothing is
//! accepted the staff member is forced to rest, so a day never fails: the
//! search degrades quality instead of propagating infeasibility.
//!
//! The per-day search runs on an explicit frame stack rather than recursion,
//! so memory stays bounded by the number of staff on a day.

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::config::RuleConfig;
use crate::models::ShiftCode;

use super::context::RunContext;
use super::strategy::ranked_candidates;
use super::validator::{ValidationWindow, validate_staff};

/// Default wall-clock budget for one run.
pub const DEFAULT_TIME_BUDGET: Duration = Duration::from_secs(30);

/// Knobs for one solver run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverOptions {
    /// Wall-clock budget, sampled before each day.
    pub time_budget: Duration,
    /// Seed for the per-day staff shuffle; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            time_budget: DEFAULT_TIME_BUDGET,
            seed: None,
        }
    }
}

impl SolverOptions {
    /// Options using the unit's configured time budget.
    pub fn from_rules(rules: &RuleConfig) -> Self {
        Self {
            time_budget: Duration::from_secs(rules.time_budget_secs),
            seed: None,
        }
    }

    /// Returns the same options with a fixed seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Returns the same options with a different time budget.
    pub fn with_time_budget(mut self, time_budget: Duration) -> Self {
        self.time_budget = time_budget;
        self
    }
}

/// How the search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SolveStatus {
    /// Every day was processed.
    Completed,
    /// The budget ran out; days after `last_completed_day` are unfilled.
    TimedOut {
        /// Last fully processed day (0 if none).
        last_completed_day: u32,
    },
}

/// Per-day search states.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SearchState {
    /// Open a frame for the next unfilled staff member.
    Pending,
    /// Take the next untried candidate from the top frame.
    TryCandidate,
    /// Candidate written; ask the validator.
    Tentative(ShiftCode),
    /// Candidate accepted; move to the next staff member.
    Advance,
    /// Candidate rejected; undo and try the next one.
    Backtrack,
    /// Whitelist exhausted; rest unconditionally.
    ForceRest,
    /// Every staff member on this day holds a code.
    Done,
}

/// One staff member's place in the day's search.
#[derive(Debug)]
struct StaffFrame {
    /// Index into the run's staff slice.
    staff: usize,
    candidates: Vec<ShiftCode>,
    next: usize,
}

/// What one day's search did.
#[derive(Debug, Default)]
struct DayOutcome {
    forced: Vec<usize>,
    attempts: usize,
}

/// Fills every open cell of the context's assignment.
///
/// Cells already holding a code (wishes, prefill) are never touched. Before
/// each day the elapsed time since the context was built is compared with
/// the budget; once exceeded the search stops and the remaining days stay
/// empty.
pub fn solve(context: &mut RunContext<'_>, options: &SolverOptions) -> SolveStatus {
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut total_attempts = 0;
    let mut total_forced = 0;

    for day in 1..=context.days {
        let elapsed = context.started_at.elapsed();
        if elapsed >= options.time_budget {
            tracing::warn!(
                run_id = %context.run_id,
                day,
                elapsed_ms = elapsed.as_millis() as u64,
                "Time budget exhausted"
            );
            context.log(format!(
                "Timed out after {} ms before day {}; days {}-{} left unfilled",
                elapsed.as_millis(),
                day,
                day,
                context.days
            ));
            return SolveStatus::TimedOut {
                last_completed_day: day - 1,
            };
        }

        let mut order: Vec<usize> = context
            .staff
            .iter()
            .enumerate()
            .filter(|(_, member)| !context.assignment.is_set(&member.id, day))
            .map(|(index, _)| index)
            .collect();
        order.shuffle(&mut rng);

        let outcome = search_day(context, day, &order);
        total_attempts += outcome.attempts;
        total_forced += outcome.forced.len();

        if !outcome.forced.is_empty() {
            let staff = context.staff;
            let names: Vec<&str> = outcome
                .forced
                .iter()
                .map(|&index| staff[index].id.as_str())
                .collect();
            context.log(format!(
                "Day {}: no legal shift for {}, forced rest",
                day,
                names.join(", ")
            ));
        }
    }

    tracing::info!(
        run_id = %context.run_id,
        strategy = %context.strategy,
        attempts = total_attempts,
        forced_rest = total_forced,
        elapsed_ms = context.started_at.elapsed().as_millis() as u64,
        "Search completed"
    );
    SolveStatus::Completed
}

/// Runs the per-day state machine over `order`.
fn search_day(context: &mut RunContext<'_>, day: u32, order: &[usize]) -> DayOutcome {
    let staff = context.staff;
    let mut frames: Vec<StaffFrame> = Vec::with_capacity(order.len());
    let mut outcome = DayOutcome::default();
    let mut state = SearchState::Pending;

    loop {
        state = match state {
            SearchState::Pending => match order.get(frames.len()) {
                Some(&index) => {
                    frames.push(StaffFrame {
                        staff: index,
                        candidates: ranked_candidates(context, &staff[index].id, day),
                        next: 0,
                    });
                    SearchState::TryCandidate
                }
                None => SearchState::Done,
            },
            SearchState::TryCandidate => match frames.last_mut() {
                Some(frame) => match frame.candidates.get(frame.next).cloned() {
                    Some(code) => {
                        frame.next += 1;
                        SearchState::Tentative(code)
                    }
                    None => SearchState::ForceRest,
                },
                None => SearchState::Done,
            },
            SearchState::Tentative(code) => {
                let Some(frame) = frames.last() else {
                    break;
                };
                let member = &staff[frame.staff];
                context.assignment.set(&member.id, day, code);
                outcome.attempts += 1;

                let anchor = context.anchor(&member.id);
                let errors = validate_staff(
                    context.assignment.month(&member.id),
                    ValidationWindow::through(day),
                    &context.rules,
                    &member.constraints,
                    &anchor,
                );
                if errors.contains_key(&day) {
                    SearchState::Backtrack
                } else {
                    SearchState::Advance
                }
            }
            SearchState::Backtrack => {
                if let Some(frame) = frames.last() {
                    context.assignment.clear(&staff[frame.staff].id, day);
                }
                SearchState::TryCandidate
            }
            SearchState::ForceRest => {
                if let Some(frame) = frames.last() {
                    context.assignment.set(
                        &staff[frame.staff].id,
                        day,
                        ShiftCode::requested_rest(),
                    );
                    outcome.forced.push(frame.staff);
                }
                SearchState::Advance
            }
            SearchState::Advance => SearchState::Pending,
            SearchState::Done => break,
        };
    }

    outcome
}
