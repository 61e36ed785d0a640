//! Run entry point.
//!
//! [`run`] chains context building, fixed-shift prefill and the search, and
//! is the failure boundary of the engine: it never returns an error and never
//! unwinds. Faults become an empty roster, a log line and
//! [`RunOutcome::Failed`].

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::UnitSettings;
use crate::error::{EngineError, EngineResult};
use crate::models::{Period, PriorSubmissions, Roster, ScoreBreakdown, StaffMember};

use super::context::build_context;
use super::prefill::prefill_fixed_shifts;
use super::quality::calculate;
use super::solver::{SolveStatus, SolverOptions, solve};
use super::strategy::Strategy;

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    /// Every day was processed.
    Completed,
    /// The time budget ran out; days after `last_completed_day` are missing.
    TimedOut {
        /// Last fully processed day (0 if none).
        last_completed_day: u32,
    },
    /// The pipeline faulted; the roster is empty.
    Failed {
        /// Description of the fault.
        message: String,
    },
}

/// Result of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutput {
    /// Correlation identifier, also attached to tracing events.
    pub run_id: Uuid,
    /// Strategy used.
    pub strategy: Strategy,
    /// Staff to day (1-based) to code. Empty on failure.
    pub roster: Roster,
    /// Human-readable run log, always present.
    pub logs: Vec<String>,
    /// How the run ended.
    pub outcome: RunOutcome,
}

impl RunOutput {
    fn failed(strategy: Strategy, message: String) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            strategy,
            roster: Roster::new(),
            logs: vec![format!("Run failed: {message}")],
            outcome: RunOutcome::Failed { message },
        }
    }

    /// Returns true when every day was processed.
    pub fn is_complete(&self) -> bool {
        self.outcome == RunOutcome::Completed
    }
}

/// Builds a roster for `period`.
///
/// Never fails: invalid input, internal errors and panics all come back as
/// [`RunOutcome::Failed`] with an empty roster. A timeout comes back as
/// [`RunOutcome::TimedOut`] with the days filled so far.
///
/// # Example
///
/// ```
/// use roster_engine::config::UnitSettings;
/// use roster_engine::models::{Period, PriorSubmissions, StaffMember};
/// use roster_engine::scheduling::{run, RunOutcome, SolverOptions, Strategy};
///
/// let staff = vec![StaffMember::new("n_001", "Kim"), StaffMember::new("n_002", "Lee")];
/// let output = run(
///     Period::new(2026, 2),
///     &staff,
///     &UnitSettings::three_shift("ward"),
///     &PriorSubmissions::new(),
///     Strategy::Balance,
///     &SolverOptions::default().with_seed(1),
/// );
/// assert_eq!(output.outcome, RunOutcome::Completed);
/// assert_eq!(output.roster.row("n_001").unwrap().len(), 28);
/// ```
pub fn run(
    period: Period,
    staff: &[StaffMember],
    settings: &UnitSettings,
    submissions: &PriorSubmissions,
    strategy: Strategy,
    options: &SolverOptions,
) -> RunOutput {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        run_pipeline(period, staff, settings, submissions, strategy, options)
    }));

    match result {
        Ok(Ok(output)) => output,
        Ok(Err(err)) => {
            tracing::warn!(period = %period, strategy = %strategy, error = %err, "Run failed");
            RunOutput::failed(strategy, err.to_string())
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::error!(period = %period, strategy = %strategy, panic = %message, "Run panicked");
            RunOutput::failed(strategy, format!("internal error: {message}"))
        }
    }
}

fn run_pipeline(
    period: Period,
    staff: &[StaffMember],
    settings: &UnitSettings,
    submissions: &PriorSubmissions,
    strategy: Strategy,
    options: &SolverOptions,
) -> EngineResult<RunOutput> {
    let mut context = build_context(period, staff, settings, submissions, strategy)?;
    tracing::info!(
        run_id = %context.run_id,
        period = %period,
        strategy = %strategy,
        staff = staff.len(),
        "Run started"
    );

    prefill_fixed_shifts(&mut context);

    let outcome = match solve(&mut context, options) {
        SolveStatus::Completed => {
            context.log(format!(
                "Completed {} days in {} ms",
                context.days,
                context.started_at.elapsed().as_millis()
            ));
            RunOutcome::Completed
        }
        SolveStatus::TimedOut { last_completed_day } => {
            RunOutcome::TimedOut { last_completed_day }
        }
    };

    Ok(RunOutput {
        run_id: context.run_id,
        strategy,
        roster: context.assignment.to_roster(),
        logs: context.logs,
        outcome,
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Immutable inputs shared by parallel runs.
#[derive(Debug, Clone)]
pub struct RunInputs {
    /// Month to schedule.
    pub period: Period,
    /// Staff in input order.
    pub staff: Vec<StaffMember>,
    /// Unit configuration.
    pub settings: UnitSettings,
    /// Submissions for the period.
    pub submissions: PriorSubmissions,
}

impl RunInputs {
    /// Runs one strategy over these inputs.
    pub fn run(&self, strategy: Strategy, options: &SolverOptions) -> RunOutput {
        run(
            self.period,
            &self.staff,
            &self.settings,
            &self.submissions,
            strategy,
            options,
        )
    }

    /// Scores a roster built from these inputs.
    pub fn score(&self, roster: &Roster) -> ScoreBreakdown {
        calculate(roster, self.period, &self.settings, &self.submissions)
    }
}

/// One strategy's output with its quality score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyComparison {
    /// The run.
    pub output: RunOutput,
    /// Quality of the run's roster.
    pub score: ScoreBreakdown,
}

/// Runs every strategy in parallel on the blocking pool.
///
/// Each task builds its own context from the shared inputs. Results come
/// back in [`Strategy::ALL`] order.
///
/// # Errors
///
/// Returns [`EngineError::SchedulingError`] if a task could not be joined.
/// Faults inside a run are reported through its [`RunOutcome`] instead.
pub async fn run_all_strategies(
    inputs: Arc<RunInputs>,
    options: SolverOptions,
) -> EngineResult<Vec<StrategyComparison>> {
    let handles: Vec<_> = Strategy::ALL
        .into_iter()
        .map(|strategy| {
            let inputs = Arc::clone(&inputs);
            tokio::task::spawn_blocking(move || {
                let output = inputs.run(strategy, &options);
                let score = inputs.score(&output.roster);
                StrategyComparison { output, score }
            })
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        let comparison = handle.await.map_err(|err| EngineError::SchedulingError {
            message: format!("strategy task failed: {err}"),
        })?;
        results.push(comparison);
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn staff(count: usize) -> Vec<StaffMember> {
        (0..count)
            .map(|i| StaffMember::new(format!("n_{i:03}"), format!("Nurse {i}")))
            .collect()
    }

    #[test]
    fn test_completed_run_covers_every_day() {
        let staff = staff(5);
        let output = run(
            Period::new(2024, 2),
            &staff,
            &UnitSettings::three_shift("ward"),
            &PriorSubmissions::new(),
            Strategy::Regularity,
            &SolverOptions::default().with_seed(11),
        );

        assert!(output.is_complete());
        assert_eq!(output.roster.len(), 5);
        for member in &staff {
            let row = output.roster.row(&member.id).unwrap();
            assert_eq!(row.keys().copied().collect::<Vec<_>>(), (1..=29).collect::<Vec<_>>());
        }
        assert!(output.logs.iter().any(|line| line.starts_with("Completed 29 days")));
    }

    #[test]
    fn test_invalid_period_fails_softly() {
        let output = run(
            Period::new(2026, 13),
            &staff(2),
            &UnitSettings::three_shift("ward"),
            &PriorSubmissions::new(),
            Strategy::Balance,
            &SolverOptions::default(),
        );

        assert!(output.roster.is_empty());
        assert!(matches!(output.outcome, RunOutcome::Failed { .. }));
        assert_eq!(output.logs, vec!["Run failed: Invalid period: 2026-13".to_string()]);
    }

    #[test]
    fn test_exhausted_budget_returns_partial_output() {
        let output = run(
            Period::new(2026, 3),
            &staff(3),
            &UnitSettings::three_shift("ward"),
            &PriorSubmissions::new(),
            Strategy::WishPriority,
            &SolverOptions::default().with_time_budget(Duration::ZERO),
        );

        assert_eq!(
            output.outcome,
            RunOutcome::TimedOut {
                last_completed_day: 0
            }
        );
        assert!(output.logs.iter().any(|line| line.contains("Timed out")));
        assert!(output.roster.is_empty());
    }

    #[test]
    fn test_panic_message_extraction() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
        let payload: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_value(RunOutcome::TimedOut {
            last_completed_day: 12,
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "status": "timed_out", "last_completed_day": 12 })
        );
    }

    #[tokio::test]
    async fn test_all_strategies_run_independently() {
        let inputs = Arc::new(RunInputs {
            period: Period::new(2026, 4),
            staff: staff(6),
            settings: UnitSettings::three_shift("ward"),
            submissions: PriorSubmissions::new(),
        });

        let results = run_all_strategies(inputs, SolverOptions::default().with_seed(3))
            .await
            .unwrap();

        assert_eq!(results.len(), 3);
        let strategies: Vec<Strategy> = results.iter().map(|r| r.output.strategy).collect();
        assert_eq!(strategies, Strategy::ALL.to_vec());
        for result in &results {
            assert!(result.output.is_complete());
            assert!(result.score.total_max > rust_decimal::Decimal::ZERO);
        }
        let ids: std::collections::HashSet<Uuid> =
            results.iter().map(|r| r.output.run_id).collect();
        assert_eq!(ids.len(), 3);
    }
}
