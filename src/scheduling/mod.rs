//! Scheduling pipeline.
//!
//! A run flows through these stages:
//!
//! 1. [`build_context`]: lanes, whitelists, anchors and seeded wishes
//! 2. [`prefill_fixed_shifts`]: fixed-night and fixed-evening lanes
//! 3. [`solve`]: day-by-day search ordered by a [`Strategy`]
//!
//! [`run`] drives all three behind a failure boundary. The auditing
//! functions ([`validate_staff`], [`validate_daily_coverage`],
//! [`validate_roster`], [`calculate`]) are pure and work on any roster.

mod context;
mod coverage;
mod engine;
mod lane;
mod prefill;
mod quality;
mod solver;
mod strategy;
mod validator;

pub use context::{Assignment, RunContext, build_context};
pub use coverage::validate_daily_coverage;
pub use engine::{
    RunInputs, RunOutcome, RunOutput, StrategyComparison, run, run_all_strategies,
};
pub use lane::{Lane, classify_lane, whitelist_for};
pub use prefill::prefill_fixed_shifts;
pub use quality::{FAIRNESS_STDEV_CAP, HEALTH_HAZARD_PENALTY, PASS_RATIO, calculate};
pub use solver::{DEFAULT_TIME_BUDGET, SolveStatus, SolverOptions, solve};
pub use strategy::{Strategy, ranked_candidates, score_candidate};
pub use validator::{
    Anchor, DIVERSITY_WINDOW_DAYS, ValidationRules, ValidationWindow, validate_roster,
    validate_staff,
};
