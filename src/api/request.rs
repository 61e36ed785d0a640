//! Request types for the roster engine API.
//!
//! Every body may carry an inline `unit`; without one the server's loaded
//! unit configuration is used.

use serde::{Deserialize, Serialize};

use crate::config::UnitSettings;
use crate::error::EngineResult;
use crate::models::{Period, PriorSubmissions, Roster, StaffMember};
use crate::scheduling::{SolverOptions, Strategy};

/// Request body for `POST /schedule`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRequest {
    /// The month to schedule.
    pub period: Period,
    /// Staff in priority order.
    pub staff: Vec<StaffMember>,
    /// Per-staff wishes, priorities and previous-period tails.
    #[serde(default)]
    pub submissions: PriorSubmissions,
    /// Strategy name (`balance`, `wish_priority`, `regularity`). Defaults to balance.
    #[serde(default)]
    pub strategy: Option<String>,
    /// Seed for a reproducible run.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Inline unit configuration overriding the server's.
    #[serde(default)]
    pub unit: Option<UnitSettings>,
}

impl ScheduleRequest {
    /// Parses the requested strategy, defaulting to balance.
    pub fn strategy(&self) -> EngineResult<Strategy> {
        self.strategy
            .as_deref()
            .map_or(Ok(Strategy::default()), str::parse)
    }
}

/// Request body for `POST /schedule/compare`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareRequest {
    /// The month to schedule.
    pub period: Period,
    /// Staff in priority order.
    pub staff: Vec<StaffMember>,
    /// Per-staff wishes, priorities and previous-period tails.
    #[serde(default)]
    pub submissions: PriorSubmissions,
    /// Seed shared by all three runs.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Inline unit configuration overriding the server's.
    #[serde(default)]
    pub unit: Option<UnitSettings>,
}

/// Request body for `POST /validate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateRequest {
    /// The month the roster covers.
    pub period: Period,
    /// Staff whose rows are checked.
    pub staff: Vec<StaffMember>,
    /// The roster to audit.
    pub roster: Roster,
    /// Submissions, used for previous-period anchors.
    #[serde(default)]
    pub submissions: PriorSubmissions,
    /// Inline unit configuration overriding the server's.
    #[serde(default)]
    pub unit: Option<UnitSettings>,
}

/// Request body for `POST /score`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRequest {
    /// The month the roster covers.
    pub period: Period,
    /// The roster to score.
    pub roster: Roster,
    /// Submissions, used for wish satisfaction.
    #[serde(default)]
    pub submissions: PriorSubmissions,
    /// Inline unit configuration overriding the server's.
    #[serde(default)]
    pub unit: Option<UnitSettings>,
}

/// Solver options for a request: the unit's time budget plus an optional seed.
pub(crate) fn solver_options(settings: &UnitSettings, seed: Option<u64>) -> SolverOptions {
    let options = SolverOptions::from_rules(settings.rules());
    match seed {
        Some(seed) => options.with_seed(seed),
        None => options,
    }
}
