//! Staff member model and per-person scheduling constraints.

use serde::{Deserialize, Serialize};

/// Flags and personal caps that shape how a staff member may be scheduled.
///
/// All flags default to `false` and all caps to "use the unit default", so
/// an empty JSON object describes an unconstrained staff member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaffConstraints {
    /// Pregnancy or postpartum protection: no evening or night work.
    pub protected: bool,
    /// Works nights only.
    pub fixed_night: bool,
    /// Works evenings only.
    pub fixed_evening: bool,
    /// Rotates between day and evening work only.
    pub day_evening_rotation: bool,
    /// Personal cap on consecutive work days, overriding the unit default.
    pub max_consecutive_work_days: Option<u32>,
    /// Personal cap on consecutive nights, combined with the unit cap by minimum.
    pub max_consecutive_nights: Option<u32>,
    /// Eligible for batch (block) assignment.
    pub batch_eligible: bool,
}

/// A member of the unit roster. Immutable input to a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    /// Unique identifier for the staff member.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Rank or grade within the unit (e.g. "charge", "senior", "staff").
    #[serde(default)]
    pub rank: String,
    /// Scheduling constraint flags.
    #[serde(default)]
    pub constraints: StaffConstraints,
}

impl StaffMember {
    /// Creates an unconstrained staff member.
    ///
    /// # Examples
    ///
    /// ```
    /// use roster_engine::models::StaffMember;
    ///
    /// let nurse = StaffMember::new("n_001", "Kim");
    /// assert!(!nurse.constraints.protected);
    /// assert!(nurse.rank.is_empty());
    /// ```
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rank: String::new(),
            constraints: StaffConstraints::default(),
        }
    }

    /// Returns the same staff member with the given constraints.
    pub fn with_constraints(mut self, constraints: StaffConstraints) -> Self {
        self.constraints = constraints;
        self
    }
}
