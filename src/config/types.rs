//! Configuration types for a scheduling unit.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from a unit's YAML files, or sent inline as JSON.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{ShiftCode, ShiftKind};

/// Metadata about the unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitMetadata {
    /// Human-readable unit name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
}

/// A work code the unit schedules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftDefinition {
    /// Code written into roster cells.
    pub code: ShiftCode,
    /// Display label.
    pub label: String,
    /// What kind of work the code denotes.
    pub kind: ShiftKind,
}

impl ShiftDefinition {
    /// Creates a shift definition.
    pub fn new(code: &str, label: &str, kind: ShiftKind) -> Self {
        Self {
            code: ShiftCode::new(code),
            label: label.to_string(),
            kind,
        }
    }
}

/// `unit.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct UnitFile {
    /// Unit name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Shift vocabulary.
    pub shifts: Vec<ShiftDefinition>,
}

fn default_max_consecutive_work_days() -> u32 {
    6
}

fn default_max_consecutive_nights() -> u32 {
    4
}

fn default_min_run_length() -> u32 {
    2
}

fn default_max_distinct_shifts_per_week() -> u32 {
    2
}

fn default_time_budget_secs() -> u64 {
    30
}

/// Hard-rule parameters from `rules.yaml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Unit default cap on consecutive work days.
    #[serde(default = "default_max_consecutive_work_days")]
    pub max_consecutive_work_days: u32,
    /// Unit cap on consecutive nights.
    #[serde(default = "default_max_consecutive_nights")]
    pub max_consecutive_nights: u32,
    /// Minimum length of a run of one work code before switching codes.
    #[serde(default = "default_min_run_length")]
    pub min_run_length: u32,
    /// Maximum distinct work codes in any 7-day window (2 or 3).
    #[serde(default = "default_max_distinct_shifts_per_week")]
    pub max_distinct_shifts_per_week: u32,
    /// Wall-clock budget for one solver run, in seconds.
    #[serde(default = "default_time_budget_secs")]
    pub time_budget_secs: u64,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            max_consecutive_work_days: default_max_consecutive_work_days(),
            max_consecutive_nights: default_max_consecutive_nights(),
            min_run_length: default_min_run_length(),
            max_distinct_shifts_per_week: default_max_distinct_shifts_per_week(),
            time_budget_secs: default_time_budget_secs(),
        }
    }
}

/// Minimum headcount per shift code per weekday (Sunday = index 0).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffingRequirements {
    /// Shift code to seven weekday minimums.
    #[serde(default)]
    pub requirements: BTreeMap<ShiftCode, [u32; 7]>,
}

impl StaffingRequirements {
    /// Required headcount for `code` on weekday `weekday` (0 = Sunday).
    pub fn required(&self, code: &ShiftCode, weekday: usize) -> u32 {
        self.requirements
            .get(code)
            .and_then(|per_weekday| per_weekday.get(weekday))
            .copied()
            .unwrap_or(0)
    }

    /// Sets the seven weekday minimums for `code`.
    pub fn set(&mut self, code: &str, per_weekday: [u32; 7]) {
        self.requirements.insert(ShiftCode::new(code), per_weekday);
    }
}

fn default_enabled() -> bool {
    true
}

/// One weighted sub-item of a quality category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringItem {
    /// Sub-item name.
    pub name: String,
    /// Points contributed when enabled.
    pub weight: u32,
    /// Disabled items contribute nothing to the category weight.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl ScoringItem {
    /// Creates an enabled sub-item.
    pub fn new(name: &str, weight: u32) -> Self {
        Self {
            name: name.to_string(),
            weight,
            enabled: true,
        }
    }
}

/// Quality category configuration from `scoring.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Coverage/efficiency sub-items.
    pub coverage: Vec<ScoringItem>,
    /// Wish satisfaction sub-items.
    pub satisfaction: Vec<ScoringItem>,
    /// Rest-day fairness sub-items.
    pub fairness: Vec<ScoringItem>,
    /// Health (turnaround) sub-items.
    pub health: Vec<ScoringItem>,
}

impl ScoringConfig {
    /// The default weighting: 40 / 30 / 15 / 15.
    pub fn standard() -> Self {
        Self {
            coverage: vec![ScoringItem::new("shift_minimums", 40)],
            satisfaction: vec![ScoringItem::new("wishes_honored", 30)],
            fairness: vec![ScoringItem::new("rest_day_spread", 15)],
            health: vec![ScoringItem::new("turnaround_hazards", 15)],
        }
    }

    /// Sum of enabled sub-item weights for each category.
    pub fn weights(&self) -> ScoreWeights {
        fn sum(items: &[ScoringItem]) -> u32 {
            items
                .iter()
                .filter(|item| item.enabled)
                .map(|item| item.weight)
                .sum()
        }

        ScoreWeights {
            coverage: sum(&self.coverage),
            satisfaction: sum(&self.satisfaction),
            fairness: sum(&self.fairness),
            health: sum(&self.health),
        }
    }
}

/// Resolved category weights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreWeights {
    /// Coverage/efficiency maximum.
    pub coverage: u32,
    /// Satisfaction maximum.
    pub satisfaction: u32,
    /// Fairness maximum.
    pub fairness: u32,
    /// Health maximum.
    pub health: u32,
}

/// Shift code to kind lookup built from the unit's definitions.
///
/// Rest codes always resolve to [`ShiftKind::Rest`]; codes the unit does not
/// define are treated as uncategorized work.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShiftCatalog {
    kinds: BTreeMap<ShiftCode, ShiftKind>,
}

impl ShiftCatalog {
    /// Builds a catalog from shift definitions.
    pub fn from_definitions(shifts: &[ShiftDefinition]) -> Self {
        Self {
            kinds: shifts
                .iter()
                .map(|shift| (shift.code.clone(), shift.kind))
                .collect(),
        }
    }

    /// The kind a code denotes.
    pub fn kind_of(&self, code: &ShiftCode) -> ShiftKind {
        if code.is_rest() {
            return ShiftKind::Rest;
        }
        self.kinds.get(code).copied().unwrap_or(ShiftKind::Other)
    }

    /// Kind of an optional cell; an empty cell counts as rest.
    pub fn kind_of_cell(&self, cell: Option<&ShiftCode>) -> ShiftKind {
        cell.map_or(ShiftKind::Rest, |code| self.kind_of(code))
    }
}

/// The complete configuration of a scheduling unit.
///
/// # Example
///
/// ```
/// use roster_engine::config::UnitSettings;
/// use roster_engine::models::{ShiftCode, ShiftKind};
///
/// let settings = UnitSettings::three_shift("Ward 7");
/// assert_eq!(settings.work_codes().len(), 3);
/// assert_eq!(settings.code_of_kind(ShiftKind::Night), Some(&ShiftCode::new("N")));
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSettings {
    metadata: UnitMetadata,
    shifts: Vec<ShiftDefinition>,
    #[serde(default)]
    rules: RuleConfig,
    #[serde(default)]
    requirements: StaffingRequirements,
    #[serde(default = "ScoringConfig::standard")]
    scoring: ScoringConfig,
}

impl UnitSettings {
    /// Creates unit settings from their component parts.
    pub fn new(
        metadata: UnitMetadata,
        shifts: Vec<ShiftDefinition>,
        rules: RuleConfig,
        requirements: StaffingRequirements,
        scoring: ScoringConfig,
    ) -> Self {
        Self {
            metadata,
            shifts,
            rules,
            requirements,
            scoring,
        }
    }

    /// A day/evening/night unit with default rules, standard scoring and no
    /// staffing minimums.
    pub fn three_shift(name: &str) -> Self {
        Self::new(
            UnitMetadata {
                name: name.to_string(),
                description: String::new(),
            },
            vec![
                ShiftDefinition::new("D", "Day", ShiftKind::Day),
                ShiftDefinition::new("E", "Evening", ShiftKind::Evening),
                ShiftDefinition::new("N", "Night", ShiftKind::Night),
            ],
            RuleConfig::default(),
            StaffingRequirements::default(),
            ScoringConfig::standard(),
        )
    }

    /// Returns the same settings with different rules.
    pub fn with_rules(mut self, rules: RuleConfig) -> Self {
        self.rules = rules;
        self
    }

    /// Returns the same settings with different staffing requirements.
    pub fn with_requirements(mut self, requirements: StaffingRequirements) -> Self {
        self.requirements = requirements;
        self
    }

    /// Returns the same settings with a different scoring configuration.
    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }

    /// Returns the unit metadata.
    pub fn metadata(&self) -> &UnitMetadata {
        &self.metadata
    }

    /// Returns the shift definitions in declaration order.
    pub fn shifts(&self) -> &[ShiftDefinition] {
        &self.shifts
    }

    /// Returns the hard-rule parameters.
    pub fn rules(&self) -> &RuleConfig {
        &self.rules
    }

    /// Returns the staffing requirements.
    pub fn requirements(&self) -> &StaffingRequirements {
        &self.requirements
    }

    /// Returns the scoring configuration.
    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    /// Every work code, in declaration order.
    pub fn work_codes(&self) -> Vec<ShiftCode> {
        self.shifts.iter().map(|shift| shift.code.clone()).collect()
    }

    /// Work codes of one kind, in declaration order.
    pub fn codes_of_kind(&self, kind: ShiftKind) -> Vec<ShiftCode> {
        self.shifts
            .iter()
            .filter(|shift| shift.kind == kind)
            .map(|shift| shift.code.clone())
            .collect()
    }

    /// The first declared code of a kind.
    pub fn code_of_kind(&self, kind: ShiftKind) -> Option<&ShiftCode> {
        self.shifts
            .iter()
            .find(|shift| shift.kind == kind)
            .map(|shift| &shift.code)
    }

    /// Builds the code-to-kind lookup.
    pub fn catalog(&self) -> ShiftCatalog {
        ShiftCatalog::from_definitions(&self.shifts)
    }

    /// Checks the settings for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] when:
    /// - no shifts are defined, or a code is defined twice
    /// - a shift redefines a universal rest code or declares kind `rest`
    /// - a staffing requirement names an undefined code
    /// - a cap or minimum is zero, or the weekly diversity cap is not 2 or 3
    pub fn validate(&self) -> EngineResult<()> {
        if self.shifts.is_empty() {
            return Err(invalid("shifts", "at least one shift must be defined"));
        }

        let mut seen = HashSet::new();
        for shift in &self.shifts {
            if shift.code.is_rest() {
                return Err(invalid(
                    "shifts",
                    format!("'{}' is a reserved rest code", shift.code),
                ));
            }
            if shift.kind == ShiftKind::Rest {
                return Err(invalid(
                    "shifts",
                    format!("'{}' cannot declare kind 'rest'", shift.code),
                ));
            }
            if !seen.insert(&shift.code) {
                return Err(invalid(
                    "shifts",
                    format!("'{}' is defined more than once", shift.code),
                ));
            }
        }

        if let Some(code) = self
            .requirements
            .requirements
            .keys()
            .find(|code| !seen.contains(code))
        {
            return Err(invalid(
                "requirements",
                format!("'{code}' is not a defined shift"),
            ));
        }

        let rules = &self.rules;
        if rules.max_consecutive_work_days == 0 || rules.max_consecutive_nights == 0 {
            return Err(invalid("rules", "consecutive caps must be at least 1"));
        }
        if rules.min_run_length == 0 {
            return Err(invalid("rules.min_run_length", "must be at least 1"));
        }
        if !(2..=3).contains(&rules.max_distinct_shifts_per_week) {
            return Err(invalid(
                "rules.max_distinct_shifts_per_week",
                format!("must be 2 or 3, got {}", rules.max_distinct_shifts_per_week),
            ));
        }

        Ok(())
    }
}

fn invalid(field: &str, message: impl Into<String>) -> EngineError {
    EngineError::InvalidConfig {
        field: field.to_string(),
        message: message.into(),
    }
}
