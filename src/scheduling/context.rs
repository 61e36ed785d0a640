//! Run context construction.
//!
//! The context builder turns plain inputs (period, roster of staff, unit
//! settings, submissions, strategy) into the working model of one run:
//! per-staff lane and whitelist, the day-0 continuity anchor, and an
//! assignment grid pre-seeded with every wish that fixes a cell.

use std::collections::{BTreeMap, HashSet};
use std::time::Instant;

use uuid::Uuid;

use crate::config::UnitSettings;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    MAX_PRIORITIES, Period, PreSubmission, PriorSubmissions, Roster, ShiftCode, StaffMember,
};

use super::lane::{Lane, classify_lane, whitelist_for};
use super::strategy::Strategy;
use super::validator::{Anchor, ValidationRules};

/// The working grid of one run: staff → day → code, with day 0 as anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    days: u32,
    rows: BTreeMap<String, Vec<Option<ShiftCode>>>,
}

impl Assignment {
    /// Creates an empty grid of `days` days (plus day 0) for each staff member.
    pub fn new<'a>(staff_ids: impl IntoIterator<Item = &'a str>, days: u32) -> Self {
        Self {
            days,
            rows: staff_ids
                .into_iter()
                .map(|id| (id.to_string(), vec![None; days as usize + 1]))
                .collect(),
        }
    }

    /// Number of roster days (day 0 excluded).
    pub fn days(&self) -> u32 {
        self.days
    }

    /// The code held by `staff_id` on `day` (day 0 is the anchor).
    pub fn get(&self, staff_id: &str, day: u32) -> Option<&ShiftCode> {
        self.rows
            .get(staff_id)
            .and_then(|row| row.get(day as usize))
            .and_then(Option::as_ref)
    }

    /// Whether the cell already holds a code.
    pub fn is_set(&self, staff_id: &str, day: u32) -> bool {
        self.get(staff_id, day).is_some()
    }

    /// Writes a cell. Unknown staff or out-of-range days are ignored.
    pub fn set(&mut self, staff_id: &str, day: u32, code: ShiftCode) {
        if let Some(cell) = self
            .rows
            .get_mut(staff_id)
            .and_then(|row| row.get_mut(day as usize))
        {
            *cell = Some(code);
        }
    }

    /// Empties a cell.
    pub fn clear(&mut self, staff_id: &str, day: u32) {
        if let Some(cell) = self
            .rows
            .get_mut(staff_id)
            .and_then(|row| row.get_mut(day as usize))
        {
            *cell = None;
        }
    }

    /// Days 1..=days of one staff member (index 0 holds day 1).
    pub fn month(&self, staff_id: &str) -> &[Option<ShiftCode>] {
        self.rows
            .get(staff_id)
            .map(|row| &row[1..])
            .unwrap_or_default()
    }

    /// How many days before `day` this month `staff_id` held `code`.
    pub fn count_before(&self, staff_id: &str, code: &ShiftCode, day: u32) -> u32 {
        self.month(staff_id)
            .iter()
            .take(day.saturating_sub(1) as usize)
            .filter(|cell| cell.as_ref() == Some(code))
            .count() as u32
    }

    /// Publishes days 1..=days as a roster. Empty cells are omitted.
    pub fn to_roster(&self) -> Roster {
        let mut roster = Roster::new();
        for (staff_id, row) in &self.rows {
            roster.ensure_staff(staff_id.as_str());
            for (day, cell) in row.iter().enumerate().skip(1) {
                if let Some(code) = cell {
                    roster.set(staff_id.as_str(), day as u32, code.clone());
                }
            }
        }
        roster
    }
}

/// Everything one run works on. Built fresh per invocation and never shared.
#[derive(Debug)]
pub struct RunContext<'a> {
    /// Identifier for log correlation.
    pub run_id: Uuid,
    /// The month being scheduled.
    pub period: Period,
    /// Days in the month.
    pub days: u32,
    /// Candidate scoring heuristic.
    pub strategy: Strategy,
    /// When the run started; the time budget is measured from here.
    pub started_at: Instant,
    /// Staff in input order.
    pub staff: &'a [StaffMember],
    /// Unit configuration.
    pub settings: &'a UnitSettings,
    /// Submissions for the period.
    pub submissions: &'a PriorSubmissions,
    /// Hard-rule parameters for the validator.
    pub rules: ValidationRules,
    /// Lane per staff identifier.
    pub lanes: BTreeMap<String, Lane>,
    /// Whitelist per staff identifier.
    pub whitelists: BTreeMap<String, Vec<ShiftCode>>,
    /// Day-0 anchor per staff identifier.
    pub anchors: BTreeMap<String, Anchor>,
    /// Ranked priorities per staff identifier, at most three.
    pub priorities: BTreeMap<String, Vec<ShiftCode>>,
    /// The grid being filled.
    pub assignment: Assignment,
    /// Human-readable run log returned to the caller.
    pub logs: Vec<String>,
}

impl<'a> RunContext<'a> {
    /// Appends a line to the run log.
    pub fn log(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(run_id = %self.run_id, "{}", message);
        self.logs.push(message);
    }

    /// The submission of `staff_id`, if any.
    pub fn submission(&self, staff_id: &str) -> Option<&'a PreSubmission> {
        self.submissions.get(staff_id)
    }

    /// The whitelist of `staff_id`; empty for unknown staff.
    pub fn whitelist(&self, staff_id: &str) -> &[ShiftCode] {
        self.whitelists
            .get(staff_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The anchor of `staff_id`.
    pub fn anchor(&self, staff_id: &str) -> Anchor {
        self.anchors.get(staff_id).cloned().unwrap_or_default()
    }
}

/// Builds the working model of one run.
///
/// For each staff member: classify the lane, derive the whitelist, set the
/// day-0 anchor (requested rest unless a previous-period tail was
/// submitted), and seed every wish that fixes a cell. Mandatory-rest wishes
/// are seeded as requested rest.
///
/// # Errors
///
/// - [`EngineError::InvalidPeriod`] if the period is not a real month
/// - [`EngineError::InvalidConfig`] if the unit settings are inconsistent
/// - [`EngineError::InvalidStaff`] on empty or duplicate staff identifiers
pub fn build_context<'a>(
    period: Period,
    staff: &'a [StaffMember],
    settings: &'a UnitSettings,
    submissions: &'a PriorSubmissions,
    strategy: Strategy,
) -> EngineResult<RunContext<'a>> {
    let days = period.ensure_valid()?;
    settings.validate()?;

    let mut seen = HashSet::new();
    for member in staff {
        if member.id.trim().is_empty() {
            return Err(EngineError::InvalidStaff {
                staff_id: member.id.clone(),
                message: "identifier must not be empty".to_string(),
            });
        }
        if !seen.insert(member.id.as_str()) {
            return Err(EngineError::InvalidStaff {
                staff_id: member.id.clone(),
                message: "duplicate identifier".to_string(),
            });
        }
    }

    let mut context = RunContext {
        run_id: Uuid::new_v4(),
        period,
        days,
        strategy,
        started_at: Instant::now(),
        staff,
        settings,
        submissions,
        rules: ValidationRules::from_settings(settings),
        lanes: BTreeMap::new(),
        whitelists: BTreeMap::new(),
        anchors: BTreeMap::new(),
        priorities: BTreeMap::new(),
        assignment: Assignment::new(staff.iter().map(|member| member.id.as_str()), days),
        logs: Vec::new(),
    };

    for member in staff {
        let lane = classify_lane(&member.constraints);
        context
            .whitelists
            .insert(member.id.clone(), whitelist_for(lane, settings));
        context.lanes.insert(member.id.clone(), lane);

        let submission = submissions.get(&member.id);
        let anchor = submission
            .map(|s| Anchor::from_tail(&s.previous_tail))
            .unwrap_or_default();
        context.assignment.set(&member.id, 0, anchor.code.clone());
        context.anchors.insert(member.id.clone(), anchor);

        let Some(submission) = submission else {
            continue;
        };

        let mut priorities = submission.priorities.clone();
        if priorities.len() > MAX_PRIORITIES {
            priorities.truncate(MAX_PRIORITIES);
            context.log(format!(
                "{}: only the first {} priorities are used",
                member.id, MAX_PRIORITIES
            ));
        }
        context.priorities.insert(member.id.clone(), priorities);

        for (&day, wish) in &submission.wishes {
            if day == 0 || day > days {
                context.log(format!(
                    "{}: wish for day {} is outside {} and was ignored",
                    member.id, day, period
                ));
                continue;
            }
            if let Some(code) = wish.seeded_code() {
                context.assignment.set(&member.id, day, code);
            }
        }
    }

    let unknown: Vec<&String> = submissions
        .iter()
        .map(|(staff_id, _)| staff_id)
        .filter(|staff_id| !seen.contains(staff_id.as_str()))
        .collect();
    for staff_id in unknown {
        context.log(format!("submission for unknown staff {staff_id} was ignored"));
    }

    context.log(format!(
        "Context built for {}: {} staff, {} days, strategy {}",
        period,
        staff.len(),
        days,
        strategy
    ));

    Ok(context)
}
