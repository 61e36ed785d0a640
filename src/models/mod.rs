//! Core data models for the roster engine.
//!
//! This module contains the plain data exchanged with callers: staff,
//! periods, submissions, rosters and the audit reports computed over them.

mod period;
mod report;
mod roster;
mod shift_code;
mod staff;
mod submission;

pub use period::Period;
pub use report::{
    CategoryScore, CoverageShortfall, ScoreBreakdown, ScoreCategory, StaffViolations,
    ValidationReport, Violation,
};
pub use roster::Roster;
pub use shift_code::{MANDATORY_REST, REQUESTED_REST, ShiftCode, ShiftKind};
pub use staff::{StaffConstraints, StaffMember};
pub use submission::{MAX_PRIORITIES, PreSubmission, PriorSubmissions, Wish};
