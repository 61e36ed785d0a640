//! Shift codes and their kinds.
//!
//! A [`ShiftCode`] is the value stored in every roster cell. Units define
//! their own vocabulary of work codes; two rest codes are universal.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The universal requested-rest code. The solver falls back to this code.
pub const REQUESTED_REST: &str = "OFF";

/// The universal mandatory-rest code. Only ever originates from wish data.
pub const MANDATORY_REST: &str = "MOFF";

/// A single roster cell value such as `D`, `E`, `N` or `OFF`.
///
/// # Example
///
/// ```
/// use roster_engine::models::ShiftCode;
///
/// let night = ShiftCode::new("N");
/// assert!(!night.is_rest());
/// assert!(ShiftCode::requested_rest().is_rest());
/// assert_eq!(night.to_string(), "N");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShiftCode(String);

impl ShiftCode {
    /// Creates a shift code from its textual form.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// The requested-rest code (`OFF`).
    pub fn requested_rest() -> Self {
        Self(REQUESTED_REST.to_string())
    }

    /// The mandatory-rest code (`MOFF`).
    pub fn mandatory_rest() -> Self {
        Self(MANDATORY_REST.to_string())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for either universal rest code.
    pub fn is_rest(&self) -> bool {
        self.0 == REQUESTED_REST || self.0 == MANDATORY_REST
    }

    /// Returns true for the requested-rest code only.
    pub fn is_requested_rest(&self) -> bool {
        self.0 == REQUESTED_REST
    }
}

impl fmt::Display for ShiftCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ShiftCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for ShiftCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

/// The kind of work a shift code denotes.
///
/// The validator reasons about kinds, never about concrete codes, so a unit
/// is free to call its night shift `N`, `NT` or anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftKind {
    /// Daytime work.
    Day,
    /// Evening work.
    Evening,
    /// Overnight work.
    Night,
    /// Work that is neither day, evening nor night (e.g. training days).
    Other,
    /// Either universal rest code.
    Rest,
}

impl ShiftKind {
    /// Returns true for every kind except [`ShiftKind::Rest`].
    pub fn is_work(self) -> bool {
        self != ShiftKind::Rest
    }
}

impl fmt::Display for ShiftKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShiftKind::Day => write!(f, "day"),
            ShiftKind::Evening => write!(f, "evening"),
            ShiftKind::Night => write!(f, "night"),
            ShiftKind::Other => write!(f, "other"),
            ShiftKind::Rest => write!(f, "rest"),
        }
    }
}
