//! Pre-submitted wishes and ranked preferences.
//!
//! Before a run, each staff member may submit per-day wishes, up to three
//! ranked priority codes and an optional batch preference. Wishes are
//! written on the wire as plain strings:
//!
//! | Text   | Meaning                        |
//! |--------|--------------------------------|
//! | `OFF`  | requested rest                 |
//! | `MOFF` | mandatory rest                 |
//! | `!N`   | avoid `N` on that day          |
//! | `D`    | work `D` on that day           |

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::shift_code::{MANDATORY_REST, REQUESTED_REST, ShiftCode};

/// Maximum number of ranked priority codes a staff member may submit.
pub const MAX_PRIORITIES: usize = 3;

/// A single day's wish.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Wish {
    /// Wants to work this code.
    Shift(ShiftCode),
    /// Asks for a rest day.
    RequestedRest,
    /// Must rest (leave, training elsewhere, ...). Not counted as a preference.
    MandatoryRest,
    /// Wants anything except this code.
    Avoid(ShiftCode),
}

impl Wish {
    /// The code the context builder writes into the roster for this wish.
    ///
    /// Both rest wishes normalize to the requested-rest code; a negative
    /// preference does not fix the cell.
    ///
    /// # Example
    ///
    /// ```
    /// use roster_engine::models::{ShiftCode, Wish};
    ///
    /// assert_eq!(Wish::MandatoryRest.seeded_code(), Some(ShiftCode::requested_rest()));
    /// assert_eq!(Wish::Avoid(ShiftCode::new("N")).seeded_code(), None);
    /// ```
    pub fn seeded_code(&self) -> Option<ShiftCode> {
        match self {
            Wish::Shift(code) => Some(code.clone()),
            Wish::RequestedRest | Wish::MandatoryRest => Some(ShiftCode::requested_rest()),
            Wish::Avoid(_) => None,
        }
    }

    /// Whether `actual` satisfies this wish.
    pub fn is_honored_by(&self, actual: &ShiftCode) -> bool {
        match self {
            Wish::Shift(code) => actual == code,
            Wish::RequestedRest | Wish::MandatoryRest => actual.is_rest(),
            Wish::Avoid(code) => actual != code,
        }
    }

    /// Returns true for mandatory rest, which satisfaction scoring ignores.
    pub fn is_mandatory(&self) -> bool {
        matches!(self, Wish::MandatoryRest)
    }
}

impl TryFrom<String> for Wish {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let value = value.trim();
        match value {
            "" => Err("wish must not be empty".to_string()),
            REQUESTED_REST => Ok(Wish::RequestedRest),
            MANDATORY_REST => Ok(Wish::MandatoryRest),
            _ => match value.strip_prefix('!') {
                Some("") => Err("negative wish must name a shift code".to_string()),
                Some(code) => Ok(Wish::Avoid(ShiftCode::new(code))),
                None => Ok(Wish::Shift(ShiftCode::new(value))),
            },
        }
    }
}

impl From<Wish> for String {
    fn from(wish: Wish) -> Self {
        wish.to_string()
    }
}

impl fmt::Display for Wish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Wish::Shift(code) => write!(f, "{code}"),
            Wish::RequestedRest => f.write_str(REQUESTED_REST),
            Wish::MandatoryRest => f.write_str(MANDATORY_REST),
            Wish::Avoid(code) => write!(f, "!{code}"),
        }
    }
}

/// One staff member's submission for the target period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreSubmission {
    /// Day (1-based) to wish.
    pub wishes: BTreeMap<u32, Wish>,
    /// Ranked priority codes, most wanted first.
    pub priorities: Vec<ShiftCode>,
    /// Preferred code for batch (block) assignment.
    pub batch_preference: Option<ShiftCode>,
    /// Last days of the previous period, oldest first, for continuity.
    pub previous_tail: Vec<ShiftCode>,
}

impl PreSubmission {
    /// The top-ranked priority code.
    pub fn top_priority(&self) -> Option<&ShiftCode> {
        self.priorities.first()
    }

    /// The second-ranked priority code.
    pub fn second_priority(&self) -> Option<&ShiftCode> {
        self.priorities.get(1)
    }

    /// The code the staff member asked to avoid on `day`, if any.
    pub fn avoided_on(&self, day: u32) -> Option<&ShiftCode> {
        match self.wishes.get(&day) {
            Some(Wish::Avoid(code)) => Some(code),
            _ => None,
        }
    }
}

/// All submissions for a run, keyed by staff identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriorSubmissions(BTreeMap<String, PreSubmission>);

impl PriorSubmissions {
    /// Creates an empty submission bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the submission for `staff_id`.
    pub fn insert(&mut self, staff_id: impl Into<String>, submission: PreSubmission) {
        self.0.insert(staff_id.into(), submission);
    }

    /// Returns the submission for `staff_id`.
    pub fn get(&self, staff_id: &str) -> Option<&PreSubmission> {
        self.0.get(staff_id)
    }

    /// Iterates submissions in staff identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &PreSubmission)> {
        self.0.iter()
    }

    /// Returns true if nobody submitted anything.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, PreSubmission)> for PriorSubmissions {
    fn from_iter<I: IntoIterator<Item = (String, PreSubmission)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
