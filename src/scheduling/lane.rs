//! Lane classification and shift whitelists.
//!
//! Every staff member falls into exactly one [`Lane`], which fixes the
//! closed set of codes the solver may ever give them.

use serde::{Deserialize, Serialize};

use crate::config::UnitSettings;
use crate::models::{ShiftCode, ShiftKind, StaffConstraints};

/// A staff member's scheduling category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lane {
    /// Pregnancy/postpartum protection: day work only.
    Protected,
    /// Nights only.
    FixedNight,
    /// Evenings only.
    FixedEvening,
    /// Day and evening work only.
    DayEveningRotation,
    /// Any work code.
    Default,
}

impl Lane {
    /// The shift kind a fixed lane is locked to.
    pub fn fixed_kind(self) -> Option<ShiftKind> {
        match self {
            Lane::FixedNight => Some(ShiftKind::Night),
            Lane::FixedEvening => Some(ShiftKind::Evening),
            _ => None,
        }
    }
}

impl std::fmt::Display for Lane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lane::Protected => write!(f, "protected"),
            Lane::FixedNight => write!(f, "fixed-night"),
            Lane::FixedEvening => write!(f, "fixed-evening"),
            Lane::DayEveningRotation => write!(f, "day-evening-rotation"),
            Lane::Default => write!(f, "default"),
        }
    }
}

/// Classifies a staff member.
///
/// Precedence is fixed: protected > fixed-night > fixed-evening >
/// day/evening rotation > default.
///
/// # Example
///
/// ```
/// use roster_engine::models::StaffConstraints;
/// use roster_engine::scheduling::{classify_lane, Lane};
///
/// let constraints = StaffConstraints {
///     protected: true,
///     fixed_night: true,
///     ..Default::default()
/// };
/// assert_eq!(classify_lane(&constraints), Lane::Protected);
/// ```
pub fn classify_lane(constraints: &StaffConstraints) -> Lane {
    if constraints.protected {
        Lane::Protected
    } else if constraints.fixed_night {
        Lane::FixedNight
    } else if constraints.fixed_evening {
        Lane::FixedEvening
    } else if constraints.day_evening_rotation {
        Lane::DayEveningRotation
    } else {
        Lane::Default
    }
}

/// The codes a lane may receive, work codes in declaration order followed by
/// requested rest.
///
/// A fixed lane gets the first declared code of its kind. If the unit has no
/// such code the lane can only rest.
pub fn whitelist_for(lane: Lane, settings: &UnitSettings) -> Vec<ShiftCode> {
    let mut codes: Vec<ShiftCode> = settings
        .shifts()
        .iter()
        .filter(|shift| match lane {
            Lane::Protected => matches!(shift.kind, ShiftKind::Day | ShiftKind::Other),
            Lane::DayEveningRotation => {
                matches!(shift.kind, ShiftKind::Day | ShiftKind::Evening)
            }
            Lane::Default => true,
            Lane::FixedNight | Lane::FixedEvening => false,
        })
        .map(|shift| shift.code.clone())
        .collect();

    if let Some(kind) = lane.fixed_kind() {
        codes.extend(settings.code_of_kind(kind).cloned());
    }

    codes.push(ShiftCode::requested_rest());
    codes
}
