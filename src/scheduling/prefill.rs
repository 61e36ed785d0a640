//! Fixed-shift prefill.
//!
//! Staff in a fixed lane get their lane's code on every day no wish already
//! fixed. Runs once, before search, and never consults the validator.

use super::context::RunContext;

/// Fills open days of fixed-lane staff with the lane's code.
///
/// Returns the number of cells written.
pub fn prefill_fixed_shifts(context: &mut RunContext<'_>) -> usize {
    let mut filled = 0;

    for member in context.staff {
        let Some(kind) = context
            .lanes
            .get(&member.id)
            .and_then(|lane| lane.fixed_kind())
        else {
            continue;
        };

        let Some(code) = context.settings.code_of_kind(kind).cloned() else {
            context.log(format!(
                "{}: unit defines no {} shift, fixed lane left to the solver",
                member.id, kind
            ));
            continue;
        };

        for day in 1..=context.days {
            if !context.assignment.is_set(&member.id, day) {
                context.assignment.set(&member.id, day, code.clone());
                filled += 1;
            }
        }
    }

    context.log(format!("Prefilled {filled} fixed-lane cells"));
    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UnitSettings;
    use crate::models::{
        Period, PreSubmission, PriorSubmissions, ShiftCode, StaffConstraints, StaffMember, Wish,
    };
    use crate::scheduling::{Strategy, build_context};

    #[test]
    fn test_fixed_lanes_fill_every_open_day() {
        let staff = vec![
            StaffMember::new("night", "Night").with_constraints(StaffConstraints {
                fixed_night: true,
                ..Default::default()
            }),
            StaffMember::new("evening", "Evening").with_constraints(StaffConstraints {
                fixed_evening: true,
                ..Default::default()
            }),
            StaffMember::new("free", "Free"),
        ];
        let settings = UnitSettings::three_shift("ward");
        let mut submissions = PriorSubmissions::new();
        let mut wish = PreSubmission::default();
        wish.wishes.insert(5, Wish::RequestedRest);
        submissions.insert("night", wish);

        let mut context = build_context(
            Period::new(2026, 2),
            &staff,
            &settings,
            &submissions,
            Strategy::Balance,
        )
        .unwrap();
        let filled = prefill_fixed_shifts(&mut context);

        assert_eq!(filled, 27 + 28);
        for day in 1..=28 {
            let expected_night = if day == 5 {
                ShiftCode::requested_rest()
            } else {
                ShiftCode::new("N")
            };
            assert_eq!(context.assignment.get("night", day), Some(&expected_night));
            assert_eq!(
                context.assignment.get("evening", day),
                Some(&ShiftCode::new("E"))
            );
            assert!(!context.assignment.is_set("free", day));
        }
    }

    #[test]
    fn test_protected_flag_wins_over_fixed_night() {
        let staff = vec![StaffMember::new("p", "P").with_constraints(StaffConstraints {
            protected: true,
            fixed_night: true,
            ..Default::default()
        })];
        let settings = UnitSettings::three_shift("ward");
        let submissions = PriorSubmissions::new();
        let mut context = build_context(
            Period::new(2026, 2),
            &staff,
            &settings,
            &submissions,
            Strategy::Balance,
        )
        .unwrap();

        assert_eq!(prefill_fixed_shifts(&mut context), 0);
        assert!(!context.assignment.is_set("p", 1));
    }
}
