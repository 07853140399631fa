//! Progress-versus-goal comparison.

use crate::model::goal::{Goal, GoalId};
use crate::model::goal_type::GoalType;
use crate::model::progress::ProgressEntry;
use crate::model::unit::{convert, Unit};

/// Recorded progress of one type, expressed in the goal's unit.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSummary {
    pub goal_id: GoalId,
    pub goal_type: GoalType,
    pub unit: Unit,
    pub target: f64,
    pub achieved: f64,
    /// Never negative.
    pub remaining: f64,
    /// `achieved / target`; exceeds 1.0 once the goal is surpassed.
    pub fraction: f64,
    pub is_met: bool,
    /// Entries included in `achieved`.
    pub counted: usize,
    /// Entries of the goal's type whose unit could not be converted.
    pub skipped: usize,
}

/// Sums `entries` of the goal's type into the goal's unit.
///
/// Entries of other goal types are ignored.
pub fn summarize(goal: &Goal, entries: &[ProgressEntry]) -> ProgressSummary {
    let mut achieved = 0.0;
    let mut counted = 0;
    let mut skipped = 0;

    for entry in entries.iter().filter(|entry| entry.goal_type == goal.goal_type) {
        match convert(entry.value, entry.unit, goal.unit) {
            Ok(value) => {
                achieved += value;
                counted += 1;
            }
            Err(_) => skipped += 1,
        }
    }

    ProgressSummary {
        goal_id: goal.id,
        goal_type: goal.goal_type,
        unit: goal.unit,
        target: goal.value,
        achieved,
        remaining: (goal.value - achieved).max(0.0),
        fraction: achieved / goal.value,
        is_met: achieved >= goal.value,
        counted,
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::summarize;
    use crate::model::goal::Goal;
    use crate::model::goal_type::GoalType;
    use crate::model::progress::ProgressEntry;
    use crate::model::unit::{DistanceUnit, VolumeUnit};

    fn water_goal(liters: f64) -> Goal {
        Goal {
            id: 7,
            goal_type: GoalType::Water,
            value: liters,
            unit: VolumeUnit::Liters.into(),
            created_at: 0,
            is_active: true,
        }
    }

    #[test]
    fn sums_entries_in_goal_unit() {
        let goal = water_goal(2.0);
        let entries = vec![
            ProgressEntry::new(GoalType::Water, 0.5, VolumeUnit::Liters.into(), 1, None),
            ProgressEntry::new(GoalType::Water, 500.0 / 29.573_529_562_5, VolumeUnit::Ounces.into(), 2, None),
            ProgressEntry::new(GoalType::Running, 3.0, DistanceUnit::Miles.into(), 3, None),
        ];

        let summary = summarize(&goal, &entries);

        assert_eq!(summary.counted, 2);
        assert_eq!(summary.skipped, 0);
        assert!((summary.achieved - 1.0).abs() < 1e-9);
        assert!((summary.remaining - 1.0).abs() < 1e-9);
        assert!((summary.fraction - 0.5).abs() < 1e-9);
        assert!(!summary.is_met);
    }

    #[test]
    fn surpassed_goal_has_zero_remaining() {
        let goal = water_goal(1.0);
        let entries = vec![ProgressEntry::new(
            GoalType::Water,
            3.0,
            VolumeUnit::Liters.into(),
            1,
            None,
        )];

        let summary = summarize(&goal, &entries);

        assert!(summary.is_met);
        assert_eq!(summary.remaining, 0.0);
        assert!(summary.fraction > 1.0);
    }

    #[test]
    fn foreign_unit_entries_are_skipped() {
        let goal = water_goal(1.0);
        let mut odd = ProgressEntry::new(GoalType::Water, 1.0, VolumeUnit::Cups.into(), 1, None);
        odd.unit = DistanceUnit::Feet.into();

        let summary = summarize(&goal, &[odd]);

        assert_eq!(summary.counted, 0);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.achieved, 0.0);
    }
}
