//! Goal type enumeration and its per-type unit capabilities.
//!
//! # Invariants
//! - Every goal type maps to exactly one measurement domain.
//! - A type only accepts units from its own domain.

use crate::model::unit::{convert, DistanceUnit, MeasurementDomain, Unit, VolumeUnit};
use crate::model::validation::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Tracked metric kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GoalType {
    /// Running distance.
    Running,
    /// Water intake.
    Water,
}

impl GoalType {
    pub const ALL: [GoalType; 2] = [Self::Running, Self::Water];

    pub fn domain(self) -> MeasurementDomain {
        match self {
            Self::Running => MeasurementDomain::Distance,
            Self::Water => MeasurementDomain::Volume,
        }
    }

    /// Unit preselected for new goals and progress of this type.
    pub fn default_unit(self) -> Unit {
        match self {
            Self::Running => DistanceUnit::Miles.into(),
            Self::Water => VolumeUnit::Ounces.into(),
        }
    }

    /// Units selectable for this type, in display order.
    pub fn units(self) -> Vec<Unit> {
        match self {
            Self::Running => DistanceUnit::ALL.into_iter().map(Unit::from).collect(),
            Self::Water => VolumeUnit::ALL.into_iter().map(Unit::from).collect(),
        }
    }

    pub fn accepts(self, unit: Unit) -> bool {
        unit.domain() == self.domain()
    }

    /// Returns `Ok(())` when `unit` belongs to this type's domain.
    pub fn check_unit(self, unit: Unit) -> Result<(), ValidationError> {
        if self.accepts(unit) {
            Ok(())
        } else {
            Err(ValidationError::UnitMismatch {
                goal_type: self,
                unit,
            })
        }
    }

    /// Re-expresses a form value after the user switches units.
    ///
    /// The value passes through unchanged when it is not positive, when the
    /// units are equal, or when either unit is outside this type's domain.
    pub fn adjust_value(self, value: f64, from: Unit, to: Unit) -> f64 {
        if value <= 0.0 || from == to || !self.accepts(from) || !self.accepts(to) {
            return value;
        }
        convert(value, from, to).unwrap_or(value)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Water => "Water",
        }
    }

    /// Lowercase name used for per-type file naming.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Water => "water",
        }
    }
}

impl Display for GoalType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalType {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "running" => Ok(Self::Running),
            "water" => Ok(Self::Water),
            _ => Err(ValidationError::UnknownGoalType(value.to_string())),
        }
    }
}
