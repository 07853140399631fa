//! Input validation shared by goal and progress writes.

use crate::model::goal_type::GoalType;
use crate::model::unit::{Unit, UnknownUnit};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation error for goal/progress payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Value is zero or negative.
    NonPositiveValue(f64),
    /// Value is NaN or infinite.
    NonFiniteValue(f64),
    /// Unit belongs to a different domain than the goal type.
    UnitMismatch { goal_type: GoalType, unit: Unit },
    /// Text does not name a goal type.
    UnknownGoalType(String),
    /// Text does not name a unit.
    UnknownUnit(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveValue(value) => write!(f, "value must be greater than 0, got {value}"),
            Self::NonFiniteValue(value) => write!(f, "value must be a finite number, got {value}"),
            Self::UnitMismatch { goal_type, unit } => write!(
                f,
                "unit {unit} is not valid for {goal_type} goals (expected {})",
                goal_type.domain()
            ),
            Self::UnknownGoalType(value) => write!(f, "unknown goal type `{value}`"),
            Self::UnknownUnit(value) => write!(f, "unknown unit `{value}`"),
        }
    }
}

impl Error for ValidationError {}

impl From<UnknownUnit> for ValidationError {
    fn from(value: UnknownUnit) -> Self {
        Self::UnknownUnit(value.0)
    }
}

/// Rejects NaN, infinite, zero and negative values.
pub fn validate_value(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue(value));
    }
    if value <= 0.0 {
        return Err(ValidationError::NonPositiveValue(value));
    }
    Ok(())
}

/// Validates a value + unit pair for the given goal type.
pub fn validate_measurement(
    goal_type: GoalType,
    value: f64,
    unit: Unit,
) -> Result<(), ValidationError> {
    validate_value(value)?;
    goal_type.check_unit(unit)
}

#[cfg(test)]
mod tests {
    use super::{validate_measurement, validate_value, ValidationError};
    use crate::model::goal_type::GoalType;
    use crate::model::unit::{DistanceUnit, VolumeUnit};

    #[test]
    fn rejects_nan_infinity_and_non_positive() {
        assert!(matches!(
            validate_value(f64::NAN),
            Err(ValidationError::NonFiniteValue(_))
        ));
        assert!(matches!(
            validate_value(f64::INFINITY),
            Err(ValidationError::NonFiniteValue(_))
        ));
        assert_eq!(
            validate_value(0.0),
            Err(ValidationError::NonPositiveValue(0.0))
        );
        assert!(validate_value(0.01).is_ok());
    }

    #[test]
    fn rejects_unit_from_other_domain() {
        let err = validate_measurement(GoalType::Running, 3.0, VolumeUnit::Cups.into())
            .unwrap_err();
        assert!(matches!(err, ValidationError::UnitMismatch { .. }));
        assert!(validate_measurement(GoalType::Running, 3.0, DistanceUnit::Feet.into()).is_ok());
    }
}
