//! Goal domain model.
//!
//! # Responsibility
//! - Define the persisted goal record and its insert payload.
//! - Provide activation lifecycle helpers.
//!
//! # Invariants
//! - `value` is positive and finite.
//! - `unit` belongs to the domain of `goal_type`.
//! - At most one goal per type is active; enforced by the store/service
//!   layer, not by this struct.

use crate::model::goal_type::GoalType;
use crate::model::unit::{Measurement, Unit};
use crate::model::validation::{validate_measurement, ValidationError};
use serde::{Deserialize, Serialize};

/// Store-assigned goal identity.
pub type GoalId = i64;

/// Target value for one tracked metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: GoalId,
    /// Serialized as `type` to keep the on-disk shape short.
    #[serde(rename = "type")]
    pub goal_type: GoalType,
    pub value: f64,
    pub unit: Unit,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    pub is_active: bool,
}

impl Goal {
    pub fn measurement(&self) -> Measurement {
        Measurement::new(self.value, self.unit)
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    /// Checks value and unit invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_measurement(self.goal_type, self.value, self.unit)
    }
}

/// Insert payload for a goal; the store assigns `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGoal {
    pub goal_type: GoalType,
    pub value: f64,
    pub unit: Unit,
    pub created_at: i64,
    pub is_active: bool,
}

impl NewGoal {
    /// Builds an active goal payload after validating it.
    pub fn active(
        goal_type: GoalType,
        value: f64,
        unit: Unit,
        now_ms: i64,
    ) -> Result<Self, ValidationError> {
        validate_measurement(goal_type, value, unit)?;
        Ok(Self {
            goal_type,
            value,
            unit,
            created_at: now_ms,
            is_active: true,
        })
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_measurement(self.goal_type, self.value, self.unit)
    }

    /// Materializes the stored record once identity is known.
    pub fn into_goal(self, id: GoalId) -> Goal {
        Goal {
            id,
            goal_type: self.goal_type,
            value: self.value,
            unit: self.unit,
            created_at: self.created_at,
            is_active: self.is_active,
        }
    }
}
