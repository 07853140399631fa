//! Progress entry domain model.
//!
//! # Invariants
//! - `id` is generated once and never reused.
//! - Entries are independent of any goal row; they are grouped by type.

use crate::model::goal_type::GoalType;
use crate::model::unit::{Measurement, Unit};
use crate::model::validation::{validate_measurement, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type ProgressId = Uuid;

/// One timestamped observation recorded against a goal type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    pub id: ProgressId,
    pub goal_type: GoalType,
    pub value: f64,
    pub unit: Unit,
    /// Unix epoch milliseconds.
    pub timestamp: i64,
    #[serde(default)]
    pub note: Option<String>,
}

impl ProgressEntry {
    /// Creates an entry with a fresh id.
    ///
    /// Does not validate; callers on write paths run `validate()`.
    pub fn new(
        goal_type: GoalType,
        value: f64,
        unit: Unit,
        timestamp: i64,
        note: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            goal_type,
            value,
            unit,
            timestamp,
            note,
        }
    }

    pub fn measurement(&self) -> Measurement {
        Measurement::new(self.value, self.unit)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_measurement(self.goal_type, self.value, self.unit)
    }
}

/// Trims a free-text note; blank notes become `None`.
pub fn normalize_note(note: Option<&str>) -> Option<String> {
    note.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Orders entries newest first.
///
/// Equal timestamps keep reverse insertion order, so the entry appended last
/// is reported first.
pub fn sort_newest_first(entries: &mut Vec<ProgressEntry>) {
    entries.reverse();
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}
