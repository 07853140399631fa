//! Progress entry form state.
//!
//! # Invariants
//! - `validation_error` reflects the current value after every value or
//!   goal-type change.
//! - A successful submit resets value and note and records `last_saved`.

use crate::form::{FormEvent, FormField};
use crate::model::goal_type::GoalType;
use crate::model::progress::ProgressEntry;
use crate::model::unit::{DistanceUnit, MeasurementDomain, Unit, VolumeUnit};
use crate::model::validation::{validate_value, ValidationError};
use crate::observe::{Observers, SubscriptionId};
use crate::repo::progress_repo::ProgressStore;
use crate::service::progress_service::{ProgressService, ProgressServiceError};
use log::error;

const VALUE_NOT_POSITIVE_MESSAGE: &str = "Progress value must be greater than 0";
const VALUE_NOT_NUMBER_MESSAGE: &str = "Progress value must be a valid number";
const SAVE_FAILED_MESSAGE: &str = "Failed to save progress. Please try again.";

/// Result of `ProgressForm::submit`.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Saved(ProgressEntry),
    /// Current input is invalid; nothing was sent to storage.
    Invalid,
    /// Storage rejected the write; `validation_error` carries the message.
    Failed,
}

#[derive(Debug)]
pub struct ProgressForm {
    goal_type: GoalType,
    value: f64,
    distance_unit: DistanceUnit,
    volume_unit: VolumeUnit,
    note: Option<String>,
    validation_error: Option<String>,
    last_saved: Option<ProgressEntry>,
    observers: Observers<FormEvent>,
}

impl Default for ProgressForm {
    fn default() -> Self {
        Self {
            goal_type: GoalType::Running,
            value: 0.0,
            distance_unit: DistanceUnit::Miles,
            volume_unit: VolumeUnit::Ounces,
            note: None,
            validation_error: None,
            last_saved: None,
            observers: Observers::new(),
        }
    }
}

impl ProgressForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&FormEvent) + 'static) -> SubscriptionId {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn goal_type(&self) -> GoalType {
        self.goal_type
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn validation_error(&self) -> Option<&str> {
        self.validation_error.as_deref()
    }

    pub fn last_saved(&self) -> Option<&ProgressEntry> {
        self.last_saved.as_ref()
    }

    pub fn is_valid(&self) -> bool {
        self.validation_error.is_none()
    }

    pub fn selected_unit(&self) -> Unit {
        match self.goal_type.domain() {
            MeasurementDomain::Distance => self.distance_unit.into(),
            MeasurementDomain::Volume => self.volume_unit.into(),
        }
    }

    pub fn set_goal_type(&mut self, goal_type: GoalType) {
        if self.goal_type == goal_type {
            return;
        }
        self.goal_type = goal_type;
        self.changed(FormField::GoalType);
        self.validate();
    }

    pub fn set_value(&mut self, value: f64) {
        if self.value.to_bits() == value.to_bits() {
            return;
        }
        self.value = value;
        self.changed(FormField::Value);
        self.validate();
    }

    pub fn set_distance_unit(&mut self, unit: DistanceUnit) {
        if self.distance_unit != unit {
            self.distance_unit = unit;
            self.changed(FormField::DistanceUnit);
        }
    }

    pub fn set_volume_unit(&mut self, unit: VolumeUnit) {
        if self.volume_unit != unit {
            self.volume_unit = unit;
            self.changed(FormField::VolumeUnit);
        }
    }

    pub fn set_note(&mut self, note: Option<String>) {
        if self.note != note {
            self.note = note;
            self.changed(FormField::Note);
        }
    }

    /// Records the current input through `service`.
    pub fn submit<S: ProgressStore>(&mut self, service: &ProgressService<S>) -> SubmitOutcome {
        self.validate();
        if !self.is_valid() {
            return SubmitOutcome::Invalid;
        }

        let unit = self.selected_unit();
        match service.record_progress(self.goal_type, self.value, unit, self.note.as_deref()) {
            Ok(entry) => {
                self.last_saved = Some(entry.clone());
                self.changed(FormField::LastSaved);
                self.reset_input();
                self.observers.notify(&FormEvent::Saved);
                SubmitOutcome::Saved(entry)
            }
            Err(ProgressServiceError::Validation(err)) => {
                self.set_validation_error(Some(err.to_string()));
                SubmitOutcome::Invalid
            }
            Err(ProgressServiceError::Repo(err)) => {
                error!(
                    "event=progress_submit module=form status=error goal_type={} error={}",
                    self.goal_type.slug(),
                    err
                );
                self.set_validation_error(Some(SAVE_FAILED_MESSAGE.to_string()));
                self.observers.notify(&FormEvent::SaveFailed);
                SubmitOutcome::Failed
            }
        }
    }

    /// Clears value and note without flagging the empty value as an error.
    fn reset_input(&mut self) {
        if self.value != 0.0 {
            self.value = 0.0;
            self.changed(FormField::Value);
        }
        self.set_validation_error(None);
        self.set_note(None);
    }

    fn validate(&mut self) {
        let message = match validate_value(self.value) {
            Ok(()) => None,
            Err(ValidationError::NonFiniteValue(_)) => Some(VALUE_NOT_NUMBER_MESSAGE),
            Err(_) => Some(VALUE_NOT_POSITIVE_MESSAGE),
        };
        self.set_validation_error(message.map(str::to_string));
    }

    fn set_validation_error(&mut self, message: Option<String>) {
        if self.validation_error != message {
            self.validation_error = message;
            self.changed(FormField::ValidationError);
        }
    }

    fn changed(&mut self, field: FormField) {
        self.observers.notify(&FormEvent::Changed(field));
    }
}
