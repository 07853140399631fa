//! Goal entry form state.
//!
//! Switching units re-expresses a positive value in the new unit, so the
//! target the user typed keeps its physical meaning.

use crate::form::{FormEvent, FormField};
use crate::model::goal::Goal;
use crate::model::goal_type::GoalType;
use crate::model::unit::{DistanceUnit, MeasurementDomain, Unit, VolumeUnit};
use crate::observe::{Observers, SubscriptionId};
use crate::repo::goal_repo::GoalStore;
use crate::service::goal_service::{GoalService, GoalServiceError};
use log::error;

#[derive(Debug)]
pub struct GoalForm {
    goal_type: GoalType,
    value: f64,
    distance_unit: DistanceUnit,
    volume_unit: VolumeUnit,
    observers: Observers<FormEvent>,
}

impl Default for GoalForm {
    fn default() -> Self {
        Self {
            goal_type: GoalType::Running,
            value: 0.0,
            distance_unit: DistanceUnit::Miles,
            volume_unit: VolumeUnit::Ounces,
            observers: Observers::new(),
        }
    }
}

impl GoalForm {
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

    pub fn distance_unit(&self) -> DistanceUnit {
        self.distance_unit
    }

    pub fn volume_unit(&self) -> VolumeUnit {
        self.volume_unit
    }

    /// Unit that applies to the selected goal type.
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
    }

    pub fn set_value(&mut self, value: f64) {
        // Bitwise compare so NaN input still registers as a change.
        if self.value.to_bits() == value.to_bits() {
            return;
        }
        self.value = value;
        self.changed(FormField::Value);
    }

    pub fn set_distance_unit(&mut self, unit: DistanceUnit) {
        if self.distance_unit == unit {
            return;
        }
        let previous = self.distance_unit;
        self.distance_unit = unit;
        let adjusted = self
            .goal_type
            .adjust_value(self.value, previous.into(), unit.into());
        self.set_value(adjusted);
        self.changed(FormField::DistanceUnit);
    }

    pub fn set_volume_unit(&mut self, unit: VolumeUnit) {
        if self.volume_unit == unit {
            return;
        }
        let previous = self.volume_unit;
        self.volume_unit = unit;
        let adjusted = self
            .goal_type
            .adjust_value(self.value, previous.into(), unit.into());
        self.set_value(adjusted);
        self.changed(FormField::VolumeUnit);
    }

    /// Saves the current selections as the active goal of the selected type.
    pub fn submit<S: GoalStore>(
        &mut self,
        service: &GoalService<S>,
    ) -> Result<Goal, GoalServiceError> {
        match service.save_goal(self.goal_type, self.value, self.selected_unit()) {
            Ok(goal) => {
                self.observers.notify(&FormEvent::Saved);
                Ok(goal)
            }
            Err(GoalServiceError::Repo(err)) => {
                error!(
                    "event=goal_submit module=form status=error goal_type={} error={}",
                    self.goal_type.slug(),
                    err
                );
                self.observers.notify(&FormEvent::SaveFailed);
                Err(GoalServiceError::Repo(err))
            }
            Err(err) => Err(err),
        }
    }

    fn changed(&mut self, field: FormField) {
        self.observers.notify(&FormEvent::Changed(field));
    }
}
