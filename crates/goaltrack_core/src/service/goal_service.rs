//! Goal use-case service.
//!
//! # Responsibility
//! - Validate goal input and keep exactly one active goal per type.
//! - Expose goal queries and deletion to presentation callers.
//!
//! # Invariants
//! - `save_goal` never leaves two active goals of the same type behind.
//! - Deleting a missing goal is a normal outcome, not an error.

use crate::model::goal::{Goal, GoalId, NewGoal};
use crate::model::goal_type::GoalType;
use crate::model::now_epoch_ms;
use crate::model::unit::Unit;
use crate::model::validation::ValidationError;
use crate::repo::error::RepoError;
use crate::repo::goal_repo::GoalStore;
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for goal use-cases.
#[derive(Debug)]
pub enum GoalServiceError {
    /// Input rejected before persistence.
    Validation(ValidationError),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for GoalServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for GoalServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<ValidationError> for GoalServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for GoalServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

/// Outcome of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

/// Goal service facade over a `GoalStore`.
pub struct GoalService<S: GoalStore> {
    store: S,
    now: fn() -> i64,
}

impl<S: GoalStore> GoalService<S> {
    /// Creates a service stamping goals with the system clock.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, now_epoch_ms)
    }

    /// Creates a service with a caller-provided epoch-millisecond clock.
    pub fn with_clock(store: S, now: fn() -> i64) -> Self {
        Self { store, now }
    }

    /// Saves a new goal as the only active goal of its type.
    ///
    /// # Contract
    /// - `value` must be finite and greater than zero.
    /// - `unit` must belong to `goal_type`'s measurement domain.
    /// - Previously active goals of the same type are deactivated first.
    pub fn save_goal(
        &self,
        goal_type: GoalType,
        value: f64,
        unit: Unit,
    ) -> Result<Goal, GoalServiceError> {
        let new_goal = match NewGoal::active(goal_type, value, unit, (self.now)()) {
            Ok(new_goal) => new_goal,
            Err(err) => {
                warn!(
                    "event=goal_save module=service status=rejected goal_type={} reason={}",
                    goal_type.slug(),
                    err
                );
                return Err(err.into());
            }
        };

        let activation = self.store.activate_goal(&new_goal)?;
        info!(
            "event=goal_save module=service status=ok goal_type={} goal_id={} deactivated={}",
            goal_type.slug(),
            activation.goal.id,
            activation.deactivated
        );
        Ok(activation.goal)
    }

    /// Returns the active goal of `goal_type`, if one is set.
    pub fn active_goal(&self, goal_type: GoalType) -> Result<Option<Goal>, GoalServiceError> {
        Ok(self.store.active_goal(goal_type)?)
    }

    pub fn get_goal(&self, id: GoalId) -> Result<Option<Goal>, GoalServiceError> {
        Ok(self.store.get_goal(id)?)
    }

    /// Lists every goal, oldest first.
    pub fn list_goals(&self) -> Result<Vec<Goal>, GoalServiceError> {
        Ok(self.store.list_goals()?)
    }

    /// Lists goals of one type, oldest first.
    pub fn goals_by_type(&self, goal_type: GoalType) -> Result<Vec<Goal>, GoalServiceError> {
        Ok(self.store.list_goals_by_type(goal_type)?)
    }

    /// Deletes a goal by id.
    pub fn delete_goal(&self, id: GoalId) -> Result<DeleteOutcome, GoalServiceError> {
        if self.store.delete_goal(id)? {
            info!("event=goal_delete module=service status=ok goal_id={id}");
            Ok(DeleteOutcome::Deleted)
        } else {
            debug!("event=goal_delete module=service status=not_found goal_id={id}");
            Ok(DeleteOutcome::NotFound)
        }
    }
}
