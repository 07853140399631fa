//! Progress use-case service.
//!
//! # Responsibility
//! - Validate and record progress entries with identity and timestamp.
//! - Serve per-type history, latest entry and goal comparison.
//!
//! # Invariants
//! - Recording is load-modify-save: the store receives the whole per-type
//!   collection on every write.
//! - `history` is non-increasing by timestamp.

use crate::model::goal::Goal;
use crate::model::goal_type::GoalType;
use crate::model::now_epoch_ms;
use crate::model::progress::{normalize_note, sort_newest_first, ProgressEntry};
use crate::model::unit::Unit;
use crate::model::validation::{validate_measurement, ValidationError};
use crate::repo::error::RepoError;
use crate::repo::progress_repo::ProgressStore;
use crate::service::summary::{summarize, ProgressSummary};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for progress use-cases.
#[derive(Debug)]
pub enum ProgressServiceError {
    /// Input rejected before persistence.
    Validation(ValidationError),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ProgressServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProgressServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<ValidationError> for ProgressServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ProgressServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

/// Progress service facade over a `ProgressStore`.
pub struct ProgressService<S: ProgressStore> {
    store: S,
    now: fn() -> i64,
}

impl<S: ProgressStore> ProgressService<S> {
    /// Creates a service stamping entries with the system clock.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, now_epoch_ms)
    }

    /// Creates a service with a caller-provided epoch-millisecond clock.
    pub fn with_clock(store: S, now: fn() -> i64) -> Self {
        Self { store, now }
    }

    /// Records one progress observation and returns the stored entry.
    ///
    /// # Contract
    /// - `value` must be finite and greater than zero.
    /// - `unit` must belong to `goal_type`'s measurement domain.
    /// - Blank notes are dropped; other notes are trimmed.
    /// - The write goes through `ProgressStore::append`; with the built-in
    ///   stores, concurrent records on one shared store all persist.
    pub fn record_progress(
        &self,
        goal_type: GoalType,
        value: f64,
        unit: Unit,
        note: Option<&str>,
    ) -> Result<ProgressEntry, ProgressServiceError> {
        if let Err(err) = validate_measurement(goal_type, value, unit) {
            warn!(
                "event=progress_record module=service status=rejected goal_type={} reason={}",
                goal_type.slug(),
                err
            );
            return Err(err.into());
        }

        let entry = ProgressEntry::new(goal_type, value, unit, (self.now)(), normalize_note(note));
        let count = self.store.append(&entry)?;

        info!(
            "event=progress_record module=service status=ok goal_type={} entries={}",
            goal_type.slug(),
            count
        );
        Ok(entry)
    }

    /// Returns every entry of `goal_type`, newest first.
    pub fn history(&self, goal_type: GoalType) -> Result<Vec<ProgressEntry>, ProgressServiceError> {
        let mut entries = self.store.load(goal_type)?;
        sort_newest_first(&mut entries);
        Ok(entries)
    }

    /// Returns the newest entry of `goal_type`, if any.
    pub fn latest(
        &self,
        goal_type: GoalType,
    ) -> Result<Option<ProgressEntry>, ProgressServiceError> {
        Ok(self.store.latest(goal_type)?)
    }

    /// Compares all recorded progress of the goal's type against `goal`.
    pub fn summary(&self, goal: &Goal) -> Result<ProgressSummary, ProgressServiceError> {
        let entries = self.store.load(goal.goal_type)?;
        Ok(summarize(goal, &entries))
    }
}
