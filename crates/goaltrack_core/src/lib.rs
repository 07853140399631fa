//! Core domain logic for the goal tracker.
//! This crate is the single source of truth for goal and progress invariants.

pub mod config;
pub mod db;
pub mod form;
pub mod logging;
pub mod model;
pub mod observe;
pub mod repo;
pub mod service;
pub mod tracker;

pub use config::{ConfigError, StorageBackend, TrackerConfig};
pub use db::{open_db, open_db_in_memory, DbError};
pub use form::goal_form::GoalForm;
pub use form::progress_form::{ProgressForm, SubmitOutcome};
pub use form::{FormEvent, FormField};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::goal::{Goal, GoalId, NewGoal};
pub use model::goal_type::GoalType;
pub use model::progress::{ProgressEntry, ProgressId};
pub use model::unit::{
    convert, ConversionError, DistanceUnit, Measurement, MeasurementDomain, Unit, VolumeUnit,
};
pub use model::validation::ValidationError;
pub use observe::{Observers, SubscriptionId};
pub use repo::error::{RepoError, RepoResult};
pub use repo::goal_repo::{GoalActivation, GoalStore, SqliteGoalStore};
pub use repo::json_store::{JsonGoalStore, JsonProgressStore};
pub use repo::progress_repo::{ProgressStore, SqliteProgressStore};
pub use service::goal_service::{DeleteOutcome, GoalService, GoalServiceError};
pub use service::progress_service::{ProgressService, ProgressServiceError};
pub use service::summary::{summarize, ProgressSummary};
pub use tracker::{OpenError, Tracker};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
