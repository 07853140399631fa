//! Goal-tracking domain model.
//!
//! # Responsibility
//! - Define goal, progress and unit value objects used by services/stores.
//! - Keep conversion and validation rules free of persistence concerns.
//!
//! # Invariants
//! - Goal types dispatch through `GoalType`, never through raw strings.
//! - Values written anywhere are positive, finite and unit-compatible.

pub mod goal;
pub mod goal_type;
pub mod progress;
pub mod unit;
pub mod validation;

/// Current wall-clock time as Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or_default()
}
