//! Framework-free form state for goal and progress entry screens.
//!
//! # Responsibility
//! - Hold the user's current selections as plain state.
//! - Announce every state change through `Observers<FormEvent>`.
//!
//! # Invariants
//! - An event is emitted only when a field actually changes.
//! - Forms talk to storage only through services.

pub mod goal_form;
pub mod progress_form;

/// Field identifiers carried by `FormEvent::Changed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    GoalType,
    Value,
    DistanceUnit,
    VolumeUnit,
    Note,
    ValidationError,
    LastSaved,
}

/// Notification emitted by forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    Changed(FormField),
    /// Submission persisted successfully.
    Saved,
    /// Submission reached storage and failed there.
    SaveFailed,
}
