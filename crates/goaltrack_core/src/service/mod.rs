//! Goal and progress use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into use-case level APIs.
//! - Keep presentation code decoupled from storage details.
//!
//! # Invariants
//! - Validation happens before any store call.
//! - Services receive their stores through constructors; there is no global
//!   registry.

pub mod goal_service;
pub mod progress_service;
pub mod summary;
