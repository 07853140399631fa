//! Store contracts and persistence implementations.
//!
//! # Responsibility
//! - Define the `GoalStore` / `ProgressStore` contracts consumed by services.
//! - Provide interchangeable JSON-file and SQLite implementations.
//!
//! # Invariants
//! - Write paths validate payloads before touching storage.
//! - Returned collections are owned copies; callers never alias store state.

pub mod error;
pub mod goal_repo;
mod json_file;
pub mod json_store;
pub mod progress_repo;

use crate::db::migrations::{current_user_version, latest_version};
use error::{RepoError, RepoResult};
use rusqlite::Connection;

/// Rejects connections that were not opened through `open_db*`.
fn ensure_schema_ready(conn: &Connection) -> RepoResult<()> {
    let schema_version = current_user_version(conn)?;
    let expected = latest_version();
    if schema_version != expected {
        return Err(RepoError::ConnectionNotReady {
            schema_version,
            expected,
        });
    }
    Ok(())
}
