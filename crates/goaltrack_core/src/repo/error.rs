//! Repository error type shared by every store implementation.

use crate::db::DbError;
use crate::model::validation::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence error for goal and progress stores.
#[derive(Debug)]
pub enum RepoError {
    /// Payload failed domain validation before persistence.
    Validation(ValidationError),
    Db(DbError),
    /// File-system failure while writing a JSON store file.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// JSON serialization failure on a write path.
    Encode(serde_json::Error),
    /// Persisted row cannot be mapped back into the domain model.
    InvalidData(String),
    /// Connection has not been migrated to the schema this build expects.
    ConnectionNotReady { schema_version: u32, expected: u32 },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Io { path, source } => write!(f, "failed to write `{}`: {source}", path.display()),
            Self::Encode(err) => write!(f, "failed to encode store data: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::ConnectionNotReady {
                schema_version,
                expected,
            } => write!(
                f,
                "database schema version {schema_version} does not match expected {expected}; open it with `open_db`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::Encode(err) => Some(err),
            Self::InvalidData(_) | Self::ConnectionNotReady { .. } => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}
