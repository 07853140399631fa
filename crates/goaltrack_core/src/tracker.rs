//! Composition point wiring stores into services.
//!
//! # Responsibility
//! - Open the configured backend once.
//! - Hand out services bound to that backend.
//!
//! # Invariants
//! - This is the only place that chooses a store implementation; services
//!   and forms only see the `GoalStore` / `ProgressStore` traits.

use crate::config::{ConfigError, StorageBackend, TrackerConfig};
use crate::db::{open_db, DbError};
use crate::logging::{init_logging, LoggingError};
use crate::repo::error::RepoError;
use crate::repo::goal_repo::{GoalStore, SqliteGoalStore};
use crate::repo::json_store::{JsonGoalStore, JsonProgressStore};
use crate::repo::progress_repo::{ProgressStore, SqliteProgressStore};
use crate::service::goal_service::GoalService;
use crate::service::progress_service::ProgressService;
use log::info;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub type BoxedGoalStore<'a> = Box<dyn GoalStore + 'a>;
pub type BoxedProgressStore<'a> = Box<dyn ProgressStore + 'a>;

#[derive(Debug)]
pub enum OpenError {
    Config(ConfigError),
    DataDir { path: PathBuf, source: std::io::Error },
    Logging(LoggingError),
    Db(DbError),
    Repo(RepoError),
}

impl Display for OpenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::DataDir { path, source } => write!(
                f,
                "failed to prepare data directory `{}`: {source}",
                path.display()
            ),
            Self::Logging(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for OpenError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::DataDir { source, .. } => Some(source),
            Self::Logging(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<ConfigError> for OpenError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<LoggingError> for OpenError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<DbError> for OpenError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for OpenError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

enum Backend {
    Json {
        goals: JsonGoalStore,
        progress: JsonProgressStore,
    },
    Sqlite(Connection),
}

/// Opened backend plus service factories.
pub struct Tracker {
    backend: Backend,
    data_dir: PathBuf,
}

impl Tracker {
    /// Opens the backend described by `config`.
    ///
    /// # Side effects
    /// - Starts file logging when `config.log_dir` is set.
    /// - Creates `config.data_dir` when it does not exist.
    /// - For SQLite, creates the database file and applies migrations.
    pub fn open(config: &TrackerConfig) -> Result<Self, OpenError> {
        config.validate()?;
        if let Some(log_dir) = &config.log_dir {
            init_logging(&config.log_level, log_dir)?;
        }

        let data_dir = config.data_dir.clone();
        std::fs::create_dir_all(&data_dir).map_err(|source| OpenError::DataDir {
            path: data_dir.clone(),
            source,
        })?;

        let backend = match config.backend {
            StorageBackend::Json => Backend::Json {
                goals: JsonGoalStore::new(&data_dir)?,
                progress: JsonProgressStore::new(&data_dir)?,
            },
            StorageBackend::Sqlite => Backend::Sqlite(open_db(config.database_path())?),
        };

        info!(
            "event=tracker_open module=tracker status=ok backend={}",
            backend_label(config.backend)
        );
        Ok(Self { backend, data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn backend(&self) -> StorageBackend {
        match self.backend {
            Backend::Json { .. } => StorageBackend::Json,
            Backend::Sqlite(_) => StorageBackend::Sqlite,
        }
    }

    /// Goal service bound to the opened backend.
    pub fn goal_service(&self) -> Result<GoalService<BoxedGoalStore<'_>>, OpenError> {
        let store: BoxedGoalStore<'_> = match &self.backend {
            Backend::Json { goals, .. } => Box::new(goals),
            Backend::Sqlite(conn) => Box::new(SqliteGoalStore::try_new(conn)?),
        };
        Ok(GoalService::new(store))
    }

    /// Progress service bound to the opened backend.
    pub fn progress_service(&self) -> Result<ProgressService<BoxedProgressStore<'_>>, OpenError> {
        let store: BoxedProgressStore<'_> = match &self.backend {
            Backend::Json { progress, .. } => Box::new(progress),
            Backend::Sqlite(conn) => Box::new(SqliteProgressStore::try_new(conn)?),
        };
        Ok(ProgressService::new(store))
    }
}

fn backend_label(backend: StorageBackend) -> &'static str {
    match backend {
        StorageBackend::Json => "json",
        StorageBackend::Sqlite => "sqlite",
    }
}
