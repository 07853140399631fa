//! File-backed JSON stores.
//!
//! # Responsibility
//! - Persist goals as one `goals.json` array and progress as one
//!   `<type>_progress.json` array per goal type under a save-data directory.
//!
//! # Invariants
//! - Every read-modify-write runs under the store's mutex.
//! - Missing, unreadable or corrupt files read as an empty collection.
//! - Array elements that fail to decode or validate are skipped; the rest of
//!   the file is kept.
//! - Goal ids are never reused; `goals.seq.json` holds the next id and only
//!   grows.
//! - Write failures propagate; the previous file stays in place.

use crate::model::goal::{Goal, GoalId, NewGoal};
use crate::model::goal_type::GoalType;
use crate::model::progress::ProgressEntry;
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::goal_repo::{GoalActivation, GoalStore};
use crate::repo::json_file::{read_json, read_json_array, write_json_atomic, ReadOutcome};
use crate::repo::progress_repo::{check_entries, ProgressStore};
use log::{error, info, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

pub const GOALS_FILE_NAME: &str = "goals.json";
/// Next goal id for the JSON goal store.
pub const GOAL_SEQUENCE_FILE_NAME: &str = "goals.seq.json";

fn create_dir(dir: &Path) -> RepoResult<()> {
    std::fs::create_dir_all(dir).map_err(|source| RepoError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Path of the progress file for `goal_type` inside `dir`.
pub fn progress_file_path(dir: &Path, goal_type: GoalType) -> PathBuf {
    dir.join(format!("{}_progress.json", goal_type.slug()))
}

/// Goal store persisted as a single JSON array.
pub struct JsonGoalStore {
    path: PathBuf,
    sequence_path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonGoalStore {
    /// Opens the store in `dir`, creating the directory when absent.
    pub fn new(dir: impl AsRef<Path>) -> RepoResult<Self> {
        let dir = dir.as_ref();
        create_dir(dir)?;
        Ok(Self {
            path: dir.join(GOALS_FILE_NAME),
            sequence_path: dir.join(GOAL_SEQUENCE_FILE_NAME),
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Vec<Goal> {
        let mut goals = match read_json_array::<Goal>(&self.path) {
            ReadOutcome::Missing => Vec::new(),
            ReadOutcome::Loaded(array) => {
                let decoded = array.items.len();
                let valid: Vec<Goal> = array
                    .items
                    .into_iter()
                    .filter(|goal| goal.validate().is_ok())
                    .collect();
                let skipped = array.skipped + decoded - valid.len();
                if skipped > 0 {
                    warn!(
                        "event=goals_load module=repo status=degraded skipped={} path={}",
                        skipped,
                        self.path.display()
                    );
                }
                valid
            }
            ReadOutcome::Unreadable(reason) => {
                warn!(
                    "event=goals_load module=repo status=degraded path={} error={}",
                    self.path.display(),
                    reason
                );
                Vec::new()
            }
        };
        goals.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        goals
    }

    fn write_all(&self, goals: &[Goal]) -> RepoResult<()> {
        write_json_atomic(&self.path, goals)?;
        info!(
            "event=goals_save module=repo status=ok goals={}",
            goals.len()
        );
        Ok(())
    }

    /// Reserves the next goal id and persists the raised high-water mark.
    ///
    /// The mark is written before the goal, so a failed goal write only
    /// burns an id.
    fn reserve_id(&self, goals: &[Goal]) -> RepoResult<GoalId> {
        let stored_next = match read_json::<GoalId>(&self.sequence_path) {
            ReadOutcome::Loaded(next) => next,
            ReadOutcome::Missing => 1,
            ReadOutcome::Unreadable(reason) => {
                warn!(
                    "event=goals_sequence_load module=repo status=degraded path={} error={}",
                    self.sequence_path.display(),
                    reason
                );
                1
            }
        };
        let after_existing = goals.iter().map(|goal| goal.id).max().unwrap_or(0) + 1;
        let id = stored_next.max(after_existing);
        write_json_atomic(&self.sequence_path, &(id + 1))?;
        Ok(id)
    }
}

impl GoalStore for JsonGoalStore {
    fn get_goal(&self, id: GoalId) -> RepoResult<Option<Goal>> {
        let _guard = lock(&self.write_lock);
        Ok(self.read_all().into_iter().find(|goal| goal.id == id))
    }

    fn list_goals(&self) -> RepoResult<Vec<Goal>> {
        let _guard = lock(&self.write_lock);
        Ok(self.read_all())
    }

    fn list_goals_by_type(&self, goal_type: GoalType) -> RepoResult<Vec<Goal>> {
        let _guard = lock(&self.write_lock);
        Ok(self
            .read_all()
            .into_iter()
            .filter(|goal| goal.goal_type == goal_type)
            .collect())
    }

    fn insert_goal(&self, goal: &NewGoal) -> RepoResult<Goal> {
        goal.validate()?;

        let _guard = lock(&self.write_lock);
        let mut goals = self.read_all();
        let stored = goal.clone().into_goal(self.reserve_id(&goals)?);
        goals.push(stored.clone());
        self.write_all(&goals)?;
        Ok(stored)
    }

    fn deactivate_goals(&self, goal_type: GoalType) -> RepoResult<usize> {
        let _guard = lock(&self.write_lock);
        let mut goals = self.read_all();
        let deactivated = deactivate_in_place(&mut goals, goal_type);
        if deactivated > 0 {
            self.write_all(&goals)?;
        }
        Ok(deactivated)
    }

    fn delete_goal(&self, id: GoalId) -> RepoResult<bool> {
        let _guard = lock(&self.write_lock);
        let mut goals = self.read_all();
        let before = goals.len();
        goals.retain(|goal| goal.id != id);
        if goals.len() == before {
            return Ok(false);
        }
        self.write_all(&goals)?;
        Ok(true)
    }

    fn activate_goal(&self, goal: &NewGoal) -> RepoResult<GoalActivation> {
        goal.validate()?;

        let _guard = lock(&self.write_lock);
        let mut goals = self.read_all();
        let deactivated = deactivate_in_place(&mut goals, goal.goal_type);
        let stored = goal.clone().into_goal(self.reserve_id(&goals)?);
        goals.push(stored.clone());
        self.write_all(&goals)?;

        Ok(GoalActivation {
            goal: stored,
            deactivated,
        })
    }
}

fn deactivate_in_place(goals: &mut [Goal], goal_type: GoalType) -> usize {
    let mut changed = 0;
    for goal in goals
        .iter_mut()
        .filter(|goal| goal.goal_type == goal_type && goal.is_active)
    {
        goal.deactivate();
        changed += 1;
    }
    changed
}

/// Progress store persisted as one JSON array per goal type.
///
/// Successfully read collections are cached per type; the cache is refreshed
/// on every successful save.
pub struct JsonProgressStore {
    dir: PathBuf,
    cache: Mutex<HashMap<GoalType, Vec<ProgressEntry>>>,
}

impl JsonProgressStore {
    /// Opens the store in `dir`, creating the directory when absent.
    pub fn new(dir: impl AsRef<Path>) -> RepoResult<Self> {
        let dir = dir.as_ref();
        create_dir(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            cache: Mutex::new(HashMap::new()),
        })
    }

    pub fn file_path(&self, goal_type: GoalType) -> PathBuf {
        progress_file_path(&self.dir, goal_type)
    }
}

impl JsonProgressStore {
    /// Reads the file of `goal_type`; `None` when it is unreadable, which is
    /// not cached so a later fix on disk is picked up.
    fn read_file(&self, goal_type: GoalType) -> Option<Vec<ProgressEntry>> {
        let path = self.file_path(goal_type);
        match read_json_array::<ProgressEntry>(&path) {
            ReadOutcome::Missing => Some(Vec::new()),
            ReadOutcome::Loaded(array) => {
                let decoded = array.items.len();
                let valid: Vec<ProgressEntry> = array
                    .items
                    .into_iter()
                    .filter(|entry| entry.goal_type == goal_type && entry.validate().is_ok())
                    .collect();
                let skipped = array.skipped + decoded - valid.len();
                if skipped > 0 {
                    warn!(
                        "event=progress_load module=repo status=degraded goal_type={} skipped={}",
                        goal_type.slug(),
                        skipped
                    );
                }
                Some(valid)
            }
            ReadOutcome::Unreadable(reason) => {
                warn!(
                    "event=progress_load module=repo status=degraded goal_type={} path={} error={}",
                    goal_type.slug(),
                    path.display(),
                    reason
                );
                None
            }
        }
    }

    fn write_locked(
        &self,
        cache: &mut HashMap<GoalType, Vec<ProgressEntry>>,
        goal_type: GoalType,
        entries: Vec<ProgressEntry>,
    ) -> RepoResult<()> {
        let path = self.file_path(goal_type);
        if let Err(err) = write_json_atomic(&path, &entries) {
            error!(
                "event=progress_save module=repo status=error goal_type={} error={}",
                goal_type.slug(),
                err
            );
            return Err(err);
        }

        info!(
            "event=progress_save module=repo status=ok goal_type={} entries={}",
            goal_type.slug(),
            entries.len()
        );
        cache.insert(goal_type, entries);
        Ok(())
    }
}

impl ProgressStore for JsonProgressStore {
    fn load(&self, goal_type: GoalType) -> RepoResult<Vec<ProgressEntry>> {
        let mut cache = lock(&self.cache);
        if let Some(entries) = cache.get(&goal_type) {
            return Ok(entries.clone());
        }

        match self.read_file(goal_type) {
            Some(entries) => {
                cache.insert(goal_type, entries.clone());
                Ok(entries)
            }
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, goal_type: GoalType, entries: &[ProgressEntry]) -> RepoResult<()> {
        check_entries(goal_type, entries)?;

        let mut cache = lock(&self.cache);
        self.write_locked(&mut cache, goal_type, entries.to_vec())
    }

    fn append(&self, entry: &ProgressEntry) -> RepoResult<usize> {
        check_entries(entry.goal_type, std::slice::from_ref(entry))?;

        let mut cache = lock(&self.cache);
        let mut entries = match cache.get(&entry.goal_type) {
            Some(entries) => entries.clone(),
            None => self.read_file(entry.goal_type).unwrap_or_default(),
        };
        entries.push(entry.clone());
        let count = entries.len();
        self.write_locked(&mut cache, entry.goal_type, entries)?;
        Ok(count)
    }
}
