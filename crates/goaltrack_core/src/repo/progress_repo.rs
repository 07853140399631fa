//! Progress store contract and SQLite implementation.
//!
//! # Responsibility
//! - Load and replace the full progress collection of one goal type.
//!
//! # Invariants
//! - `save` is a replacement: after it returns, the given slice is the whole
//!   collection for that type.
//! - Every saved entry belongs to the type it is saved under.
//! - `append` of the built-in stores is one unit of work; concurrent appends
//!   through a shared store never drop each other's entries.

use crate::model::goal_type::GoalType;
use crate::model::progress::{sort_newest_first, ProgressEntry};
use crate::model::unit::Unit;
use crate::repo::ensure_schema_ready;
use crate::repo::error::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row, Statement};
use uuid::Uuid;

const PROGRESS_SELECT_SQL: &str = "SELECT
    id,
    goal_type,
    value,
    unit,
    recorded_at,
    note
FROM progress_entries";

const PROGRESS_INSERT_SQL: &str = "INSERT INTO progress_entries (
    id,
    goal_type,
    value,
    unit,
    recorded_at,
    note
) VALUES (?1, ?2, ?3, ?4, ?5, ?6);";

/// Store interface for per-type progress collections.
pub trait ProgressStore {
    /// Loads every entry of `goal_type`, oldest first.
    fn load(&self, goal_type: GoalType) -> RepoResult<Vec<ProgressEntry>>;
    /// Replaces the stored collection of `goal_type` with `entries`.
    fn save(&self, goal_type: GoalType, entries: &[ProgressEntry]) -> RepoResult<()>;

    /// Most recent entry of `goal_type`, if any.
    fn latest(&self, goal_type: GoalType) -> RepoResult<Option<ProgressEntry>> {
        let mut entries = self.load(goal_type)?;
        sort_newest_first(&mut entries);
        Ok(entries.into_iter().next())
    }

    /// Adds `entry` to the collection of its goal type and returns the new
    /// collection size.
    ///
    /// The default runs `load` and `save` as separate calls, so two callers
    /// appending at once can lose one entry. Stores shared across threads
    /// override it.
    fn append(&self, entry: &ProgressEntry) -> RepoResult<usize> {
        let mut entries = self.load(entry.goal_type)?;
        entries.push(entry.clone());
        self.save(entry.goal_type, &entries)?;
        Ok(entries.len())
    }
}

impl<T: ProgressStore + ?Sized> ProgressStore for &T {
    fn load(&self, goal_type: GoalType) -> RepoResult<Vec<ProgressEntry>> {
        (**self).load(goal_type)
    }
    fn save(&self, goal_type: GoalType, entries: &[ProgressEntry]) -> RepoResult<()> {
        (**self).save(goal_type, entries)
    }
    fn latest(&self, goal_type: GoalType) -> RepoResult<Option<ProgressEntry>> {
        (**self).latest(goal_type)
    }
    fn append(&self, entry: &ProgressEntry) -> RepoResult<usize> {
        (**self).append(entry)
    }
}

impl<T: ProgressStore + ?Sized> ProgressStore for Box<T> {
    fn load(&self, goal_type: GoalType) -> RepoResult<Vec<ProgressEntry>> {
        (**self).load(goal_type)
    }
    fn save(&self, goal_type: GoalType, entries: &[ProgressEntry]) -> RepoResult<()> {
        (**self).save(goal_type, entries)
    }
    fn latest(&self, goal_type: GoalType) -> RepoResult<Option<ProgressEntry>> {
        (**self).latest(goal_type)
    }
    fn append(&self, entry: &ProgressEntry) -> RepoResult<usize> {
        (**self).append(entry)
    }
}

/// Validates a replacement collection before any store writes it.
pub(crate) fn check_entries(goal_type: GoalType, entries: &[ProgressEntry]) -> RepoResult<()> {
    for entry in entries {
        if entry.goal_type != goal_type {
            return Err(RepoError::InvalidData(format!(
                "entry {} has goal type {} but is saved under {}",
                entry.id, entry.goal_type, goal_type
            )));
        }
        entry.validate()?;
    }
    Ok(())
}

/// SQLite-backed progress store.
pub struct SqliteProgressStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProgressStore<'conn> {
    /// Wraps a connection returned by `open_db` / `open_db_in_memory`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ProgressStore for SqliteProgressStore<'_> {
    fn load(&self, goal_type: GoalType) -> RepoResult<Vec<ProgressEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PROGRESS_SELECT_SQL}
             WHERE goal_type = ?1
             ORDER BY recorded_at ASC, rowid ASC;"
        ))?;
        let mut rows = stmt.query([goal_type.as_str()])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_progress_row(row)?);
        }
        Ok(entries)
    }

    fn save(&self, goal_type: GoalType, entries: &[ProgressEntry]) -> RepoResult<()> {
        check_entries(goal_type, entries)?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM progress_entries WHERE goal_type = ?1;",
            [goal_type.as_str()],
        )?;
        {
            let mut insert = tx.prepare(PROGRESS_INSERT_SQL)?;
            for entry in entries {
                insert_entry(&mut insert, entry)?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn append(&self, entry: &ProgressEntry) -> RepoResult<usize> {
        check_entries(entry.goal_type, std::slice::from_ref(entry))?;

        let tx = self.conn.unchecked_transaction()?;
        {
            let mut insert = tx.prepare(PROGRESS_INSERT_SQL)?;
            insert_entry(&mut insert, entry)?;
        }
        let count: i64 = tx.query_row(
            "SELECT COUNT(*) FROM progress_entries WHERE goal_type = ?1;",
            [entry.goal_type.as_str()],
            |row| row.get(0),
        )?;
        tx.commit()?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    fn latest(&self, goal_type: GoalType) -> RepoResult<Option<ProgressEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PROGRESS_SELECT_SQL}
             WHERE goal_type = ?1
             ORDER BY recorded_at DESC, rowid DESC
             LIMIT 1;"
        ))?;
        let mut rows = stmt.query([goal_type.as_str()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_progress_row(row)?));
        }
        Ok(None)
    }
}

fn insert_entry(insert: &mut Statement<'_>, entry: &ProgressEntry) -> rusqlite::Result<usize> {
    insert.execute(params![
        entry.id.to_string(),
        entry.goal_type.as_str(),
        entry.value,
        entry.unit.as_str(),
        entry.timestamp,
        entry.note.as_deref(),
    ])
}

fn parse_progress_row(row: &Row<'_>) -> RepoResult<ProgressEntry> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid `{id_text}` in progress_entries.id"))
    })?;

    let type_text: String = row.get("goal_type")?;
    let goal_type = type_text.parse::<GoalType>().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid goal type `{type_text}` in progress_entries.goal_type"
        ))
    })?;

    let unit_text: String = row.get("unit")?;
    let unit = unit_text.parse::<Unit>().map_err(|_| {
        RepoError::InvalidData(format!("invalid unit `{unit_text}` in progress_entries.unit"))
    })?;

    let entry = ProgressEntry {
        id,
        goal_type,
        value: row.get("value")?,
        unit,
        timestamp: row.get("recorded_at")?,
        note: row.get("note")?,
    };
    entry.validate().map_err(|err| {
        RepoError::InvalidData(format!("progress entry {id} failed validation: {err}"))
    })?;
    Ok(entry)
}
