//! Goal store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over goals plus the "activate one, deactivate the rest"
//!   write used by the goal service.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths validate payloads before SQL mutations.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - `goals` carries a partial unique index allowing one active row per type.

use crate::model::goal::{Goal, GoalId, NewGoal};
use crate::model::goal_type::GoalType;
use crate::model::unit::Unit;
use crate::repo::ensure_schema_ready;
use crate::repo::error::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const GOAL_SELECT_SQL: &str = "SELECT
    id,
    goal_type,
    value,
    unit,
    created_at,
    is_active
FROM goals";

/// Result of inserting a goal as the active one for its type.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalActivation {
    /// Newly stored active goal.
    pub goal: Goal,
    /// Number of previously active goals that were switched off.
    pub deactivated: usize,
}

/// Store interface for goal records.
pub trait GoalStore {
    fn get_goal(&self, id: GoalId) -> RepoResult<Option<Goal>>;
    /// All goals ordered by `(created_at, id)` ascending.
    fn list_goals(&self) -> RepoResult<Vec<Goal>>;
    fn list_goals_by_type(&self, goal_type: GoalType) -> RepoResult<Vec<Goal>>;
    fn insert_goal(&self, goal: &NewGoal) -> RepoResult<Goal>;
    /// Clears the active flag on every goal of `goal_type`.
    fn deactivate_goals(&self, goal_type: GoalType) -> RepoResult<usize>;
    /// Returns `false` when no goal has this id.
    fn delete_goal(&self, id: GoalId) -> RepoResult<bool>;

    fn active_goal(&self, goal_type: GoalType) -> RepoResult<Option<Goal>> {
        Ok(self
            .list_goals_by_type(goal_type)?
            .into_iter()
            .find(|goal| goal.is_active))
    }

    /// Deactivates the current goal(s) of the type, then inserts `goal`.
    ///
    /// Implementations that can do both in one unit of work override this.
    fn activate_goal(&self, goal: &NewGoal) -> RepoResult<GoalActivation> {
        let deactivated = self.deactivate_goals(goal.goal_type)?;
        let goal = self.insert_goal(goal)?;
        Ok(GoalActivation { goal, deactivated })
    }
}

impl<T: GoalStore + ?Sized> GoalStore for &T {
    fn get_goal(&self, id: GoalId) -> RepoResult<Option<Goal>> {
        (**self).get_goal(id)
    }
    fn list_goals(&self) -> RepoResult<Vec<Goal>> {
        (**self).list_goals()
    }
    fn list_goals_by_type(&self, goal_type: GoalType) -> RepoResult<Vec<Goal>> {
        (**self).list_goals_by_type(goal_type)
    }
    fn insert_goal(&self, goal: &NewGoal) -> RepoResult<Goal> {
        (**self).insert_goal(goal)
    }
    fn deactivate_goals(&self, goal_type: GoalType) -> RepoResult<usize> {
        (**self).deactivate_goals(goal_type)
    }
    fn delete_goal(&self, id: GoalId) -> RepoResult<bool> {
        (**self).delete_goal(id)
    }
    fn active_goal(&self, goal_type: GoalType) -> RepoResult<Option<Goal>> {
        (**self).active_goal(goal_type)
    }
    fn activate_goal(&self, goal: &NewGoal) -> RepoResult<GoalActivation> {
        (**self).activate_goal(goal)
    }
}

impl<T: GoalStore + ?Sized> GoalStore for Box<T> {
    fn get_goal(&self, id: GoalId) -> RepoResult<Option<Goal>> {
        (**self).get_goal(id)
    }
    fn list_goals(&self) -> RepoResult<Vec<Goal>> {
        (**self).list_goals()
    }
    fn list_goals_by_type(&self, goal_type: GoalType) -> RepoResult<Vec<Goal>> {
        (**self).list_goals_by_type(goal_type)
    }
    fn insert_goal(&self, goal: &NewGoal) -> RepoResult<Goal> {
        (**self).insert_goal(goal)
    }
    fn deactivate_goals(&self, goal_type: GoalType) -> RepoResult<usize> {
        (**self).deactivate_goals(goal_type)
    }
    fn delete_goal(&self, id: GoalId) -> RepoResult<bool> {
        (**self).delete_goal(id)
    }
    fn active_goal(&self, goal_type: GoalType) -> RepoResult<Option<Goal>> {
        (**self).active_goal(goal_type)
    }
    fn activate_goal(&self, goal: &NewGoal) -> RepoResult<GoalActivation> {
        (**self).activate_goal(goal)
    }
}

/// SQLite-backed goal store.
pub struct SqliteGoalStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGoalStore<'conn> {
    /// Wraps a connection returned by `open_db` / `open_db_in_memory`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self { conn })
    }

    fn query_goals(&self, sql: &str, params: impl rusqlite::Params) -> RepoResult<Vec<Goal>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut goals = Vec::new();
        while let Some(row) = rows.next()? {
            goals.push(parse_goal_row(row)?);
        }
        Ok(goals)
    }
}

impl GoalStore for SqliteGoalStore<'_> {
    fn get_goal(&self, id: GoalId) -> RepoResult<Option<Goal>> {
        let goals = self.query_goals(&format!("{GOAL_SELECT_SQL} WHERE id = ?1;"), [id])?;
        Ok(goals.into_iter().next())
    }

    fn list_goals(&self) -> RepoResult<Vec<Goal>> {
        self.query_goals(
            &format!("{GOAL_SELECT_SQL} ORDER BY created_at ASC, id ASC;"),
            params![],
        )
    }

    fn list_goals_by_type(&self, goal_type: GoalType) -> RepoResult<Vec<Goal>> {
        self.query_goals(
            &format!("{GOAL_SELECT_SQL} WHERE goal_type = ?1 ORDER BY created_at ASC, id ASC;"),
            [goal_type.as_str()],
        )
    }

    fn insert_goal(&self, goal: &NewGoal) -> RepoResult<Goal> {
        goal.validate()?;

        self.conn.execute(
            "INSERT INTO goals (
                goal_type,
                value,
                unit,
                created_at,
                is_active
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                goal.goal_type.as_str(),
                goal.value,
                goal.unit.as_str(),
                goal.created_at,
                bool_to_int(goal.is_active),
            ],
        )?;

        Ok(goal.clone().into_goal(self.conn.last_insert_rowid()))
    }

    fn deactivate_goals(&self, goal_type: GoalType) -> RepoResult<usize> {
        let changed = self.conn.execute(
            "UPDATE goals SET is_active = 0 WHERE goal_type = ?1 AND is_active = 1;",
            [goal_type.as_str()],
        )?;
        Ok(changed)
    }

    fn delete_goal(&self, id: GoalId) -> RepoResult<bool> {
        let changed = self.conn.execute("DELETE FROM goals WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }

    fn active_goal(&self, goal_type: GoalType) -> RepoResult<Option<Goal>> {
        let goals = self.query_goals(
            &format!("{GOAL_SELECT_SQL} WHERE goal_type = ?1 AND is_active = 1 LIMIT 1;"),
            [goal_type.as_str()],
        )?;
        Ok(goals.into_iter().next())
    }

    fn activate_goal(&self, goal: &NewGoal) -> RepoResult<GoalActivation> {
        goal.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        let deactivated = self.deactivate_goals(goal.goal_type)?;
        let goal = self.insert_goal(goal)?;
        tx.commit()?;

        Ok(GoalActivation { goal, deactivated })
    }
}

fn parse_goal_row(row: &Row<'_>) -> RepoResult<Goal> {
    let type_text: String = row.get("goal_type")?;
    let goal_type = type_text.parse::<GoalType>().map_err(|_| {
        RepoError::InvalidData(format!("invalid goal type `{type_text}` in goals.goal_type"))
    })?;

    let unit_text: String = row.get("unit")?;
    let unit = unit_text.parse::<Unit>().map_err(|_| {
        RepoError::InvalidData(format!("invalid unit `{unit_text}` in goals.unit"))
    })?;

    let is_active = match row.get::<_, i64>("is_active")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_active value `{other}` in goals.is_active"
            )));
        }
    };

    let goal = Goal {
        id: row.get("id")?,
        goal_type,
        value: row.get("value")?,
        unit,
        created_at: row.get("created_at")?,
        is_active,
    };
    goal.validate().map_err(|err| {
        RepoError::InvalidData(format!("goal {} failed validation: {err}", goal.id))
    })?;
    Ok(goal)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
