use goaltrack_core::db::open_db_in_memory;
use goaltrack_core::{
    DeleteOutcome, DistanceUnit, GoalService, GoalServiceError, GoalStore, GoalType,
    JsonGoalStore, SqliteGoalStore, ValidationError, VolumeUnit,
};
use std::sync::atomic::{AtomicI64, Ordering};

static CLOCK: AtomicI64 = AtomicI64::new(1_000);

fn ticking_clock() -> i64 {
    CLOCK.fetch_add(1, Ordering::SeqCst)
}

fn assert_second_save_replaces_active<S: GoalStore>(service: &GoalService<S>) {
    let first = service
        .save_goal(GoalType::Water, 1.0, VolumeUnit::Liters.into())
        .unwrap();
    let second = service
        .save_goal(GoalType::Water, 2.0, VolumeUnit::Liters.into())
        .unwrap();

    assert_ne!(first.id, second.id);
    assert!(second.is_active);

    let active = service.active_goal(GoalType::Water).unwrap().unwrap();
    assert_eq!(active.id, second.id);
    assert_eq!(active.value, 2.0);

    let water = service.goals_by_type(GoalType::Water).unwrap();
    assert_eq!(water.len(), 2);
    assert_eq!(water.iter().filter(|goal| goal.is_active).count(), 1);

    let stored_first = service.get_goal(first.id).unwrap().unwrap();
    assert!(!stored_first.is_active);
}

fn assert_types_are_independent<S: GoalStore>(service: &GoalService<S>) {
    let running = service
        .save_goal(GoalType::Running, 5.0, DistanceUnit::Kilometers.into())
        .unwrap();
    service
        .save_goal(GoalType::Water, 64.0, VolumeUnit::Ounces.into())
        .unwrap();

    let active_running = service.active_goal(GoalType::Running).unwrap().unwrap();
    assert_eq!(active_running.id, running.id);
    assert_eq!(service.list_goals().unwrap().len(), 2);
}

fn assert_delete_outcomes<S: GoalStore>(service: &GoalService<S>) {
    let goal = service
        .save_goal(GoalType::Running, 3.0, DistanceUnit::Miles.into())
        .unwrap();

    assert_eq!(service.delete_goal(goal.id).unwrap(), DeleteOutcome::Deleted);
    assert_eq!(
        service.delete_goal(goal.id).unwrap(),
        DeleteOutcome::NotFound
    );
    assert_eq!(service.delete_goal(9_999).unwrap(), DeleteOutcome::NotFound);
    assert!(service.active_goal(GoalType::Running).unwrap().is_none());
}

#[test]
fn sqlite_second_save_leaves_only_latest_active() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteGoalStore::try_new(&conn).unwrap();
    assert_second_save_replaces_active(&GoalService::new(store));
}

#[test]
fn json_second_save_leaves_only_latest_active() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonGoalStore::new(dir.path()).unwrap();
    assert_second_save_replaces_active(&GoalService::new(store));
}

#[test]
fn sqlite_goal_types_keep_separate_active_goals() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteGoalStore::try_new(&conn).unwrap();
    assert_types_are_independent(&GoalService::new(store));
}

#[test]
fn json_goal_types_keep_separate_active_goals() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonGoalStore::new(dir.path()).unwrap();
    assert_types_are_independent(&GoalService::new(store));
}

#[test]
fn sqlite_delete_reports_not_found_for_missing_goal() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteGoalStore::try_new(&conn).unwrap();
    assert_delete_outcomes(&GoalService::new(store));
}

#[test]
fn json_delete_reports_not_found_for_missing_goal() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonGoalStore::new(dir.path()).unwrap();
    assert_delete_outcomes(&GoalService::new(store));
}

#[test]
fn save_goal_rejects_invalid_input_before_storage() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteGoalStore::try_new(&conn).unwrap();
    let service = GoalService::new(&store);

    let zero = service
        .save_goal(GoalType::Running, 0.0, DistanceUnit::Miles.into())
        .unwrap_err();
    assert!(matches!(
        zero,
        GoalServiceError::Validation(ValidationError::NonPositiveValue(_))
    ));

    let nan = service
        .save_goal(GoalType::Running, f64::NAN, DistanceUnit::Miles.into())
        .unwrap_err();
    assert!(matches!(
        nan,
        GoalServiceError::Validation(ValidationError::NonFiniteValue(_))
    ));

    let mismatch = service
        .save_goal(GoalType::Running, 2.0, VolumeUnit::Cups.into())
        .unwrap_err();
    assert!(matches!(
        mismatch,
        GoalServiceError::Validation(ValidationError::UnitMismatch { .. })
    ));

    assert!(store.list_goals().unwrap().is_empty());
}

#[test]
fn list_goals_is_ordered_by_creation_time() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonGoalStore::new(dir.path()).unwrap();
    let service = GoalService::with_clock(&store, ticking_clock);

    let a = service
        .save_goal(GoalType::Water, 8.0, VolumeUnit::Cups.into())
        .unwrap();
    let b = service
        .save_goal(GoalType::Running, 10.0, DistanceUnit::Kilometers.into())
        .unwrap();
    let c = service
        .save_goal(GoalType::Water, 2.0, VolumeUnit::Liters.into())
        .unwrap();

    let ids: Vec<_> = service.list_goals().unwrap().iter().map(|goal| goal.id).collect();
    assert_eq!(ids, vec![a.id, b.id, c.id]);
    assert!(a.created_at < b.created_at && b.created_at < c.created_at);
}

#[test]
fn sqlite_schema_rejects_second_active_goal_of_same_type() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO goals (goal_type, value, unit, created_at, is_active)
         VALUES ('Water', 1.0, 'Liters', 1, 1);",
        [],
    )
    .unwrap();

    let result = conn.execute(
        "INSERT INTO goals (goal_type, value, unit, created_at, is_active)
         VALUES ('Water', 2.0, 'Liters', 2, 1);",
        [],
    );
    assert!(result.is_err());

    conn.execute(
        "INSERT INTO goals (goal_type, value, unit, created_at, is_active)
         VALUES ('Water', 3.0, 'Liters', 3, 0);",
        [],
    )
    .unwrap();
}

#[test]
fn sqlite_rejects_corrupt_goal_rows_on_read() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO goals (goal_type, value, unit, created_at, is_active)
         VALUES ('Running', 1.0, 'Liters', 1, 1);",
        [],
    )
    .unwrap();
    let store = SqliteGoalStore::try_new(&conn).unwrap();

    let err = store.list_goals().unwrap_err();
    assert!(matches!(err, goaltrack_core::RepoError::InvalidData(_)));
}

#[test]
fn json_goals_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let saved = {
        let store = JsonGoalStore::new(dir.path()).unwrap();
        GoalService::new(store)
            .save_goal(GoalType::Running, 26.2, DistanceUnit::Miles.into())
            .unwrap()
    };

    let reopened = JsonGoalStore::new(dir.path()).unwrap();
    let active = reopened.active_goal(GoalType::Running).unwrap().unwrap();
    assert_eq!(active, saved);
}

fn assert_ids_not_reused_after_delete<S: GoalStore>(service: &GoalService<S>) {
    let first = service
        .save_goal(GoalType::Water, 1.0, VolumeUnit::Liters.into())
        .unwrap();
    assert_eq!(service.delete_goal(first.id).unwrap(), DeleteOutcome::Deleted);

    let second = service
        .save_goal(GoalType::Running, 2.0, DistanceUnit::Miles.into())
        .unwrap();
    assert!(second.id > first.id);
    assert!(service.get_goal(first.id).unwrap().is_none());
}

#[test]
fn json_goal_ids_are_not_reused_after_delete() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonGoalStore::new(dir.path()).unwrap();
    assert_ids_not_reused_after_delete(&GoalService::new(store));

    let reopened = GoalService::new(JsonGoalStore::new(dir.path()).unwrap());
    let newest = reopened.list_goals().unwrap().last().unwrap().id;
    assert_eq!(reopened.delete_goal(newest).unwrap(), DeleteOutcome::Deleted);
    let after_reopen = reopened
        .save_goal(GoalType::Water, 3.0, VolumeUnit::Cups.into())
        .unwrap();
    assert!(after_reopen.id > newest);
}

#[test]
fn sqlite_goal_ids_are_not_reused_after_delete() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteGoalStore::try_new(&conn).unwrap();
    assert_ids_not_reused_after_delete(&GoalService::new(store));
}
