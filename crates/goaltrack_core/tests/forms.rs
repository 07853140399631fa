use goaltrack_core::db::open_db_in_memory;
use goaltrack_core::{
    DistanceUnit, FormEvent, FormField, Goal, GoalForm, GoalId, GoalService, GoalServiceError,
    GoalStore, GoalType, JsonGoalStore, JsonProgressStore, NewGoal, ProgressEntry, ProgressForm,
    ProgressService, ProgressStore, RepoError, RepoResult, SqliteProgressStore, SubmitOutcome,
    Unit, VolumeUnit,
};
use std::cell::RefCell;
use std::rc::Rc;

fn record_events(events: &Rc<RefCell<Vec<FormEvent>>>) -> impl FnMut(&FormEvent) + 'static {
    let events = Rc::clone(events);
    move |event: &FormEvent| events.borrow_mut().push(event.clone())
}

/// Store whose writes always fail.
struct FailingStore;

impl ProgressStore for FailingStore {
    fn load(&self, _goal_type: GoalType) -> RepoResult<Vec<ProgressEntry>> {
        Ok(Vec::new())
    }

    fn save(&self, _goal_type: GoalType, _entries: &[ProgressEntry]) -> RepoResult<()> {
        Err(RepoError::InvalidData("disk full".to_string()))
    }
}

/// Goal store that reads as empty and refuses every write.
struct FailingGoalStore;

impl GoalStore for FailingGoalStore {
    fn get_goal(&self, _id: GoalId) -> RepoResult<Option<Goal>> {
        Ok(None)
    }

    fn list_goals(&self) -> RepoResult<Vec<Goal>> {
        Ok(Vec::new())
    }

    fn list_goals_by_type(&self, _goal_type: GoalType) -> RepoResult<Vec<Goal>> {
        Ok(Vec::new())
    }

    fn insert_goal(&self, _goal: &NewGoal) -> RepoResult<Goal> {
        Err(RepoError::InvalidData("disk full".to_string()))
    }

    fn deactivate_goals(&self, _goal_type: GoalType) -> RepoResult<usize> {
        Ok(0)
    }

    fn delete_goal(&self, _id: GoalId) -> RepoResult<bool> {
        Ok(false)
    }
}

#[test]
fn goal_form_converts_value_when_unit_changes() {
    let mut form = GoalForm::new();
    form.set_value(1.0);

    form.set_distance_unit(DistanceUnit::Kilometers);

    assert!((form.value() - 1.609344).abs() < 1e-12);
    assert_eq!(form.selected_unit(), Unit::from(DistanceUnit::Kilometers));
}

#[test]
fn goal_form_keeps_value_when_other_domain_unit_changes() {
    let mut form = GoalForm::new();
    form.set_value(3.0);

    form.set_volume_unit(VolumeUnit::Liters);

    assert_eq!(form.value(), 3.0);
    assert_eq!(form.selected_unit(), Unit::from(DistanceUnit::Miles));
}

#[test]
fn goal_form_emits_events_only_for_real_changes() {
    let events = Rc::new(RefCell::new(Vec::new()));
    let mut form = GoalForm::new();
    let id = form.subscribe(record_events(&events));

    form.set_goal_type(GoalType::Running);
    form.set_goal_type(GoalType::Water);
    form.set_value(2.0);
    form.set_value(2.0);

    assert_eq!(
        *events.borrow(),
        vec![
            FormEvent::Changed(FormField::GoalType),
            FormEvent::Changed(FormField::Value),
        ]
    );

    assert!(form.unsubscribe(id));
    form.set_value(4.0);
    assert_eq!(events.borrow().len(), 2);
}

#[test]
fn goal_form_submit_saves_active_goal() {
    let dir = tempfile::tempdir().unwrap();
    let service = GoalService::new(JsonGoalStore::new(dir.path()).unwrap());
    let events = Rc::new(RefCell::new(Vec::new()));
    let mut form = GoalForm::new();
    form.set_goal_type(GoalType::Water);
    form.set_volume_unit(VolumeUnit::Cups);
    form.set_value(8.0);
    form.subscribe(record_events(&events));

    let goal = form.submit(&service).unwrap();

    assert_eq!(goal.goal_type, GoalType::Water);
    assert_eq!(goal.unit, Unit::from(VolumeUnit::Cups));
    assert_eq!(
        service.active_goal(GoalType::Water).unwrap().unwrap().id,
        goal.id
    );
    assert_eq!(*events.borrow(), vec![FormEvent::Saved]);
}

#[test]
fn goal_form_submit_rejects_zero_value_without_events() {
    let dir = tempfile::tempdir().unwrap();
    let service = GoalService::new(JsonGoalStore::new(dir.path()).unwrap());
    let events = Rc::new(RefCell::new(Vec::new()));
    let mut form = GoalForm::new();
    form.subscribe(record_events(&events));

    assert!(form.submit(&service).is_err());
    assert!(events.borrow().is_empty());
    assert!(service.list_goals().unwrap().is_empty());
}

#[test]
fn goal_form_reports_storage_failure() {
    let service = GoalService::new(FailingGoalStore);
    let events = Rc::new(RefCell::new(Vec::new()));
    let mut form = GoalForm::new();
    form.set_value(5.0);
    form.subscribe(record_events(&events));

    let err = form.submit(&service).unwrap_err();

    assert!(matches!(err, GoalServiceError::Repo(RepoError::InvalidData(_))));
    assert_eq!(events.borrow().last(), Some(&FormEvent::SaveFailed));
    assert!(!events.borrow().contains(&FormEvent::Saved));
}

#[test]
fn progress_form_flags_invalid_values() {
    let mut form = ProgressForm::new();

    form.set_value(-1.0);
    assert_eq!(
        form.validation_error(),
        Some("Progress value must be greater than 0")
    );

    form.set_value(f64::NAN);
    assert_eq!(
        form.validation_error(),
        Some("Progress value must be a valid number")
    );

    form.set_value(2.5);
    assert!(form.is_valid());
}

#[test]
fn progress_form_invalid_submit_skips_storage() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteProgressStore::try_new(&conn).unwrap();
    let service = ProgressService::new(&store);
    let mut form = ProgressForm::new();

    assert_eq!(form.submit(&service), SubmitOutcome::Invalid);
    assert!(!form.is_valid());
    assert!(store.load(GoalType::Running).unwrap().is_empty());
}

#[test]
fn progress_form_success_resets_input_and_records_last_saved() {
    let dir = tempfile::tempdir().unwrap();
    let service = ProgressService::new(JsonProgressStore::new(dir.path()).unwrap());
    let events = Rc::new(RefCell::new(Vec::new()));
    let mut form = ProgressForm::new();
    form.set_goal_type(GoalType::Water);
    form.set_volume_unit(VolumeUnit::Liters);
    form.set_value(0.5);
    form.set_note(Some("after run".to_string()));
    form.subscribe(record_events(&events));

    let entry = match form.submit(&service) {
        SubmitOutcome::Saved(entry) => entry,
        other => panic!("expected saved outcome, got {other:?}"),
    };
    assert_eq!(entry.unit, Unit::from(VolumeUnit::Liters));
    assert_eq!(entry.note.as_deref(), Some("after run"));
    assert_eq!(form.last_saved(), Some(&entry));
    assert_eq!(form.value(), 0.0);
    assert!(form.note().is_none());
    assert!(form.is_valid());
    assert_eq!(events.borrow().last(), Some(&FormEvent::Saved));
    assert_eq!(service.history(GoalType::Water).unwrap(), vec![entry]);
}

#[test]
fn progress_form_reports_storage_failure() {
    let service = ProgressService::new(FailingStore);
    let events = Rc::new(RefCell::new(Vec::new()));
    let mut form = ProgressForm::new();
    form.set_value(1.0);
    form.subscribe(record_events(&events));

    assert_eq!(form.submit(&service), SubmitOutcome::Failed);
    assert_eq!(
        form.validation_error(),
        Some("Failed to save progress. Please try again.")
    );
    assert!(form.last_saved().is_none());
    assert_eq!(events.borrow().last(), Some(&FormEvent::SaveFailed));
}
