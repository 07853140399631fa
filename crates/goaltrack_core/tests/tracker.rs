use goaltrack_core::{
    DistanceUnit, GoalType, OpenError, StorageBackend, Tracker, TrackerConfig, VolumeUnit,
};

#[test]
fn json_tracker_creates_data_dir_and_persists() {
    let root = tempfile::tempdir().unwrap();
    let data_dir = root.path().join("SaveData");
    let config = TrackerConfig::new(&data_dir);

    let tracker = Tracker::open(&config).unwrap();
    assert!(data_dir.is_dir());
    assert_eq!(tracker.backend(), StorageBackend::Json);

    let goal = tracker
        .goal_service()
        .unwrap()
        .save_goal(GoalType::Water, 2.0, VolumeUnit::Liters.into())
        .unwrap();
    tracker
        .progress_service()
        .unwrap()
        .record_progress(GoalType::Water, 1.0, VolumeUnit::Liters.into(), None)
        .unwrap();
    drop(tracker);

    let reopened = Tracker::open(&config).unwrap();
    let active = reopened
        .goal_service()
        .unwrap()
        .active_goal(GoalType::Water)
        .unwrap()
        .unwrap();
    assert_eq!(active.id, goal.id);

    let summary = reopened.progress_service().unwrap().summary(&active).unwrap();
    assert_eq!(summary.counted, 1);
    assert!((summary.remaining - 1.0).abs() < 1e-12);
}

#[test]
fn sqlite_tracker_opens_database_file() {
    let root = tempfile::tempdir().unwrap();
    let config = TrackerConfig::new(root.path()).with_backend(StorageBackend::Sqlite);

    let tracker = Tracker::open(&config).unwrap();
    assert!(config.database_path().exists());
    assert_eq!(tracker.data_dir(), root.path());

    let goals = tracker.goal_service().unwrap();
    goals
        .save_goal(GoalType::Running, 5.0, DistanceUnit::Kilometers.into())
        .unwrap();
    let second = goals
        .save_goal(GoalType::Running, 10.0, DistanceUnit::Kilometers.into())
        .unwrap();

    let active = goals.active_goal(GoalType::Running).unwrap().unwrap();
    assert_eq!(active.id, second.id);
    assert_eq!(goals.list_goals().unwrap().len(), 2);
}

#[test]
fn empty_data_dir_is_rejected() {
    let config = TrackerConfig::new("");

    assert!(matches!(Tracker::open(&config), Err(OpenError::Config(_))));
}
