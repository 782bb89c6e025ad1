use std::time::Duration;

use chrono::{TimeZone, Utc};
use tempfile::tempdir;
use workout_tracker::store::{self, StoreEvent};
use workout_tracker::{
    EditSession, Exercise, ExerciseSet, LoadStatus, StoreConfig, StoreSession, StoreWorker,
    Workout, WorkoutState,
};

const WAIT: Duration = Duration::from_secs(5);

fn leg_day() -> Workout {
    Workout::new(
        "Leg Day",
        Utc.with_ymd_and_hms(2024, 4, 12, 18, 15, 0).unwrap(),
        45,
        Vec::new(),
    )
}

#[test]
fn leg_day_survives_save_and_reload() {
    let dir = tempdir().unwrap();
    let config = StoreConfig::at(dir.path());
    let workout = leg_day();

    let mut worker = StoreWorker::spawn(config.clone()).unwrap();
    worker.save(vec![workout.clone()]).unwrap();
    worker.load().unwrap();

    match worker.wait(WAIT).unwrap() {
        Some(StoreEvent::Saved(Ok(count))) => assert_eq!(count, 1),
        other => panic!("expected a save result, got {other:?}"),
    }
    let reloaded = match worker.wait(WAIT).unwrap() {
        Some(StoreEvent::Loaded(Ok(workouts))) => workouts,
        other => panic!("expected a load result, got {other:?}"),
    };
    worker.shutdown();

    assert_eq!(reloaded.len(), 1);
    let loaded = &reloaded[0];
    assert_eq!(loaded.id(), workout.id());
    assert_eq!(loaded.name, "Leg Day");
    assert_eq!(loaded.length_in_minutes, 45);
    assert!(loaded.exercises.is_empty());
}

#[test]
fn nested_tree_round_trips_in_order() {
    let dir = tempdir().unwrap();
    let config = StoreConfig::at(dir.path());
    let mut workouts = workout_tracker::models::sample_workouts();
    let mut pull = leg_day();
    pull.push_exercise(Exercise::new(
        "Row",
        vec![
            ExerciseSet::new(50.0, 10, 60),
            ExerciseSet::new(50.0, 10, 60),
            ExerciseSet::new(55.5, 8, 90),
        ],
    ));
    pull.push_exercise(Exercise::new("Chin-up", vec![ExerciseSet::new(0.0, 6, 120)]));
    workouts.push(pull);

    store::save(&config, &workouts).unwrap();
    assert_eq!(store::load(&config).unwrap(), workouts);
}

#[test]
fn session_restores_previous_run() {
    let dir = tempdir().unwrap();
    let config = StoreConfig::at(dir.path());

    let mut first = StoreSession::start(config.clone()).unwrap();
    first.wait_until_ready(WAIT).unwrap();
    first.state_mut().add_workout(leg_day());
    first.state_mut().add_workout(Workout::default());
    let expected = first.state().snapshot();
    first.shutdown();

    let mut second = StoreSession::start(config).unwrap();
    second.wait_until_ready(WAIT).unwrap();
    assert_eq!(second.load_status(), LoadStatus::Ready);
    assert_eq!(second.state().workouts(), expected.as_slice());
}

#[test]
fn cancelled_edit_changes_nothing() {
    let mut state = WorkoutState::new();
    state.replace_all(workout_tracker::models::sample_workouts());
    let before = state.snapshot();

    let mut session = EditSession::begin(&state.workouts()[0]);
    session.scratch_mut().name = "Something Else".into();
    session.scratch_mut().date = Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap();
    session.discard();

    assert_eq!(state.snapshot(), before);
}

#[test]
fn removing_a_workout_cascades() {
    let mut state = WorkoutState::new();
    state.replace_all(workout_tracker::models::sample_workouts());
    let len = state.len();

    let removed = state.remove_workout(1);

    assert_eq!(state.len(), len - 1);
    assert!(state.position_of(removed.id()).is_none());
    let remaining_sets: Vec<_> = state
        .workouts()
        .iter()
        .flat_map(|w| &w.exercises)
        .flat_map(|e| &e.sets)
        .map(|s| s.id())
        .collect();
    for set in &removed.exercises[0].sets {
        assert!(!remaining_sets.contains(&set.id()));
    }
}
