//! Domain models for the workout log. These types are plain value records: a
//! `Workout` owns its `Exercise`s, and every `Exercise` owns its `ExerciseSet`s.
//! The whole tree is serialized as-is, so the serde attributes below define the
//! on-disk format.

mod samples;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use samples::sample_workouts;

/// Name given to freshly created workouts.
pub const DEFAULT_WORKOUT_NAME: &str = "New Workout";
/// Name given to exercises added from the workout screen.
pub const DEFAULT_EXERCISE_NAME: &str = "New Exercise";
/// Duration assigned to a new workout.
pub const DEFAULT_WORKOUT_MINUTES: u32 = 60;
/// Upper bound offered by the duration field when editing a workout.
pub const MAX_WORKOUT_MINUTES: u32 = 181;

/// Copy every field except the identity from another value.
///
/// Container types leave their children alone: merging a `Workout` never
/// touches `exercises`, merging an `Exercise` never touches `sets`.
pub trait UpdateFrom {
    fn update_from(&mut self, other: &Self);
}

/// One training session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    id: Uuid,
    /// Label shown in the workout list ("Push Day", "Leg Day", ...).
    pub name: String,
    /// When the session took place. Lists are ordered newest first on this.
    pub date: DateTime<Utc>,
    /// Session duration in minutes.
    pub length_in_minutes: u32,
    /// Exercises in display order.
    pub exercises: Vec<Exercise>,
}

impl Workout {
    pub fn new(
        name: impl Into<String>,
        date: DateTime<Utc>,
        length_in_minutes: u32,
        exercises: Vec<Exercise>,
    ) -> Self {
        Self::with_id(Uuid::new_v4(), name, date, length_in_minutes, exercises)
    }

    /// Build a workout around an existing identity.
    pub fn with_id(
        id: Uuid,
        name: impl Into<String>,
        date: DateTime<Utc>,
        length_in_minutes: u32,
        exercises: Vec<Exercise>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            date,
            length_in_minutes,
            exercises,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn push_exercise(&mut self, exercise: Exercise) {
        self.exercises.push(exercise);
    }

    /// Remove and return the exercise at `index`, dropping all of its sets
    /// with it. Panics if `index` is out of bounds.
    pub fn remove_exercise(&mut self, index: usize) -> Exercise {
        self.exercises.remove(index)
    }

    /// Swap in a new exercise at `index`, returning the old one. Panics if
    /// `index` is out of bounds.
    pub fn replace_exercise(&mut self, index: usize, exercise: Exercise) -> Exercise {
        std::mem::replace(&mut self.exercises[index], exercise)
    }

    /// Append a blank exercise and return its position.
    pub fn add_exercise(&mut self) -> usize {
        self.exercises
            .push(Exercise::new(DEFAULT_EXERCISE_NAME, Vec::new()));
        self.exercises.len() - 1
    }

    /// One-line description used by list views.
    pub fn summary(&self) -> String {
        format!(
            "{} - {} minutes, {} exercise(s)",
            self.date.format("%Y-%m-%d"),
            self.length_in_minutes,
            self.exercises.len()
        )
    }
}

impl Default for Workout {
    fn default() -> Self {
        Self::new(
            DEFAULT_WORKOUT_NAME,
            Utc::now(),
            DEFAULT_WORKOUT_MINUTES,
            Vec::new(),
        )
    }
}

impl UpdateFrom for Workout {
    fn update_from(&mut self, other: &Self) {
        self.name = other.name.clone();
        self.date = other.date;
        self.length_in_minutes = other.length_in_minutes;
    }
}

impl fmt::Display for Workout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A movement performed during a workout, made of one or more sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    id: Uuid,
    pub name: String,
    /// Sets in the order they were performed. Identical sets are allowed; they
    /// still carry distinct ids.
    pub sets: Vec<ExerciseSet>,
}

impl Exercise {
    pub fn new(name: impl Into<String>, sets: Vec<ExerciseSet>) -> Self {
        Self::with_id(Uuid::new_v4(), name, sets)
    }

    pub fn with_id(id: Uuid, name: impl Into<String>, sets: Vec<ExerciseSet>) -> Self {
        Self {
            id,
            name: name.into(),
            sets,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn push_set(&mut self, set: ExerciseSet) {
        self.sets.push(set);
    }

    /// Panics if `index` is out of bounds.
    pub fn remove_set(&mut self, index: usize) -> ExerciseSet {
        self.sets.remove(index)
    }

    /// Panics if `index` is out of bounds.
    pub fn replace_set(&mut self, index: usize, set: ExerciseSet) -> ExerciseSet {
        std::mem::replace(&mut self.sets[index], set)
    }

    /// Append a set that repeats the previous one (or the default set when the
    /// exercise is empty). The new set gets its own id so it can be edited
    /// independently.
    pub fn add_set(&mut self) -> usize {
        let template = self
            .sets
            .last()
            .cloned()
            .unwrap_or_else(ExerciseSet::default_set);
        self.sets.push(template.duplicate());
        self.sets.len() - 1
    }
}

impl UpdateFrom for Exercise {
    fn update_from(&mut self, other: &Self) {
        self.name = other.name.clone();
    }
}

/// A single set of an exercise. Values are not range-checked: zero or negative
/// numbers are stored exactly as entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSet {
    id: Uuid,
    #[serde(rename = "weightInKG")]
    pub weight_in_kg: f32,
    #[serde(rename = "noReps")]
    pub reps: u32,
    #[serde(rename = "restTimeInSeconds")]
    pub rest_time_in_seconds: u32,
}

impl ExerciseSet {
    pub fn new(weight_in_kg: f32, reps: u32, rest_time_in_seconds: u32) -> Self {
        Self::with_id(Uuid::new_v4(), weight_in_kg, reps, rest_time_in_seconds)
    }

    pub fn with_id(id: Uuid, weight_in_kg: f32, reps: u32, rest_time_in_seconds: u32) -> Self {
        Self {
            id,
            weight_in_kg,
            reps,
            rest_time_in_seconds,
        }
    }

    /// Placeholder values offered when the user adds the first set of an
    /// exercise: 60 kg for 8 reps with two minutes of rest.
    pub fn default_set() -> Self {
        Self::new(60.0, 8, 120)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Same values, new identity.
    pub fn duplicate(&self) -> Self {
        Self::new(self.weight_in_kg, self.reps, self.rest_time_in_seconds)
    }

    pub fn summary(&self) -> String {
        format!(
            "{} kg x {} reps, rest {} s",
            self.weight_in_kg, self.reps, self.rest_time_in_seconds
        )
    }
}

impl UpdateFrom for ExerciseSet {
    fn update_from(&mut self, other: &Self) {
        self.weight_in_kg = other.weight_in_kg;
        self.reps = other.reps;
        self.rest_time_in_seconds = other.rest_time_in_seconds;
    }
}

/// Order workouts newest first. The sort is stable, so workouts sharing a date
/// keep their relative order.
pub fn sort_by_date_desc(workouts: &mut [Workout]) {
    workouts.sort_by(|a, b| b.date.cmp(&a.date));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, 9, 30, 0).unwrap()
    }

    #[test]
    fn constructed_ids_are_unique() {
        let mut ids = HashSet::new();
        for _ in 0..100 {
            assert!(ids.insert(Workout::default().id()));
            assert!(ids.insert(Exercise::new("Row", Vec::new()).id()));
            assert!(ids.insert(ExerciseSet::default_set().id()));
        }
    }

    #[test]
    fn workout_defaults() {
        let before = Utc::now();
        let workout = Workout::default();
        assert_eq!(workout.name, "New Workout");
        assert_eq!(workout.length_in_minutes, 60);
        assert!(workout.exercises.is_empty());
        assert!(workout.date >= before && workout.date <= Utc::now());
    }

    #[test]
    fn workout_update_keeps_id_and_exercises() {
        let mut workout = sample_workouts().remove(0);
        let id = workout.id();
        let exercises = workout.exercises.clone();
        let other = Workout::new("Pull Day", at(4), 45, Vec::new());

        workout.update_from(&other);

        assert_eq!(workout.id(), id);
        assert_eq!(workout.name, "Pull Day");
        assert_eq!(workout.date, at(4));
        assert_eq!(workout.length_in_minutes, 45);
        assert_eq!(workout.exercises, exercises);
    }

    #[test]
    fn set_update_copies_all_values() {
        let mut set = ExerciseSet::default_set();
        let id = set.id();
        let other = ExerciseSet::new(82.5, 5, 180);

        set.update_from(&other);

        assert_eq!(set.id(), id);
        assert_eq!(set.weight_in_kg, 82.5);
        assert_eq!(set.reps, 5);
        assert_eq!(set.rest_time_in_seconds, 180);
    }

    #[test]
    fn exercise_update_only_renames() {
        let mut exercise = Exercise::new("Squat", vec![ExerciseSet::default_set()]);
        let id = exercise.id();
        let other = Exercise::new("Front Squat", Vec::new());

        exercise.update_from(&other);

        assert_eq!(exercise.id(), id);
        assert_eq!(exercise.name, "Front Squat");
        assert_eq!(exercise.sets.len(), 1);
    }

    #[test]
    fn add_set_repeats_last_with_new_id() {
        let mut exercise = Exercise::new("Deadlift", vec![ExerciseSet::new(140.0, 3, 240)]);
        let index = exercise.add_set();

        assert_eq!(index, 1);
        let (first, second) = (&exercise.sets[0], &exercise.sets[1]);
        assert_ne!(first.id(), second.id());
        assert_eq!(second.weight_in_kg, 140.0);
        assert_eq!(second.reps, 3);
        assert_eq!(second.rest_time_in_seconds, 240);
    }

    #[test]
    fn add_set_on_empty_exercise_uses_default() {
        let mut exercise = Exercise::new("Curl", Vec::new());
        exercise.add_set();
        let set = &exercise.sets[0];
        assert_eq!((set.weight_in_kg, set.reps, set.rest_time_in_seconds), (60.0, 8, 120));
    }

    #[test]
    fn child_sequence_operations() {
        let mut workout = Workout::new("Upper", at(1), 50, Vec::new());
        workout.push_exercise(Exercise::new("Bench", Vec::new()));
        let added = workout.add_exercise();
        assert_eq!(workout.exercises[added].name, DEFAULT_EXERCISE_NAME);

        let replaced = workout.replace_exercise(0, Exercise::new("Incline Bench", Vec::new()));
        assert_eq!(replaced.name, "Bench");
        assert_eq!(workout.exercises[0].name, "Incline Bench");

        let removed = workout.remove_exercise(1);
        assert_eq!(removed.name, DEFAULT_EXERCISE_NAME);
        assert_eq!(workout.exercises.len(), 1);
    }

    #[test]
    #[should_panic]
    fn removing_out_of_range_set_panics() {
        let mut exercise = Exercise::new("Dip", Vec::new());
        exercise.remove_set(0);
    }

    #[test]
    fn sort_is_stable_for_equal_dates() {
        let first = Workout::new("A", at(2), 60, Vec::new());
        let second = Workout::new("B", at(2), 60, Vec::new());
        let newest = Workout::new("C", at(5), 60, Vec::new());
        let oldest = Workout::new("D", at(1), 60, Vec::new());
        let mut workouts = vec![oldest, first, second, newest];

        sort_by_date_desc(&mut workouts);

        let names: Vec<_> = workouts.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, ["C", "A", "B", "D"]);
    }

    #[test]
    fn serializes_with_persisted_field_names() {
        let set = ExerciseSet::new(70.0, 8, 120);
        let value = serde_json::to_value(&set).unwrap();
        assert_eq!(value["weightInKG"], 70.0);
        assert_eq!(value["noReps"], 8);
        assert_eq!(value["restTimeInSeconds"], 120);

        let workout = Workout::new("Leg Day", at(3), 45, Vec::new());
        let value = serde_json::to_value(&workout).unwrap();
        assert_eq!(value["lengthInMinutes"], 45);
        assert_eq!(value["id"], workout.id().to_string());
        assert!(value["exercises"].as_array().unwrap().is_empty());
    }
}
