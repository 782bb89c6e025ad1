//! The live workout collection shared by every screen. All mutation goes
//! through [`WorkoutState`] so observers hear about each change and the
//! revision counter stays honest.

use crossbeam_channel::{unbounded, Receiver, Sender};
use uuid::Uuid;

use crate::editing::EditSession;
use crate::models::{self, Workout};

/// What happened to the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
    /// The whole collection was swapped out (e.g. after a load).
    Replaced { count: usize },
    Added { id: Uuid },
    Removed { id: Uuid },
    Updated { id: Uuid },
    /// Order changed without any workout changing.
    Reordered,
}

#[derive(Default)]
pub struct WorkoutState {
    workouts: Vec<Workout>,
    revision: u64,
    subscribers: Vec<Sender<StateChange>>,
}

impl WorkoutState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Workout> {
        self.workouts.get(index)
    }

    /// Bumped on every mutation. Readers that cache derived data can compare
    /// revisions instead of subscribing.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn position_of(&self, id: Uuid) -> Option<usize> {
        self.workouts.iter().position(|w| w.id() == id)
    }

    /// Clone the collection for handing to the storage thread.
    pub fn snapshot(&self) -> Vec<Workout> {
        self.workouts.clone()
    }

    /// Receive a message for every subsequent change.
    pub fn subscribe(&mut self) -> Receiver<StateChange> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    pub fn replace_all(&mut self, workouts: Vec<Workout>) {
        self.workouts = workouts;
        let count = self.workouts.len();
        self.notify(StateChange::Replaced { count });
    }

    /// Append without reordering.
    pub fn push_workout(&mut self, workout: Workout) {
        let id = workout.id();
        self.workouts.push(workout);
        self.notify(StateChange::Added { id });
    }

    /// Append and re-sort newest first, returning where the workout landed.
    pub fn add_workout(&mut self, workout: Workout) -> usize {
        let id = workout.id();
        self.workouts.push(workout);
        models::sort_by_date_desc(&mut self.workouts);
        self.notify(StateChange::Added { id });
        self.position_of(id).unwrap_or(0)
    }

    /// Remove the workout at `index` together with all of its exercises and
    /// sets. Panics if `index` is out of bounds.
    pub fn remove_workout(&mut self, index: usize) -> Workout {
        let removed = self.workouts.remove(index);
        self.notify(StateChange::Removed { id: removed.id() });
        removed
    }

    /// Panics if `index` is out of bounds.
    pub fn replace_workout(&mut self, index: usize, workout: Workout) -> Workout {
        let old = std::mem::replace(&mut self.workouts[index], workout);
        let id = self.workouts[index].id();
        self.notify(StateChange::Updated { id });
        old
    }

    /// Mutate one workout in place (its exercises, sets, ...). Panics if
    /// `index` is out of bounds.
    pub fn update_workout<R>(&mut self, index: usize, edit: impl FnOnce(&mut Workout) -> R) -> R {
        let workout = &mut self.workouts[index];
        let result = edit(workout);
        let id = workout.id();
        self.notify(StateChange::Updated { id });
        result
    }

    pub fn sort_by_date_desc(&mut self) {
        models::sort_by_date_desc(&mut self.workouts);
        self.notify(StateChange::Reordered);
    }

    /// Merge a staged edit into the workout at `index`, then restore newest
    /// first ordering. Returns the workout's index after sorting.
    pub fn commit_workout_edit(&mut self, index: usize, session: EditSession<Workout>) -> usize {
        let workout = &mut self.workouts[index];
        let id = workout.id();
        session.commit(workout);
        models::sort_by_date_desc(&mut self.workouts);
        self.notify(StateChange::Updated { id });
        self.position_of(id).unwrap_or(index)
    }

    fn notify(&mut self, change: StateChange) {
        self.revision += 1;
        self.subscribers
            .retain(|subscriber| subscriber.send(change.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{sample_workouts, Exercise, ExerciseSet};
    use chrono::{DateTime, TimeZone, Utc};

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, 7, 0, 0).unwrap()
    }

    fn state_with(workouts: Vec<Workout>) -> WorkoutState {
        let mut state = WorkoutState::new();
        state.replace_all(workouts);
        state
    }

    #[test]
    fn starts_empty() {
        let state = WorkoutState::new();
        assert!(state.is_empty());
        assert_eq!(state.revision(), 0);
    }

    #[test]
    fn remove_drops_exactly_one_workout() {
        let mut state = state_with(sample_workouts());
        let keep = state.workouts()[1].id();
        let target = state.workouts()[0].id();

        let removed = state.remove_workout(0);

        assert_eq!(removed.id(), target);
        assert_eq!(removed.exercises[0].sets.len(), 2);
        assert_eq!(state.len(), 1);
        assert_eq!(state.workouts()[0].id(), keep);
        assert!(state.position_of(target).is_none());
    }

    #[test]
    #[should_panic]
    fn remove_out_of_range_panics() {
        let mut state = WorkoutState::new();
        state.remove_workout(0);
    }

    #[test]
    fn add_workout_sorts_newest_first() {
        let mut state = state_with(vec![
            Workout::new("Older", at(1), 60, Vec::new()),
            Workout::new("Newer", at(3), 60, Vec::new()),
        ]);
        state.sort_by_date_desc();

        let index = state.add_workout(Workout::new("Middle", at(2), 60, Vec::new()));

        assert_eq!(index, 1);
        let names: Vec<_> = state.workouts().iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, ["Newer", "Middle", "Older"]);
    }

    #[test]
    fn subscribers_see_each_change() {
        let mut state = WorkoutState::new();
        let changes = state.subscribe();

        state.replace_all(sample_workouts());
        let id = state.workouts()[0].id();
        state.update_workout(0, |w| {
            w.push_exercise(Exercise::new("Fly", vec![ExerciseSet::default_set()]))
        });
        state.remove_workout(0);

        let seen: Vec<_> = changes.try_iter().collect();
        assert_eq!(
            seen,
            vec![
                StateChange::Replaced { count: 2 },
                StateChange::Updated { id },
                StateChange::Removed { id },
            ]
        );
        assert_eq!(state.revision(), 3);
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut state = WorkoutState::new();
        drop(state.subscribe());
        state.push_workout(Workout::default());
        assert!(state.subscribers.is_empty());
    }

    #[test]
    fn committed_edit_resorts_and_tracks_index() {
        let mut state = state_with(vec![
            Workout::new("Monday", at(3), 60, Vec::new()),
            Workout::new("Sunday", at(2), 60, Vec::new()),
        ]);
        let id = state.workouts()[1].id();

        let mut session = EditSession::begin(&state.workouts()[1]);
        session.scratch_mut().date = at(9);
        let index = state.commit_workout_edit(1, session);

        assert_eq!(index, 0);
        assert_eq!(state.workouts()[0].id(), id);
        assert_eq!(state.workouts()[0].date, at(9));
    }

    #[test]
    fn committed_edit_keeps_insertion_order_for_ties() {
        let mut state = state_with(vec![
            Workout::new("First", at(4), 60, Vec::new()),
            Workout::new("Second", at(4), 60, Vec::new()),
            Workout::new("Edited", at(1), 60, Vec::new()),
        ]);

        let mut session = EditSession::begin(&state.workouts()[2]);
        session.scratch_mut().date = at(4);
        state.commit_workout_edit(2, session);

        let names: Vec<_> = state.workouts().iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, ["First", "Second", "Edited"]);
    }
}
