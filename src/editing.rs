//! Staged editing: the UI works on a scratch copy and the real value only
//! changes on an explicit commit. Both `commit` and `discard` consume the
//! session, so a finished edit cannot be reused.

use crate::models::UpdateFrom;

#[derive(Debug, Clone)]
pub struct EditSession<T> {
    scratch: T,
}

impl<T: Clone + UpdateFrom> EditSession<T> {
    /// Start editing `target` by taking a deep copy of it.
    pub fn begin(target: &T) -> Self {
        Self {
            scratch: target.clone(),
        }
    }

    pub fn scratch(&self) -> &T {
        &self.scratch
    }

    pub fn scratch_mut(&mut self) -> &mut T {
        &mut self.scratch
    }

    /// Merge the scratch copy into `target`.
    pub fn commit(self, target: &mut T) {
        target.update_from(&self.scratch);
    }

    /// Throw the scratch copy away; `target` is untouched.
    pub fn discard(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{sample_workouts, ExerciseSet, Workout};

    #[test]
    fn discard_leaves_target_unchanged() {
        let workout = sample_workouts().remove(0);
        let before = workout.clone();

        let mut session = EditSession::begin(&workout);
        session.scratch_mut().name = "Renamed".into();
        session.scratch_mut().length_in_minutes = 5;
        session.scratch_mut().exercises.clear();
        session.discard();

        assert_eq!(workout, before);
    }

    #[test]
    fn scratch_edits_are_invisible_until_commit() {
        let mut set = ExerciseSet::new(50.0, 10, 90);
        let mut session = EditSession::begin(&set);
        session.scratch_mut().reps = 12;

        assert_eq!(set.reps, 10);
        session.commit(&mut set);
        assert_eq!(set.reps, 12);
    }

    #[test]
    fn commit_preserves_identity() {
        let mut workout = Workout::default();
        let id = workout.id();
        let mut session = EditSession::begin(&workout);
        session.scratch_mut().name = "Tempo Run".into();
        session.commit(&mut workout);

        assert_eq!(workout.id(), id);
        assert_eq!(workout.name, "Tempo Run");
    }
}
