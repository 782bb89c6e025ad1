use uuid::Uuid;

use crate::models::Workout;
use crate::state::WorkoutState;

use super::helpers::{clamp_selection, detail_rows, DetailRow};

/// Detail view of one workout. The workout is tracked by id because the list
/// re-sorts whenever a date changes.
pub(crate) struct WorkoutScreen {
    pub(crate) workout_id: Uuid,
    pub(crate) selected: usize,
}

impl WorkoutScreen {
    pub(crate) fn new(workout: &Workout) -> Self {
        Self {
            workout_id: workout.id(),
            selected: 0,
        }
    }

    /// Current index of the workout in the collection, if it still exists.
    pub(crate) fn index(&self, state: &WorkoutState) -> Option<usize> {
        state.position_of(self.workout_id)
    }

    pub(crate) fn current_row(&self, workout: &Workout) -> Option<DetailRow> {
        detail_rows(workout).get(self.selected).copied()
    }

    pub(crate) fn move_selection(&mut self, workout: &Workout, offset: isize) {
        let len = detail_rows(workout).len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        let next = (self.selected as isize + offset).clamp(0, len as isize - 1);
        self.selected = next as usize;
    }

    /// Point the selection at a specific row, e.g. a freshly added set.
    pub(crate) fn focus(&mut self, workout: &Workout, target: DetailRow) {
        if let Some(idx) = detail_rows(workout).iter().position(|row| *row == target) {
            self.selected = idx;
        }
    }

    pub(crate) fn ensure_in_bounds(&mut self, workout: &Workout) {
        self.selected = clamp_selection(self.selected, detail_rows(workout).len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_workouts;

    #[test]
    fn selection_stays_within_rows() {
        let workout = sample_workouts().remove(1);
        let mut screen = WorkoutScreen::new(&workout);

        screen.move_selection(&workout, -1);
        assert_eq!(screen.selected, 0);
        screen.move_selection(&workout, 10);
        assert_eq!(screen.selected, 2);
        assert_eq!(
            screen.current_row(&workout),
            Some(DetailRow::Set { exercise: 0, set: 1 })
        );
    }

    #[test]
    fn focus_jumps_to_row() {
        let workout = sample_workouts().remove(0);
        let mut screen = WorkoutScreen::new(&workout);
        screen.focus(&workout, DetailRow::Set { exercise: 0, set: 1 });
        assert_eq!(screen.selected, 2);
    }
}
