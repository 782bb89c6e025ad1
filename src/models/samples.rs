use chrono::Utc;

use super::{Exercise, ExerciseSet, Workout};

/// Two ready-made workouts used as placeholder content and test fixtures.
pub fn sample_workouts() -> Vec<Workout> {
    vec![
        Workout::new(
            "Chest Day",
            Utc::now(),
            60,
            vec![Exercise::new(
                "Bench Press",
                vec![ExerciseSet::new(70.0, 8, 120), ExerciseSet::new(70.0, 8, 120)],
            )],
        ),
        Workout::new(
            "Leg Day",
            Utc::now(),
            60,
            vec![Exercise::new(
                "Squat",
                vec![
                    ExerciseSet::new(100.0, 8, 120),
                    ExerciseSet::new(100.0, 8, 120),
                ],
            )],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_have_one_exercise_with_two_sets() {
        let samples = sample_workouts();
        assert_eq!(samples.len(), 2);
        for workout in &samples {
            assert_eq!(workout.exercises.len(), 1);
            assert_eq!(workout.exercises[0].sets.len(), 2);
        }
        assert_eq!(samples[0].name, "Chest Day");
        assert_eq!(samples[1].exercises[0].name, "Squat");
    }
}
