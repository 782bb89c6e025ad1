use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use ratatui::text::Line;

use crate::editing::EditSession;
use crate::models::{Exercise, ExerciseSet, Workout, MAX_WORKOUT_MINUTES};

use super::helpers::field_line;

/// Format used to show and type workout dates.
pub(crate) const DATE_INPUT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Staged edit of a workout's name, date and duration.
pub(crate) struct WorkoutForm {
    pub(crate) name: String,
    pub(crate) date: String,
    pub(crate) minutes: String,
    pub(crate) active: WorkoutField,
    pub(crate) error: Option<String>,
    initial_date: String,
    session: EditSession<Workout>,
}

/// Fields available within the workout form.
#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum WorkoutField {
    #[default]
    Name,
    Date,
    Minutes,
}

impl WorkoutField {
    fn next(self) -> Self {
        match self {
            WorkoutField::Name => WorkoutField::Date,
            WorkoutField::Date => WorkoutField::Minutes,
            WorkoutField::Minutes => WorkoutField::Name,
        }
    }

    fn previous(self) -> Self {
        match self {
            WorkoutField::Name => WorkoutField::Minutes,
            WorkoutField::Date => WorkoutField::Name,
            WorkoutField::Minutes => WorkoutField::Date,
        }
    }

    pub(crate) fn row(self) -> u16 {
        match self {
            WorkoutField::Name => 0,
            WorkoutField::Date => 1,
            WorkoutField::Minutes => 2,
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            WorkoutField::Name => "Name",
            WorkoutField::Date => "Date",
            WorkoutField::Minutes => "Minutes",
        }
    }
}

impl WorkoutForm {
    /// Open a staged edit of `workout`. Nothing touches the real workout until
    /// the caller commits the session returned by [`WorkoutForm::finish`].
    pub(crate) fn begin(workout: &Workout) -> Self {
        let session = EditSession::begin(workout);
        let scratch = session.scratch();
        let date = format_date(scratch.date);
        Self {
            name: scratch.name.clone(),
            minutes: scratch.length_in_minutes.to_string(),
            initial_date: date.clone(),
            date,
            active: WorkoutField::Name,
            error: None,
            session,
        }
    }

    pub(crate) fn next_field(&mut self) {
        self.active = self.active.next();
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = self.active.previous();
    }

    /// Append a character to the active field, validating allowed input.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        match self.active {
            WorkoutField::Name => push_text(&mut self.name, ch),
            WorkoutField::Date => {
                if ch.is_ascii_digit() || matches!(ch, '-' | ':' | ' ') {
                    self.date.push(ch);
                    true
                } else {
                    false
                }
            }
            WorkoutField::Minutes => push_digit(&mut self.minutes, ch),
        }
    }

    pub(crate) fn backspace(&mut self) {
        self.value_mut(self.active).pop();
    }

    /// Move the typed values into the scratch workout and hand the session
    /// back for committing. On a parse error the form is returned intact.
    pub(crate) fn finish(mut self) -> std::result::Result<EditSession<Workout>, (Self, String)> {
        match self.parse_into_scratch() {
            Ok(()) => Ok(self.session),
            Err(err) => {
                let message = err.to_string();
                Err((self, message))
            }
        }
    }

    fn parse_into_scratch(&mut self) -> Result<()> {
        let minutes = parse_minutes(&self.minutes)?;
        let date = if self.date.trim() == self.initial_date {
            self.session.scratch().date
        } else {
            parse_date(&self.date)?
        };

        let scratch = self.session.scratch_mut();
        scratch.name = self.name.trim().to_string();
        scratch.date = date;
        scratch.length_in_minutes = minutes;
        Ok(())
    }

    pub(crate) fn value(&self, field: WorkoutField) -> &str {
        match field {
            WorkoutField::Name => &self.name,
            WorkoutField::Date => &self.date,
            WorkoutField::Minutes => &self.minutes,
        }
    }

    fn value_mut(&mut self, field: WorkoutField) -> &mut String {
        match field {
            WorkoutField::Name => &mut self.name,
            WorkoutField::Date => &mut self.date,
            WorkoutField::Minutes => &mut self.minutes,
        }
    }

    pub(crate) fn lines(&self) -> Vec<Line<'static>> {
        [WorkoutField::Name, WorkoutField::Date, WorkoutField::Minutes]
            .into_iter()
            .map(|field| field_line(field.label(), self.value(field), field == self.active))
            .collect()
    }
}

/// Staged edit of a single set.
pub(crate) struct SetForm {
    pub(crate) weight: String,
    pub(crate) reps: String,
    pub(crate) rest: String,
    pub(crate) active: SetField,
    pub(crate) error: Option<String>,
    session: EditSession<ExerciseSet>,
}

#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum SetField {
    #[default]
    Weight,
    Reps,
    Rest,
}

impl SetField {
    fn next(self) -> Self {
        match self {
            SetField::Weight => SetField::Reps,
            SetField::Reps => SetField::Rest,
            SetField::Rest => SetField::Weight,
        }
    }

    fn previous(self) -> Self {
        match self {
            SetField::Weight => SetField::Rest,
            SetField::Reps => SetField::Weight,
            SetField::Rest => SetField::Reps,
        }
    }

    pub(crate) fn row(self) -> u16 {
        match self {
            SetField::Weight => 0,
            SetField::Reps => 1,
            SetField::Rest => 2,
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            SetField::Weight => "Weight (kg)",
            SetField::Reps => "Reps",
            SetField::Rest => "Rest (s)",
        }
    }
}

impl SetForm {
    pub(crate) fn begin(set: &ExerciseSet) -> Self {
        let session = EditSession::begin(set);
        let scratch = session.scratch();
        Self {
            weight: scratch.weight_in_kg.to_string(),
            reps: scratch.reps.to_string(),
            rest: scratch.rest_time_in_seconds.to_string(),
            active: SetField::Weight,
            error: None,
            session,
        }
    }

    pub(crate) fn next_field(&mut self) {
        self.active = self.active.next();
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = self.active.previous();
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        match self.active {
            SetField::Weight => {
                if ch.is_ascii_digit() || ch == '.' || (ch == '-' && self.weight.is_empty()) {
                    self.weight.push(ch);
                    true
                } else {
                    false
                }
            }
            SetField::Reps => push_digit(&mut self.reps, ch),
            SetField::Rest => push_digit(&mut self.rest, ch),
        }
    }

    pub(crate) fn backspace(&mut self) {
        self.value_mut(self.active).pop();
    }

    pub(crate) fn finish(
        mut self,
    ) -> std::result::Result<EditSession<ExerciseSet>, (Self, String)> {
        match self.parse_into_scratch() {
            Ok(()) => Ok(self.session),
            Err(err) => {
                let message = err.to_string();
                Err((self, message))
            }
        }
    }

    fn parse_into_scratch(&mut self) -> Result<()> {
        let weight = self
            .weight
            .trim()
            .parse::<f32>()
            .ok()
            .filter(|weight| weight.is_finite())
            .ok_or_else(|| anyhow!("Weight must be a number."))?;
        let reps = parse_count(&self.reps, "Reps")?;
        let rest = parse_count(&self.rest, "Rest time")?;

        let scratch = self.session.scratch_mut();
        scratch.weight_in_kg = weight;
        scratch.reps = reps;
        scratch.rest_time_in_seconds = rest;
        Ok(())
    }

    pub(crate) fn value(&self, field: SetField) -> &str {
        match field {
            SetField::Weight => &self.weight,
            SetField::Reps => &self.reps,
            SetField::Rest => &self.rest,
        }
    }

    fn value_mut(&mut self, field: SetField) -> &mut String {
        match field {
            SetField::Weight => &mut self.weight,
            SetField::Reps => &mut self.reps,
            SetField::Rest => &mut self.rest,
        }
    }

    pub(crate) fn lines(&self) -> Vec<Line<'static>> {
        [SetField::Weight, SetField::Reps, SetField::Rest]
            .into_iter()
            .map(|field| field_line(field.label(), self.value(field), field == self.active))
            .collect()
    }
}

/// Inline rename of an exercise.
pub(crate) struct ExerciseForm {
    pub(crate) name: String,
    session: EditSession<Exercise>,
}

impl ExerciseForm {
    pub(crate) fn begin(exercise: &Exercise) -> Self {
        let session = EditSession::begin(exercise);
        Self {
            name: session.scratch().name.clone(),
            session,
        }
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        push_text(&mut self.name, ch)
    }

    pub(crate) fn backspace(&mut self) {
        self.name.pop();
    }

    pub(crate) fn finish(mut self) -> EditSession<Exercise> {
        self.session.scratch_mut().name = self.name.trim().to_string();
        self.session
    }

    pub(crate) fn line(&self) -> Line<'static> {
        field_line("Name", &self.name, true)
    }
}

/// Pending deletion awaiting a y/n answer.
pub(crate) struct ConfirmDelete {
    pub(crate) target: DeleteTarget,
    pub(crate) label: String,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum DeleteTarget {
    Workout(usize),
    Exercise { workout: usize, exercise: usize },
    Set { workout: usize, exercise: usize, set: usize },
}

pub(crate) fn format_date(date: DateTime<Utc>) -> String {
    date.with_timezone(&Local).format(DATE_INPUT_FORMAT).to_string()
}

/// Interpret `raw` as a local wall-clock time.
pub(crate) fn parse_date(raw: &str) -> Result<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(raw.trim(), DATE_INPUT_FORMAT)
        .context("Date must look like 2024-01-31 18:30.")?;
    let local = Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| anyhow!("That time does not exist in the local time zone."))?;
    Ok(local.with_timezone(&Utc))
}

/// Workout durations are limited to what the duration field offers.
pub(crate) fn parse_minutes(raw: &str) -> Result<u32> {
    let minutes = parse_count(raw, "Minutes")?;
    if minutes > MAX_WORKOUT_MINUTES {
        return Err(anyhow!(
            "Minutes must be between 0 and {MAX_WORKOUT_MINUTES}."
        ));
    }
    Ok(minutes)
}

fn parse_count(raw: &str, what: &str) -> Result<u32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(anyhow!("{what} is required."));
    }
    raw.parse::<u32>()
        .map_err(|_| anyhow!("{what} must be a whole number."))
}

fn push_text(value: &mut String, ch: char) -> bool {
    if ch.is_control() {
        false
    } else {
        value.push(ch);
        true
    }
}

fn push_digit(value: &mut String, ch: char) -> bool {
    if ch.is_ascii_digit() {
        value.push(ch);
        true
    } else {
        false
    }
}
