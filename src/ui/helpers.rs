use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::models::{Exercise, Workout};

/// One selectable row on the workout screen.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum DetailRow {
    Exercise(usize),
    Set { exercise: usize, set: usize },
}

/// Flatten a workout into exercise headers followed by their sets.
pub(crate) fn detail_rows(workout: &Workout) -> Vec<DetailRow> {
    let mut rows = Vec::new();
    for (exercise_idx, exercise) in workout.exercises.iter().enumerate() {
        rows.push(DetailRow::Exercise(exercise_idx));
        rows.extend((0..exercise.sets.len()).map(|set| DetailRow::Set {
            exercise: exercise_idx,
            set,
        }));
    }
    rows
}

/// Render the line for a detail row, bolding exercise headers and marking
/// the current selection.
pub(crate) fn detail_line(workout: &Workout, row: DetailRow, selected: bool) -> Line<'static> {
    let marker = if selected { "> " } else { "  " };
    match row {
        DetailRow::Exercise(idx) => {
            let exercise: &Exercise = &workout.exercises[idx];
            let mut style = Style::default().add_modifier(Modifier::BOLD);
            if selected {
                style = style.fg(Color::Yellow);
            }
            Line::from(vec![
                Span::raw(marker),
                Span::styled(exercise.name.clone(), style),
                Span::styled(
                    format!("  ({} set(s))", exercise.sets.len()),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        }
        DetailRow::Set { exercise, set } => {
            let entry = &workout.exercises[exercise].sets[set];
            let style = if selected {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::raw(marker),
                Span::styled(format!("    Set {}: {}", set + 1, entry.summary()), style),
            ])
        }
    }
}

/// Render a `Label: value` form line, highlighting the focused field.
pub(crate) fn field_line(label: &str, value: &str, active: bool) -> Line<'static> {
    let display = if value.is_empty() {
        "<empty>".to_string()
    } else {
        value.to_string()
    };

    let style = if active {
        Style::default().fg(Color::Yellow)
    } else if value.is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::raw(format!("{label}: ")),
        Span::styled(display, style),
    ])
}

/// Keep a selection inside a list of `len` items.
pub(crate) fn clamp_selection(selected: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        selected.min(len - 1)
    }
}

/// Place a text cursor at `(column, row)` inside `inner`, pinned to its last
/// cell when the text runs past the edge.
pub(crate) fn cursor_position(inner: Rect, (column, row): (usize, u16)) -> (u16, u16) {
    let max_column = inner.width.saturating_sub(1);
    let column = u16::try_from(column).unwrap_or(u16::MAX).min(max_column);
    let row = row.min(inner.height.saturating_sub(1));
    (inner.x.saturating_add(column), inner.y.saturating_add(row))
}

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_workouts;

    #[test]
    fn rows_list_exercises_before_their_sets() {
        let workout = sample_workouts().remove(0);
        assert_eq!(
            detail_rows(&workout),
            vec![
                DetailRow::Exercise(0),
                DetailRow::Set { exercise: 0, set: 0 },
                DetailRow::Set { exercise: 0, set: 1 },
            ]
        );
    }

    #[test]
    fn clamp_handles_empty_and_overflow() {
        assert_eq!(clamp_selection(3, 0), 0);
        assert_eq!(clamp_selection(5, 2), 1);
        assert_eq!(clamp_selection(1, 4), 1);
    }

    #[test]
    fn cursor_stays_inside_long_fields() {
        let inner = Rect::new(10, 5, 30, 4);
        assert_eq!(cursor_position(inner, (3, 1)), (13, 6));
        assert_eq!(cursor_position(inner, (70_000, 1)), (39, 6));
        assert_eq!(cursor_position(inner, (0, 9)), (10, 8));
    }
}
