use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use uuid::Uuid;

use crate::models::Workout;
use crate::session::{Lifecycle, LoadStatus, SessionNotice, StoreSession};

use super::forms::{
    format_date, ConfirmDelete, DeleteTarget, ExerciseForm, SetForm, WorkoutForm,
};
use super::helpers::{
    centered_rect, clamp_selection, cursor_position, detail_line, detail_rows, DetailRow,
};
use super::screens::WorkoutScreen;

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;

/// High-level navigation states.
enum Screen {
    Workouts,
    Workout(WorkoutScreen),
}

/// Fine-grained modes scoped to the current screen. Every editing mode holds
/// its own staged copy; leaving the mode without committing discards it.
enum Mode {
    Normal,
    EditingWorkout {
        workout_id: Uuid,
        form: WorkoutForm,
    },
    EditingSet {
        workout_id: Uuid,
        exercise: usize,
        set: usize,
        form: SetForm,
    },
    RenamingExercise {
        workout_id: Uuid,
        exercise: usize,
        form: ExerciseForm,
    },
    ConfirmDelete(ConfirmDelete),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state for the TUI. The store session is injected by
/// the binary and handed back through [`App::into_session`] for the final
/// save.
pub struct App {
    session: StoreSession,
    selected: usize,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(session: StoreSession) -> Self {
        Self {
            session,
            selected: 0,
            screen: Screen::Workouts,
            mode: Mode::Normal,
            status: None,
        }
    }

    pub fn into_session(self) -> StoreSession {
        self.session
    }

    /// Apply finished storage jobs. Called once per frame.
    pub fn tick(&mut self) {
        for notice in self.session.poll() {
            self.show_notice(notice);
        }
        self.selected = clamp_selection(self.selected, self.session.state().len());
    }

    /// Terminal focus changes stand in for the app going inactive/active.
    pub fn handle_focus(&mut self, focused: bool) {
        let phase = if focused {
            Lifecycle::Active
        } else {
            Lifecycle::Inactive
        };
        if let Err(err) = self.session.on_lifecycle(phase) {
            log::error!("lifecycle save failed: {err}");
            self.set_status(format!("Save failed: {err}"), StatusKind::Error);
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::EditingWorkout { workout_id, form } => {
                self.handle_edit_workout(code, workout_id, form)
            }
            Mode::EditingSet {
                workout_id,
                exercise,
                set,
                form,
            } => self.handle_edit_set(code, workout_id, exercise, set, form),
            Mode::RenamingExercise {
                workout_id,
                exercise,
                form,
            } => self.handle_rename_exercise(code, workout_id, exercise, form),
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm),
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        let screen = mem::replace(&mut self.screen, Screen::Workouts);
        let (screen, mode) = match screen {
            Screen::Workouts => self.handle_list_key(code, exit),
            Screen::Workout(workout_screen) => self.handle_workout_key(code, workout_screen),
        };
        self.screen = screen;
        mode
    }

    fn handle_list_key(&mut self, code: KeyCode, exit: &mut bool) -> (Screen, Mode) {
        let mode = match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                *exit = true;
                Mode::Normal
            }
            KeyCode::Up => {
                self.move_selection(-1);
                Mode::Normal
            }
            KeyCode::Down => {
                self.move_selection(1);
                Mode::Normal
            }
            KeyCode::Char('s') => {
                self.save_now();
                Mode::Normal
            }
            KeyCode::Enter | KeyCode::Right => {
                if let Some(workout) = self.current_workout() {
                    let screen = WorkoutScreen::new(workout);
                    return (Screen::Workout(screen), Mode::Normal);
                }
                self.set_status("No workout selected.", StatusKind::Error);
                Mode::Normal
            }
            KeyCode::Char('a') => {
                if self.require_ready() {
                    self.selected = self.session.state_mut().add_workout(Workout::default());
                    self.set_status("Added a new workout.", StatusKind::Info);
                }
                Mode::Normal
            }
            KeyCode::Char('e') => self.begin_workout_edit(),
            KeyCode::Char('d') => {
                match self.current_workout() {
                    Some(workout) if self.session.is_ready() => {
                        Mode::ConfirmDelete(ConfirmDelete {
                            target: DeleteTarget::Workout(self.selected),
                            label: format!("workout \"{}\"", workout.name),
                        })
                    }
                    _ => Mode::Normal,
                }
            }
            _ => Mode::Normal,
        };
        (Screen::Workouts, mode)
    }

    fn begin_workout_edit(&mut self) -> Mode {
        if !self.require_ready() {
            return Mode::Normal;
        }
        match self.current_workout() {
            Some(workout) => Mode::EditingWorkout {
                workout_id: workout.id(),
                form: WorkoutForm::begin(workout),
            },
            None => {
                self.set_status("No workout selected.", StatusKind::Error);
                Mode::Normal
            }
        }
    }

    fn handle_workout_key(&mut self, code: KeyCode, mut screen: WorkoutScreen) -> (Screen, Mode) {
        let Some(index) = screen.index(self.session.state()) else {
            self.set_status("That workout no longer exists.", StatusKind::Error);
            return (Screen::Workouts, Mode::Normal);
        };

        match code {
            KeyCode::Esc | KeyCode::Left | KeyCode::Backspace => {
                self.selected = index;
                return (Screen::Workouts, Mode::Normal);
            }
            KeyCode::Up => screen.move_selection(self.workout(index), -1),
            KeyCode::Down => screen.move_selection(self.workout(index), 1),
            KeyCode::Char('s') => self.save_now(),
            KeyCode::Char('n') => {
                if self.require_ready() {
                    let added = self
                        .session
                        .state_mut()
                        .update_workout(index, |workout| workout.add_exercise());
                    screen.focus(self.workout(index), DetailRow::Exercise(added));
                    self.set_status("Added an exercise.", StatusKind::Info);
                }
            }
            KeyCode::Char('a') => {
                if self.require_ready() {
                    match screen.current_row(self.workout(index)) {
                        Some(DetailRow::Exercise(exercise))
                        | Some(DetailRow::Set { exercise, .. }) => {
                            let set = self
                                .session
                                .state_mut()
                                .update_workout(index, |workout| {
                                    workout.exercises[exercise].add_set()
                                });
                            screen.focus(self.workout(index), DetailRow::Set { exercise, set });
                            self.set_status("Added a set.", StatusKind::Info);
                        }
                        None => {
                            self.set_status("Add an exercise first.", StatusKind::Error);
                        }
                    }
                }
            }
            KeyCode::Enter | KeyCode::Char('e') => {
                if self.require_ready() {
                    let workout = self.workout(index);
                    let workout_id = workout.id();
                    match screen.current_row(workout) {
                        Some(DetailRow::Exercise(exercise)) => {
                            let form = ExerciseForm::begin(&workout.exercises[exercise]);
                            let mode = Mode::RenamingExercise {
                                workout_id,
                                exercise,
                                form,
                            };
                            return (Screen::Workout(screen), mode);
                        }
                        Some(DetailRow::Set { exercise, set }) => {
                            let form = SetForm::begin(&workout.exercises[exercise].sets[set]);
                            let mode = Mode::EditingSet {
                                workout_id,
                                exercise,
                                set,
                                form,
                            };
                            return (Screen::Workout(screen), mode);
                        }
                        None => {}
                    }
                }
            }
            KeyCode::Char('w') => {
                if self.require_ready() {
                    let workout = self.workout(index);
                    let mode = Mode::EditingWorkout {
                        workout_id: workout.id(),
                        form: WorkoutForm::begin(workout),
                    };
                    return (Screen::Workout(screen), mode);
                }
            }
            KeyCode::Char('d') => {
                if self.require_ready() {
                    let workout = self.workout(index);
                    let confirm = match screen.current_row(workout) {
                        Some(DetailRow::Exercise(exercise)) => Some(ConfirmDelete {
                            target: DeleteTarget::Exercise {
                                workout: index,
                                exercise,
                            },
                            label: format!("exercise \"{}\"", workout.exercises[exercise].name),
                        }),
                        Some(DetailRow::Set { exercise, set }) => Some(ConfirmDelete {
                            target: DeleteTarget::Set {
                                workout: index,
                                exercise,
                                set,
                            },
                            label: format!(
                                "set {} of \"{}\"",
                                set + 1,
                                workout.exercises[exercise].name
                            ),
                        }),
                        None => None,
                    };
                    if let Some(confirm) = confirm {
                        return (Screen::Workout(screen), Mode::ConfirmDelete(confirm));
                    }
                }
            }
            _ => {}
        }

        (Screen::Workout(screen), Mode::Normal)
    }

    fn handle_edit_workout(
        &mut self,
        code: KeyCode,
        workout_id: Uuid,
        mut form: WorkoutForm,
    ) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Edit cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => {
                let Some(index) = self.session.state().position_of(workout_id) else {
                    self.set_status("That workout no longer exists.", StatusKind::Error);
                    return Mode::Normal;
                };
                match form.finish() {
                    Ok(session) => {
                        let new_index =
                            self.session.state_mut().commit_workout_edit(index, session);
                        if matches!(self.screen, Screen::Workouts) {
                            self.selected = new_index;
                        }
                        self.set_status("Workout updated.", StatusKind::Info);
                        return Mode::Normal;
                    }
                    Err((returned, message)) => {
                        form = returned;
                        form.error = Some(message.clone());
                        self.set_status(message, StatusKind::Error);
                    }
                }
            }
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Mode::EditingWorkout { workout_id, form }
    }

    fn handle_edit_set(
        &mut self,
        code: KeyCode,
        workout_id: Uuid,
        exercise: usize,
        set: usize,
        mut form: SetForm,
    ) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Edit cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => {
                let Some(index) = self.session.state().position_of(workout_id) else {
                    self.set_status("That workout no longer exists.", StatusKind::Error);
                    return Mode::Normal;
                };
                match form.finish() {
                    Ok(session) => {
                        self.session.state_mut().update_workout(index, |workout| {
                            session.commit(&mut workout.exercises[exercise].sets[set])
                        });
                        self.set_status("Set updated.", StatusKind::Info);
                        return Mode::Normal;
                    }
                    Err((returned, message)) => {
                        form = returned;
                        form.error = Some(message.clone());
                        self.set_status(message, StatusKind::Error);
                    }
                }
            }
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Mode::EditingSet {
            workout_id,
            exercise,
            set,
            form,
        }
    }

    fn handle_rename_exercise(
        &mut self,
        code: KeyCode,
        workout_id: Uuid,
        exercise: usize,
        mut form: ExerciseForm,
    ) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Rename cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => {
                if let Some(index) = self.session.state().position_of(workout_id) {
                    let session = form.finish();
                    self.session.state_mut().update_workout(index, |workout| {
                        session.commit(&mut workout.exercises[exercise])
                    });
                    self.set_status("Exercise renamed.", StatusKind::Info);
                }
                return Mode::Normal;
            }
            KeyCode::Char(ch) => {
                form.push_char(ch);
            }
            _ => {}
        }
        Mode::RenamingExercise {
            workout_id,
            exercise,
            form,
        }
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmDelete) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.perform_delete(&confirm);
                Mode::Normal
            }
            _ => Mode::ConfirmDelete(confirm),
        }
    }

    fn perform_delete(&mut self, confirm: &ConfirmDelete) {
        let state = self.session.state_mut();
        match confirm.target {
            DeleteTarget::Workout(index) => {
                state.remove_workout(index);
                self.selected = clamp_selection(self.selected, self.session.state().len());
            }
            DeleteTarget::Exercise { workout, exercise } => {
                state.update_workout(workout, |w| w.remove_exercise(exercise));
            }
            DeleteTarget::Set {
                workout,
                exercise,
                set,
            } => {
                state.update_workout(workout, |w| w.exercises[exercise].remove_set(set));
            }
        }

        if let Screen::Workout(ref mut screen) = self.screen {
            if let Some(index) = self.session.state().position_of(screen.workout_id) {
                screen.ensure_in_bounds(&self.session.state().workouts()[index]);
            }
        }
        self.set_status(format!("Deleted {}.", confirm.label), StatusKind::Info);
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match &self.screen {
            Screen::Workouts => self.draw_workout_list(frame, content_area),
            Screen::Workout(screen) => self.draw_workout_detail(frame, content_area, screen),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::EditingWorkout { form, .. } => {
                let mut lines = form.lines();
                push_form_hint(&mut lines, form.error.as_deref());
                let cursor = (
                    form.active.label().len() + 2 + form.value(form.active).chars().count(),
                    form.active.row(),
                );
                self.draw_form(frame, area, "Edit Workout", lines, cursor);
            }
            Mode::EditingSet { form, .. } => {
                let mut lines = form.lines();
                push_form_hint(&mut lines, form.error.as_deref());
                let cursor = (
                    form.active.label().len() + 2 + form.value(form.active).chars().count(),
                    form.active.row(),
                );
                self.draw_form(frame, area, "Change Set", lines, cursor);
            }
            Mode::RenamingExercise { form, .. } => {
                let mut lines = vec![form.line()];
                push_form_hint(&mut lines, None);
                let cursor = ("Name: ".len() + form.name.chars().count(), 0);
                self.draw_form(frame, area, "Rename Exercise", lines, cursor);
            }
            Mode::ConfirmDelete(confirm) => self.draw_confirm(frame, area, confirm),
            Mode::Normal => {}
        }
    }

    fn draw_workout_list(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Your Workouts")
            .borders(Borders::ALL);

        let state = self.session.state();
        let placeholder = match self.session.load_status() {
            LoadStatus::Pending => Some("Loading workouts..."),
            _ if state.is_empty() => Some("No workouts yet. Press [a] to add one."),
            _ => None,
        };
        if let Some(text) = placeholder {
            let paragraph = Paragraph::new(Span::styled(text, Style::default().fg(Color::Gray)))
                .block(block)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, area);
            return;
        }

        let items: Vec<ListItem> = state
            .workouts()
            .iter()
            .map(|workout| {
                ListItem::new(vec![
                    Line::from(Span::styled(
                        workout.name.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        workout.summary(),
                        Style::default().fg(Color::Gray),
                    )),
                ])
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().fg(Color::Yellow))
            .highlight_symbol("> ");
        let mut list_state = ListState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn draw_workout_detail(&self, frame: &mut Frame, area: Rect, screen: &WorkoutScreen) {
        let Some(index) = screen.index(self.session.state()) else {
            return;
        };
        let workout = &self.session.state().workouts()[index];
        let title = format!(
            "{} - {} - {} minutes",
            workout.name,
            format_date(workout.date),
            workout.length_in_minutes
        );
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = detail_rows(workout);
        if rows.is_empty() {
            let paragraph = Paragraph::new(Span::styled(
                "No exercises yet. Press [n] to add one.",
                Style::default().fg(Color::Gray),
            ))
            .alignment(Alignment::Center);
            frame.render_widget(paragraph, inner);
            return;
        }

        let lines: Vec<Line> = rows
            .iter()
            .enumerate()
            .map(|(idx, row)| detail_line(workout, *row, idx == screen.selected))
            .collect();
        let visible = inner.height.max(1) as usize;
        let offset = screen.selected.saturating_sub(visible - 1) as u16;
        frame.render_widget(Paragraph::new(lines).scroll((offset, 0)), inner);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let keys: &[(&str, &str)] = match (&self.screen, &self.mode) {
            (_, Mode::ConfirmDelete(_)) => &[("[y]", " Delete   "), ("[n]", " Keep")],
            (_, Mode::RenamingExercise { .. }) => &[("[Enter]", " Save   "), ("[Esc]", " Cancel")],
            (_, Mode::EditingWorkout { .. }) | (_, Mode::EditingSet { .. }) => &[
                ("[Tab]", " Next Field   "),
                ("[Enter]", " Save   "),
                ("[Esc]", " Cancel"),
            ],
            (Screen::Workouts, Mode::Normal) => &[
                ("[Up/Down]", " Navigate   "),
                ("[Enter]", " Open   "),
                ("[a]", " Add   "),
                ("[e]", " Edit   "),
                ("[d]", " Delete   "),
                ("[s]", " Save   "),
                ("[q]", " Quit"),
            ],
            (Screen::Workout(_), Mode::Normal) => &[
                ("[Up/Down]", " Navigate   "),
                ("[n]", " New Exercise   "),
                ("[a]", " Add Set   "),
                ("[e]", " Edit   "),
                ("[w]", " Edit Workout   "),
                ("[d]", " Delete   "),
                ("[Esc]", " Back"),
            ],
        };

        Line::from(
            keys.iter()
                .flat_map(|(key, action)| {
                    [Span::styled(*key, key_style), Span::raw(*action)]
                })
                .collect::<Vec<_>>(),
        )
    }

    fn draw_form(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        lines: Vec<Line<'static>>,
        cursor: (usize, u16),
    ) {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        frame.set_cursor_position(cursor_position(inner, cursor));
    }

    fn draw_confirm(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmDelete) {
        let popup_area = centered_rect(50, 25, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Delete")
            .borders(Borders::ALL);
        let lines = vec![
            Line::from(format!("Delete {}?", confirm.label)),
            Line::from(""),
            Line::from(Span::styled(
                "y to delete - n to keep",
                Style::default().fg(Color::Gray),
            )),
        ];
        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn show_notice(&mut self, notice: SessionNotice) {
        match notice {
            SessionNotice::Info(text) => self.set_status(text, StatusKind::Info),
            SessionNotice::Error(text) => self.set_status(text, StatusKind::Error),
        }
    }

    fn save_now(&mut self) {
        match self.session.save_now() {
            Ok(true) => self.set_status("Saving...", StatusKind::Info),
            Ok(false) => self.set_status(
                "Saving is disabled because the stored workouts could not be loaded.",
                StatusKind::Error,
            ),
            Err(err) => self.set_status(format!("Save failed: {err}"), StatusKind::Error),
        }
    }

    /// Edits before the startup load lands would be overwritten by it.
    fn require_ready(&mut self) -> bool {
        if self.session.is_ready() {
            true
        } else {
            self.set_status("Still loading workouts...", StatusKind::Error);
            false
        }
    }

    fn workout(&self, index: usize) -> &Workout {
        &self.session.state().workouts()[index]
    }

    fn current_workout(&self) -> Option<&Workout> {
        self.session.state().get(self.selected)
    }

    fn move_selection(&mut self, offset: isize) {
        let len = self.session.state().len();
        if len == 0 {
            return;
        }
        let next = (self.selected as isize + offset).clamp(0, len as isize - 1);
        self.selected = next as usize;
    }
}

fn push_form_hint(lines: &mut Vec<Line<'static>>, error: Option<&str>) {
    lines.push(Line::from(""));
    match error {
        Some(error) => lines.push(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        ))),
        None => lines.push(Line::from(Span::styled(
            "Enter to save - Tab to switch - Esc to cancel",
            Style::default().fg(Color::Gray),
        ))),
    }
}
