use std::path::PathBuf;

use chrono::Local;
use crossterm::event::KeyCode;
use tracing::{info, warn};

use crate::config::Config;
use crate::session::{AddOutcome, Screen, Session, SessionError};
use crate::store::{self, LoadOutcome};
use crate::types::{LogEntry, Shift};

use super::AppEvent;

/// The top-level application state.
pub struct App {
    pub running: bool,
    pub session: Session,
    pub config: Config,
    pub data_dir: PathBuf,
    pub status: Option<String>,
    pub input: String,
    pub element_input_active: bool,
    pub selected_shift_index: usize,
    pub selected_element_index: usize,
    pub known_projects: Vec<String>,
    known_project_cursor: Option<usize>,
    /// Set when the previous log could not be read. Autosave would overwrite
    /// it, so only an explicit export writes the file.
    pub autosave_suspended: bool,
    pub show_help: bool,
    pub confirm_popup: Option<ConfirmPopup>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmAction {
    ResetLog,
}

#[derive(Clone, Debug)]
pub struct ConfirmPopup {
    pub message: String,
    pub action: ConfirmAction,
}

impl App {
    pub fn new(config: Config, data_dir: PathBuf) -> Self {
        let known_projects = match store::list_projects(&data_dir) {
            Ok(projects) => projects,
            Err(err) => {
                warn!(%err, dir = %data_dir.display(), "project discovery failed");
                Vec::new()
            }
        };
        let session = Session::new(config.time_format, config.save_mode);
        Self {
            running: true,
            session,
            config,
            data_dir,
            status: None,
            input: String::new(),
            element_input_active: false,
            selected_shift_index: 0,
            selected_element_index: 0,
            known_projects,
            known_project_cursor: None,
            autosave_suspended: false,
            show_help: false,
            confirm_popup: None,
        }
    }

    /// Applies project and shift given on the command line.
    pub fn prefill(&mut self, project: Option<String>, shift: Option<Shift>) {
        if let Some(project) = project {
            let result = self.session.set_project_name(&project);
            self.report(result);
        }
        if let Some(shift) = shift {
            self.choose_shift(shift);
        }
    }

    /// Where the log of this session is written, if the project is known.
    pub fn log_path(&self) -> Option<PathBuf> {
        let project = self.session.project_name();
        if project.is_empty() {
            return None;
        }
        let name = store::log_file_name(
            project,
            self.session.save_mode,
            Local::now().date_naive(),
        );
        Some(self.data_dir.join(name))
    }

    /// Whether the settings keys (`f`, `m`) are live on the current screen.
    pub fn settings_keys_active(&self) -> bool {
        !self.session.project_name().is_empty() && !self.element_input_active
    }

    /// Central update function - process an event and mutate state.
    pub fn update(&mut self, event: AppEvent) {
        match event {
            // The running total is recomputed on every draw; a tick only triggers one.
            AppEvent::Tick => {}
            AppEvent::KeyPress(key) => self.handle_key(key),
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        if self.confirm_popup.is_some() {
            self.handle_confirm_key(key);
            return;
        }
        if self.show_help {
            if matches!(key, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return;
        }
        match self.session.screen() {
            Screen::Setup => self.handle_setup_key(key),
            Screen::Elements if self.element_input_active => self.handle_element_input_key(key),
            Screen::Elements => self.handle_elements_key(key),
            Screen::Timing => self.handle_timing_key(key),
        }
    }

    /// Keys shared by the element and timing screens.
    fn handle_global_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('f') => {
                self.session.time_format = self.session.time_format.toggle();
                self.status = Some(format!(
                    "Time format: {}",
                    self.session.time_format.label()
                ));
            }
            KeyCode::Char('m') => {
                self.session.save_mode = self.session.save_mode.toggle();
                self.status = Some(format!("Save mode: {}", self.session.save_mode.label()));
            }
            _ => {}
        }
    }

    fn handle_setup_key(&mut self, key: KeyCode) {
        if self.session.project_name().is_empty() {
            self.handle_project_input_key(key);
        } else {
            self.handle_shift_key(key);
        }
    }

    fn handle_project_input_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.running = false,
            KeyCode::Enter => {
                let name = std::mem::take(&mut self.input);
                let result = self.session.set_project_name(&name);
                self.report(result);
                if self.session.project_name().is_empty() {
                    self.status = Some("Please enter project name and shift to begin.".into());
                }
            }
            KeyCode::Tab => self.cycle_known_project(),
            KeyCode::Backspace | KeyCode::Delete => {
                self.input.pop();
            }
            KeyCode::Char(ch) => {
                if ch.is_control() {
                    return;
                }
                self.input.push(ch);
            }
            _ => {}
        }
    }

    fn cycle_known_project(&mut self) {
        if self.known_projects.is_empty() {
            return;
        }
        let next = match self.known_project_cursor {
            Some(index) => (index + 1) % self.known_projects.len(),
            None => 0,
        };
        self.known_project_cursor = Some(next);
        self.input = self.known_projects[next].clone();
    }

    fn handle_shift_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::Char('q') => self.running = false,
            KeyCode::Up => {
                if self.selected_shift_index == 0 {
                    self.selected_shift_index = Shift::ALL.len() - 1;
                } else {
                    self.selected_shift_index -= 1;
                }
            }
            KeyCode::Down => {
                self.selected_shift_index = (self.selected_shift_index + 1) % Shift::ALL.len();
            }
            KeyCode::Enter => self.choose_shift(Shift::ALL[self.selected_shift_index]),
            KeyCode::Char(ch) if ch.is_ascii_digit() => {
                if let Some(shift) = ch
                    .to_digit(10)
                    .and_then(|digit| Shift::from_number(digit as u8))
                {
                    self.choose_shift(shift);
                }
            }
            _ => self.handle_global_key(key),
        }
    }

    fn choose_shift(&mut self, shift: Shift) {
        match self.session.set_shift(shift) {
            Ok(()) => {
                self.clear_status();
                self.load_existing_log();
            }
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    /// Reloads a previous log for this project, if one exists.
    fn load_existing_log(&mut self) {
        let Some(path) = self.log_path() else {
            return;
        };
        match store::read_log(&path) {
            LoadOutcome::Loaded(entries) if entries.is_empty() => {}
            LoadOutcome::Loaded(entries) => {
                let rows = entries.len();
                info!(rows, path = %path.display(), "reloaded log");
                self.session.restore_log(entries);
                self.status = Some(format!("Reloaded {rows} rows from {}", path.display()));
            }
            LoadOutcome::Missing => {}
            LoadOutcome::Malformed(reason) => {
                warn!(
                    %reason,
                    path = %path.display(),
                    "could not reload log, autosave suspended"
                );
                self.autosave_suspended = true;
                self.status = Some(format!(
                    "Could not reload {}: {reason}. Starting with an empty log, autosave paused until x.",
                    path.display()
                ));
            }
        }
    }

    fn handle_element_input_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.element_input_active = false;
                self.input.clear();
            }
            KeyCode::Enter => {
                let name = std::mem::take(&mut self.input);
                match self.session.add_element(&name) {
                    Ok(AddOutcome::Added(name)) => {
                        self.selected_element_index = self.session.elements().len() - 1;
                        self.status = Some(format!("Added element: {name}"));
                    }
                    Ok(AddOutcome::Blank) => {}
                    Err(err) => self.status = Some(err.to_string()),
                }
            }
            KeyCode::Backspace | KeyCode::Delete => {
                self.input.pop();
            }
            KeyCode::Char(ch) => {
                if ch.is_control() {
                    return;
                }
                self.input.push(ch);
            }
            _ => {}
        }
    }

    fn handle_elements_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('a') => {
                self.element_input_active = true;
                self.input.clear();
                self.clear_status();
            }
            KeyCode::Char('d') | KeyCode::Delete => self.remove_selected_element(),
            KeyCode::Char('n') => match self.session.proceed() {
                Ok(()) => {
                    self.selected_element_index = 0;
                    self.clear_status();
                }
                Err(err) => self.status = Some(err.to_string()),
            },
            KeyCode::Up => self.move_selection_up(),
            KeyCode::Down => self.move_selection_down(),
            _ => self.handle_global_key(key),
        }
    }

    fn remove_selected_element(&mut self) {
        if self.session.elements().is_empty() {
            return;
        }
        match self.session.remove_element(self.selected_element_index) {
            Ok(name) => {
                self.status = Some(format!("Removed element: {name}"));
                let len = self.session.elements().len();
                if self.selected_element_index >= len {
                    self.selected_element_index = len.saturating_sub(1);
                }
            }
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    fn handle_timing_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Up => self.move_selection_up(),
            KeyCode::Down => self.move_selection_down(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.start_element(self.selected_element_index);
            }
            KeyCode::Char(ch @ '1'..='9') => {
                let index = ch as usize - '1' as usize;
                if self.start_element(index) {
                    self.selected_element_index = index;
                }
            }
            KeyCode::Char('s') => self.stop_timer(),
            KeyCode::Char('R') => {
                self.confirm_popup = Some(ConfirmPopup {
                    message: "Reset the timer and clear all logged data?".into(),
                    action: ConfirmAction::ResetLog,
                });
            }
            KeyCode::Char('x') => self.export_log(),
            _ => self.handle_global_key(key),
        }
    }

    /// Returns whether the element is now running.
    fn start_element(&mut self, index: usize) -> bool {
        match self.session.start(index) {
            Ok(finished) => {
                self.clear_status();
                if let Some(entry) = finished {
                    self.after_log_change(Some(&entry));
                }
                true
            }
            Err(err) => {
                self.status = Some(err.to_string());
                false
            }
        }
    }

    fn stop_timer(&mut self) {
        if let Some(entry) = self.session.stop() {
            self.status = Some("Timer stopped.".into());
            self.after_log_change(Some(&entry));
        }
    }

    fn handle_confirm_key(&mut self, key: KeyCode) {
        let Some(popup) = self.confirm_popup.take() else {
            return;
        };
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => match popup.action {
                ConfirmAction::ResetLog => {
                    self.session.reset();
                    self.status = Some("Timer reset and data cleared.".into());
                    self.after_log_change(None);
                }
            },
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.clear_status(),
            _ => self.confirm_popup = Some(popup),
        }
    }

    fn after_log_change(&mut self, entry: Option<&LogEntry>) {
        if let Some(entry) = entry {
            if self.status.is_none() {
                self.status = Some(format!(
                    "Logged {} ({})",
                    entry.element, entry.formatted
                ));
            }
        }
        if !self.config.autosave {
            return;
        }
        if self.autosave_suspended {
            self.status = Some(
                "Autosave paused: the previous log could not be read. Press x to overwrite it."
                    .into(),
            );
        } else if let Err(err) = self.save_log() {
            warn!(%err, "autosave failed");
            self.status = Some(format!("Failed to save log: {err}"));
        }
    }

    fn export_log(&mut self) {
        match self.save_log() {
            Ok(Some(path)) => {
                if self.autosave_suspended {
                    info!(path = %path.display(), "unreadable log overwritten, autosave resumed");
                    self.autosave_suspended = false;
                }
                self.status = Some(format!(
                    "Saved {} rows to {}",
                    self.session.log().len(),
                    path.display()
                ));
            }
            Ok(None) => {}
            Err(err) => {
                warn!(%err, "export failed");
                self.status = Some(format!("Failed to save log: {err}"));
            }
        }
    }

    fn save_log(&self) -> anyhow::Result<Option<PathBuf>> {
        let Some(path) = self.log_path() else {
            return Ok(None);
        };
        store::write_log(&path, self.session.log())?;
        info!(rows = self.session.log().len(), path = %path.display(), "log saved");
        Ok(Some(path))
    }

    fn move_selection_up(&mut self) {
        let len = self.session.elements().len();
        if len == 0 {
            return;
        }
        if self.selected_element_index == 0 {
            self.selected_element_index = len - 1;
        } else {
            self.selected_element_index -= 1;
        }
    }

    fn move_selection_down(&mut self) {
        let len = self.session.elements().len();
        if len == 0 {
            return;
        }
        self.selected_element_index = (self.selected_element_index + 1) % len;
    }

    fn report(&mut self, result: Result<(), SessionError>) {
        if let Err(err) = result {
            self.status = Some(err.to_string());
        }
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SaveMode, TimeFormat};

    fn app_in(dir: &std::path::Path) -> App {
        App::new(Config::default(), dir.to_path_buf())
    }

    fn press(app: &mut App, keys: &[KeyCode]) {
        for key in keys {
            app.update(AppEvent::KeyPress(*key));
        }
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.update(AppEvent::KeyPress(KeyCode::Char(ch)));
        }
    }

    fn ready_to_time(app: &mut App, elements: &[&str]) {
        type_text(app, "Assembly");
        press(app, &[KeyCode::Enter, KeyCode::Char('2')]);
        press(app, &[KeyCode::Char('a')]);
        for name in elements {
            type_text(app, name);
            press(app, &[KeyCode::Enter]);
        }
        press(app, &[KeyCode::Esc, KeyCode::Char('n')]);
    }

    #[test]
    fn setup_flow_reaches_element_editor() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        press(&mut app, &[KeyCode::Enter]);
        assert_eq!(app.session.screen(), Screen::Setup);
        assert!(app.status.is_some());

        type_text(&mut app, "Assembly");
        press(&mut app, &[KeyCode::Enter]);
        assert_eq!(app.session.project_name(), "Assembly");
        assert_eq!(app.session.screen(), Screen::Setup);

        press(&mut app, &[KeyCode::Down, KeyCode::Enter]);
        assert_eq!(app.session.shift(), Some(Shift::Shift2));
        assert_eq!(app.session.screen(), Screen::Elements);
    }

    #[test]
    fn tab_fills_in_a_known_project() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("packing_log.csv"), "").unwrap();
        let mut app = app_in(dir.path());
        press(&mut app, &[KeyCode::Tab]);
        assert_eq!(app.input, "packing");
    }

    #[test]
    fn duplicate_element_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        type_text(&mut app, "Assembly");
        press(&mut app, &[KeyCode::Enter, KeyCode::Char('1'), KeyCode::Char('a')]);
        type_text(&mut app, "Pick");
        press(&mut app, &[KeyCode::Enter]);
        type_text(&mut app, "Pick ");
        press(&mut app, &[KeyCode::Enter]);
        assert_eq!(app.session.elements().len(), 1);
        assert_eq!(app.status.as_deref(), Some("element 'Pick' already exists"));
    }

    #[test]
    fn remove_selected_element() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        type_text(&mut app, "Assembly");
        press(&mut app, &[KeyCode::Enter, KeyCode::Char('1'), KeyCode::Char('a')]);
        for name in ["Pick", "Place"] {
            type_text(&mut app, name);
            press(&mut app, &[KeyCode::Enter]);
        }
        press(&mut app, &[KeyCode::Esc, KeyCode::Char('d')]);
        assert_eq!(app.session.elements().iter().collect::<Vec<_>>(), vec!["Pick"]);
        assert_eq!(app.selected_element_index, 0);
    }

    #[test]
    fn timing_keys_log_and_autosave() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        ready_to_time(&mut app, &["Pick", "Place"]);
        assert_eq!(app.session.screen(), Screen::Timing);

        press(&mut app, &[KeyCode::Char('1')]);
        assert_eq!(app.session.active_element(), Some("Pick"));
        press(&mut app, &[KeyCode::Char('2')]);
        assert_eq!(app.session.active_element(), Some("Place"));
        press(&mut app, &[KeyCode::Char('s')]);
        assert!(app.session.active_element().is_none());
        assert_eq!(app.session.log().len(), 2);

        let path = dir.path().join("assembly_log.csv");
        match store::read_log(&path) {
            LoadOutcome::Loaded(rows) => assert_eq!(rows, app.session.log()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn stop_without_running_timer_does_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        ready_to_time(&mut app, &["Pick"]);
        press(&mut app, &[KeyCode::Char('s')]);
        assert!(app.session.log().is_empty());
        assert!(!dir.path().join("assembly_log.csv").exists());
    }

    #[test]
    fn reset_requires_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        ready_to_time(&mut app, &["Pick"]);
        press(&mut app, &[KeyCode::Char('1'), KeyCode::Char('s')]);
        assert_eq!(app.session.log().len(), 1);

        press(&mut app, &[KeyCode::Char('R'), KeyCode::Char('n')]);
        assert_eq!(app.session.log().len(), 1);
        assert!(app.confirm_popup.is_none());

        press(&mut app, &[KeyCode::Char('R'), KeyCode::Char('z')]);
        assert!(app.confirm_popup.is_some());
        press(&mut app, &[KeyCode::Char('y')]);
        assert!(app.session.log().is_empty());
        assert_eq!(app.session.screen(), Screen::Timing);
    }

    #[test]
    fn previous_log_is_reloaded_on_setup() {
        let dir = tempfile::tempdir().unwrap();
        let rows = vec![LogEntry {
            project: "Assembly".into(),
            shift: Shift::Shift1,
            element: "Pick".into(),
            duration_secs: 4.25,
            formatted: "00:04.250".into(),
        }];
        store::write_log(&dir.path().join("assembly_log.csv"), &rows).unwrap();

        let mut app = app_in(dir.path());
        app.prefill(Some("Assembly".into()), Some(Shift::Shift2));
        assert_eq!(app.session.screen(), Screen::Elements);
        assert_eq!(app.session.log(), rows.as_slice());
        assert_eq!(
            app.session.accumulated_total(),
            std::time::Duration::from_millis(4250)
        );
    }

    #[test]
    fn malformed_log_falls_back_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("assembly_log.csv"), "nonsense\n1,2,3\n").unwrap();
        let mut app = app_in(dir.path());
        app.prefill(Some("Assembly".into()), Some(Shift::Shift1));
        assert!(app.session.log().is_empty());
        assert!(app.status.as_deref().unwrap().starts_with("Could not reload"));
        assert!(app.autosave_suspended);
    }

    #[test]
    fn unreadable_log_survives_until_explicit_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assembly_log.csv");
        let original = "Project,Shift,Element,Duration (s),Formatted Time\n\
                        Assembly,Shift 1,Pick,1.0,00:01.000\n\
                        Assembly,Shift 9,Place,2.0,00:02.000\n";
        std::fs::write(&path, original).unwrap();

        let mut app = app_in(dir.path());
        ready_to_time(&mut app, &["Pick"]);
        assert!(app.autosave_suspended);
        press(&mut app, &[KeyCode::Char('1'), KeyCode::Char('s')]);
        assert_eq!(app.session.log().len(), 1);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
        assert!(app.status.as_deref().unwrap().starts_with("Autosave paused"));

        press(&mut app, &[KeyCode::Char('x')]);
        assert!(!app.autosave_suspended);
        match store::read_log(&path) {
            LoadOutcome::Loaded(rows) => assert_eq!(rows, app.session.log()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn out_of_range_duration_is_not_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("assembly_log.csv"),
            "Project,Shift,Element,Duration (s),Formatted Time\n\
             Assembly,Shift 1,Pick,inf,00:01.000\n",
        )
        .unwrap();
        let mut app = app_in(dir.path());
        app.prefill(Some("Assembly".into()), Some(Shift::Shift1));
        assert!(app.session.log().is_empty());
        assert!(app.status.as_deref().unwrap().starts_with("Could not reload"));
        assert_eq!(app.session.current_total(), std::time::Duration::ZERO);
    }

    #[test]
    fn unknown_number_key_keeps_the_selection() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        ready_to_time(&mut app, &["Pick", "Place"]);
        press(&mut app, &[KeyCode::Char('2')]);
        assert_eq!(app.selected_element_index, 1);
        press(&mut app, &[KeyCode::Char('5')]);
        assert_eq!(app.selected_element_index, 1);
        assert_eq!(app.session.active_element(), Some("Place"));
        assert!(app.status.is_some());
    }

    #[test]
    fn settings_toggle_on_the_shift_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let rows = vec![LogEntry {
            project: "Assembly".into(),
            shift: Shift::Shift1,
            element: "Pick".into(),
            duration_secs: 1.5,
            formatted: "00:01.500".into(),
        }];
        let today = Local::now().date_naive();
        let per_day = store::log_file_name("Assembly", SaveMode::PerDay, today);
        store::write_log(&dir.path().join(per_day), &rows).unwrap();

        let mut app = app_in(dir.path());
        assert!(!app.settings_keys_active());
        type_text(&mut app, "Assembly");
        press(&mut app, &[KeyCode::Enter]);
        assert!(app.settings_keys_active());
        press(&mut app, &[KeyCode::Char('m'), KeyCode::Char('f')]);
        assert_eq!(app.session.save_mode, SaveMode::PerDay);
        assert_eq!(app.session.time_format, TimeFormat::HoursMinutesSeconds);
        assert_eq!(app.session.screen(), Screen::Setup);

        press(&mut app, &[KeyCode::Char('1')]);
        assert_eq!(app.session.log(), rows.as_slice());
    }

    #[test]
    fn settings_toggle_from_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        ready_to_time(&mut app, &[]);
        press(&mut app, &[KeyCode::Char('f'), KeyCode::Char('m')]);
        assert_eq!(app.session.time_format, TimeFormat::HoursMinutesSeconds);
        assert_eq!(app.session.save_mode, SaveMode::PerDay);
        let name = app.log_path().unwrap();
        let name = name.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("assembly_2"));
    }

    #[test]
    fn help_swallows_keys_until_closed() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        ready_to_time(&mut app, &["Pick"]);
        press(&mut app, &[KeyCode::Char('?'), KeyCode::Char('1')]);
        assert!(app.session.active_element().is_none());
        press(&mut app, &[KeyCode::Esc, KeyCode::Char('q')]);
        assert!(!app.running);
    }
}
