//! One user's working session: setup, element list, stopwatch and log.
mod elements;
mod format;
mod stopwatch;

use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info};

use crate::types::{LogEntry, SaveMode, Shift, TimeFormat};

use elements::ElementRegistry;
use format::round_millis;
use stopwatch::{Lap, Stopwatch};

pub use elements::AddOutcome;
pub use format::{format_duration, format_secs};
pub use stopwatch::TimerState;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("project name is already set")]
    ProjectAlreadySet,
    #[error("enter a project name first")]
    ProjectMissing,
    #[error("shift is already set")]
    ShiftAlreadySet,
    #[error("please enter project name and shift to begin")]
    SetupIncomplete,
    #[error("element '{0}' already exists")]
    DuplicateElement(String),
    #[error("no element at position {index} (have {len})")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("'{0}' is being timed, stop it before removing")]
    ElementActive(String),
    #[error("elements can only be edited before timing starts")]
    NotEditing,
    #[error("timing has not started yet")]
    NotTiming,
}

/// Monotonic progression of a session. Only moves forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    AwaitingSetup,
    EditingElements,
    Timing,
}

/// The screen the router selects for the current state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Setup,
    Elements,
    Timing,
}

#[derive(Debug)]
pub struct Session {
    project_name: String,
    shift: Option<Shift>,
    phase: Phase,
    pub time_format: TimeFormat,
    pub save_mode: SaveMode,
    elements: ElementRegistry,
    stopwatch: Stopwatch,
    log: Vec<LogEntry>,
}

impl Session {
    pub fn new(time_format: TimeFormat, save_mode: SaveMode) -> Self {
        Self {
            project_name: String::new(),
            shift: None,
            phase: Phase::AwaitingSetup,
            time_format,
            save_mode,
            elements: ElementRegistry::default(),
            stopwatch: Stopwatch::default(),
            log: Vec::new(),
        }
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn shift(&self) -> Option<Shift> {
        self.shift
    }

    pub fn elements(&self) -> &ElementRegistry {
        &self.elements
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    pub fn timer(&self) -> &TimerState {
        self.stopwatch.state()
    }

    pub fn active_element(&self) -> Option<&str> {
        self.stopwatch.active_element()
    }

    pub fn is_setup_complete(&self) -> bool {
        !self.project_name.is_empty() && self.shift.is_some()
    }

    /// Page router.
    pub fn screen(&self) -> Screen {
        if !self.is_setup_complete() {
            Screen::Setup
        } else if self.phase != Phase::Timing {
            Screen::Elements
        } else {
            Screen::Timing
        }
    }

    /// Sets the project name once. Blank input is ignored.
    pub fn set_project_name(&mut self, name: &str) -> Result<(), SessionError> {
        if !self.project_name.is_empty() {
            return Err(SessionError::ProjectAlreadySet);
        }
        let name = name.trim();
        if name.is_empty() {
            return Ok(());
        }
        self.project_name = name.to_string();
        info!(project = %self.project_name, "project set");
        self.advance_setup();
        Ok(())
    }

    pub fn set_shift(&mut self, shift: Shift) -> Result<(), SessionError> {
        if self.project_name.is_empty() {
            return Err(SessionError::ProjectMissing);
        }
        if self.shift.is_some() {
            return Err(SessionError::ShiftAlreadySet);
        }
        self.shift = Some(shift);
        info!(%shift, "shift set");
        self.advance_setup();
        Ok(())
    }

    fn advance_setup(&mut self) {
        if self.phase == Phase::AwaitingSetup && self.is_setup_complete() {
            self.phase = Phase::EditingElements;
        }
    }

    pub fn add_element(&mut self, name: &str) -> Result<AddOutcome, SessionError> {
        self.require_phase(Phase::EditingElements, SessionError::NotEditing)?;
        let outcome = self.elements.add(name)?;
        if let AddOutcome::Added(name) = &outcome {
            debug!(element = %name, "element added");
        }
        Ok(outcome)
    }

    /// Removes an element by position. The element being timed cannot be removed.
    pub fn remove_element(&mut self, index: usize) -> Result<String, SessionError> {
        self.require_phase(Phase::EditingElements, SessionError::NotEditing)?;
        if let Some(name) = self.elements.get(index) {
            if self.stopwatch.active_element() == Some(name) {
                return Err(SessionError::ElementActive(name.to_string()));
            }
        }
        let name = self.elements.remove(index)?;
        debug!(element = %name, "element removed");
        Ok(name)
    }

    /// Moves from element editing to timing. No minimum element count.
    pub fn proceed(&mut self) -> Result<(), SessionError> {
        if !self.is_setup_complete() {
            return Err(SessionError::SetupIncomplete);
        }
        if self.phase == Phase::EditingElements {
            self.phase = Phase::Timing;
            info!(elements = self.elements.len(), "timing started");
        }
        Ok(())
    }

    fn require_phase(&self, phase: Phase, err: SessionError) -> Result<(), SessionError> {
        if !self.is_setup_complete() {
            return Err(SessionError::SetupIncomplete);
        }
        if self.phase != phase {
            return Err(err);
        }
        Ok(())
    }

    pub fn start(&mut self, index: usize) -> Result<Option<LogEntry>, SessionError> {
        self.start_at(index, Instant::now())
    }

    /// Starts timing the element at `index`. Anything already running is
    /// finalized into the log first, in the same step.
    pub fn start_at(
        &mut self,
        index: usize,
        now: Instant,
    ) -> Result<Option<LogEntry>, SessionError> {
        self.require_phase(Phase::Timing, SessionError::NotTiming)?;
        let element = self
            .elements
            .get(index)
            .ok_or(SessionError::IndexOutOfBounds {
                index,
                len: self.elements.len(),
            })?
            .to_string();
        debug!(%element, "start");
        let lap = self.stopwatch.start_at(element, now);
        Ok(lap.map(|lap| self.record(lap)))
    }

    pub fn stop(&mut self) -> Option<LogEntry> {
        self.stop_at(Instant::now())
    }

    /// Finalizes the running interval. A no-op when idle.
    pub fn stop_at(&mut self, now: Instant) -> Option<LogEntry> {
        let lap = self.stopwatch.stop_at(now)?;
        Some(self.record(lap))
    }

    fn record(&mut self, lap: Lap) -> LogEntry {
        let duration_secs = round_millis(lap.elapsed.as_secs_f64());
        let entry = LogEntry {
            project: self.project_name.clone(),
            // record() is only reachable from Timing, which requires a shift
            shift: self.shift.unwrap_or(Shift::Shift1),
            element: lap.element,
            duration_secs,
            formatted: format_secs(duration_secs, TimeFormat::MinutesSeconds),
        };
        info!(
            element = %entry.element,
            duration = entry.duration_secs,
            "interval logged"
        );
        self.log.push(entry.clone());
        entry
    }

    /// Clears the log and the running timer.
    pub fn reset(&mut self) {
        self.log.clear();
        self.stopwatch.clear();
        info!("log and timer reset");
    }

    /// Appends previously exported rows, in file order.
    pub fn restore_log(&mut self, entries: Vec<LogEntry>) {
        debug!(rows = entries.len(), "restoring log");
        self.log.extend(entries);
    }

    /// Sum of every logged interval. Derived from the log so a reloaded log and
    /// the displayed total always agree.
    pub fn accumulated_total(&self) -> Duration {
        let millis = self
            .log
            .iter()
            .map(LogEntry::duration_millis)
            .fold(0u64, u64::saturating_add);
        Duration::from_millis(millis)
    }

    pub fn current_total(&self) -> Duration {
        self.current_total_at(Instant::now())
    }

    pub fn current_total_at(&self, now: Instant) -> Duration {
        self.accumulated_total() + self.stopwatch.running_elapsed(now)
    }

    pub fn running_elapsed_at(&self, now: Instant) -> Duration {
        self.stopwatch.running_elapsed(now)
    }
}
