use std::time::{Duration, Instant};

/// A finalized interval handed back when the stopwatch stops or switches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lap {
    pub element: String,
    pub elapsed: Duration,
}

/// At most one running interval. The element and its start instant live in
/// the same variant so one can never be set without the other.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TimerState {
    #[default]
    Idle,
    Running { element: String, started: Instant },
}

#[derive(Debug, Default)]
pub struct Stopwatch {
    state: TimerState,
}

impl Stopwatch {
    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn active_element(&self) -> Option<&str> {
        match &self.state {
            TimerState::Idle => None,
            TimerState::Running { element, .. } => Some(element.as_str()),
        }
    }

    /// Starts timing `element`. A running interval is finalized first and returned.
    pub fn start_at(&mut self, element: String, now: Instant) -> Option<Lap> {
        let lap = self.stop_at(now);
        self.state = TimerState::Running {
            element,
            started: now,
        };
        lap
    }

    /// Finalizes the running interval, if any. Idle is a no-op.
    pub fn stop_at(&mut self, now: Instant) -> Option<Lap> {
        match std::mem::take(&mut self.state) {
            TimerState::Idle => None,
            TimerState::Running { element, started } => Some(Lap {
                element,
                elapsed: now.saturating_duration_since(started),
            }),
        }
    }

    /// Elapsed time of the running interval, zero when idle.
    pub fn running_elapsed(&self, now: Instant) -> Duration {
        match &self.state {
            TimerState::Idle => Duration::ZERO,
            TimerState::Running { started, .. } => now.saturating_duration_since(*started),
        }
    }

    pub fn clear(&mut self) {
        self.state = TimerState::Idle;
    }
}
