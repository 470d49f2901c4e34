use std::sync::atomic::{AtomicU8, Ordering};

/// The analysis state of a [`PitchRecognizer`](crate::PitchRecognizer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ScheduleState {
    /// No analysis is running.
    Idle = 0,
    /// An analysis is running and nothing is queued behind it.
    Analyzing = 1,
    /// An analysis is running and another one will start when it finishes.
    AnalyzingWithPending = 2,
}

impl ScheduleState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => ScheduleState::Analyzing,
            2 => ScheduleState::AnalyzingWithPending,
            _ => ScheduleState::Idle,
        }
    }
}

/// What a call to [`Schedule::request`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The schedule was idle. The caller must start an analysis.
    Start,
    /// An analysis was running. Another one will follow it.
    Queued,
    /// An analysis was running with another one queued. Nothing changed.
    Coalesced,
}

/// Coalesces analysis requests so that at most one analysis runs and at
/// most one is pending at any time.
///
/// Requests come from the thread appending audio, completions from the
/// analysis thread. The state lives in a single atomic, so neither side
/// takes a lock.
#[derive(Debug)]
pub struct Schedule {
    state: AtomicU8,
}

impl Default for Schedule {
    fn default() -> Self {
        Schedule::new()
    }
}

impl Schedule {
    pub fn new() -> Self {
        Schedule {
            state: AtomicU8::new(ScheduleState::Idle as u8),
        }
    }

    pub fn state(&self) -> ScheduleState {
        ScheduleState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Requests an analysis.
    pub fn request(&self) -> Trigger {
        let mut current = self.state.load(Ordering::Acquire);
        loop {
            let (next, trigger) = match ScheduleState::from_u8(current) {
                ScheduleState::Idle => (ScheduleState::Analyzing, Trigger::Start),
                ScheduleState::Analyzing => (ScheduleState::AnalyzingWithPending, Trigger::Queued),
                ScheduleState::AnalyzingWithPending => return Trigger::Coalesced,
            };
            match self.state.compare_exchange_weak(
                current,
                next as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return trigger,
                Err(actual) => current = actual,
            }
        }
    }

    /// Marks the running analysis as finished. Returns true if a pending
    /// analysis must start right away, in which case the schedule stays
    /// in [`ScheduleState::Analyzing`].
    pub fn finish(&self) -> bool {
        let mut current = self.state.load(Ordering::Acquire);
        loop {
            let (next, run_pending) = match ScheduleState::from_u8(current) {
                ScheduleState::AnalyzingWithPending => (ScheduleState::Analyzing, true),
                ScheduleState::Analyzing | ScheduleState::Idle => (ScheduleState::Idle, false),
            };
            match self.state.compare_exchange_weak(
                current,
                next as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return run_pending,
                Err(actual) => current = actual,
            }
        }
    }
}
