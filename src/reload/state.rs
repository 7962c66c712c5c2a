//! Scheduler lifecycle state.

use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle of a [`ReloadScheduler`](super::ReloadScheduler).
///
/// `Idle → Scheduled → Firing → Scheduled …`, with `Stopped` terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerState {
    /// No source set, no timer armed.
    Idle,
    /// Timer armed, waiting for the next fire.
    Scheduled,
    /// A reload is running.
    Firing,
    /// Shut down; cannot be restarted.
    Stopped,
}

impl SchedulerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchedulerState::Idle => "idle",
            SchedulerState::Scheduled => "scheduled",
            SchedulerState::Firing => "firing",
            SchedulerState::Stopped => "stopped",
        }
    }
}

impl fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn state_to_u8(state: SchedulerState) -> u8 {
    match state {
        SchedulerState::Idle => 0,
        SchedulerState::Scheduled => 1,
        SchedulerState::Firing => 2,
        SchedulerState::Stopped => 3,
    }
}

fn u8_to_state(val: u8) -> SchedulerState {
    match val {
        0 => SchedulerState::Idle,
        1 => SchedulerState::Scheduled,
        2 => SchedulerState::Firing,
        _ => SchedulerState::Stopped,
    }
}

/// Atomic holder for a [`SchedulerState`].
#[derive(Debug)]
pub(crate) struct StateCell(AtomicU8);

impl StateCell {
    pub(crate) fn new(state: SchedulerState) -> Self {
        Self(AtomicU8::new(state_to_u8(state)))
    }

    pub(crate) fn get(&self) -> SchedulerState {
        u8_to_state(self.0.load(Ordering::Acquire))
    }

    /// Move `from → to`; false if the current state was not `from`.
    pub(crate) fn transition(&self, from: SchedulerState, to: SchedulerState) -> bool {
        self.0
            .compare_exchange(
                state_to_u8(from),
                state_to_u8(to),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Enter `Stopped`, returning the state it replaced.
    pub(crate) fn stop(&self) -> SchedulerState {
        u8_to_state(self.0.swap(state_to_u8(SchedulerState::Stopped), Ordering::AcqRel))
    }
}
