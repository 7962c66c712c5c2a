//! Reload results and scheduler status reporting.

use super::SchedulerState;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// What caused a reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReloadTrigger {
    /// `set_source` loading its new path.
    Source,
    /// The recurring timer.
    Timer,
    /// An explicit `reload_now`.
    Manual,
}

/// Result of one successful reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReloadOutcome {
    pub trigger: ReloadTrigger,
    /// Entries in the installed mapping.
    pub entries: usize,
    /// Cadence read from the installed mapping.
    #[serde(rename = "cadence_ms", serialize_with = "as_millis")]
    pub cadence: Duration,
    /// True if the timer has to be re-armed at the new cadence.
    pub cadence_changed: bool,
}

/// Point-in-time view of a scheduler.
#[derive(Debug, Clone, Serialize)]
pub struct ReloadStatus {
    pub state: SchedulerState,
    pub source: Option<PathBuf>,
    #[serde(rename = "cadence_ms", serialize_with = "as_millis")]
    pub cadence: Duration,
    /// Entries in the currently installed mapping.
    pub entries: usize,
    pub successful_reloads: u64,
    pub failed_reloads: u64,
    pub last_success: Option<DateTime<Utc>>,
    pub last_failure: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub next_fire: Option<DateTime<Utc>>,
}

fn as_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

/// Counters kept by the scheduler between status calls.
#[derive(Debug, Default)]
pub(crate) struct ReloadStats {
    pub(crate) successes: u64,
    pub(crate) failures: u64,
    pub(crate) last_success: Option<DateTime<Utc>>,
    pub(crate) last_failure: Option<DateTime<Utc>>,
    pub(crate) last_error: Option<String>,
    pub(crate) next_fire: Option<DateTime<Utc>>,
}

impl ReloadStats {
    pub(crate) fn record_success(&mut self) {
        self.successes += 1;
        self.last_success = Some(Utc::now());
    }

    pub(crate) fn record_failure(&mut self, error: impl ToString) {
        self.failures += 1;
        self.last_failure = Some(Utc::now());
        self.last_error = Some(error.to_string());
    }

    /// Wall-clock estimate of the next timer fire, `period` from now.
    ///
    /// `None` when the fire lies beyond what `DateTime<Utc>` can hold.
    pub(crate) fn schedule_next(&mut self, period: Duration) {
        self.next_fire = chrono::Duration::from_std(period)
            .ok()
            .and_then(|delta| Utc::now().checked_add_signed(delta));
    }
}
