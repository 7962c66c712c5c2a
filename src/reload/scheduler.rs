//! Self-adjusting reload timer.
//!
//! A single background task waits on the cadence interval and reloads the
//! source file on every tick, on the blocking pool. Each successful reload reads the cadence back
//! out of the mapping it just installed; when that value differs from the
//! armed interval the task cancels the interval and re-arms it, with the
//! first tick one full period after the change.

use super::state::StateCell;
use super::status::ReloadStats;
use super::{ReloadOutcome, ReloadStatus, ReloadTrigger, SchedulerState};
use crate::config::SchedulerConfig;
use crate::error::{SchedulerError, SchedulerResult};
use crate::props::{FileLoader, PropertyLoader};
use crate::store::TypedStore;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::{self, JoinHandle};
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at, timeout};
use tracing::{debug, error, info, warn};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// State shared between the scheduler handle and its timer task.
struct ReloadCore {
    store: Arc<TypedStore>,
    loader: Box<dyn PropertyLoader>,
    config: SchedulerConfig,
    state: StateCell,
    source: Mutex<Option<PathBuf>>,
    /// Held for the whole of a reload; fires are serialized.
    reload_lock: Mutex<()>,
    cadence_tx: watch::Sender<Duration>,
    stats: Mutex<ReloadStats>,
}

impl ReloadCore {
    fn reload(&self, trigger: ReloadTrigger) -> SchedulerResult<ReloadOutcome> {
        let _guard = lock(&self.reload_lock);

        if self.state.get() == SchedulerState::Stopped {
            return Err(SchedulerError::Stopped);
        }
        let path = lock(&self.source).clone().ok_or(SchedulerError::NoSource)?;

        let firing = self
            .state
            .transition(SchedulerState::Scheduled, SchedulerState::Firing);
        let result = self.load_and_install(&path, trigger);
        if firing {
            self.state
                .transition(SchedulerState::Firing, SchedulerState::Scheduled);
        }
        result
    }

    fn load_and_install(&self, path: &Path, trigger: ReloadTrigger) -> SchedulerResult<ReloadOutcome> {
        let mapping = match self.loader.load(path) {
            Ok(mapping) => mapping,
            Err(e) => {
                error!(
                    path = %path.display(),
                    ?trigger,
                    error = %e,
                    "Failed to reload properties, keeping previous values"
                );
                lock(&self.stats).record_failure(&e);
                return Err(e.into());
            }
        };

        let entries = mapping.len();
        self.store.install(mapping);
        lock(&self.stats).record_success();
        info!(path = %path.display(), ?trigger, entries, "Properties installed");

        let cadence = self.read_cadence();
        let cadence_changed = self.cadence_tx.send_if_modified(|current| {
            if *current == cadence {
                return false;
            }
            *current = cadence;
            true
        });
        if cadence_changed {
            info!(cadence_ms = cadence.as_millis() as u64, "Reload cadence changed");
        }

        Ok(ReloadOutcome {
            trigger,
            entries,
            cadence,
            cadence_changed,
        })
    }

    /// Cadence from the installed mapping, or the configured default.
    fn read_cadence(&self) -> Duration {
        let default_ms = i64::try_from(self.config.default_cadence.as_millis()).unwrap_or(i64::MAX);
        let ms = self.store.get(&self.config.cadence_key, default_ms);
        if ms <= 0 {
            warn!(
                key = %self.config.cadence_key,
                value = ms,
                "Reload cadence must be positive, using default"
            );
            return self.config.default_cadence;
        }
        Duration::from_millis(ms as u64)
    }

    fn schedule_next(&self, period: Duration) {
        lock(&self.stats).schedule_next(period.min(MAX_ARMED_PERIOD));
    }
}

/// Longest interval the timer is armed with. Larger cadences are reported
/// as configured but fire at this period.
const MAX_ARMED_PERIOD: Duration = Duration::from_secs(60 * 60 * 24 * 365 * 30);

fn arm(period: Duration) -> Interval {
    let period = period.min(MAX_ARMED_PERIOD);
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

async fn run_timer(
    core: Arc<ReloadCore>,
    mut cadence_rx: watch::Receiver<Duration>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut period = *cadence_rx.borrow_and_update();
    let mut ticker = arm(period);
    core.schedule_next(period);
    debug!(cadence_ms = period.as_millis() as u64, "Reload timer armed");

    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        tokio::select! {
            biased;

            changed = shutdown_rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }

            changed = cadence_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let next = *cadence_rx.borrow_and_update();
                if next != period {
                    period = next;
                    ticker = arm(period);
                    core.schedule_next(period);
                    debug!(cadence_ms = period.as_millis() as u64, "Reload timer re-armed");
                }
            }

            _ = ticker.tick() => {
                // The loader does blocking file I/O. Failures are logged and
                // counted inside reload.
                let firing = Arc::clone(&core);
                let reload = task::spawn_blocking(move || firing.reload(ReloadTrigger::Timer));
                if let Err(e) = reload.await {
                    error!(error = %e, "Timer reload task failed");
                }
                core.schedule_next(period);
            }
        }
    }

    lock(&core.stats).next_fire = None;
    debug!("Reload timer stopped");
}

/// Keeps a [`TypedStore`] in sync with a property file.
///
/// ```no_run
/// use hotprops::reload::ReloadScheduler;
/// use hotprops::store::TypedStore;
/// use std::sync::Arc;
///
/// # async fn run() -> hotprops::error::SchedulerResult<()> {
/// let store = Arc::new(TypedStore::new());
/// let scheduler = ReloadScheduler::new(Arc::clone(&store));
/// scheduler.set_source("/etc/app/app.properties")?;
///
/// let workers = store.get("workers", 4i32);
/// # let _ = workers;
/// scheduler.shutdown().await;
/// # Ok(())
/// # }
/// ```
pub struct ReloadScheduler {
    core: Arc<ReloadCore>,
    shutdown_tx: watch::Sender<bool>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl ReloadScheduler {
    /// Scheduler reading `.properties` files with the default configuration.
    pub fn new(store: Arc<TypedStore>) -> Self {
        Self::with_loader(store, FileLoader, SchedulerConfig::default())
    }

    pub fn with_config(store: Arc<TypedStore>, config: SchedulerConfig) -> Self {
        Self::with_loader(store, FileLoader, config)
    }

    pub fn with_loader(
        store: Arc<TypedStore>,
        loader: impl PropertyLoader + 'static,
        config: SchedulerConfig,
    ) -> Self {
        let (cadence_tx, _) = watch::channel(config.default_cadence);
        let (shutdown_tx, _) = watch::channel(false);
        let core = ReloadCore {
            store,
            loader: Box::new(loader),
            config,
            state: StateCell::new(SchedulerState::Idle),
            source: Mutex::new(None),
            reload_lock: Mutex::new(()),
            cadence_tx,
            stats: Mutex::new(ReloadStats::default()),
        };
        Self {
            core: Arc::new(core),
            shutdown_tx,
            task: Mutex::new(None),
        }
    }

    pub fn store(&self) -> &Arc<TypedStore> {
        &self.core.store
    }

    pub fn state(&self) -> SchedulerState {
        self.core.state.get()
    }

    /// Interval the timer is (or will be) armed with.
    pub fn cadence(&self) -> Duration {
        *self.core.cadence_tx.borrow()
    }

    /// Receiver notified whenever a reload changes the cadence.
    pub fn subscribe_cadence(&self) -> watch::Receiver<Duration> {
        self.core.cadence_tx.subscribe()
    }

    pub fn source(&self) -> Option<PathBuf> {
        lock(&self.core.source).clone()
    }

    /// Point the scheduler at `path` and load it immediately.
    ///
    /// The first call arms the recurring timer and must run inside a tokio
    /// runtime. Later calls replace the path and reload at once; the timer
    /// keeps running. A failed load is logged and leaves the previous mapping
    /// installed (or nothing, on the first call); the timer is armed anyway
    /// and retries at the current cadence.
    pub fn set_source(&self, path: impl Into<PathBuf>) -> SchedulerResult<()> {
        if self.state() == SchedulerState::Stopped {
            return Err(SchedulerError::Stopped);
        }

        let mut task = lock(&self.task);
        let runtime = match *task {
            Some(_) => None,
            None => Some(Handle::try_current()?),
        };

        let path = path.into();
        debug!(path = %path.display(), "Property source set");
        *lock(&self.core.source) = Some(path);

        let _ = self.core.reload(ReloadTrigger::Source);

        if let Some(runtime) = runtime {
            if !self
                .core
                .state
                .transition(SchedulerState::Idle, SchedulerState::Scheduled)
            {
                return Err(SchedulerError::Stopped);
            }
            self.core.schedule_next(self.cadence());
            let core = Arc::clone(&self.core);
            let cadence_rx = self.core.cadence_tx.subscribe();
            let shutdown_rx = self.shutdown_tx.subscribe();
            *task = Some(runtime.spawn(run_timer(core, cadence_rx, shutdown_rx)));
        }
        Ok(())
    }

    /// Reload now, outside the timer. Serialized with timer fires.
    pub fn reload_now(&self) -> SchedulerResult<ReloadOutcome> {
        self.core.reload(ReloadTrigger::Manual)
    }

    pub fn status(&self) -> ReloadStatus {
        let state = self.state();
        let source = self.source();
        let stats = lock(&self.core.stats);
        ReloadStatus {
            state,
            source,
            cadence: self.cadence(),
            entries: self.core.store.len(),
            successful_reloads: stats.successes,
            failed_reloads: stats.failures,
            last_success: stats.last_success,
            last_failure: stats.last_failure,
            last_error: stats.last_error.clone(),
            next_fire: match state {
                SchedulerState::Scheduled | SchedulerState::Firing => stats.next_fire,
                SchedulerState::Idle | SchedulerState::Stopped => None,
            },
        }
    }

    /// Stop the timer. Idempotent.
    ///
    /// Waits up to the configured grace period for the timer task to exit,
    /// then abandons it. A reload already installing runs to completion.
    pub async fn shutdown(&self) {
        if self.core.state.stop() == SchedulerState::Stopped {
            return;
        }
        self.shutdown_tx.send_replace(true);

        let task = lock(&self.task).take();
        if let Some(mut task) = task {
            let grace = self.core.config.shutdown_grace;
            match timeout(grace, &mut task).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(error = %e, "Reload timer task ended abnormally"),
                Err(_) => {
                    warn!(
                        grace_ms = grace.as_millis() as u64,
                        "Reload timer did not stop within grace period, abandoning it"
                    );
                    task.abort();
                }
            }
        }
        info!("Reload scheduler stopped");
    }
}

impl Drop for ReloadScheduler {
    fn drop(&mut self) {
        self.shutdown_tx.send_replace(true);
    }
}

impl std::fmt::Debug for ReloadScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReloadScheduler")
            .field("state", &self.state())
            .field("source", &self.source())
            .field("cadence", &self.cadence())
            .finish()
    }
}
