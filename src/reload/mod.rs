//! Timer-driven reloading of the property store.
//!
//! [`ReloadScheduler`] owns the reload cadence. It loads the source through a
//! [`PropertyLoader`](crate::props::PropertyLoader), installs the result into
//! a [`TypedStore`](crate::store::TypedStore), then reads the next cadence
//! from the mapping it just installed.

mod scheduler;
mod state;
mod status;

pub use scheduler::ReloadScheduler;
pub use state::SchedulerState;
pub use status::{ReloadOutcome, ReloadStatus, ReloadTrigger};
