//! Typed, hot-reloadable property store.
//!
//! A flat `.properties` file is loaded into a [`store::TypedStore`] and read
//! back through typed accessors. A [`reload::ReloadScheduler`] re-reads the
//! file on a timer whose period is itself one of the loaded values.

pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod props;
pub mod reload;
pub mod store;
