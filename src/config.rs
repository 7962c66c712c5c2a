//! Scheduler tuning and binary settings.
//!
//! Settings are layered: built-in defaults, then `HOTPROPS_*` environment
//! variables, then command line flags.

use crate::props::{DEFAULT_CONFIG_PATH, ResolutionContext, resolve_file_path};
use std::path::PathBuf;
use std::time::Duration;

/// Key holding the reload cadence in milliseconds.
pub const DEFAULT_CADENCE_KEY: &str = "readerRefreshIntertime";

/// Default property file name for the binary.
pub const DEFAULT_FILE_NAME: &str = "hotprops.properties";

pub const ENV_CONFIG_PATH: &str = "HOTPROPS_CONFIG_PATH";
pub const ENV_CONFIG_FILE: &str = "HOTPROPS_CONFIG_FILE";

fn default_cadence() -> Duration {
    Duration::from_millis(60_000)
}

fn default_shutdown_grace() -> Duration {
    Duration::from_secs(4)
}

/// Tuning for [`ReloadScheduler`](crate::reload::ReloadScheduler).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Property read after every install to derive the next cadence.
    pub cadence_key: String,
    /// Cadence used when the key is absent, malformed or not positive.
    pub default_cadence: Duration,
    /// How long `shutdown` waits for the timer task before abandoning it.
    pub shutdown_grace: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            cadence_key: DEFAULT_CADENCE_KEY.to_string(),
            default_cadence: default_cadence(),
            shutdown_grace: default_shutdown_grace(),
        }
    }
}

impl SchedulerConfig {
    pub fn with_cadence_key(mut self, key: impl Into<String>) -> Self {
        self.cadence_key = key.into();
        self
    }

    pub fn with_default_cadence(mut self, cadence: Duration) -> Self {
        self.default_cadence = cadence;
        self
    }

    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }
}

/// Where the binary looks for its property file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory template, may contain `${name}` placeholders.
    pub config_path: String,
    pub file_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config_path: DEFAULT_CONFIG_PATH.to_string(),
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }
}

impl Settings {
    /// Defaults with process environment overrides applied.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        settings.apply_env_overrides(|name| std::env::var(name).ok());
        settings
    }

    /// Apply `HOTPROPS_CONFIG_PATH` and `HOTPROPS_CONFIG_FILE` via `lookup`.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup(ENV_CONFIG_PATH) {
            self.config_path = path;
        }

        if let Some(file) = lookup(ENV_CONFIG_FILE) {
            self.file_name = file;
        }
    }

    /// Apply command line values, which win over everything else.
    pub fn with_overrides(mut self, config_path: Option<String>, file_name: Option<String>) -> Self {
        if let Some(path) = config_path {
            self.config_path = path;
        }
        if let Some(file) = file_name {
            self.file_name = file;
        }
        self
    }

    /// Resolve the property file location against `ctx`.
    pub fn resolve(&self, ctx: &ResolutionContext) -> PathBuf {
        resolve_file_path(&self.config_path, &self.file_name, ctx)
    }
}
