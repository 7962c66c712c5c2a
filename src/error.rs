//! Error types for loading property files and driving the reload scheduler.
//!
//! Typed accessors never return errors: a missing or malformed value resolves
//! to the caller's default. Errors only exist at the edges, where a file is
//! read or the scheduler is misused.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure to produce a [`PropertyMapping`](crate::props::PropertyMapping)
/// from a source file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The source file does not exist.
    #[error("cannot find configuration file: {}", path.display())]
    NotFound { path: PathBuf },

    /// The file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but its content is not a valid property file.
    #[error("{}:{line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// A custom loader failed for its own reasons.
    #[error("{0}")]
    Source(String),
}

impl LoadError {
    pub fn not_found(path: &Path) -> Self {
        Self::NotFound {
            path: path.to_path_buf(),
        }
    }

    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn parse(path: &Path, err: ParseError) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            line: err.line,
            message: err.message,
        }
    }

    /// Returns true if the file simply does not exist (yet).
    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::NotFound { .. })
    }
}

/// Grammar error inside property file text, before a path is attached.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct ParseError {
    /// 1-based line where the offending logical line starts.
    pub line: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Errors surfaced by [`ReloadScheduler`](crate::reload::ReloadScheduler)
/// operations.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The scheduler was shut down; it cannot be restarted.
    #[error("reload scheduler has been stopped")]
    Stopped,

    /// A reload was requested before any source path was set.
    #[error("no property source configured")]
    NoSource,

    /// Arming the timer requires a tokio runtime on the calling thread.
    #[error("no tokio runtime available to run the reload timer")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),

    /// The loader failed; the previous mapping is still installed.
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Result type for scheduler operations.
pub type SchedulerResult<T> = std::result::Result<T, SchedulerError>;
