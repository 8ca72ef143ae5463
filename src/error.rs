//! Error types shared across the crate.

use std::path::PathBuf;
use thiserror::Error;

/// Startup-fatal problems with the configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file {0} does not exist")]
    NotFound(PathBuf),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Startup-fatal problems with the catalog file.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog file {0} does not exist")]
    NotFound(PathBuf),
    #[error("failed to read catalog file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Faults raised by an input driver.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("input connection failed: {0}")]
    Connection(String),
    #[error("input failed: {0}")]
    Input(String),
    #[error("clipboard failed: {0}")]
    Clipboard(String),
    #[error("unknown key '{0}'")]
    UnknownKey(String),
    #[error("window lookup failed: {0}")]
    Window(String),
    /// The operator parked the pointer in a screen corner to abort.
    #[error("fail-safe triggered: pointer in a screen corner")]
    FailSafe,
}

pub type DriverResult<T> = Result<T, DriverError>;

/// Why a step or an item did not complete.
///
/// `Interrupted` is kept apart from ordinary failures so a batch can stop
/// instead of moving on to the next item.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepError {
    #[error("interrupted")]
    Interrupted,
    #[error("{0}")]
    Failed(String),
}

impl StepError {
    pub fn failed(message: impl Into<String>) -> Self {
        StepError::Failed(message.into())
    }

    pub fn is_interrupted(&self) -> bool {
        matches!(self, StepError::Interrupted)
    }
}
