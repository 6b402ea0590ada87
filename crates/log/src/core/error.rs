//! Error handling for vlog
//!
//! Only configuration entry points return errors. The logging calls themselves
//! (`Vlog::log`, `Vlog::log_rate_limited`) never fail observably.

use std::io;
use std::path::PathBuf;

/// Result alias for configuration operations
pub type VlogResult<T> = Result<T, VlogError>;

/// Errors reported to whoever configures the logging subsystem
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum VlogError {
    /// The log file could not be opened; the file facility stays inert
    #[error("Failed to open log file '{}': {source}", .path.display())]
    OpenLogFile {
        /// Path that was requested (still recorded by the file sink)
        path: PathBuf,
        /// Underlying OS error
        #[source]
        source: io::Error,
    },

    /// Any other I/O failure on a configuration path
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Severity name did not match any level
    #[error("Unknown log level '{0}'")]
    UnknownLevel(String),

    /// Facility name did not match any facility
    #[error("Unknown log facility '{0}'")]
    UnknownFacility(String),

    /// Module name is not part of the registry
    #[error("Unknown log module '{0}'")]
    UnknownModule(String),

    /// A `module:facility:level` string could not be parsed
    #[error("Invalid level spec '{spec}': {reason}")]
    InvalidLevelSpec {
        /// The offending spec string
        spec: String,
        /// What was wrong with it
        reason: String,
    },

    /// Two modules share a (case-insensitive) name
    #[error("Duplicate log module '{0}'")]
    DuplicateModule(String),

    /// A module was declared with an empty name
    #[error("Log module names must not be empty")]
    EmptyModuleName,

    /// Configuration value out of range or inconsistent
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON configuration could not be parsed
    #[error("Invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// The process-wide default instance was already installed
    #[error("The global vlog instance is already initialized")]
    AlreadyInitialized,
}

impl VlogError {
    /// OS error code behind this error, if any
    ///
    /// Mirrors the errno-style status a C configurator would receive from
    /// `set_log_file`.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            Self::OpenLogFile { source, .. } | Self::Io(source) => source.raw_os_error(),
            _ => None,
        }
    }

    /// Whether the error came from the caller's configuration input
    pub fn is_config_error(&self) -> bool {
        !matches!(self, Self::OpenLogFile { .. } | Self::Io(_))
    }
}
