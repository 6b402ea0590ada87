//! Configuration presets for common scenarios

use std::path::PathBuf;

use super::{Config, ConsoleTarget, FacilityLevels, LevelSpec};
use crate::level::Severity;

/// Comma-separated level specs applied after the defaults
pub const ENV_LEVELS: &str = "VLOG_LEVELS";
/// Log file opened at build time
pub const ENV_FILE: &str = "VLOG_FILE";
/// Log file size limit in bytes
pub const ENV_FILE_MAX_SIZE: &str = "VLOG_FILE_MAX_SIZE";
/// `stderr` or `stdout`
pub const ENV_CONSOLE: &str = "VLOG_CONSOLE";

const PRODUCTION_MAX_FILE_SIZE: u64 = 64 * 1024 * 1024;

impl Config {
    /// Create configuration from environment variables
    ///
    /// Unparseable values are skipped with a warning and the rest of the
    /// configuration still applies.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with a custom variable source
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(levels) = lookup(ENV_LEVELS) {
            for item in levels.split(',').map(str::trim).filter(|item| !item.is_empty()) {
                match item.parse::<LevelSpec>() {
                    Ok(spec) => config.levels.push(spec),
                    Err(error) => tracing::warn!(var = ENV_LEVELS, %error, "skipping level spec"),
                }
            }
        }

        if let Some(path) = lookup(ENV_FILE).filter(|path| !path.is_empty()) {
            config.log_file = Some(PathBuf::from(path));
        }

        if let Some(size) = lookup(ENV_FILE_MAX_SIZE) {
            match size.trim().parse::<u64>() {
                Ok(size) => config.max_file_size = size,
                Err(error) => tracing::warn!(var = ENV_FILE_MAX_SIZE, value = %size, %error, "ignoring file size limit"),
            }
        }

        if let Some(console) = lookup(ENV_CONSOLE) {
            match console.parse::<ConsoleTarget>() {
                Ok(target) => config.console = target,
                Err(error) => tracing::warn!(var = ENV_CONSOLE, %error, "ignoring console target"),
            }
        }

        config
    }

    /// Development configuration (everything on the console)
    #[must_use]
    pub fn development() -> Self {
        Self {
            default_levels: FacilityLevels {
                console: Severity::Dbg,
                ..FacilityLevels::default()
            },
            ..Self::default()
        }
    }

    /// Production configuration (quiet console, bounded file)
    #[must_use]
    pub fn production() -> Self {
        Self {
            default_levels: FacilityLevels {
                console: Severity::Warn,
                syslog: Severity::Off,
                file: Severity::Info,
            },
            max_file_size: PRODUCTION_MAX_FILE_SIZE,
            ..Self::default()
        }
    }

    /// Test configuration (console only, everything through)
    #[cfg(test)]
    pub fn test() -> Self {
        Self {
            default_levels: FacilityLevels {
                console: Severity::Dbg,
                syslog: Severity::Off,
                file: Severity::Dbg,
            },
            ..Self::default()
        }
    }
}
