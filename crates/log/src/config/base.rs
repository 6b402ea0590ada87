//! Core configuration types

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{ConsoleTarget, LevelSpec};
use crate::core::VlogResult;
use crate::facility::Facility;
use crate::level::Severity;

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Module names in declaration order
    pub modules: Vec<String>,

    /// Threshold every module starts with, per facility
    pub default_levels: FacilityLevels,

    /// Threshold overrides, applied in order after the defaults
    pub levels: Vec<LevelSpec>,

    /// Stream used by the console facility
    pub console: ConsoleTarget,

    /// Log file opened at build time
    pub log_file: Option<PathBuf>,

    /// Log file size limit in bytes (0 = unbounded)
    pub max_file_size: u64,

    /// Identity prefixed to syslog messages
    pub syslog_ident: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            modules: Vec::new(),
            default_levels: FacilityLevels::default(),
            levels: Vec::new(),
            console: ConsoleTarget::Stderr,
            log_file: None,
            max_file_size: 0,
            syslog_ident: "vlog".to_string(),
        }
    }
}

impl Config {
    /// Parse a JSON document; missing fields take their defaults
    ///
    /// ```rust
    /// use vlog::{Config, Severity};
    ///
    /// let config = Config::from_json(r#"{
    ///     "modules": ["netdev", "bridge"],
    ///     "default_levels": { "console": "warn" },
    ///     "levels": ["netdev:file:dbg"],
    ///     "max_file_size": 1048576
    /// }"#).unwrap();
    ///
    /// assert_eq!(config.default_levels.console, Severity::Warn);
    /// assert_eq!(config.default_levels.file, Severity::Info);
    /// assert_eq!(config.levels[0].to_string(), "netdev:file:dbg");
    /// ```
    pub fn from_json(json: &str) -> VlogResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> VlogResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Add modules to the declaration list
    #[must_use]
    pub fn with_modules<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modules.extend(names.into_iter().map(Into::into));
        self
    }
}

/// One threshold per facility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacilityLevels {
    /// Console threshold
    pub console: Severity,
    /// Syslog threshold
    pub syslog: Severity,
    /// File threshold
    pub file: Severity,
}

impl Default for FacilityLevels {
    fn default() -> Self {
        Self {
            console: Severity::Info,
            syslog: Severity::Off,
            file: Severity::Info,
        }
    }
}

impl FacilityLevels {
    /// Same threshold on every facility
    pub const fn uniform(level: Severity) -> Self {
        Self {
            console: level,
            syslog: level,
            file: level,
        }
    }

    /// Threshold of one facility
    pub const fn get(&self, facility: Facility) -> Severity {
        match facility {
            Facility::Console => self.console,
            Facility::Syslog => self.syslog,
            Facility::File => self.file,
        }
    }

    /// Thresholds indexed by [`Facility::index`]
    pub const fn as_array(&self) -> [Severity; Facility::COUNT] {
        [self.console, self.syslog, self.file]
    }
}
