//! Context builder
//!
//! Turns a [`Config`] plus optional overrides (sinks, lock, clock) into a
//! ready [`Vlog`]. Sinks are registered in a fixed order: console, syslog,
//! file, then extra sinks in the order they were added.

use std::path::PathBuf;
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::config::{Config, ConsoleTarget, LevelSpec};
use crate::core::VlogResult;
use crate::facility::Facility;
use crate::level::Severity;
use crate::lock::{EmitLock, FnLock, MutexLock};
use crate::logger::{Destinations, Vlog};
use crate::matrix::GatingMatrix;
use crate::module::ModuleRegistry;
use crate::sink::{ConsoleSink, Destination, FileSink, Sink, SyslogSink};

/// Builder for [`Vlog`]
pub struct VlogBuilder {
    config: Config,
    console_sink: Option<Arc<dyn Sink>>,
    syslog_sink: Option<Arc<dyn Sink>>,
    extra_sinks: Vec<Destination>,
    lock: Option<Box<dyn EmitLock>>,
    clock: Option<Arc<dyn Clock>>,
}

impl VlogBuilder {
    /// Builder with the default configuration
    pub fn new() -> Self {
        Self::from_config(Config::default())
    }

    /// Create builder from config
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        Self {
            config,
            console_sink: None,
            syslog_sink: None,
            extra_sinks: Vec::new(),
            lock: None,
            clock: None,
        }
    }

    /// Declare modules, appended to any already configured
    #[must_use]
    pub fn modules<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config = self.config.with_modules(names);
        self
    }

    /// Starting threshold of one facility for every module
    #[must_use]
    pub fn default_level(mut self, facility: Facility, level: Severity) -> Self {
        let levels = &mut self.config.default_levels;
        match facility {
            Facility::Console => levels.console = level,
            Facility::Syslog => levels.syslog = level,
            Facility::File => levels.file = level,
        }
        self
    }

    /// Threshold override applied after the defaults
    #[must_use]
    pub fn level(mut self, spec: LevelSpec) -> Self {
        self.config.levels.push(spec);
        self
    }

    /// Open `path` as the log file at build time
    #[must_use]
    pub fn log_file(mut self, path: impl Into<PathBuf>, max_size: u64) -> Self {
        self.config.log_file = Some(path.into());
        self.config.max_file_size = max_size;
        self
    }

    /// Stream used by the default console sink
    #[must_use]
    pub fn console(mut self, target: ConsoleTarget) -> Self {
        self.config.console = target;
        self
    }

    /// Replace the default console sink
    #[must_use]
    pub fn console_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.console_sink = Some(sink);
        self
    }

    /// Replace the default syslog sink
    #[must_use]
    pub fn syslog_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.syslog_sink = Some(sink);
        self
    }

    /// Register an extra sink on `facility`
    #[must_use]
    pub fn sink(mut self, facility: Facility, sink: Arc<dyn Sink>) -> Self {
        self.extra_sinks.push(Destination::new(facility, sink));
        self
    }

    /// Serialize emission with a custom lock
    #[must_use]
    pub fn lock(mut self, lock: impl EmitLock) -> Self {
        self.lock = Some(Box::new(lock));
        self
    }

    /// Serialize emission with a lock/unlock callback (`true` = lock)
    #[must_use]
    pub fn lock_fn<F>(self, callback: F) -> Self
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.lock(FnLock::new(callback))
    }

    /// Timestamp source (defaults to the local wall clock)
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Configuration this builder will apply
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build the context
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - A module name is empty or declared twice
    /// - A level spec names an unknown module
    /// - The configured log file cannot be opened
    pub fn build(self) -> VlogResult<Vlog> {
        let Self {
            config,
            console_sink,
            syslog_sink,
            extra_sinks,
            lock,
            clock,
        } = self;

        let modules = ModuleRegistry::new(&config.modules)?;
        let matrix = GatingMatrix::new(modules.len(), config.default_levels.as_array());
        let file = Arc::new(FileSink::new());

        let console: Arc<dyn Sink> = match console_sink {
            Some(sink) => sink,
            None => Arc::new(ConsoleSink::new(config.console)),
        };
        let syslog: Arc<dyn Sink> = match syslog_sink {
            Some(sink) => sink,
            None => Arc::new(SyslogSink::new(config.syslog_ident.clone())),
        };
        let lock: Box<dyn EmitLock> = match lock {
            Some(lock) => lock,
            None => Box::new(MutexLock::new()),
        };
        let clock: Arc<dyn Clock> = match clock {
            Some(clock) => clock,
            None => Arc::new(SystemClock::new()),
        };

        let mut sinks = Destinations::new();
        sinks.push(Destination::new(Facility::Console, console));
        sinks.push(Destination::new(Facility::Syslog, syslog));
        sinks.push(Destination::new(Facility::File, file.clone()));
        sinks.extend(extra_sinks);

        let vlog = Vlog::from_parts(modules, matrix, sinks, file, lock, clock);

        for spec in &config.levels {
            vlog.apply_level_spec(spec)?;
        }
        if let Some(path) = &config.log_file {
            vlog.set_log_file(path, config.max_file_size)?;
        }

        Ok(vlog)
    }
}

impl Default for VlogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for VlogBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VlogBuilder")
            .field("config", &self.config)
            .field("extra_sinks", &self.extra_sinks.len())
            .finish_non_exhaustive()
    }
}
