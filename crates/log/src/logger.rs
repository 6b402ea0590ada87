//! The logging context
//!
//! A [`Vlog`] owns the module registry, the gating matrix, the ordered sink
//! collection and the log file. Call sites go through [`Vlog::is_enabled`]
//! first (one atomic load, no lock) and only then build their arguments.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use smallvec::SmallVec;
use time::OffsetDateTime;

use crate::builder::VlogBuilder;
use crate::clock::{Clock, unix_secs};
use crate::config::LevelSpec;
use crate::core::{VlogError, VlogResult};
use crate::errno::ErrnoGuard;
use crate::facility::{Facility, Selector};
use crate::format::{Record, TimeStyle, render_line};
use crate::level::Severity;
use crate::lock::EmitLock;
use crate::matrix::GatingMatrix;
use crate::module::{Module, ModuleRegistry};
use crate::rate_limit::{Admission, RateLimit, summary_message};
use crate::sink::{Destination, FileSink, Sink};

pub(crate) type Destinations = SmallVec<[Destination; 4]>;

/// Leveled, multi-destination logger
pub struct Vlog {
    modules: ModuleRegistry,
    matrix: GatingMatrix,
    sinks: ArcSwap<Destinations>,
    file: Arc<FileSink>,
    lock: Box<dyn EmitLock>,
    clock: Arc<dyn Clock>,
    config_lock: Mutex<()>,
}

impl Vlog {
    /// Start configuring a new context
    pub fn builder() -> VlogBuilder {
        VlogBuilder::new()
    }

    pub(crate) fn from_parts(
        modules: ModuleRegistry,
        matrix: GatingMatrix,
        sinks: Destinations,
        file: Arc<FileSink>,
        lock: Box<dyn EmitLock>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let vlog = Self {
            modules,
            matrix,
            sinks: ArcSwap::from_pointee(sinks),
            file,
            lock,
            clock,
            config_lock: Mutex::new(()),
        };
        vlog.recompute_all();
        vlog
    }

    // ---------------------------------------------------------------------
    // Modules
    // ---------------------------------------------------------------------

    /// Case-insensitive module lookup
    pub fn module(&self, name: &str) -> Option<Module> {
        self.modules.lookup(name)
    }

    /// Name of a registered module
    pub fn module_name(&self, module: Module) -> &str {
        self.modules.name(module)
    }

    /// The closed module set
    pub fn modules(&self) -> &ModuleRegistry {
        &self.modules
    }

    // ---------------------------------------------------------------------
    // Gating
    // ---------------------------------------------------------------------

    /// Set the threshold for every (module, facility) pair the selectors cover
    ///
    /// ```rust
    /// use vlog::{Facility, Selector, Severity, Vlog};
    ///
    /// let log = Vlog::builder().modules(["netdev", "bridge"]).build().unwrap();
    /// let netdev = log.module("netdev").unwrap();
    ///
    /// log.set_levels(Selector::Any, Selector::Any, Severity::Warn);
    /// log.set_levels(netdev, Facility::Console, Severity::Dbg);
    ///
    /// assert_eq!(log.get_level(netdev, Facility::Console), Severity::Dbg);
    /// assert!(log.is_enabled(netdev, Severity::Dbg));
    /// ```
    pub fn set_levels(
        &self,
        module: impl Into<Selector<Module>>,
        facility: impl Into<Selector<Facility>>,
        level: Severity,
    ) {
        let module = module.into();
        let facility = facility.into();
        let _config = self.config_lock.lock();

        match module {
            Selector::One(module) => self.set_module_levels(module, facility, level),
            Selector::Any => {
                for module in self.modules.iter() {
                    self.set_module_levels(module, facility, level);
                }
            }
        }
    }

    fn set_module_levels(&self, module: Module, facility: Selector<Facility>, level: Severity) {
        self.modules.check(module);
        for target in Facility::ALL {
            if facility.matches(&target) {
                self.matrix.set(module, target, level);
                self.matrix.recompute(module, |f| self.is_live(f));
            }
        }
    }

    /// Threshold of one concrete (module, facility) pair
    pub fn get_level(&self, module: Module, facility: Facility) -> Severity {
        self.modules.check(module);
        self.matrix.get(module, facility)
    }

    /// Whether a message at `level` from `module` could reach any destination
    ///
    /// `false` guarantees the message produces no output.
    #[inline(always)]
    pub fn is_enabled(&self, module: Module, level: Severity) -> bool {
        self.matrix.is_enabled(module, level)
    }

    /// Cached minimum effective level of `module`
    pub fn min_level(&self, module: Module) -> Severity {
        self.modules.check(module);
        self.matrix.min_level(module)
    }

    /// Apply a parsed `module:facility:level` spec
    ///
    /// # Errors
    ///
    /// [`VlogError::UnknownModule`] when the spec names a module outside the
    /// registry.
    pub fn apply_level_spec(&self, spec: &LevelSpec) -> VlogResult<()> {
        let module = match &spec.module {
            Selector::Any => Selector::Any,
            Selector::One(name) => Selector::One(
                self.module(name)
                    .ok_or_else(|| VlogError::UnknownModule(name.clone()))?,
            ),
        };
        self.set_levels(module, spec.facility, spec.level);
        Ok(())
    }

    fn is_live(&self, facility: Facility) -> bool {
        facility != Facility::File || self.file.is_open()
    }

    fn recompute_all(&self) {
        for module in self.modules.iter() {
            self.matrix.recompute(module, |f| self.is_live(f));
        }
    }

    // ---------------------------------------------------------------------
    // Log file
    // ---------------------------------------------------------------------

    /// Switch the file facility to `path`
    ///
    /// Any previous file is closed first. `max_size` bounds the file in bytes
    /// (0 for unbounded). The path is recorded even when opening fails; the
    /// file facility then stays inert until a later call succeeds.
    pub fn set_log_file(&self, path: impl AsRef<Path>, max_size: u64) -> VlogResult<()> {
        let _config = self.config_lock.lock();
        let result = self.file.open(path.as_ref(), max_size);
        self.recompute_all();
        result
    }

    /// Reopen the recorded log file path
    ///
    /// Used after an external tool moved the file away. Does nothing when no
    /// path was ever configured.
    pub fn reopen_log_file(&self) -> VlogResult<()> {
        let _config = self.config_lock.lock();
        let result = self.file.reopen();
        self.recompute_all();
        result
    }

    /// Close the log file; the file facility becomes inert
    pub fn close_log_file(&self) {
        let _config = self.config_lock.lock();
        self.lock.run(&mut || self.file.close());
        self.recompute_all();
    }

    /// Most recently configured log file path
    pub fn log_file_path(&self) -> Option<PathBuf> {
        self.file.path()
    }

    /// Whether the file facility currently has an open file
    pub fn is_log_file_open(&self) -> bool {
        self.file.is_open()
    }

    // ---------------------------------------------------------------------
    // Sinks
    // ---------------------------------------------------------------------

    /// Register an extra sink on `facility`, after every existing one
    pub fn add_sink(&self, facility: Facility, sink: Arc<dyn Sink>) {
        let _config = self.config_lock.lock();
        let destination = Destination::new(facility, sink);
        self.sinks.rcu(|current| {
            let mut next = Destinations::clone(current);
            next.push(destination.clone());
            next
        });
    }

    /// Flush every sink
    pub fn flush(&self) {
        let sinks = self.sinks.load();
        self.lock.run(&mut || {
            for destination in sinks.iter() {
                let _ = destination.sink.flush();
            }
        });
    }

    /// Flush every sink and close the log file
    pub fn shutdown(&self) {
        self.flush();
        self.close_log_file();
    }

    // ---------------------------------------------------------------------
    // Emission
    // ---------------------------------------------------------------------

    /// Emit one message
    ///
    /// Never fails observably; sink errors are swallowed and errno is left as
    /// the caller had it.
    ///
    /// Panics when `level` is [`Severity::Off`].
    pub fn log(&self, module: Module, level: Severity, file: &str, line: u32, args: fmt::Arguments<'_>) {
        assert_ne!(level, Severity::Off, "cannot log a message at level OFF");
        if !self.is_enabled(module, level) {
            return;
        }

        let _errno = ErrnoGuard::save();
        let now = self.clock.now();
        self.lock.run(&mut || self.emit(module, level, file, line, args, now));
    }

    /// Emit one message subject to the call site's rate limit
    ///
    /// When the message ends a run of suppressed ones, a summary line follows
    /// it at the same module and level.
    pub fn log_rate_limited(
        &self,
        module: Module,
        level: Severity,
        file: &str,
        line: u32,
        limit: &RateLimit,
        args: fmt::Arguments<'_>,
    ) {
        assert_ne!(level, Severity::Off, "cannot log a message at level OFF");
        if !self.is_enabled(module, level) {
            return;
        }

        let _errno = ErrnoGuard::save();
        let now = self.clock.now();
        self.lock.run(&mut || match limit.withdraw(unix_secs(now)) {
            Admission::Suppressed => {}
            Admission::Allowed { dropped } => {
                self.emit(module, level, file, line, args, now);
                if let Some(summary) = dropped {
                    let text = summary_message(summary);
                    self.emit(module, level, file, line, format_args!("{text}"), now);
                }
            }
        });
    }

    fn emit(
        &self,
        module: Module,
        level: Severity,
        file: &str,
        line: u32,
        args: fmt::Arguments<'_>,
        timestamp: OffsetDateTime,
    ) {
        let qualifies = Facility::ALL.map(|facility| {
            level.passes(self.matrix.get(module, facility))
                && (facility != Facility::File || self.file.is_open())
        });
        if !qualifies.contains(&true) {
            return;
        }

        let record = Record {
            timestamp,
            level,
            module: self.modules.name(module),
            file,
            line,
            args,
        };
        let mut rendered: [Option<String>; Facility::COUNT] = Default::default();

        let sinks = self.sinks.load();
        for destination in sinks.iter() {
            let index = destination.facility.index();
            if !qualifies[index] {
                continue;
            }
            let text = rendered[index]
                .get_or_insert_with(|| render_line(TimeStyle::for_facility(destination.facility), &record));
            let _ = destination.sink.write_line(level, text);
        }
    }
}

impl fmt::Debug for Vlog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vlog")
            .field("modules", &self.modules)
            .field("sinks", &self.sinks.load().len())
            .field("file", &self.file)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::clock::ManualClock;
    use crate::sink::CaptureSink;

    struct Fixture {
        log: Vlog,
        console: Arc<CaptureSink>,
        syslog: Arc<CaptureSink>,
        clock: Arc<ManualClock>,
    }

    fn fixture() -> Fixture {
        let console = Arc::new(CaptureSink::new());
        let syslog = Arc::new(CaptureSink::new());
        // 2024-01-01 14:03:07 UTC
        let clock = Arc::new(ManualClock::at_unix(1_704_117_787));
        let log = Vlog::builder()
            .modules(["netdev", "bridge"])
            .console_sink(console.clone())
            .syslog_sink(syslog.clone())
            .clock(clock.clone())
            .build()
            .unwrap();
        Fixture {
            log,
            console,
            syslog,
            clock,
        }
    }

    #[test]
    fn test_default_levels() {
        let Fixture { log, .. } = fixture();
        let netdev = log.module("netdev").unwrap();
        assert_eq!(log.get_level(netdev, Facility::Console), Severity::Info);
        assert_eq!(log.get_level(netdev, Facility::Syslog), Severity::Off);
        assert_eq!(log.get_level(netdev, Facility::File), Severity::Info);
        assert_eq!(log.min_level(netdev), Severity::Info);
    }

    #[test]
    fn test_set_levels_fans_out() {
        let Fixture { log, .. } = fixture();
        log.set_levels(Selector::Any, Selector::Any, Severity::Err);
        for module in log.modules().iter() {
            for facility in Facility::ALL {
                assert_eq!(log.get_level(module, facility), Severity::Err);
            }
        }

        let bridge = log.module("bridge").unwrap();
        log.set_levels(Selector::Any, Facility::Syslog, Severity::Dbg);
        assert_eq!(log.get_level(bridge, Facility::Syslog), Severity::Dbg);
        assert_eq!(log.get_level(bridge, Facility::Console), Severity::Err);
        assert!(log.is_enabled(bridge, Severity::Dbg));
    }

    #[test]
    fn test_file_threshold_needs_open_file() {
        let Fixture { log, .. } = fixture();
        let netdev = log.module("netdev").unwrap();
        log.set_levels(netdev, Facility::File, Severity::Dbg);
        assert!(!log.is_enabled(netdev, Severity::Dbg));

        let dir = tempfile::tempdir().unwrap();
        log.set_log_file(dir.path().join("vlog.log"), 0).unwrap();
        assert!(log.is_enabled(netdev, Severity::Dbg));

        log.close_log_file();
        assert!(!log.is_enabled(netdev, Severity::Dbg));
    }

    #[test]
    fn test_console_and_file_timestamps() {
        let Fixture { log, console, .. } = fixture();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vlog.log");
        log.set_log_file(&path, 0).unwrap();

        let netdev = log.module("netdev").unwrap();
        log.log(netdev, Severity::Dbg, "eth.c", 7, format_args!("hidden"));
        log.log(netdev, Severity::Info, "eth.c", 42, format_args!("link {}", "up"));

        assert_eq!(console.contents(), "14:03:07 INFO  netdev eth.c:42: link up\n");
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "2024-01-01 14:03:07 INFO  netdev eth.c:42: link up\n"
        );
    }

    #[test]
    fn test_syslog_gets_untimestamped_line() {
        let Fixture { log, syslog, .. } = fixture();
        let bridge = log.module("bridge").unwrap();
        log.set_levels(bridge, Facility::Syslog, Severity::Warn);
        log.log(bridge, Severity::Err, "br.c", 3, format_args!("loop"));
        assert_eq!(syslog.contents(), "ERR   bridge br.c:3: loop\n");
    }

    #[test]
    fn test_rate_limited_summary_follows_message() {
        let Fixture {
            log,
            console,
            clock,
            ..
        } = fixture();
        let netdev = log.module("netdev").unwrap();
        let limit = RateLimit::new(60, 1);

        for i in 0..4 {
            log.log_rate_limited(netdev, Severity::Warn, "eth.c", 1, &limit, format_args!("storm {i}"));
        }
        assert_eq!(console.len(), 1);

        clock.advance(Duration::from_secs(2));
        log.log_rate_limited(netdev, Severity::Warn, "eth.c", 1, &limit, format_args!("calm"));

        let lines = console.lines();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].line.ends_with("eth.c:1: calm\n"));
        assert!(
            lines[2]
                .line
                .ends_with("eth.c:1: Dropped 3 messages in last 2 seconds due to excessive rate\n")
        );
    }

    #[test]
    fn test_disabled_call_skips_rate_limiter() {
        let Fixture { log, .. } = fixture();
        let netdev = log.module("netdev").unwrap();
        let limit = RateLimit::new(60, 1);
        for _ in 0..5 {
            log.log_rate_limited(netdev, Severity::Dbg, "eth.c", 1, &limit, format_args!("quiet"));
        }
        assert_eq!(limit.dropped(), 0);
        assert_eq!(limit.snapshot().tokens(), 0);
    }

    #[test]
    fn test_added_sinks_receive_in_order() {
        let Fixture { log, console, .. } = fixture();
        let extra = Arc::new(CaptureSink::new());
        log.add_sink(Facility::Console, extra.clone());

        let netdev = log.module("netdev").unwrap();
        log.log(netdev, Severity::Warn, "a.rs", 1, format_args!("twice"));
        assert_eq!(console.contents(), extra.contents());
        assert_eq!(extra.len(), 1);
    }

    #[test]
    fn test_apply_level_spec() {
        let Fixture { log, .. } = fixture();
        let spec: LevelSpec = "bridge:syslog:dbg".parse().unwrap();
        log.apply_level_spec(&spec).unwrap();
        let bridge = log.module("bridge").unwrap();
        assert_eq!(log.get_level(bridge, Facility::Syslog), Severity::Dbg);

        let unknown: LevelSpec = "ofproto:dbg".parse().unwrap();
        assert!(matches!(
            log.apply_level_spec(&unknown),
            Err(VlogError::UnknownModule(name)) if name == "ofproto"
        ));
    }

    #[test]
    fn test_failed_log_file_keeps_path() {
        let Fixture { log, .. } = fixture();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("vlog.log");

        let err = log.set_log_file(&path, 0).unwrap_err();
        assert!(matches!(err, VlogError::OpenLogFile { .. }));
        assert!(!log.is_log_file_open());
        assert_eq!(log.log_file_path(), Some(path));
    }

    #[test]
    #[should_panic(expected = "level OFF")]
    fn test_logging_at_off_panics() {
        let Fixture { log, .. } = fixture();
        let netdev = log.module("netdev").unwrap();
        log.log(netdev, Severity::Off, "a.rs", 1, format_args!("nope"));
    }

    #[test]
    #[should_panic(expected = "outside the registry")]
    fn test_foreign_module_panics() {
        let Fixture { log, .. } = fixture();
        log.set_levels(Module::from_raw(9), Facility::Console, Severity::Dbg);
    }
}
