//! # vlog - leveled, multi-destination logging
//!
//! Routes line-oriented text messages to the console, a log file and the local
//! syslog daemon. Output is gated per module and per facility by severity
//! thresholds; a per-module cached minimum makes disabled calls cost a single
//! atomic load. Noisy call sites can be rate limited with a token bucket, and
//! the log file can be bounded in size.
//!
//! ## Quick Start
//!
//! ```rust
//! use vlog::prelude::*;
//!
//! const NETDEV: Module = Module::from_raw(0);
//!
//! fn main() -> VlogResult<()> {
//!     let log = Vlog::builder()
//!         .modules(["netdev", "bridge"])
//!         .level("netdev:console:dbg".parse()?)
//!         .build()?;
//!
//!     vlog_info!(ctx = &log, NETDEV, "link {} up", "eth0");
//!     vlog_dbg!(ctx = &log, NETDEV, "carrier changes: {}", 3);
//!     Ok(())
//! }
//! ```
//!
//! ## Process-wide instance
//!
//! [`init`] installs one default context used by the macros when no `ctx` is
//! given. It can be installed once per process.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod builder;
mod clock;
mod config;
mod core;
mod errno;
mod facility;
mod format;
mod layer;
mod level;
mod lock;
mod logger;
mod macros;
mod matrix;
mod module;
mod rate_limit;
mod sink;
mod utils;

use std::sync::OnceLock;

// Public API
pub use builder::VlogBuilder;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{
    Config, ConsoleTarget, ENV_CONSOLE, ENV_FILE, ENV_FILE_MAX_SIZE, ENV_LEVELS, FacilityLevels,
    LevelSpec,
};
pub use crate::core::{LogIoResultExt, VlogError, VlogResult};
pub use facility::{Facility, Selector};
pub use format::{MAX_LINE_LEN, Record, TimeStyle, render_line};
pub use layer::VlogLayer;
pub use level::Severity;
pub use lock::{EmitLock, FnLock, MutexLock};
pub use logger::Vlog;
pub use matrix::GatingMatrix;
pub use module::{Module, ModuleRegistry};
pub use rate_limit::{Admission, DropSummary, MSG_TOKENS, RateLimit, TokenBucket, summary_message};
pub use sink::{CaptureSink, CapturedLine, ConsoleSink, Destination, FileSink, Sink, SyslogSink};
pub use utils::{sat_add, sat_mul, sat_sub};

/// Prelude for common imports
pub mod prelude {
    pub use crate::{
        Config, Facility, Module, RateLimit, Selector, Severity, Vlog, VlogError, VlogResult,
        vlog, vlog_dbg, vlog_emer, vlog_err, vlog_info, vlog_rl, vlog_warn,
    };
}

static GLOBAL: OnceLock<Vlog> = OnceLock::new();

// ============================================================================
// Initialization Functions
// ============================================================================

/// Install the process-wide instance built from `config`
///
/// # Errors
///
/// [`VlogError::AlreadyInitialized`] when an instance is already installed,
/// or whatever [`VlogBuilder::build`] reports.
pub fn init(config: Config) -> VlogResult<&'static Vlog> {
    init_with(VlogBuilder::from_config(config))
}

/// Install the process-wide instance built by `builder`
pub fn init_with(builder: VlogBuilder) -> VlogResult<&'static Vlog> {
    if GLOBAL.get().is_some() {
        return Err(VlogError::AlreadyInitialized);
    }
    let vlog = builder.build()?;
    let mut fresh = false;
    let installed = GLOBAL.get_or_init(|| {
        fresh = true;
        vlog
    });
    if fresh {
        Ok(installed)
    } else {
        Err(VlogError::AlreadyInitialized)
    }
}

/// The process-wide instance, if installed
#[inline]
pub fn global() -> Option<&'static Vlog> {
    GLOBAL.get()
}
