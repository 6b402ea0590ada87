//! Call-site macros
//!
//! Every macro captures `file!()`/`line!()` and checks
//! [`Vlog::is_enabled`](crate::Vlog::is_enabled) before the format arguments
//! are evaluated, so disabled messages cost one atomic load. Without
//! `ctx = ...` they log through the process-wide instance and do nothing when
//! it has not been installed.

/// Log at an explicit level
///
/// ```rust
/// use vlog::{Module, Severity, Vlog, vlog};
///
/// const NETDEV: Module = Module::from_raw(0);
///
/// let log = Vlog::builder().modules(["netdev"]).build().unwrap();
/// vlog!(ctx = &log, NETDEV, Severity::Info, "{} queues", 4);
///
/// // Without `ctx`, the global instance is used when installed.
/// vlog!(NETDEV, Severity::Dbg, "not shown");
/// ```
#[macro_export]
macro_rules! vlog {
    (ctx = $ctx:expr, $module:expr, $level:expr, $($arg:tt)+) => {{
        let __vlog: &$crate::Vlog = $ctx;
        let __module: $crate::Module = $module;
        let __level: $crate::Severity = $level;
        if __vlog.is_enabled(__module, __level) {
            __vlog.log(__module, __level, file!(), line!(), format_args!($($arg)+));
        }
    }};
    ($module:expr, $level:expr, $($arg:tt)+) => {{
        if let Some(__vlog) = $crate::global() {
            $crate::vlog!(ctx = __vlog, $module, $level, $($arg)+);
        }
    }};
}

/// Log at an explicit level, subject to a call-site [`RateLimit`](crate::RateLimit)
///
/// ```rust
/// use vlog::{Module, RateLimit, Severity, Vlog, vlog_rl};
///
/// static RL: RateLimit = RateLimit::new(300, 5);
/// const NETDEV: Module = Module::from_raw(0);
///
/// let log = Vlog::builder().modules(["netdev"]).build().unwrap();
/// for i in 0..3 {
///     vlog_rl!(ctx = &log, &RL, NETDEV, Severity::Warn, "retry {i}");
/// }
/// ```
#[macro_export]
macro_rules! vlog_rl {
    (ctx = $ctx:expr, $limit:expr, $module:expr, $level:expr, $($arg:tt)+) => {{
        let __vlog: &$crate::Vlog = $ctx;
        let __module: $crate::Module = $module;
        let __level: $crate::Severity = $level;
        if __vlog.is_enabled(__module, __level) {
            __vlog.log_rate_limited(
                __module,
                __level,
                file!(),
                line!(),
                $limit,
                format_args!($($arg)+),
            );
        }
    }};
    ($limit:expr, $module:expr, $level:expr, $($arg:tt)+) => {{
        if let Some(__vlog) = $crate::global() {
            $crate::vlog_rl!(ctx = __vlog, $limit, $module, $level, $($arg)+);
        }
    }};
}

/// Log at [`Severity::Emer`](crate::Severity::Emer)
#[macro_export]
macro_rules! vlog_emer {
    (ctx = $ctx:expr, $module:expr, $($arg:tt)+) => {
        $crate::vlog!(ctx = $ctx, $module, $crate::Severity::Emer, $($arg)+)
    };
    ($module:expr, $($arg:tt)+) => {
        $crate::vlog!($module, $crate::Severity::Emer, $($arg)+)
    };
}

/// Log at [`Severity::Err`](crate::Severity::Err)
#[macro_export]
macro_rules! vlog_err {
    (ctx = $ctx:expr, $module:expr, $($arg:tt)+) => {
        $crate::vlog!(ctx = $ctx, $module, $crate::Severity::Err, $($arg)+)
    };
    ($module:expr, $($arg:tt)+) => {
        $crate::vlog!($module, $crate::Severity::Err, $($arg)+)
    };
}

/// Log at [`Severity::Warn`](crate::Severity::Warn)
#[macro_export]
macro_rules! vlog_warn {
    (ctx = $ctx:expr, $module:expr, $($arg:tt)+) => {
        $crate::vlog!(ctx = $ctx, $module, $crate::Severity::Warn, $($arg)+)
    };
    ($module:expr, $($arg:tt)+) => {
        $crate::vlog!($module, $crate::Severity::Warn, $($arg)+)
    };
}

/// Log at [`Severity::Info`](crate::Severity::Info)
#[macro_export]
macro_rules! vlog_info {
    (ctx = $ctx:expr, $module:expr, $($arg:tt)+) => {
        $crate::vlog!(ctx = $ctx, $module, $crate::Severity::Info, $($arg)+)
    };
    ($module:expr, $($arg:tt)+) => {
        $crate::vlog!($module, $crate::Severity::Info, $($arg)+)
    };
}

/// Log at [`Severity::Dbg`](crate::Severity::Dbg)
#[macro_export]
macro_rules! vlog_dbg {
    (ctx = $ctx:expr, $module:expr, $($arg:tt)+) => {
        $crate::vlog!(ctx = $ctx, $module, $crate::Severity::Dbg, $($arg)+)
    };
    ($module:expr, $($arg:tt)+) => {
        $crate::vlog!($module, $crate::Severity::Dbg, $($arg)+)
    };
}
