//! Bridge from `tracing` into the gating matrix
//!
//! [`VlogLayer`] lets code instrumented with `tracing` log through a [`Vlog`]:
//!
//! ```rust
//! use std::sync::Arc;
//! use tracing_subscriber::layer::SubscriberExt;
//! use vlog::{CaptureSink, Severity, Vlog, VlogLayer};
//!
//! let capture = Arc::new(CaptureSink::new());
//! let log = Arc::new(
//!     Vlog::builder()
//!         .modules(["app", "netdev"])
//!         .console_sink(capture.clone())
//!         .build()
//!         .unwrap(),
//! );
//! let fallback = log.module("app");
//! let subscriber = tracing_subscriber::registry().with(VlogLayer::new(log, fallback));
//!
//! tracing::subscriber::with_default(subscriber, || {
//!     tracing::warn!(target: "netdev::eth", port = 3, "link down");
//! });
//! assert!(capture.contents().contains("WARN  netdev "));
//! assert!(capture.contents().ends_with(": link down port=3\n"));
//! ```

pub(crate) mod fields;

use std::sync::Arc;

use tracing::{Event, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

use self::fields::MessageVisitor;
use crate::level::Severity;
use crate::logger::Vlog;
use crate::module::Module;

#[derive(Debug, Clone)]
enum Handle {
    Shared(Arc<Vlog>),
    Static(&'static Vlog),
}

impl Handle {
    fn get(&self) -> &Vlog {
        match self {
            Handle::Shared(vlog) => vlog.as_ref(),
            Handle::Static(vlog) => *vlog,
        }
    }
}

/// `tracing_subscriber` layer that forwards events to a [`Vlog`]
///
/// The module is the first `::` segment of the event target, looked up
/// case-insensitively; events whose target names no module go to the fallback
/// module, or are dropped when there is none. Levels map as `ERROR` to
/// [`Severity::Err`], `WARN` to [`Severity::Warn`], `INFO` to
/// [`Severity::Info`] and `DEBUG`/`TRACE` to [`Severity::Dbg`].
#[derive(Debug, Clone)]
pub struct VlogLayer {
    vlog: Handle,
    fallback: Option<Module>,
}

impl VlogLayer {
    /// Forward to a shared context
    pub fn new(vlog: Arc<Vlog>, fallback: Option<Module>) -> Self {
        Self {
            vlog: Handle::Shared(vlog),
            fallback,
        }
    }

    /// Forward to a context that lives for the whole program
    pub fn from_static(vlog: &'static Vlog, fallback: Option<Module>) -> Self {
        Self {
            vlog: Handle::Static(vlog),
            fallback,
        }
    }

    fn module_for(&self, target: &str) -> Option<Module> {
        let head = target.split("::").next().unwrap_or(target);
        self.vlog.get().module(head).or(self.fallback)
    }
}

impl<S> Layer<S> for VlogLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let Some(module) = self.module_for(metadata.target()) else {
            return;
        };
        let level = Severity::from(*metadata.level());

        let vlog = self.vlog.get();
        if !vlog.is_enabled(module, level) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let mut message = visitor.finish();

        if let Some(scope) = ctx.event_scope(event) {
            let spans: Vec<&str> = scope.from_root().map(|span| span.name()).collect();
            if !spans.is_empty() {
                message = format!("{}: {message}", spans.join("::"));
            }
        }

        vlog.log(
            module,
            level,
            metadata.file().unwrap_or("<unknown>"),
            metadata.line().unwrap_or(0),
            format_args!("{message}"),
        );
    }
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::layer::SubscriberExt;

    use super::*;
    use crate::facility::{Facility, Selector};
    use crate::sink::CaptureSink;

    fn setup() -> (Arc<Vlog>, Arc<CaptureSink>) {
        let capture = Arc::new(CaptureSink::new());
        let log = Vlog::builder()
            .modules(["app", "netdev"])
            .console_sink(capture.clone())
            .build()
            .unwrap();
        (Arc::new(log), capture)
    }

    #[test]
    fn test_target_selects_module() {
        let (log, capture) = setup();
        let subscriber = tracing_subscriber::registry().with(VlogLayer::new(log, None));

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!(target: "netdev::eth", "boom");
            tracing::error!(target: "unregistered", "dropped");
        });

        let lines = capture.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].level, Severity::Err);
        assert!(lines[0].line.contains("ERR   netdev "));
    }

    #[test]
    fn test_gating_applies_to_events() {
        let (log, capture) = setup();
        let app = log.module("app");
        log.set_levels(Selector::Any, Facility::Console, Severity::Warn);
        let subscriber = tracing_subscriber::registry().with(VlogLayer::new(log, app));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("quiet");
            tracing::debug!("quieter");
            tracing::trace!("quietest");
            tracing::warn!(attempt = 2, "loud");
        });

        assert_eq!(capture.len(), 1);
        assert!(capture.contents().contains("WARN  app   "));
        assert!(capture.contents().ends_with(": loud attempt=2\n"));
    }

    #[test]
    fn test_span_names_prefix_message() {
        let (log, capture) = setup();
        let app = log.module("app");
        let subscriber = tracing_subscriber::registry().with(VlogLayer::new(log, app));

        tracing::subscriber::with_default(subscriber, || {
            let _outer = tracing::info_span!("request").entered();
            let _inner = tracing::info_span!("db").entered();
            tracing::info!("query");
        });

        assert!(capture.contents().ends_with(": request::db: query\n"));
    }
}
