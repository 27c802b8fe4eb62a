pub use tracing::{debug, error, info, warn, trace, instrument};
use tracing::Span;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt::{self, format::FmtSpan}};

/// Installs the global subscriber. Called once by the binary; library code
/// never initializes logging on its own.
pub fn init() {
    
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    
    let is_debug = env_filter.to_string().contains("debug") || 
                   std::env::var("RUST_LOG").unwrap_or_default().contains("debug");
    
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_timer(fmt::time::uptime())
        .with_span_events(if is_debug {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        });
    
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

/// Logging handle owned by a pipeline component.
///
/// Each component records its events inside its own span, so output from the
/// loader, normalizer, decoder and batch driver can be told apart and nested
/// under whatever span the caller hands in.
#[derive(Debug, Clone)]
pub struct LogHandle {
    span: Span,
}

impl LogHandle {
    pub fn new(component: &'static str) -> Self {
        Self {
            span: tracing::info_span!("component", name = component),
        }
    }

    /// A handle whose span is nested under this one.
    pub fn child(&self, component: &'static str) -> Self {
        Self {
            span: tracing::info_span!(parent: &self.span, "component", name = component),
        }
    }

    /// A handle that records nothing of its own; events still reach the
    /// subscriber under the caller's current span.
    pub fn disabled() -> Self {
        Self { span: Span::none() }
    }

    pub fn from_span(span: Span) -> Self {
        Self { span }
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }

    pub fn in_scope<F: FnOnce() -> T, T>(&self, f: F) -> T {
        self.span.in_scope(f)
    }
}
