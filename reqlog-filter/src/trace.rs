use std::sync::Arc;
use uuid::Uuid;

/// Length of the locally generated trace id.
pub const FALLBACK_TRACE_ID_LEN: usize = 8;

/// Reports the trace active for the current request, if any.
///
/// Implementations are handed to the pipeline explicitly; the pipeline never
/// looks tracing state up on its own.
pub trait TraceProvider: Send + Sync {
    fn current_trace_id(&self) -> Option<String>;
}

impl<F> TraceProvider for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn current_trace_id(&self) -> Option<String> {
        self()
    }
}

/// Picks the trace id printed on the access line.
#[derive(Clone, Default)]
pub struct TraceResolver {
    provider: Option<Arc<dyn TraceProvider>>,
}

impl TraceResolver {
    pub fn new(provider: Option<Arc<dyn TraceProvider>>) -> Self {
        Self { provider }
    }

    /// The active trace id verbatim, otherwise an 8-char random hex id.
    pub fn resolve(&self) -> String {
        self.provider
            .as_ref()
            .and_then(|p| p.current_trace_id())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(fallback_trace_id)
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }
}

/// Leading hex digits of a random v4 UUID.
pub fn fallback_trace_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(FALLBACK_TRACE_ID_LEN);
    id
}

/// Reads the span context attached to the current OpenTelemetry context.
#[cfg(feature = "otel")]
#[derive(Debug, Default, Clone, Copy)]
pub struct OtelTraceProvider;

#[cfg(feature = "otel")]
impl TraceProvider for OtelTraceProvider {
    fn current_trace_id(&self) -> Option<String> {
        use opentelemetry::trace::TraceContextExt;

        let cx = opentelemetry::Context::current();
        let span = cx.span();
        let span_context = span.span_context();
        span_context
            .is_valid()
            .then(|| span_context.trace_id().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn is_fallback_shape(id: &str) -> bool {
        id.len() == FALLBACK_TRACE_ID_LEN && id.chars().all(|c| c.is_ascii_hexdigit())
    }

    #[test]
    fn active_trace_is_used_verbatim() {
        let resolver = TraceResolver::new(Some(Arc::new(|| Some("abc123".to_string()))));
        assert_eq!(resolver.resolve(), "abc123");
    }

    #[test]
    fn long_trace_ids_are_not_reformatted() {
        let id = "4bf92f3577b34da6a3ce929d0e0e4736";
        let resolver = TraceResolver::new(Some(Arc::new(move || Some(id.to_string()))));
        assert_eq!(resolver.resolve(), id);
    }

    #[test]
    fn provider_without_active_trace_falls_back() {
        let resolver = TraceResolver::new(Some(Arc::new(|| None::<String>)));
        assert!(resolver.has_provider());
        assert!(is_fallback_shape(&resolver.resolve()));
    }

    #[test]
    fn empty_trace_id_falls_back() {
        let resolver = TraceResolver::new(Some(Arc::new(|| Some(String::new()))));
        assert!(is_fallback_shape(&resolver.resolve()));
    }

    #[test]
    fn missing_provider_falls_back() {
        let resolver = TraceResolver::default();
        assert!(!resolver.has_provider());
        assert!(is_fallback_shape(&resolver.resolve()));
    }

    #[test]
    fn fallback_ids_differ_across_calls() {
        let ids: HashSet<String> = (0..64).map(|_| fallback_trace_id()).collect();
        assert_eq!(ids.len(), 64);
    }

    #[cfg(feature = "otel")]
    #[test]
    fn otel_provider_without_span_reports_nothing() {
        assert!(OtelTraceProvider.current_trace_id().is_none());
    }
}
