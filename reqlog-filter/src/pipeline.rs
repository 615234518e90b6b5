use crate::body::BodyCapture;
use crate::headers::LoggedHeaders;
use crate::record::LogRecord;
use crate::sink::{LogSink, TracingSink};
use crate::trace::{TraceProvider, TraceResolver};
use axum::body::Body;
use http::{HeaderMap, Request, header};
use reqlog_core::{LoggerConfig, QueryParams, ReqlogError, ResponseSnapshot, ResponseStatus};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Per-request interception and access logging.
///
/// Holds only immutable state, so one instance is shared (behind `Arc`)
/// by every in-flight request.
pub struct RequestLogPipeline {
    config: LoggerConfig,
    traces: TraceResolver,
    capture: BodyCapture,
    sink: Arc<dyn LogSink>,
}

impl RequestLogPipeline {
    /// Build a pipeline that logs through `tracing` and has no trace provider.
    pub fn new(config: LoggerConfig) -> Self {
        let capture = BodyCapture::from_config(&config);
        Self {
            config,
            traces: TraceResolver::default(),
            capture,
            sink: Arc::new(TracingSink),
        }
    }

    pub fn with_trace_provider(mut self, provider: Arc<dyn TraceProvider>) -> Self {
        self.traces = TraceResolver::new(Some(provider));
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    /// Run `next` for `request` and emit one access line.
    ///
    /// When logging is disabled the request goes straight to `next`.
    /// Otherwise the line is written after `next` finishes, whether it
    /// returned `Ok` or `Err`, panicked, or was dropped before completing.
    /// An `Err` from `next` is returned unchanged.
    ///
    /// A body capture failure ends the request before `next` runs; the
    /// line is still written with the error's status.
    pub async fn process<F, Fut, R, E>(&self, request: Request<Body>, next: F) -> Result<R, E>
    where
        F: FnOnce(Request<Body>) -> Fut,
        Fut: Future<Output = Result<R, E>>,
        R: ResponseStatus,
        E: From<ReqlogError>,
    {
        if !self.config.enabled {
            return next(request).await;
        }

        let trace_id = self.traces.resolve();
        let started = Instant::now();

        let (parts, body) = request.into_parts();
        let mut pending = PendingLine {
            pipeline: self,
            started,
            trace_id,
            method: parts.method.to_string(),
            path: parts.uri.path().to_owned(),
            headers: LoggedHeaders::collect(&parts.headers, &self.config),
            params: QueryParams::from_uri(&parts.uri),
            body: None,
            outcome: None,
        };

        let body = if self.config.captures_body(&parts.method) {
            match self.capture.capture_body(body).await {
                Ok(captured) => {
                    if self.config.log_form_params && is_form_encoded(&parts.headers) {
                        pending.params.extend_encoded(captured.replay.remaining());
                    }
                    pending.body = Some(captured.text);
                    Body::new(captured.replay)
                }
                Err(e) => {
                    warn!(
                        method = %pending.method,
                        path = %pending.path,
                        error = %e,
                        "request body capture failed"
                    );
                    pending.outcome = Some(ResponseSnapshot::new(e.status_code()));
                    return Err(e.into());
                }
            }
        } else {
            body
        };

        let result = next(Request::from_parts(parts, body)).await;
        pending.outcome = Some(match &result {
            Ok(response) => response.snapshot(),
            Err(_) => ResponseSnapshot::SERVER_ERROR,
        });
        drop(pending);
        result
    }
}

/// Request data gathered before delegation. Dropping it writes the line,
/// so every exit from `process` logs exactly once.
struct PendingLine<'a> {
    pipeline: &'a RequestLogPipeline,
    started: Instant,
    trace_id: String,
    method: String,
    path: String,
    headers: LoggedHeaders,
    params: QueryParams,
    body: Option<String>,
    outcome: Option<ResponseSnapshot>,
}

impl Drop for PendingLine<'_> {
    fn drop(&mut self) {
        let outcome = self.outcome.unwrap_or_else(|| {
            debug!(path = %self.path, "handler did not complete; logging as server error");
            ResponseSnapshot::SERVER_ERROR
        });
        let duration_ms = u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let record = LogRecord::new(
            std::mem::take(&mut self.method),
            std::mem::take(&mut self.path),
            outcome.status,
            duration_ms,
            std::mem::take(&mut self.trace_id),
            std::mem::take(&mut self.headers),
        )
        .with_payload(
            &self.pipeline.config,
            std::mem::take(&mut self.params),
            self.body.take(),
        );
        self.pipeline.sink.emit(&record);
    }
}

fn is_form_encoded(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/x-www-form-urlencoded"))
}
