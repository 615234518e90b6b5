pub mod body;
pub mod headers;
pub mod middleware;
pub mod pipeline;
pub mod record;
pub mod sink;
pub mod trace;

pub use body::{BodyCapture, CapturedBody, ReplayBody, TRUNCATION_MARKER};
pub use headers::{LoggedHeaders, MASK};
pub use middleware::{ErrorResponse, log_requests};
pub use pipeline::RequestLogPipeline;
pub use record::LogRecord;
pub use sink::{LogSink, MemorySink, TracingSink};
pub use trace::{TraceProvider, TraceResolver};

#[cfg(feature = "otel")]
pub use trace::OtelTraceProvider;
