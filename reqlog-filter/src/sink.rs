use crate::record::LogRecord;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;

/// Destination for rendered access lines.
pub trait LogSink: Send + Sync {
    /// Called once per logged request, at informational severity.
    ///
    /// Runs from a drop guard, possibly while a handler panic is unwinding.
    /// Implementations must not panic; a second panic aborts the process.
    fn emit(&self, record: &LogRecord);
}

/// Emits through `tracing` under the `reqlog::access` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, record: &LogRecord) {
        info!(
            target: "reqlog::access",
            method = %record.method,
            path = %record.path,
            status = record.status,
            duration_ms = record.duration_ms,
            trace_id = %record.trace_id,
            "{record}"
        );
    }
}

/// Keeps rendered lines in memory. Clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LogSink for MemorySink {
    fn emit(&self, record: &LogRecord) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.to_string());
    }
}
