use crate::headers::LoggedHeaders;
use reqlog_core::{LoggerConfig, QueryParams, status_phrase};
use std::fmt;

/// Everything printed on one access line. Built after the handler returns,
/// rendered once, then dropped.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub method: String,
    pub path: String,
    pub status: u16,
    pub duration_ms: u64,
    pub trace_id: String,
    pub headers: LoggedHeaders,
    pub params: Option<QueryParams>,
    pub body: Option<String>,
}

impl LogRecord {
    pub fn new(
        method: impl Into<String>,
        path: impl Into<String>,
        status: u16,
        duration_ms: u64,
        trace_id: impl Into<String>,
        headers: LoggedHeaders,
    ) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            status,
            duration_ms,
            trace_id: trace_id.into(),
            headers,
            params: None,
            body: None,
        }
    }

    /// Attach params and body text, keeping only what `config` allows.
    ///
    /// A non-empty captured body brings the params segment with it (even an
    /// empty one). `log_params` adds the segment on its own whenever there
    /// is at least one parameter.
    pub fn with_payload(
        mut self,
        config: &LoggerConfig,
        params: QueryParams,
        body: Option<String>,
    ) -> Self {
        let body = body.filter(|b| config.log_body && !b.is_empty());
        let show_params = body.is_some() || (config.log_params && !params.is_empty());
        self.params = show_params.then_some(params);
        self.body = body;
        self
    }

    pub fn phrase(&self) -> &'static str {
        status_phrase(self.status)
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} | {} {} | {}ms | traceId={} | Headers: {}",
            self.method,
            self.path,
            self.status,
            self.phrase(),
            self.duration_ms,
            self.trace_id,
            self.headers,
        )?;
        if let Some(params) = &self.params {
            write!(f, " | Params: {params}")?;
        }
        if let Some(body) = &self.body {
            write!(f, " | Request Body: {body}")?;
        }
        Ok(())
    }
}
