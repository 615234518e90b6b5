use crate::error::ReqlogError;
use figment::{Figment, providers::{Env, Format, Yaml}};
use http::Method;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub request_logger: LoggerConfig,
}

/// Host server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_addr")]
    pub addr: String,
}

/// Request logger settings. Read-only once the pipeline is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// When false the pipeline hands requests straight to the handler.
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub log_body: bool,
    #[serde(default)]
    pub log_params: bool,
    /// Characters of body text kept in the log line before truncation.
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
    /// Header allow-list. Names not listed here are never logged.
    #[serde(default)]
    pub headers: Vec<String>,
    /// Allow-listed headers whose values are replaced by `****`.
    #[serde(default)]
    pub mask_headers: Vec<String>,
    /// Methods whose body is captured when `log_body` is on.
    #[serde(default = "default_body_methods")]
    pub body_methods: Vec<String>,
    /// Hard cap on bytes buffered during capture. `None` buffers everything.
    #[serde(default)]
    pub max_buffer_size: Option<usize>,
    /// Merge url-encoded form fields from a captured body into the params.
    #[serde(default = "default_true")]
    pub log_form_params: bool,
}

// ── Defaults ──────────────────────────────────────────────────

fn default_addr() -> String { "0.0.0.0:8080".into() }
fn default_true() -> bool { true }
fn default_max_body_size() -> usize { 2000 }
fn default_body_methods() -> Vec<String> { vec!["POST".into(), "PUT".into()] }

// ── Impls ─────────────────────────────────────────────────────

impl Default for ServerConfig {
    fn default() -> Self {
        Self { addr: default_addr() }
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_body: false,
            log_params: false,
            max_body_size: default_max_body_size(),
            headers: Vec::new(),
            mask_headers: Vec::new(),
            body_methods: default_body_methods(),
            max_buffer_size: None,
            log_form_params: true,
        }
    }
}

impl LoggerConfig {
    /// Reject settings the pipeline cannot honour.
    pub fn validate(&self) -> Result<(), ReqlogError> {
        if self.max_body_size == 0 {
            return Err(ReqlogError::ConfigError(
                "max_body_size must be greater than zero".into(),
            ));
        }
        if self.max_buffer_size == Some(0) {
            return Err(ReqlogError::ConfigError(
                "max_buffer_size must be greater than zero when set".into(),
            ));
        }
        Ok(())
    }

    /// Whether a body sent with `method` should be captured.
    pub fn captures_body(&self, method: &Method) -> bool {
        self.log_body
            && self
                .body_methods
                .iter()
                .any(|m| m.eq_ignore_ascii_case(method.as_str()))
    }

    /// The allow-list spelling of `name`, if the header may be logged.
    ///
    /// Header names compare case-insensitively.
    pub fn allowed_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.eq_ignore_ascii_case(name))
            .map(String::as_str)
    }

    pub fn is_masked(&self, name: &str) -> bool {
        self.mask_headers.iter().any(|h| h.eq_ignore_ascii_case(name))
    }
}

impl AppConfig {
    /// Load configuration from YAML file + env overrides.
    ///
    /// Environment keys use `REQLOG_` and `__` between sections, e.g.
    /// `REQLOG_REQUEST_LOGGER__LOG_BODY=true`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let config: AppConfig = Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed("REQLOG_").split("__"))
            .extract()?;
        config.request_logger.validate()?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }
}
