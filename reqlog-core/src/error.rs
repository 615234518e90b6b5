use thiserror::Error;

/// Unified error type for reqlog.
#[derive(Error, Debug)]
pub enum ReqlogError {
    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Body read failed: {0}")]
    BodyRead(#[from] std::io::Error),

    #[error("Body exceeds buffer limit of {limit} bytes")]
    BodyTooLarge { limit: usize },

    #[error("Internal: {0}")]
    Internal(String),
}

impl ReqlogError {
    /// Map to HTTP status code.
    pub fn status_code(&self) -> u16 {
        match self {
            ReqlogError::BodyRead(_) => 400,
            ReqlogError::BodyTooLarge { .. } => 413,
            ReqlogError::ConfigError(_) | ReqlogError::Internal(_) => 500,
        }
    }

    /// JSON error body.
    pub fn to_json_body(&self) -> Vec<u8> {
        serde_json::json!({
            "error": self.to_string(),
            "status": self.status_code(),
        })
        .to_string()
        .into_bytes()
    }
}
