use http::{Response, StatusCode};

/// Status of a finished exchange, read once the downstream handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseSnapshot {
    pub status: u16,
}

impl ResponseSnapshot {
    /// Recorded when the handler produced no response (error, panic, cancel).
    pub const SERVER_ERROR: ResponseSnapshot = ResponseSnapshot { status: 500 };

    pub fn new(status: u16) -> Self {
        Self { status }
    }
}

/// Anything the downstream handler may hand back that carries a status code.
pub trait ResponseStatus {
    fn status_code(&self) -> u16;

    fn snapshot(&self) -> ResponseSnapshot {
        ResponseSnapshot::new(self.status_code())
    }
}

impl<B> ResponseStatus for Response<B> {
    fn status_code(&self) -> u16 {
        self.status().as_u16()
    }
}

impl ResponseStatus for StatusCode {
    fn status_code(&self) -> u16 {
        self.as_u16()
    }
}

impl ResponseStatus for ResponseSnapshot {
    fn status_code(&self) -> u16 {
        self.status
    }
}
