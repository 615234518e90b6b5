//! Request body capture.
//!
//! The body is buffered once, decoded into a bounded display string, and
//! handed back as a [`ReplayBody`] so the downstream handler still sees the
//! full payload.

use bytes::{Buf, Bytes};
use http_body::{Body, Frame, SizeHint};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use reqlog_core::{LoggerConfig, ReqlogError};
use std::convert::Infallible;
use std::io::{self, Read};
use std::pin::Pin;
use std::task::{Context, Poll};

/// Appended to body text cut at `max_body_size` characters.
pub const TRUNCATION_MARKER: &str = "...(truncated)";

// ─────────────────────────────────────────────────────────────
// Replay body
// ─────────────────────────────────────────────────────────────

/// A fully buffered body that serves the captured bytes a second time.
///
/// Readable both as a blocking [`Read`] source and as an [`http_body::Body`].
#[derive(Debug, Clone, Default)]
pub struct ReplayBody {
    data: Bytes,
}

impl ReplayBody {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> &Bytes {
        &self.data
    }

    /// End of stream reached.
    pub fn is_finished(&self) -> bool {
        !self.data.has_remaining()
    }

    /// The buffer is in memory, so a read never blocks.
    pub fn is_ready(&self) -> bool {
        true
    }
}

impl Read for ReplayBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data.advance(n);
        Ok(n)
    }
}

impl Body for ReplayBody {
    type Data = Bytes;
    type Error = Infallible;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        if self.data.is_empty() {
            return Poll::Ready(None);
        }
        let data = std::mem::take(&mut self.data);
        Poll::Ready(Some(Ok(Frame::data(data))))
    }

    fn is_end_stream(&self) -> bool {
        self.data.is_empty()
    }

    fn size_hint(&self) -> SizeHint {
        SizeHint::with_exact(self.data.len() as u64)
    }
}

// ─────────────────────────────────────────────────────────────
// Capture
// ─────────────────────────────────────────────────────────────

/// Output of a capture: the replayable body plus its display text.
#[derive(Debug)]
pub struct CapturedBody {
    pub replay: ReplayBody,
    pub text: String,
}

/// Buffers request bodies for logging.
#[derive(Debug, Clone, Copy)]
pub struct BodyCapture {
    max_body_size: usize,
    max_buffer_size: Option<usize>,
}

impl BodyCapture {
    pub fn new(max_body_size: usize) -> Self {
        Self {
            max_body_size,
            max_buffer_size: None,
        }
    }

    /// Fail with [`ReqlogError::BodyTooLarge`] instead of buffering more than `limit` bytes.
    pub fn with_buffer_limit(mut self, limit: Option<usize>) -> Self {
        self.max_buffer_size = limit;
        self
    }

    pub fn from_config(config: &LoggerConfig) -> Self {
        Self::new(config.max_body_size).with_buffer_limit(config.max_buffer_size)
    }

    /// Drain a blocking byte source.
    pub fn capture<R: Read>(&self, reader: R) -> Result<CapturedBody, ReqlogError> {
        let mut buf = Vec::new();
        match self.max_buffer_size {
            Some(limit) => {
                let mut limited = reader.take((limit as u64).saturating_add(1));
                limited.read_to_end(&mut buf)?;
                if buf.len() > limit {
                    return Err(ReqlogError::BodyTooLarge { limit });
                }
            }
            None => {
                let mut reader = reader;
                reader.read_to_end(&mut buf)?;
            }
        }
        Ok(self.finish(Bytes::from(buf)))
    }

    /// Collect an async HTTP body.
    pub async fn capture_body<B>(&self, body: B) -> Result<CapturedBody, ReqlogError>
    where
        B: Body,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let data = match self.max_buffer_size {
            Some(limit) => Limited::new(body, limit)
                .collect()
                .await
                .map_err(|e| {
                    if e.downcast_ref::<LengthLimitError>().is_some() {
                        ReqlogError::BodyTooLarge { limit }
                    } else {
                        ReqlogError::BodyRead(io::Error::other(e))
                    }
                })?
                .to_bytes(),
            None => body
                .collect()
                .await
                .map_err(|e| ReqlogError::BodyRead(io::Error::other(e)))?
                .to_bytes(),
        };
        Ok(self.finish(data))
    }

    fn finish(&self, data: Bytes) -> CapturedBody {
        let text = display_text(&data, self.max_body_size);
        CapturedBody {
            replay: ReplayBody::new(data),
            text,
        }
    }
}

/// Decode `bytes` as UTF-8 (lossy) and cut it to `max_chars` characters.
pub fn display_text(bytes: &[u8], max_chars: usize) -> String {
    let text = String::from_utf8_lossy(bytes);
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            let mut out = String::with_capacity(cut + TRUNCATION_MARKER.len());
            out.push_str(&text[..cut]);
            out.push_str(TRUNCATION_MARKER);
            out
        }
        None => text.into_owned(),
    }
}
