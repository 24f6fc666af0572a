use std::io;
use std::io::Write;

use http::{StatusCode, Version};
use tracing::{debug, error};

use crate::codec::ContentRange;
use crate::emit::{EmitterConfig, MessageWriter, ResponseEmitterBuilder};
use crate::protocol::{HeaderBag, HttpMessage, Response, SendError};
use crate::utils::parse_decimal;

/// The line-oriented half of a response transport.
///
/// The emitter calls [`write_status_line`](HeadWriter::write_status_line) once, then
/// [`write_header_line`](HeadWriter::write_header_line) for every header value, then
/// [`finish_head`](HeadWriter::finish_head) before the first body byte.
#[cfg_attr(test, mockall::automock)]
pub trait HeadWriter {
    fn write_status_line(&mut self, version: Version, status: StatusCode, reason: &str) -> Result<(), SendError>;

    fn write_header_line(&mut self, name: &str, value: &str) -> Result<(), SendError>;

    fn finish_head(&mut self) -> Result<(), SendError>;
}

/// The byte window of a body that a response is allowed to send.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitPlan {
    skip: u64,
    limit: Option<u64>,
}

impl EmitPlan {
    /// Derives the window from `Content-Length` and `Content-Range`.
    ///
    /// A valid `Content-Range` wins: skip its start and send its length. Otherwise a
    /// valid `Content-Length` caps the output. Headers that do not parse are ignored.
    pub fn from_headers(headers: &HeaderBag) -> Self {
        let declared_length = headers.get("Content-Length").and_then(|value| {
            let length = parse_decimal(value.trim());
            if length.is_none() {
                debug!(value, "ignore unparseable content-length");
            }
            length
        });

        let range = headers.get("Content-Range").and_then(|value| {
            let range = ContentRange::parse(value);
            if range.is_none() {
                debug!(value, "ignore unparseable content-range");
            }
            range
        });

        match range {
            Some(range) => Self { skip: range.start(), limit: Some(range.len()) },
            None => Self { skip: 0, limit: declared_length },
        }
    }

    /// Bytes dropped from the front of the body.
    #[inline]
    pub fn skip(&self) -> u64 {
        self.skip
    }

    /// Maximum bytes written, `None` sends everything after `skip`.
    #[inline]
    pub fn limit(&self) -> Option<u64> {
        self.limit
    }
}

/// Writes a [`Response`] onto a blocking transport.
///
/// The head is written verbatim: the status line, then every header value in
/// [`HeaderBag`] order. The body is then copied in bounded chunks, honoring the window
/// described by [`EmitPlan`]. A deferred body is handed the sink directly and is
/// trusted to respect the headers itself.
///
/// # Example
///
/// ```
/// use http::StatusCode;
/// use micro_sapi::emit::ResponseEmitter;
/// use micro_sapi::protocol::{HttpMessage, Response};
///
/// let mut response = Response::new(StatusCode::OK);
/// response.set_header("Content-Length", "19");
/// response.set_body("Send this sentence. Ignore this one.");
///
/// let mut out = Vec::new();
/// let written = ResponseEmitter::new().send(&mut response, &mut out).unwrap();
///
/// assert_eq!(written, 19);
/// assert!(out.ends_with(b"\r\n\r\nSend this sentence."));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ResponseEmitter {
    config: EmitterConfig,
}

impl ResponseEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EmitterConfig) -> Self {
        Self { config }
    }

    pub fn builder() -> ResponseEmitterBuilder {
        ResponseEmitterBuilder::new()
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    /// Writes the status line and all headers.
    ///
    /// # Errors
    ///
    /// Propagates any error of the head writer.
    pub fn write_head<H>(&self, response: &Response, head: &mut H) -> Result<(), SendError>
    where
        H: HeadWriter + ?Sized,
    {
        head.write_status_line(response.version(), response.status(), response.status_text())?;
        for (name, value) in response.headers().lines() {
            head.write_header_line(name, value)?;
        }
        head.finish_head()
    }

    /// Writes the body, returning the number of bytes written.
    ///
    /// # Errors
    ///
    /// Fails when the body source or the sink fails. A body shorter than the headers
    /// announce is not an error.
    pub fn write_body<W>(&self, response: &mut Response, sink: &mut W) -> Result<u64, SendError>
    where
        W: Write,
    {
        let plan = EmitPlan::from_headers(response.headers());
        let body = response.body_mut();

        if body.is_deferred() {
            debug!("deferred body, length and range are left to the producer");
            let mut counter = CountingWriter { inner: sink, count: 0 };
            body.run_deferred(&mut counter).inspect_err(|e| error!(cause = %e, "deferred body failed"))?;
            return Ok(counter.count);
        }

        debug!(skip = plan.skip(), limit = ?plan.limit(), "emit response body");
        let written = body
            .copy_to_with_chunk_size(sink, plan.skip(), plan.limit(), self.config.chunk_size())
            .inspect_err(|e| error!(cause = %e, "failed to copy response body"))?;
        Ok(written)
    }

    /// Writes the head to `head` and the body to `sink`, then flushes the sink.
    ///
    /// # Errors
    ///
    /// See [`ResponseEmitter::write_head`] and [`ResponseEmitter::write_body`].
    pub fn emit_split<H, W>(&self, response: &mut Response, head: &mut H, sink: &mut W) -> Result<u64, SendError>
    where
        H: HeadWriter + ?Sized,
        W: Write,
    {
        self.write_head(response, head)?;
        let written = self.write_body(response, sink)?;
        sink.flush().inspect_err(|e| error!(cause = %e, "failed to flush response body"))?;
        Ok(written)
    }

    /// Writes the whole response to a transport that accepts both head lines and bytes.
    ///
    /// # Errors
    ///
    /// See [`ResponseEmitter::write_head`] and [`ResponseEmitter::write_body`].
    pub fn emit<T>(&self, response: &mut Response, transport: &mut T) -> Result<u64, SendError>
    where
        T: HeadWriter + Write,
    {
        self.write_head(response, transport)?;
        let written = self.write_body(response, transport)?;
        transport.flush().inspect_err(|e| error!(cause = %e, "failed to flush response"))?;
        Ok(written)
    }

    /// Serializes the response as HTTP/1.x text onto `writer`.
    ///
    /// # Errors
    ///
    /// See [`ResponseEmitter::emit`].
    pub fn send<W>(&self, response: &mut Response, writer: W) -> Result<u64, SendError>
    where
        W: Write,
    {
        let mut writer = MessageWriter::with_capacity(writer, self.config.head_buffer_capacity());
        self.emit(response, &mut writer)
    }
}

/// Sends `response` onto `writer` with the default emitter configuration.
///
/// # Errors
///
/// See [`ResponseEmitter::emit`].
pub fn send_response<W>(response: &mut Response, writer: W) -> Result<u64, SendError>
where
    W: Write,
{
    ResponseEmitter::new().send(response, writer)
}

struct CountingWriter<'a, W: ?Sized> {
    inner: &'a mut W,
    count: u64,
}

impl<W> Write for CountingWriter<'_, W>
where
    W: Write + ?Sized,
{
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.count += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
