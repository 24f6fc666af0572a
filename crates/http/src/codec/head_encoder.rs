//! Encoder for the status line and header lines of a response.
//!
//! The encoder serializes HTTP/1.x head text into a `BytesMut` buffer, one line per
//! [`HeadLine`]. It enforces the order status line, headers, blank line, and refuses
//! header text that would break the line framing.

use std::io;
use std::io::Write;

use bytes::{BufMut, BytesMut};
use http::{StatusCode, Version};
use tokio_util::codec::Encoder;
use tracing::error;

use crate::protocol::SendError;
use crate::protocol::message::version_str;

/// Initial buffer size reserved for head serialization
pub const INIT_HEAD_SIZE: usize = 4 * 1024;

/// One line of a response head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadLine<'a> {
    /// `HTTP/<version> <code> <reason>`
    Status { version: Version, status: StatusCode, reason: &'a str },
    /// `<name>: <value>`
    Header { name: &'a str, value: &'a str },
    /// The blank line closing the head
    End,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum State {
    #[default]
    StatusLine,
    Headers,
    Done,
}

/// Encoder for response heads implementing the [`Encoder`] trait.
#[derive(Debug, Default)]
pub struct HeadEncoder {
    state: State,
}

impl HeadEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true once the closing blank line has been encoded.
    #[inline]
    pub fn is_finish(&self) -> bool {
        self.state == State::Done
    }

    /// Returns true once the status line has been encoded.
    #[inline]
    pub fn is_started(&self) -> bool {
        self.state != State::StatusLine
    }
}

impl Encoder<HeadLine<'_>> for HeadEncoder {
    type Error = SendError;

    fn encode(&mut self, item: HeadLine<'_>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        match (self.state, item) {
            (State::StatusLine, HeadLine::Status { version, status, reason }) => {
                if breaks_line(reason) {
                    error!(reason, "reason phrase contains a line break");
                    return Err(SendError::invalid_head("reason phrase contains a line break"));
                }
                dst.reserve(INIT_HEAD_SIZE);
                write!(FastWrite(dst), "HTTP/{} {} {}\r\n", version_str(version), status.as_str(), reason)?;
                self.state = State::Headers;
                Ok(())
            }

            (State::Headers, HeadLine::Header { name, value }) => {
                if name.is_empty() || name.contains(':') || breaks_line(name) || breaks_line(value) {
                    error!(header_name = name, "invalid header line");
                    return Err(SendError::invalid_head(format!("invalid header line for {name:?}")));
                }
                dst.reserve(name.len() + value.len() + 4);
                dst.put_slice(name.as_bytes());
                dst.put_slice(b": ");
                dst.put_slice(value.as_bytes());
                dst.put_slice(b"\r\n");
                Ok(())
            }

            (State::Headers, HeadLine::End) => {
                dst.put_slice(b"\r\n");
                self.state = State::Done;
                Ok(())
            }

            (state, item) => {
                error!(?state, ?item, "head line out of order");
                Err(SendError::invalid_head("head line out of order"))
            }
        }
    }
}

#[inline]
fn breaks_line(s: &str) -> bool {
    s.bytes().any(|b| b == b'\r' || b == b'\n')
}

/// Fast writer implementation for writing to BytesMut.
///
/// The head encoder reserves the buffer up front, so writes never fail.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
