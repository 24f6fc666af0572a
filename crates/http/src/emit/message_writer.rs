use std::io;
use std::io::{ErrorKind, Write};

use bytes::BytesMut;
use http::{StatusCode, Version};
use tokio_util::codec::Encoder;
use tracing::error;

use crate::codec::{HeadEncoder, HeadLine, INIT_HEAD_SIZE};
use crate::emit::HeadWriter;
use crate::protocol::SendError;

/// Adapts a blocking [`Write`] transport to the emitter.
///
/// Head lines are encoded into an internal buffer and written out in one go once the
/// head is finished. Body bytes pass straight through to the transport.
#[derive(Debug)]
pub struct MessageWriter<W> {
    writer: W,
    buffer: BytesMut,
    encoder: HeadEncoder,
}

impl<W> MessageWriter<W>
where
    W: Write,
{
    pub fn new(writer: W) -> Self {
        Self::with_capacity(writer, INIT_HEAD_SIZE)
    }

    pub fn with_capacity(writer: W, buffer_size: usize) -> Self {
        Self { writer, buffer: BytesMut::with_capacity(buffer_size), encoder: HeadEncoder::new() }
    }

    #[inline]
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    #[inline]
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    #[inline]
    pub fn is_head_finished(&self) -> bool {
        self.encoder.is_finish()
    }

    /// Writes any buffered head bytes and returns the transport.
    ///
    /// # Errors
    ///
    /// Fails when writing the buffered head fails.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.flush_head()?;
        Ok(self.writer)
    }

    fn flush_head(&mut self) -> io::Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        self.writer.write_all(self.buffer.as_ref())?;
        self.buffer.clear();
        Ok(())
    }

    #[inline]
    fn encode(&mut self, line: HeadLine<'_>) -> Result<(), SendError> {
        self.encoder.encode(line, &mut self.buffer)
    }
}

impl<W> HeadWriter for MessageWriter<W>
where
    W: Write,
{
    fn write_status_line(&mut self, version: Version, status: StatusCode, reason: &str) -> Result<(), SendError> {
        self.encode(HeadLine::Status { version, status, reason })
    }

    fn write_header_line(&mut self, name: &str, value: &str) -> Result<(), SendError> {
        self.encode(HeadLine::Header { name, value })
    }

    fn finish_head(&mut self) -> Result<(), SendError> {
        self.encode(HeadLine::End)?;
        Ok(self.flush_head()?)
    }
}

impl<W> Write for MessageWriter<W>
where
    W: Write,
{
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.encoder.is_started() && !self.encoder.is_finish() {
            error!("expect head to be finished before writing body");
            return Err(io::Error::from(ErrorKind::InvalidInput));
        }

        self.flush_head()?;
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flush_head()?;
        self.writer.flush()
    }
}
