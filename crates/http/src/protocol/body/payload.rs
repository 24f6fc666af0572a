use std::fmt;
use std::io::{self, Read, Write};

use bytes::Bytes;
use tracing::{info, warn};

use super::copy::{self, StreamSource, DEFAULT_CHUNK_SIZE};
use crate::protocol::BodyError;

/// A write-only body producer, invoked once with the output sink.
pub type Producer = Box<dyn FnOnce(&mut dyn Write) -> io::Result<()> + Send>;

/// The payload of a [`Request`](crate::protocol::Request) or [`Response`](crate::protocol::Response).
///
/// A body is one of three kinds:
///
/// - **bytes**: fully materialized and rewindable, reading it is idempotent
/// - **stream**: a readable source with a cursor, consumed as it is read
/// - **deferred**: a producer that writes straight into the output sink, it can run only once
///   and can never be read back
pub struct Body {
    kind: Kind,
}

enum Kind {
    Bytes(Bytes),
    Stream(StreamSource),
    Deferred(Option<Producer>),
}

impl Body {
    pub fn empty() -> Self {
        Self { kind: Kind::Bytes(Bytes::new()) }
    }

    pub fn bytes(bytes: impl Into<Bytes>) -> Self {
        Self { kind: Kind::Bytes(bytes.into()) }
    }

    pub fn stream<R>(reader: R) -> Self
    where
        R: Read + Send + 'static,
    {
        Self { kind: Kind::Stream(StreamSource::new(Box::new(reader))) }
    }

    pub fn deferred<F>(producer: F) -> Self
    where
        F: FnOnce(&mut dyn Write) -> io::Result<()> + Send + 'static,
    {
        Self { kind: Kind::Deferred(Some(Box::new(producer))) }
    }

    #[inline]
    pub fn is_bytes(&self) -> bool {
        matches!(self.kind, Kind::Bytes(_))
    }

    #[inline]
    pub fn is_stream(&self) -> bool {
        matches!(self.kind, Kind::Stream(_))
    }

    #[inline]
    pub fn is_deferred(&self) -> bool {
        matches!(self.kind, Kind::Deferred(_))
    }

    /// Returns true if there is nothing left to send.
    ///
    /// A stream only reports empty once it has been read to the end, a deferred
    /// body only once its producer has run.
    pub fn is_empty(&self) -> bool {
        match &self.kind {
            Kind::Bytes(bytes) => bytes.is_empty(),
            Kind::Stream(source) => source.is_eof(),
            Kind::Deferred(producer) => producer.is_none(),
        }
    }

    /// Exact length in bytes, known only for a bytes body.
    pub fn size_hint(&self) -> Option<u64> {
        match &self.kind {
            Kind::Bytes(bytes) => Some(bytes.len() as u64),
            Kind::Stream(_) | Kind::Deferred(_) => None,
        }
    }

    /// Number of bytes consumed from a stream body so far.
    pub fn position(&self) -> Option<u64> {
        match &self.kind {
            Kind::Stream(source) => Some(source.position()),
            Kind::Bytes(_) | Kind::Deferred(_) => None,
        }
    }

    /// Materializes the remaining bytes of this body.
    ///
    /// # Errors
    ///
    /// Returns [`BodyError::UnsupportedOperation`] for a deferred body, and
    /// [`BodyError::Io`] if reading a stream fails.
    pub fn read_all(&mut self) -> Result<Bytes, BodyError> {
        match &mut self.kind {
            Kind::Bytes(bytes) => Ok(bytes.clone()),
            Kind::Stream(source) => Ok(Bytes::from(source.read_to_end()?)),
            Kind::Deferred(_) => Err(BodyError::unsupported("read_all on a deferred body")),
        }
    }

    /// Copies the body into `sink` in chunks of [`DEFAULT_CHUNK_SIZE`] bytes.
    ///
    /// The first `skip` bytes are dropped. When `limit` is set, copying stops after
    /// exactly `limit` bytes. A source shorter than `skip + limit` simply writes
    /// fewer bytes. Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns [`BodyError::UnsupportedOperation`] for a deferred body, and
    /// [`BodyError::Io`] when the source or the sink fails.
    pub fn copy_to<W>(&mut self, sink: &mut W, skip: u64, limit: Option<u64>) -> Result<u64, BodyError>
    where
        W: Write + ?Sized,
    {
        self.copy_to_with_chunk_size(sink, skip, limit, DEFAULT_CHUNK_SIZE)
    }

    /// Same as [`Body::copy_to`] with an explicit chunk size.
    ///
    /// # Errors
    ///
    /// See [`Body::copy_to`].
    pub fn copy_to_with_chunk_size<W>(
        &mut self,
        sink: &mut W,
        skip: u64,
        limit: Option<u64>,
        chunk_size: usize,
    ) -> Result<u64, BodyError>
    where
        W: Write + ?Sized,
    {
        let chunk_size = chunk_size.max(1);
        let written = match &mut self.kind {
            Kind::Bytes(bytes) => copy::copy_slice(bytes, sink, skip, limit, chunk_size)?,
            Kind::Stream(source) => {
                let mut buf = vec![0u8; chunk_size];
                let skipped = source.discard(skip, &mut buf)?;
                if skipped > 0 {
                    info!(size = skipped, "skip stream body prefix");
                }
                if skipped < skip {
                    0
                } else {
                    source.copy_to(sink, limit, &mut buf)?
                }
            }
            Kind::Deferred(_) => return Err(BodyError::unsupported("copy_to on a deferred body")),
        };

        if let Some(limit) = limit
            && written < limit
        {
            warn!(limit, written, skip, "body source is shorter than the requested length");
        }
        Ok(written)
    }

    /// Runs a deferred producer against `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`BodyError::UnsupportedOperation`] if this body is not deferred or its
    /// producer has already run, and [`BodyError::Io`] when the producer fails.
    pub fn run_deferred(&mut self, sink: &mut dyn Write) -> Result<(), BodyError> {
        match &mut self.kind {
            Kind::Deferred(slot) => {
                let producer = slot.take().ok_or_else(|| BodyError::unsupported("deferred body already consumed"))?;
                producer(sink)?;
                Ok(())
            }
            Kind::Bytes(_) | Kind::Stream(_) => Err(BodyError::unsupported("run_deferred on a readable body")),
        }
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            Kind::Bytes(bytes) => f.debug_struct("Body").field("kind", &"bytes").field("len", &bytes.len()).finish(),
            Kind::Stream(source) => f
                .debug_struct("Body")
                .field("kind", &"stream")
                .field("position", &source.position())
                .field("eof", &source.is_eof())
                .finish(),
            Kind::Deferred(producer) => {
                f.debug_struct("Body").field("kind", &"deferred").field("consumed", &producer.is_none()).finish()
            }
        }
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Self::bytes(bytes)
    }
}

impl From<Vec<u8>> for Body {
    fn from(value: Vec<u8>) -> Self {
        Self::bytes(value)
    }
}

impl From<String> for Body {
    fn from(value: String) -> Self {
        Self::bytes(value)
    }
}

impl From<&'static str> for Body {
    fn from(value: &'static str) -> Self {
        Self::bytes(value)
    }
}

impl From<()> for Body {
    fn from((): ()) -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn check_send<T: Send>() {}

    #[test]
    fn is_send() {
        check_send::<Body>();
    }

    #[test]
    fn test_bytes_body_is_rewindable() {
        let mut body = Body::from("Hello world");

        assert_eq!(body.size_hint(), Some(11));
        assert!(!body.is_empty());
        assert_eq!(body.read_all().unwrap(), Bytes::from("Hello world"));
        assert_eq!(body.read_all().unwrap(), Bytes::from("Hello world"));

        let mut sink = Vec::new();
        assert_eq!(body.copy_to(&mut sink, 0, None).unwrap(), 11);
        assert_eq!(&sink[..], b"Hello world");
    }

    #[test]
    fn test_empty_body() {
        let mut body = Body::from(());

        assert!(body.is_empty());
        assert_eq!(body.size_hint(), Some(0));
        assert!(body.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_stream_body_is_consumed() {
        let mut body = Body::stream(Cursor::new(b"streamed content".to_vec()));

        assert!(body.is_stream());
        assert!(!body.is_empty());
        assert_eq!(body.size_hint(), None);

        let mut sink = Vec::new();
        assert_eq!(body.copy_to(&mut sink, 0, Some(8)).unwrap(), 8);
        assert_eq!(&sink[..], b"streamed");
        assert_eq!(body.position(), Some(8));

        assert_eq!(body.read_all().unwrap(), Bytes::from(" content"));
        assert!(body.is_empty());
        assert!(body.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_copy_bytes_with_skip_and_limit() {
        let content = "Ignore this. Send this sentence. Ignore this too.";
        let mut body = Body::from(content);

        let mut sink = Vec::new();
        assert_eq!(body.copy_to(&mut sink, 13, Some(19)).unwrap(), 19);
        assert_eq!(&sink[..], b"Send this sentence.");
    }

    #[test]
    fn test_copy_stream_with_small_chunks() {
        let content: Vec<u8> = (0..100u8).collect();
        let mut body = Body::stream(Cursor::new(content.clone()));

        let mut sink = Vec::new();
        assert_eq!(body.copy_to_with_chunk_size(&mut sink, 10, Some(50), 7).unwrap(), 50);
        assert_eq!(sink, content[10..60].to_vec());
        assert_eq!(body.position(), Some(60));
    }

    #[test]
    fn test_copy_stream_skip_beyond_source() {
        let mut body = Body::stream(Cursor::new(b"tiny".to_vec()));

        let mut sink = Vec::new();
        assert_eq!(body.copy_to(&mut sink, 100, Some(10)).unwrap(), 0);
        assert!(sink.is_empty());
        assert!(body.is_empty());
    }

    #[test]
    fn test_copy_stream_limit_larger_than_source() {
        let mut body = Body::stream(Cursor::new(vec![b'x'; 100]));

        let mut sink = Vec::new();
        assert_eq!(body.copy_to(&mut sink, 0, Some(101)).unwrap(), 100);
        assert_eq!(sink.len(), 100);
    }

    #[test]
    fn test_deferred_body_cannot_be_read() {
        let mut body = Body::deferred(|sink| sink.write_all(b"produced"));

        assert!(body.is_deferred());
        assert!(!body.is_empty());
        assert!(matches!(body.read_all(), Err(BodyError::UnsupportedOperation { .. })));

        let mut sink = Vec::new();
        assert!(matches!(body.copy_to(&mut sink, 0, None), Err(BodyError::UnsupportedOperation { .. })));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_deferred_body_runs_once() {
        let mut body = Body::deferred(|sink| sink.write_all(b"produced"));

        let mut sink = Vec::new();
        body.run_deferred(&mut sink).unwrap();
        assert_eq!(&sink[..], b"produced");
        assert!(body.is_empty());

        assert!(matches!(body.run_deferred(&mut sink), Err(BodyError::UnsupportedOperation { .. })));
        assert_eq!(&sink[..], b"produced");
    }

    #[test]
    fn test_run_deferred_on_bytes() {
        let mut body = Body::from("bytes");
        let mut sink = Vec::new();

        assert!(matches!(body.run_deferred(&mut sink), Err(BodyError::UnsupportedOperation { .. })));
    }

    #[test]
    fn test_debug() {
        assert_eq!(format!("{:?}", Body::from("abc")), r#"Body { kind: "bytes", len: 3 }"#);
        assert_eq!(
            format!("{:?}", Body::deferred(|_| Ok(()))),
            r#"Body { kind: "deferred", consumed: false }"#
        );
    }
}
