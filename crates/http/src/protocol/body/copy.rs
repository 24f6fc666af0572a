//! Chunked copy loops shared by every readable body variant.
//!
//! Both loops stop on the first of two conditions: the byte budget is spent, or the
//! source is exhausted. A short source is never an error.

use std::cmp;
use std::io::{self, ErrorKind, Read, Write};

/// Number of bytes moved per read/write call.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Size of the next chunk: the chunk size, capped by what is left of the budget.
#[inline]
fn next_chunk(chunk_size: usize, limit: Option<u64>, written: u64) -> usize {
    match limit {
        Some(limit) => usize::try_from(limit - written).map_or(chunk_size, |left| cmp::min(chunk_size, left)),
        None => chunk_size,
    }
}

/// Copies `content[skip..skip + limit]` into `sink`, one chunk per write.
pub(crate) fn copy_slice<W>(content: &[u8], sink: &mut W, skip: u64, limit: Option<u64>, chunk_size: usize) -> io::Result<u64>
where
    W: Write + ?Sized,
{
    let len = content.len();
    let start = usize::try_from(skip).map_or(len, |skip| cmp::min(skip, len));
    let end = match limit.map(usize::try_from) {
        Some(Ok(limit)) => cmp::min(start.saturating_add(limit), len),
        Some(Err(_)) | None => len,
    };

    let window = &content[start..end];
    for chunk in window.chunks(chunk_size) {
        sink.write_all(chunk)?;
    }
    Ok(window.len() as u64)
}

/// A readable, single-consumer source with a cursor over the bytes consumed so far.
pub(crate) struct StreamSource {
    reader: Box<dyn Read + Send>,
    position: u64,
    eof: bool,
}

impl StreamSource {
    pub(crate) fn new(reader: Box<dyn Read + Send>) -> Self {
        Self { reader, position: 0, eof: false }
    }

    #[inline]
    pub(crate) fn position(&self) -> u64 {
        self.position
    }

    #[inline]
    pub(crate) fn is_eof(&self) -> bool {
        self.eof
    }

    /// Reads at most `buf.len()` bytes, retrying on `Interrupted`.
    ///
    /// `buf` must not be empty, a zero-length read is taken as end of stream.
    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        debug_assert!(!buf.is_empty());
        loop {
            match self.reader.read(buf) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(0);
                }
                Ok(n) => {
                    self.position += n as u64;
                    return Ok(n);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
    }

    /// Reads and drops up to `count` bytes, the source is not assumed seekable.
    pub(crate) fn discard(&mut self, count: u64, buf: &mut [u8]) -> io::Result<u64> {
        let mut discarded = 0;
        while discarded < count && !self.eof {
            let want = usize::try_from(count - discarded).map_or(buf.len(), |left| cmp::min(buf.len(), left));
            discarded += self.read_chunk(&mut buf[..want])? as u64;
        }
        Ok(discarded)
    }

    /// Copies from the cursor into `sink` until `limit` bytes are written or the source ends.
    pub(crate) fn copy_to<W>(&mut self, sink: &mut W, limit: Option<u64>, buf: &mut [u8]) -> io::Result<u64>
    where
        W: Write + ?Sized,
    {
        let mut written = 0;
        while limit != Some(written) && !self.eof {
            let want = next_chunk(buf.len(), limit, written);
            let n = self.read_chunk(&mut buf[..want])?;
            sink.write_all(&buf[..n])?;
            written += n as u64;
        }
        Ok(written)
    }

    pub(crate) fn read_to_end(&mut self) -> io::Result<Vec<u8>> {
        let mut content = Vec::new();
        if self.eof {
            return Ok(content);
        }
        let n = self.reader.read_to_end(&mut content)?;
        self.position += n as u64;
        self.eof = true;
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Hands out at most `step` bytes per read, like a socket would.
    struct Trickle {
        inner: Cursor<Vec<u8>>,
        step: usize,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = cmp::min(buf.len(), self.step);
            self.inner.read(&mut buf[..n])
        }
    }

    fn trickle(content: &[u8], step: usize) -> StreamSource {
        StreamSource::new(Box::new(Trickle { inner: Cursor::new(content.to_vec()), step }))
    }

    #[test]
    fn test_next_chunk() {
        assert_eq!(next_chunk(4096, None, 10_000), 4096);
        assert_eq!(next_chunk(4096, Some(10_000), 8192), 1808);
        assert_eq!(next_chunk(4096, Some(10), 0), 10);
    }

    #[test]
    fn test_copy_slice_window() {
        let content = b"0123456789";
        for skip in 0..=10usize {
            for limit in 0..=12usize {
                let mut sink = Vec::new();
                let written =
                    copy_slice(content, &mut sink, u64::try_from(skip).unwrap(), Some(u64::try_from(limit).unwrap()), 3)
                        .unwrap();

                let start = skip;
                let end = cmp::min(start + limit, content.len());
                assert_eq!(written, u64::try_from(end - start).unwrap());
                assert_eq!(&sink[..], &content[start..end]);
            }
        }
    }

    #[test]
    fn test_copy_slice_huge_window() {
        let mut sink = Vec::new();
        assert_eq!(copy_slice(b"abc", &mut sink, 1, Some(u64::MAX), 2).unwrap(), 2);
        assert_eq!(&sink[..], b"bc");

        let mut sink = Vec::new();
        assert_eq!(copy_slice(b"abc", &mut sink, u64::MAX, Some(u64::MAX), 2).unwrap(), 0);
        assert_eq!(next_chunk(4096, Some(u64::MAX), 0), 4096);
    }

    #[test]
    fn test_copy_slice_skip_past_end() {
        let mut sink = Vec::new();
        assert_eq!(copy_slice(b"abc", &mut sink, 10, None, 2).unwrap(), 0);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_stream_does_not_over_read() {
        let content: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
        let mut source = trickle(&content, 1000);
        let mut buf = vec![0; 4096];

        assert_eq!(source.discard(5000, &mut buf).unwrap(), 5000);

        let mut sink = Vec::new();
        assert_eq!(source.copy_to(&mut sink, Some(4097), &mut buf).unwrap(), 4097);
        assert_eq!(&sink[..], &content[5000..9097]);

        // nothing past the window is pulled from the source
        assert_eq!(source.position(), 9097);
        assert!(!source.is_eof());
    }

    #[test]
    fn test_stream_short_source() {
        let mut source = trickle(&[7u8; 100], 7);
        let mut buf = vec![0; 16];

        let mut sink = Vec::new();
        assert_eq!(source.copy_to(&mut sink, Some(101), &mut buf).unwrap(), 100);
        assert_eq!(sink, vec![7u8; 100]);
        assert!(source.is_eof());
    }

    #[test]
    fn test_discard_past_end() {
        let mut source = trickle(b"short", 2);
        let mut buf = vec![0; 4];

        assert_eq!(source.discard(64, &mut buf).unwrap(), 5);
        assert!(source.is_eof());

        let mut sink = Vec::new();
        assert_eq!(source.copy_to(&mut sink, None, &mut buf).unwrap(), 0);
        assert!(source.read_to_end().unwrap().is_empty());
    }
}
