//! Parsing of the `Content-Range` response header.
//!
//! Only the single-range form `bytes <start>-<end>/<total>` is understood, with `*` for
//! an unknown total, as described in
//! [RFC 9110 Section 14.4](https://www.rfc-editor.org/rfc/rfc9110#section-14.4).

use crate::utils::parse_decimal;

/// An inclusive byte range taken from a `Content-Range` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentRange {
    start: u64,
    end: u64,
    total: Option<u64>,
}

impl ContentRange {
    /// Creates a range, returning `None` unless `start <= end < total`.
    ///
    /// Without a known total, `end` must still be below `u64::MAX` so the length fits.
    pub fn new(start: u64, end: u64, total: Option<u64>) -> Option<Self> {
        if start > end || end == u64::MAX {
            return None;
        }
        if let Some(total) = total
            && end >= total
        {
            return None;
        }
        Some(Self { start, end, total })
    }

    /// Parses a header value such as `bytes 13-31/50` or `bytes 0-9/*`.
    ///
    /// The unit is matched case-insensitively. Anything else, including unsatisfied
    /// ranges (`bytes */50`), yields `None`.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        let (unit, rest) = value.split_once(|c: char| c.is_ascii_whitespace())?;
        if !unit.eq_ignore_ascii_case("bytes") {
            return None;
        }

        let (range, total) = rest.trim_start().split_once('/')?;
        let (start, end) = range.split_once('-')?;
        let total = match total.trim_end() {
            "*" => None,
            total => Some(parse_decimal(total)?),
        };

        Self::new(parse_decimal(start)?, parse_decimal(end)?, total)
    }

    /// Offset of the first byte.
    #[inline]
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Offset of the last byte, inclusive.
    #[inline]
    pub fn end(&self) -> u64 {
        self.end
    }

    #[inline]
    pub fn total(&self) -> Option<u64> {
        self.total
    }

    /// Number of bytes covered, never zero.
    #[inline]
    #[allow(clippy::len_without_is_empty, reason = "an inclusive range is never empty")]
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }
}
