//! HTTP codec module for the text parts of a response.
//!
//! This module turns response heads into HTTP/1.x wire text and reads the headers
//! that shape how a body is emitted.
//!
//! # Components
//!
//! - [`HeadEncoder`]: encodes the status line and header lines into a `BytesMut`,
//!   implementing `tokio_util::codec::Encoder`
//! - [`ContentRange`]: parses `Content-Range: bytes <start>-<end>/<total>`
//!
//! # Example
//!
//! ```
//! use bytes::BytesMut;
//! use http::{StatusCode, Version};
//! use micro_sapi::codec::{HeadEncoder, HeadLine};
//! use tokio_util::codec::Encoder;
//!
//! let mut encoder = HeadEncoder::new();
//! let mut buffer = BytesMut::new();
//! encoder.encode(HeadLine::Status { version: Version::HTTP_11, status: StatusCode::OK, reason: "OK" }, &mut buffer).unwrap();
//! encoder.encode(HeadLine::End, &mut buffer).unwrap();
//!
//! assert_eq!(&buffer[..], b"HTTP/1.1 200 OK\r\n\r\n");
//! ```

mod content_range;
mod head_encoder;

pub use content_range::ContentRange;
pub use head_encoder::{HeadEncoder, HeadLine, INIT_HEAD_SIZE};
