//! HTTP message body handling.
//!
//! A [`Body`] is either fully buffered bytes, a readable stream, or a deferred producer
//! that writes directly into the output sink. The readable variants share one chunked
//! copy primitive, [`Body::copy_to`], which the response emitter uses to send a
//! byte window of the body without buffering it.
//!
//! # Design Goals
//!
//! 1. **Memory Efficiency**
//!    - Stream bodies in bounded chunks ([`DEFAULT_CHUNK_SIZE`] bytes) instead of buffering
//!    - Never read past the requested byte window
//!
//! 2. **Explicit Consumption**
//!    - A stream is single-consumer; reading advances its cursor
//!    - A deferred producer runs at most once and can not be materialized
//!
//! 3. **Tolerance**
//!    - A source shorter than the requested window writes fewer bytes, it is not an error

mod copy;
mod payload;

pub use copy::DEFAULT_CHUNK_SIZE;
pub use payload::Body;
pub use payload::Producer;
