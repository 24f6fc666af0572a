//! Response emission onto a blocking transport.
//!
//! This module writes a [`Response`](crate::protocol::Response) out: the status line
//! and headers first, then the body, limited to the window the response headers
//! announce.
//!
//! # Components
//!
//! - [`ResponseEmitter`]: drives emission of one response
//! - [`EmitPlan`]: the `skip`/`limit` window derived from `Content-Length` and `Content-Range`
//! - [`HeadWriter`]: the status-line and header-line surface a transport implements
//! - [`MessageWriter`]: a [`HeadWriter`] + [`std::io::Write`] adapter over any blocking writer
//! - [`EmitterConfig`]: chunk size and head buffer tunables
//!
//! # Concurrency
//!
//! Emission is synchronous: every read from the body source and every write to the
//! transport happens on the calling thread. Backpressure comes only from the
//! transport blocking on write.

mod config;
mod emitter;
mod message_writer;

pub use config::{EmitterConfig, ResponseEmitterBuilder};
pub use emitter::{EmitPlan, HeadWriter, ResponseEmitter, send_response};
pub use message_writer::MessageWriter;
