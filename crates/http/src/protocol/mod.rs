//! Core HTTP message abstractions.
//!
//! This module provides the in-memory model of HTTP requests and responses: an
//! ordered header bag, a body that may be buffered, streamed or produced on demand,
//! and the error types shared by the rest of the crate.
//!
//! # Architecture
//!
//! - **Headers** ([`header`]): [`HeaderBag`], an ordered, case-insensitive, multi-valued map
//!
//! - **Bodies** ([`body`]): [`Body`] and its chunked copy primitive
//!
//! - **Messages** ([`message`]): the shared [`Message`] value and the [`HttpMessage`] trait
//!   - [`Request`]: method, url, base url and query decoding
//!   - [`Response`]: status code and reason phrase
//!
//! - **Error Handling**:
//!   - [`HttpError`]: Top-level error type
//!   - [`RequestError`]: request construction and url resolution errors
//!   - [`BodyError`]: body consumption errors
//!   - [`ResponseError`]: status errors
//!   - [`SendError`]: response emission errors
//!   - [`ConfigError`]: emitter configuration errors
//!
//! Messages are plain values: they are mutated freely until they are handed to the
//! emitter, and are not meant to be shared between threads while doing so.

pub mod header;
pub use header::HeaderBag;

pub mod message;
pub use message::HttpMessage;
pub use message::Message;

mod request;
pub use request::Request;

mod response;
pub use response::Response;

mod error;
pub use error::BodyError;
pub use error::ConfigError;
pub use error::HttpError;
pub use error::RequestError;
pub use error::ResponseError;
pub use error::SendError;

pub mod body;
pub use body::Body;
