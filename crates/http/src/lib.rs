//! A small synchronous HTTP message model and response emitter
//!
//! This crate provides in-memory HTTP requests and responses for server applications that
//! sit behind a web server interface, plus the machinery that writes a response back out
//! over a blocking transport. It focuses on getting the framing right: the body that reaches
//! the wire matches the `Content-Length` and `Content-Range` the response announces.
//!
//! # Features
//!
//! - Ordered, case-insensitive, multi-valued headers
//! - Bodies held in memory, read from a stream, or produced on demand by a callback
//! - Chunked body copy that stops exactly at the announced length
//! - Partial content: the body window is derived from `Content-Range`
//! - Base url resolution and query string decoding
//! - Construction of requests from CGI-style server variables
//! - Clean error handling
//!
//! # Example
//!
//! ```
//! use http::StatusCode;
//! use micro_sapi::emit::send_response;
//! use micro_sapi::protocol::{Body, HttpMessage, Response};
//! use micro_sapi::sapi::request_from_server_vars;
//!
//! let request = request_from_server_vars([
//!     ("REQUEST_METHOD", "GET"),
//!     ("REQUEST_URI", "/greeting"),
//! ])
//! .unwrap();
//! assert_eq!(request.path().unwrap(), "greeting");
//!
//! let mut response = Response::new(StatusCode::OK);
//! response.set_header("Content-Length", "5");
//! response.set_body(Body::from("Hello World!"));
//!
//! let mut wire = Vec::new();
//! send_response(&mut response, &mut wire).unwrap();
//! assert_eq!(wire, b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nHello");
//! ```
//!
//! # Architecture
//!
//! The crate is organized into several key modules:
//!
//! - [`protocol`]: headers, bodies, messages and error types
//! - [`codec`]: head line encoding and `Content-Range` parsing
//! - [`emit`]: the response emitter and its transport adapter
//! - [`sapi`]: request construction from server variables
//!
//! # Core Components
//!
//! ## Messages
//!
//! [`protocol::Request`] and [`protocol::Response`] share their version, headers and body
//! through [`protocol::Message`]; the [`protocol::HttpMessage`] trait gives both the same
//! header and body accessors.
//!
//! ## Emission
//!
//! [`emit::ResponseEmitter`] writes the status line and headers through an
//! [`emit::HeadWriter`], then copies the body in chunks of
//! [`protocol::body::DEFAULT_CHUNK_SIZE`] bytes unless configured otherwise.
//!
//! ## Error Handling
//!
//! The crate uses custom error types that implement `std::error::Error`:
//!
//! - [`protocol::HttpError`]: Top-level error type
//! - [`protocol::RequestError`]: Request construction and url errors
//! - [`protocol::SendError`]: Response sending errors
//!
//! # Limitations
//!
//! - Blocking I/O only, emission happens on the calling thread
//! - Requests are not parsed from raw bytes, they come from server variables
//! - No transfer or content encoding

pub mod codec;
pub mod emit;
pub mod protocol;
pub mod sapi;

mod utils;
