//! The message model shared by requests and responses.
//!
//! A [`Message`] holds the protocol version, a [`HeaderBag`] and a [`Body`]. Both
//! [`Request`](crate::protocol::Request) and [`Response`](crate::protocol::Response) embed
//! one and expose it through the [`HttpMessage`] trait, which provides the common
//! header and body accessors.

use std::mem;

use bytes::Bytes;
use http::Version;

use crate::protocol::{Body, BodyError, HeaderBag};

/// Replaces credential material when an `Authorization` header is rendered for diagnostics.
pub const REDACTED: &str = "REDACTED";

/// Version, headers and body of an HTTP message.
#[derive(Debug, Default)]
pub struct Message {
    version: Version,
    headers: HeaderBag,
    body: Body,
}

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parts(version: Version, headers: HeaderBag, body: Body) -> Self {
        Self { version, headers, body }
    }

    #[inline]
    pub fn version(&self) -> Version {
        self.version
    }

    pub fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    #[inline]
    pub fn headers(&self) -> &HeaderBag {
        &self.headers
    }

    #[inline]
    pub fn headers_mut(&mut self) -> &mut HeaderBag {
        &mut self.headers
    }

    #[inline]
    pub fn body(&self) -> &Body {
        &self.body
    }

    #[inline]
    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    pub fn set_body(&mut self, body: impl Into<Body>) {
        self.body = body.into();
    }

    /// Takes the body out of the message, leaving an empty one behind.
    pub fn take_body(&mut self) -> Body {
        mem::take(&mut self.body)
    }

    pub fn into_parts(self) -> (Version, HeaderBag, Body) {
        (self.version, self.headers, self.body)
    }
}

/// Common accessors of requests and responses.
///
/// Implementors only provide access to their embedded [`Message`] and their start line;
/// everything else is derived from those.
pub trait HttpMessage {
    fn message(&self) -> &Message;

    fn message_mut(&mut self) -> &mut Message;

    /// First line of the serialized message, without the line terminator.
    fn start_line(&self) -> String;

    fn version(&self) -> Version {
        self.message().version()
    }

    fn set_version(&mut self, version: Version) {
        self.message_mut().set_version(version);
    }

    fn headers(&self) -> &HeaderBag {
        self.message().headers()
    }

    fn headers_mut(&mut self) -> &mut HeaderBag {
        self.message_mut().headers_mut()
    }

    /// First value of the header `name`, case-insensitive.
    fn header(&self, name: &str) -> Option<&str> {
        self.headers().get(name)
    }

    fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers().get_all(name)
    }

    fn has_header(&self, name: &str) -> bool {
        self.headers().contains(name)
    }

    fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>)
    where
        Self: Sized,
    {
        self.headers_mut().set(name, value);
    }

    fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>)
    where
        Self: Sized,
    {
        self.headers_mut().add(name, value);
    }

    fn remove_header(&mut self, name: &str) -> Option<Vec<String>> {
        self.headers_mut().remove(name)
    }

    fn body(&self) -> &Body {
        self.message().body()
    }

    fn body_mut(&mut self) -> &mut Body {
        self.message_mut().body_mut()
    }

    fn set_body(&mut self, body: impl Into<Body>)
    where
        Self: Sized,
    {
        self.message_mut().set_body(body);
    }

    fn take_body(&mut self) -> Body {
        self.message_mut().take_body()
    }

    /// Materializes the whole body, see [`Body::read_all`].
    ///
    /// # Errors
    ///
    /// Fails for a deferred body or when reading a stream fails.
    fn body_as_bytes(&mut self) -> Result<Bytes, BodyError> {
        self.body_mut().read_all()
    }

    /// Materializes the whole body as utf-8 text.
    ///
    /// # Errors
    ///
    /// Fails like [`HttpMessage::body_as_bytes`], or with [`BodyError::InvalidUtf8`].
    fn body_as_string(&mut self) -> Result<String, BodyError> {
        let bytes = self.body_as_bytes()?;
        Ok(std::str::from_utf8(&bytes)?.to_owned())
    }
}

/// Renders the start line and headers of a message for logs and debugging.
///
/// `Authorization` values keep their scheme token only, the rest is replaced with
/// [`REDACTED`]. The message itself is left untouched and the body is never rendered.
pub fn format_head<M>(message: &M) -> String
where
    M: HttpMessage + ?Sized,
{
    let mut out = message.start_line();
    out.push_str("\r\n");
    for (name, value) in message.headers().lines() {
        out.push_str(name);
        out.push_str(": ");
        if name.eq_ignore_ascii_case("authorization") {
            out.push_str(&redact_authorization(value));
        } else {
            out.push_str(value);
        }
        out.push_str("\r\n");
    }
    out.push_str("\r\n");
    out
}

fn redact_authorization(value: &str) -> String {
    match value.split_once(' ') {
        Some((scheme, _)) => format!("{scheme} {REDACTED}"),
        None => REDACTED.to_string(),
    }
}

/// Formats a version the way it appears after `HTTP/` on the wire.
pub fn version_str(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2.0",
        Version::HTTP_3 => "3.0",
        _ => "1.1",
    }
}

/// Parses a bare version number such as `"1.0"` or `"2"`.
pub fn parse_version(s: &str) -> Option<Version> {
    match s {
        "0.9" => Some(Version::HTTP_09),
        "1.0" => Some(Version::HTTP_10),
        "1.1" => Some(Version::HTTP_11),
        "2" | "2.0" => Some(Version::HTTP_2),
        "3" | "3.0" => Some(Version::HTTP_3),
        _ => None,
    }
}

/// Parses a protocol token such as `"HTTP/1.0"`.
pub fn parse_protocol(s: &str) -> Option<Version> {
    s.strip_prefix("HTTP/").and_then(parse_version)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain(Message);

    impl HttpMessage for Plain {
        fn message(&self) -> &Message {
            &self.0
        }

        fn message_mut(&mut self) -> &mut Message {
            &mut self.0
        }

        fn start_line(&self) -> String {
            format!("PLAIN/{}", version_str(self.version()))
        }
    }

    #[test]
    fn test_accessors() {
        let mut message = Plain(Message::new());
        assert_eq!(message.version(), Version::HTTP_11);

        message.set_header("Content-Type", "text/plain");
        message.add_header("X-Foo", "1");
        message.add_header("x-foo", "2");

        assert_eq!(message.header("content-type"), Some("text/plain"));
        assert_eq!(message.header_values("X-FOO"), vec!["1", "2"]);
        assert!(message.has_header("x-foo"));

        message.remove_header("X-Foo");
        assert!(!message.has_header("x-foo"));
    }

    #[test]
    fn test_body_as_string() {
        let mut message = Plain(Message::new());
        message.set_body("hello");
        assert_eq!(message.body_as_string().unwrap(), "hello");

        message.set_body(vec![0xff, 0xfe]);
        assert!(matches!(message.body_as_string(), Err(BodyError::InvalidUtf8 { .. })));

        message.set_body(Body::deferred(|_| Ok(())));
        assert!(matches!(message.body_as_bytes(), Err(BodyError::UnsupportedOperation { .. })));
    }

    #[test]
    fn test_take_body() {
        let mut message = Plain(Message::new());
        message.set_body("content");

        let mut body = message.take_body();
        assert_eq!(body.read_all().unwrap(), Bytes::from("content"));
        assert!(message.body().is_empty());
    }

    #[test]
    fn test_format_head_redacts_authorization() {
        let mut message = Plain(Message::new());
        message.add_header("Authorization", "Basic dXNlcjpwYXNz");
        message.add_header("X-Foo", "bar");

        assert_eq!(format_head(&message), "PLAIN/1.1\r\nAuthorization: Basic REDACTED\r\nX-Foo: bar\r\n\r\n");
        assert_eq!(message.header("Authorization"), Some("Basic dXNlcjpwYXNz"));
    }

    #[test]
    fn test_format_head_repeats_names() {
        let mut message = Plain(Message::new());
        message.add_header("Set-Cookie", "a=1");
        message.add_header("set-cookie", "b=2");
        message.add_header("Authorization", "token");

        assert_eq!(
            format_head(&message),
            "PLAIN/1.1\r\nSet-Cookie: a=1\r\nSet-Cookie: b=2\r\nAuthorization: REDACTED\r\n\r\n"
        );
    }

    #[test]
    fn test_redact_without_scheme() {
        assert_eq!(redact_authorization("opaque-token"), "REDACTED");
        assert_eq!(redact_authorization("Digest a=b, c=d"), "Digest REDACTED");
    }

    #[test]
    fn test_versions() {
        assert_eq!(parse_version("1.0"), Some(Version::HTTP_10));
        assert_eq!(parse_version("2"), Some(Version::HTTP_2));
        assert_eq!(parse_version("4.0"), None);
        assert_eq!(parse_protocol("HTTP/2.0"), Some(Version::HTTP_2));
        assert_eq!(parse_protocol("1.1"), None);

        for version in [Version::HTTP_10, Version::HTTP_11, Version::HTTP_2] {
            assert_eq!(parse_version(version_str(version)), Some(version));
        }
    }
}
