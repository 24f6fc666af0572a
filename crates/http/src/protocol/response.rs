//! HTTP response implementation.
//!
//! A [`Response`] is a [`Message`] plus a status code and an optional custom reason
//! phrase. Emitting it onto a transport is the job of
//! [`ResponseEmitter`](crate::emit::ResponseEmitter).

use std::fmt;

use http::StatusCode;

use crate::protocol::message::{format_head, version_str};
use crate::protocol::{Body, HeaderBag, HttpMessage, Message, ResponseError};
use crate::utils::{ensure, parse_decimal};

#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    reason: Option<String>,
    message: Message,
}

impl Response {
    pub fn new(status: StatusCode) -> Self {
        Self::from_parts(status, HeaderBag::new(), Body::empty())
    }

    pub fn from_parts(status: StatusCode, headers: HeaderBag, body: impl Into<Body>) -> Self {
        Self { status, reason: None, message: Message::with_parts(http::Version::HTTP_11, headers, body.into()) }
    }

    #[inline]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Sets the status code and drops any custom reason phrase.
    pub fn set_status_code(&mut self, status: StatusCode) {
        self.status = status;
        self.reason = None;
    }

    /// Sets the status from a plain integer.
    ///
    /// # Errors
    ///
    /// Returns [`ResponseError::InvalidStatus`] unless `100 <= status <= 999`.
    pub fn set_status(&mut self, status: u16) -> Result<(), ResponseError> {
        ensure!((100..=999).contains(&status), ResponseError::invalid_status(status));
        let status = StatusCode::from_u16(status).map_err(|e| {
            tracing::debug!(status, cause = %e, "status code rejected");
            ResponseError::invalid_status(status)
        })?;
        self.set_status_code(status);
        Ok(())
    }

    /// Sets the status from a line such as `"404 Not Found"` or `"299 Custom"`.
    ///
    /// A reason phrase that differs from the canonical one is kept as given.
    ///
    /// # Errors
    ///
    /// Returns [`ResponseError::InvalidStatusLine`] if the line does not start with a
    /// valid three digit code.
    pub fn set_status_line(&mut self, line: &str) -> Result<(), ResponseError> {
        let line = line.trim();
        let (code, reason) = line.split_once(' ').unwrap_or((line, ""));
        let code = parse_decimal(code)
            .and_then(|code| u16::try_from(code).ok())
            .ok_or_else(|| ResponseError::invalid_status_line(line))?;

        self.set_status(code).map_err(|e| {
            tracing::debug!(line, cause = %e, "status line rejected");
            ResponseError::invalid_status_line(line)
        })?;

        let reason = reason.trim();
        if !reason.is_empty() && Some(reason) != self.status.canonical_reason() {
            self.reason = Some(reason.to_string());
        }
        Ok(())
    }

    pub fn set_reason(&mut self, reason: impl Into<String>) {
        self.reason = Some(reason.into());
    }

    /// The reason phrase sent on the status line.
    ///
    /// This is the custom phrase when one is set, otherwise the canonical phrase of the
    /// status code, or `""` for codes without one.
    pub fn status_text(&self) -> &str {
        self.reason.as_deref().or_else(|| self.status.canonical_reason()).unwrap_or_default()
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new(StatusCode::OK)
    }
}

impl HttpMessage for Response {
    fn message(&self) -> &Message {
        &self.message
    }

    fn message_mut(&mut self) -> &mut Message {
        &mut self.message
    }

    fn start_line(&self) -> String {
        format!("HTTP/{} {} {}", version_str(self.version()), self.status.as_str(), self.status_text())
    }
}

impl AsRef<Message> for Response {
    fn as_ref(&self) -> &Message {
        &self.message
    }
}

impl AsMut<Message> for Response {
    fn as_mut(&mut self) -> &mut Message {
        &mut self.message
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_head(self))
    }
}
