use std::io;
use std::str::Utf8Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request error: {source}")]
    RequestError {
        #[from]
        source: RequestError,
    },

    #[error("response error: {source}")]
    ResponseError {
        #[from]
        source: ResponseError,
    },

    #[error("body error: {source}")]
    BodyError {
        #[from]
        source: BodyError,
    },

    #[error("send error: {source}")]
    SendError {
        #[from]
        source: SendError,
    },

    #[error("config error: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },
}

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("server variables must contain the {field} key")]
    MissingRequiredField { field: &'static str },

    #[error("requested url ({url}) is out of base url ({base_url})")]
    OutOfScope { url: String, base_url: String },

    #[error("requested path ({url}) is not valid utf-8 once decoded")]
    InvalidPath { url: String },

    #[error("invalid http method")]
    InvalidMethod,

    #[error("invalid query string: {reason}")]
    InvalidQuery { reason: String },
}

impl RequestError {
    pub fn missing_required_field(field: &'static str) -> Self {
        Self::MissingRequiredField { field }
    }

    pub fn out_of_scope<U: ToString, B: ToString>(url: U, base_url: B) -> Self {
        Self::OutOfScope { url: url.to_string(), base_url: base_url.to_string() }
    }

    pub fn invalid_path<U: ToString>(url: U) -> Self {
        Self::InvalidPath { url: url.to_string() }
    }

    pub fn invalid_query<S: ToString>(str: S) -> Self {
        Self::InvalidQuery { reason: str.to_string() }
    }
}

#[derive(Error, Debug)]
pub enum BodyError {
    #[error("unsupported body operation: {operation}")]
    UnsupportedOperation { operation: &'static str },

    #[error("body is not valid utf-8: {source}")]
    InvalidUtf8 {
        #[from]
        source: Utf8Error,
    },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl BodyError {
    pub fn unsupported(operation: &'static str) -> Self {
        Self::UnsupportedOperation { operation }
    }
}

#[derive(Error, Debug)]
pub enum ResponseError {
    #[error("invalid status code: {status}")]
    InvalidStatus { status: u16 },

    #[error("invalid status line: {line}")]
    InvalidStatusLine { line: String },
}

impl ResponseError {
    pub fn invalid_status(status: u16) -> Self {
        Self::InvalidStatus { status }
    }

    pub fn invalid_status_line<S: ToString>(str: S) -> Self {
        Self::InvalidStatusLine { line: str.to_string() }
    }
}

#[derive(Error, Debug)]
pub enum SendError {
    #[error("invalid head: {reason}")]
    InvalidHead { reason: String },

    #[error("body error: {source}")]
    Body {
        #[from]
        source: BodyError,
    },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn invalid_head<S: ToString>(str: S) -> Self {
        Self::InvalidHead { reason: str.to_string() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("chunk size must be greater than zero")]
    ZeroChunkSize,

    #[error("head buffer capacity must be greater than zero")]
    ZeroHeadBuffer,
}
