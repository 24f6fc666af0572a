//! HTTP request implementation.
//!
//! A [`Request`] is a [`Message`] plus a method and an origin-relative url. On top of the
//! shared message accessors it resolves the url against a configurable base url, decodes
//! the query string and synthesizes an absolute url.

use std::collections::HashMap;
use std::fmt;

use http::Method;
use percent_encoding::percent_decode_str;
use serde::de::DeserializeOwned;

use crate::protocol::message::{format_head, version_str};
use crate::protocol::{Body, HeaderBag, HttpMessage, Message, RequestError};

#[derive(Debug)]
pub struct Request {
    method: Method,
    url: String,
    base_url: String,
    absolute_url: Option<String>,
    server_vars: Vec<(String, String)>,
    message: Message,
}

impl Request {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self::from_parts(method, url, HeaderBag::new(), Body::empty())
    }

    pub fn from_parts(method: Method, url: impl Into<String>, headers: HeaderBag, body: impl Into<Body>) -> Self {
        Self {
            method,
            url: url.into(),
            base_url: "/".to_string(),
            absolute_url: None,
            server_vars: Vec::new(),
            message: Message::with_parts(http::Version::HTTP_11, headers, body.into()),
        }
    }

    #[inline]
    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn set_method(&mut self, method: Method) {
        self.method = method;
    }

    /// The origin-relative url, including the query string.
    #[inline]
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    #[inline]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sets the prefix that [`Request::path`] resolves the url against, `/` by default.
    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.base_url = base_url.into();
    }

    /// Returns the url path relative to the base url, percent-decoded and without
    /// leading or trailing slashes.
    ///
    /// Duplicate slashes are collapsed and the query string is ignored. A url equal to
    /// the base url without its trailing slash resolves to `""`.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::OutOfScope`] if the url lies outside the base url, and
    /// [`RequestError::InvalidPath`] if the decoded path is not valid utf-8.
    pub fn path(&self) -> Result<String, RequestError> {
        let url = collapse_slashes(&self.url);
        let path = url.split_once('?').map_or(url.as_str(), |(path, _)| path);
        let base_url = collapse_slashes(&self.base_url);

        if let Some(rest) = path.strip_prefix(base_url.as_str()) {
            // `/base` must not match `/basement`
            if base_url.ends_with('/') || rest.is_empty() || rest.starts_with('/') {
                let decoded = percent_decode_str(rest).decode_utf8().map_err(|e| {
                    tracing::debug!(url = %self.url, cause = %e, "path is not valid utf-8");
                    RequestError::invalid_path(&self.url)
                })?;
                return Ok(decoded.trim_matches('/').to_string());
            }
        }

        if base_url.strip_suffix('/') == Some(path) {
            return Ok(String::new());
        }

        Err(RequestError::out_of_scope(&self.url, &self.base_url))
    }

    /// The raw query string, the part of the url after the first `?`.
    pub fn query_string(&self) -> Option<&str> {
        self.url.split_once('?').map(|(_, query)| query)
    }

    /// Decodes the query string as `application/x-www-form-urlencoded`.
    ///
    /// Repeated keys keep their last value. Without a query string the map is empty.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::InvalidQuery`] if the query can not be decoded.
    pub fn query_parameters(&self) -> Result<HashMap<String, String>, RequestError> {
        let Some(query) = self.query_string() else {
            return Ok(HashMap::new());
        };

        let pairs = serde_urlencoded::from_str::<Vec<(String, String)>>(query)
            .map_err(|e| RequestError::invalid_query(e.to_string()))?;
        Ok(pairs.into_iter().collect())
    }

    /// Decodes the query string into `T`, array-style keys such as `a[]=1&a[]=2` included.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::InvalidQuery`] if the query does not fit `T`.
    pub fn query<T>(&self) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
    {
        let query = self.query_string().unwrap_or_default();
        serde_qs::from_str::<T>(query).map_err(|e| RequestError::invalid_query(e.to_string()))
    }

    /// The absolute url of this request.
    ///
    /// Unless set explicitly, this is `http://` + the `Host` header (or `localhost`) + the
    /// url. Behind a proxy the result may not be what the client requested.
    pub fn absolute_url(&self) -> String {
        match &self.absolute_url {
            Some(absolute_url) => absolute_url.clone(),
            None => {
                let host = self.header("Host").unwrap_or("localhost");
                format!("http://{host}{}", self.url)
            }
        }
    }

    pub fn set_absolute_url(&mut self, absolute_url: impl Into<String>) {
        self.absolute_url = Some(absolute_url.into());
    }

    /// A raw value from the platform metadata this request was built from.
    pub fn server_value(&self, key: &str) -> Option<&str> {
        self.server_vars.iter().find(|(name, _)| name == key).map(|(_, value)| value.as_str())
    }

    pub fn set_server_vars(&mut self, server_vars: Vec<(String, String)>) {
        self.server_vars = server_vars;
    }
}

impl HttpMessage for Request {
    fn message(&self) -> &Message {
        &self.message
    }

    fn message_mut(&mut self) -> &mut Message {
        &mut self.message
    }

    fn start_line(&self) -> String {
        format!("{} {} HTTP/{}", self.method, self.url, version_str(self.version()))
    }
}

impl AsRef<Message> for Request {
    fn as_ref(&self) -> &Message {
        &self.message
    }
}

impl AsMut<Message> for Request {
    fn as_mut(&mut self) -> &mut Message {
        &mut self.message
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_head(self))
    }
}

fn collapse_slashes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c == '/' && out.ends_with('/') {
            continue;
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use serde::Deserialize;

    fn request(url: &str, base_url: &str) -> Request {
        let mut request = Request::new(Method::GET, url);
        request.set_base_url(base_url);
        request
    }

    #[test]
    fn test_path() {
        assert_eq!(request("/base/foo/bar", "/base").path().unwrap(), "foo/bar");
        assert_eq!(request("/base/foo/bar", "/base/").path().unwrap(), "foo/bar");
        assert_eq!(request("/base", "/base").path().unwrap(), "");
        assert_eq!(request("/base", "/base/").path().unwrap(), "");
        assert_eq!(request("/foo/bar/", "/").path().unwrap(), "foo/bar");
    }

    #[test]
    fn test_path_decodes_and_strips_query() {
        assert_eq!(request("/base//a%20b/c%2Fd?x=1", "/base/").path().unwrap(), "a b/c/d");
        assert_eq!(request("/base?x=1", "/base/").path().unwrap(), "");
    }

    #[test]
    fn test_path_out_of_scope() {
        assert!(matches!(request("/other/foo", "/base/").path(), Err(RequestError::OutOfScope { .. })));
        assert!(matches!(request("/basement", "/base").path(), Err(RequestError::OutOfScope { .. })));
    }

    #[test]
    fn test_path_rejects_invalid_utf8() {
        assert!(matches!(request("/base/%FF", "/base").path(), Err(RequestError::InvalidPath { .. })));
        assert!(matches!(request("/base/a%FEb", "/base/").path(), Err(RequestError::InvalidPath { .. })));
        assert_eq!(request("/base/%C3%A9t%C3%A9", "/base").path().unwrap(), "été");
    }

    #[test]
    fn test_query_parameters() {
        let req = request("/index/?a=1&b=hello+world&a=3&c=%2F", "/");
        let params = req.query_parameters().unwrap();

        assert_eq!(params.len(), 3);
        assert_eq!(params["a"], "3");
        assert_eq!(params["b"], "hello world");
        assert_eq!(params["c"], "/");

        assert!(request("/index", "/").query_parameters().unwrap().is_empty());
    }

    #[test]
    fn test_typed_query() {
        #[derive(Deserialize, Debug, PartialEq)]
        struct Params {
            name: String,
            ids: Vec<u32>,
        }

        let req = request("/search?name=zava&ids[0]=1&ids[1]=2", "/");
        let params: Params = req.query().unwrap();
        assert_eq!(params, Params { name: "zava".to_string(), ids: vec![1, 2] });

        assert!(matches!(req.query::<HashMap<String, u32>>(), Err(RequestError::InvalidQuery { .. })));
    }

    #[test]
    fn test_absolute_url() {
        let mut req = request("/foo?bar=1", "/");
        assert_eq!(req.absolute_url(), "http://localhost/foo?bar=1");

        req.set_header("Host", "example.org:8080");
        assert_eq!(req.absolute_url(), "http://example.org:8080/foo?bar=1");

        req.set_absolute_url("https://example.org/foo?bar=1");
        assert_eq!(req.absolute_url(), "https://example.org/foo?bar=1");
    }

    #[test]
    fn test_display() {
        let mut req = request("/index.html", "/");
        req.add_header("Host", "127.0.0.1:8080");
        req.add_header("Authorization", "Bearer secret-token");
        req.set_body("body is not rendered");

        let expected = indoc! {"
            GET /index.html HTTP/1.1
            Host: 127.0.0.1:8080
            Authorization: Bearer REDACTED

        "};
        assert_eq!(req.to_string(), expected.replace('\n', "\r\n"));
    }
}
