//! Translation of CGI-style server variables into a [`Request`].
//!
//! Web server interfaces describe an incoming request as a flat map of variables such
//! as `REQUEST_METHOD`, `REQUEST_URI` and `HTTP_*`. [`request_from_server_vars`] turns
//! such a map into a [`Request`] once, at the boundary, without touching any I/O.
//!
//! # Authorization
//!
//! Servers may expose credentials in several places at once. The `Authorization` header
//! is taken from the first source present, in this order:
//!
//! 1. `REDIRECT_HTTP_AUTHORIZATION`, passed through verbatim
//! 2. `PHP_AUTH_USER` with `PHP_AUTH_PW`, as `Basic base64(user:pass)`
//! 3. `PHP_AUTH_DIGEST`, as `Digest <token>`
//! 4. `HTTP_AUTHORIZATION`, passed through verbatim
//!
//! # Example
//!
//! ```
//! use micro_sapi::protocol::HttpMessage;
//! use micro_sapi::sapi::request_from_server_vars;
//!
//! let request = request_from_server_vars([
//!     ("REQUEST_METHOD", "GET"),
//!     ("REQUEST_URI", "/index.html?a=1"),
//!     ("HTTP_HOST", "example.org"),
//!     ("HTTP_X_FORWARDED_FOR", "10.0.0.1"),
//! ])
//! .unwrap();
//!
//! assert_eq!(request.header("X-Forwarded-For"), Some("10.0.0.1"));
//! assert_eq!(request.absolute_url(), "http://example.org/index.html?a=1");
//! ```

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use http::{Method, Version};
use tracing::debug;

use crate::protocol::message::parse_protocol;
use crate::protocol::{HeaderBag, HttpMessage, Request, RequestError};

const AUTHORIZATION: &str = "Authorization";

/// Builds a [`Request`] from server variables, see the [module docs](self).
///
/// Variables are processed in iteration order, which also fixes header order. The full
/// variable set stays available through [`Request::server_value`]. The body is left
/// empty for the caller to attach.
///
/// # Errors
///
/// Returns [`RequestError::MissingRequiredField`] when `REQUEST_URI` or
/// `REQUEST_METHOD` is absent, and [`RequestError::InvalidMethod`] when the method is
/// not a valid token.
pub fn request_from_server_vars<I, K, V>(vars: I) -> Result<Request, RequestError>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let vars: Vec<(String, String)> = vars.into_iter().map(|(key, value)| (key.into(), value.into())).collect();
    let lookup = |key: &str| vars.iter().find(|(name, _)| name == key).map(|(_, value)| value.as_str());

    let url = lookup("REQUEST_URI").ok_or_else(|| RequestError::missing_required_field("REQUEST_URI"))?;
    let method = lookup("REQUEST_METHOD").ok_or_else(|| RequestError::missing_required_field("REQUEST_METHOD"))?;
    let method = Method::from_bytes(method.as_bytes()).map_err(|e| {
        debug!(method, cause = %e, "invalid request method");
        RequestError::InvalidMethod
    })?;

    let version = lookup("SERVER_PROTOCOL")
        .and_then(parse_protocol)
        .filter(|version| *version == Version::HTTP_10 || *version == Version::HTTP_2)
        .unwrap_or(Version::HTTP_11);

    let mut headers = HeaderBag::new();
    let mut host = "localhost";
    let mut scheme = "http";
    for (key, value) in &vars {
        match key.as_str() {
            "CONTENT_TYPE" => headers.set("Content-Type", value.as_str()),
            "CONTENT_LENGTH" => headers.set("Content-Length", value.as_str()),
            "HTTPS" => {
                if !value.is_empty() && value != "off" {
                    scheme = "https";
                }
            }
            "HTTP_HOST" => {
                host = value.as_str();
                headers.set("Host", value.as_str());
            }
            key => {
                if let Some(name) = key.strip_prefix("HTTP_") {
                    headers.set(header_name(name), value.as_str());
                }
            }
        }
    }

    if let Some(authorization) = authorization(&lookup) {
        headers.set(AUTHORIZATION, authorization);
    }

    let mut request = Request::from_parts(method, url, headers, ());
    request.set_version(version);
    request.set_absolute_url(format!("{scheme}://{host}{url}"));
    request.set_server_vars(vars.clone());
    Ok(request)
}

/// Picks the synthesized `Authorization` value, `HTTP_AUTHORIZATION` is already a header.
fn authorization<'a>(lookup: &impl Fn(&str) -> Option<&'a str>) -> Option<String> {
    if let Some(redirected) = lookup("REDIRECT_HTTP_AUTHORIZATION") {
        return Some(redirected.to_string());
    }

    if let (Some(user), Some(password)) = (lookup("PHP_AUTH_USER"), lookup("PHP_AUTH_PW")) {
        return Some(format!("Basic {}", STANDARD.encode(format!("{user}:{password}"))));
    }

    lookup("PHP_AUTH_DIGEST").map(|digest| format!("Digest {digest}"))
}

/// `X_FORWARDED_FOR` becomes `X-Forwarded-For`.
fn header_name(var: &str) -> String {
    var.split('_')
        .map(|word| {
            let word = word.to_ascii_lowercase();
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// Decodes the user and password of a `Basic` `Authorization` header.
///
/// Returns `None` when the header is absent, uses another scheme, or does not decode
/// to `user:password`.
pub fn basic_credentials(request: &Request) -> Option<(String, String)> {
    let value = request.header(AUTHORIZATION)?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(token.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, password) = decoded.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}
