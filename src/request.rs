//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use http::Method;
use http_body_util::BodyExt;

use crate::error::Error;
use crate::headers::Headers;

/// An incoming HTTP request.
///
/// Filters pass it to the handler they wrap without looking at it. Outside a
/// server, build one directly:
///
/// ```rust
/// use tsu_length::{Method, Request};
///
/// let req = Request::new(Method::POST, "/users")
///     .with_header("content-type", "application/json")
///     .with_body(r#"{"name":"alice"}"#);
///
/// assert_eq!(req.header("Content-Type"), Some("application/json"));
/// ```
#[derive(Clone, Debug)]
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) headers: Headers,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    /// A request with no headers, no body and no path parameters.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Headers::new(),
            body: Bytes::new(),
            params: HashMap::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Reads a hyper request to the end of its body.
    pub(crate) async fn from_hyper(
        req: hyper::Request<hyper::body::Incoming>,
        params: HashMap<String, String>,
    ) -> Result<Self, Error> {
        let (parts, incoming) = req.into_parts();
        let body = incoming.collect().await?.to_bytes();
        let headers = parts.headers.iter()
            .filter_map(|(k, v)| Some((k.as_str(), v.to_str().ok()?)))
            .collect::<Headers>();

        Ok(Self {
            method: parts.method,
            path: parts.uri.path().to_owned(),
            headers,
            body,
            params,
        })
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &Headers { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{id}`, `req.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}
