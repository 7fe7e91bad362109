//! Outgoing HTTP response type and the [`IntoResponse`] conversion trait.
//!
//! A [`Response`] is the triple every handler and filter passes along:
//! a status code, a [`Headers`] mapping and a [`Body`]. Build one in your
//! handler and return it; filters such as
//! [`ContentLength`](crate::middleware::ContentLength) take it apart with
//! [`Response::headers_mut`] or [`Response::into_parts`] and hand it on.

use bytes::Bytes;
use http_body_util::combinators::UnsyncBoxBody;

use crate::body::{Body, Chunk};
use crate::error::Error;
use crate::headers::Headers;

// ── ContentType ───────────────────────────────────────────────────────────────

/// Content-type values for use with [`ResponseBuilder::chunks`].
pub enum ContentType {
    Csv,   // text/csv
    Text,  // text/plain; charset=utf-8
}

impl ContentType {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Csv  => "text/csv",
            Self::Text => "text/plain; charset=utf-8",
        }
    }
}

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing HTTP response.
///
/// # Shortcuts (200 OK)
///
/// ```rust
/// use tsu_length::{Response, StatusCode};
///
/// Response::json(br#"{"id":1}"#.to_vec());
/// Response::text("hello");
/// Response::status(StatusCode::NO_CONTENT);
/// ```
///
/// # Builder (custom status, headers or body shape)
///
/// ```rust
/// use tsu_length::{ContentType, Response, StatusCode};
///
/// Response::builder()
///     .status(StatusCode::CREATED)
///     .header("location", "/users/42")
///     .json(br#"{"id":42}"#.to_vec());
///
/// Response::builder()
///     .chunks(ContentType::Csv, ["id,name\n", "1,alice\n"]);
/// ```
#[derive(Debug)]
pub struct Response {
    pub(crate) status: u16,
    pub(crate) headers: Headers,
    pub(crate) body: Body,
}

impl Response {
    /// `200 OK` — `application/json`.
    pub fn json(body: Vec<u8>) -> Self {
        Self::with_type("application/json", body.into())
    }

    /// `200 OK` — `text/plain; charset=utf-8`.
    pub fn text(body: impl Into<String>) -> Self {
        Self::with_type("text/plain; charset=utf-8", body.into().into())
    }

    /// Response with no body.
    pub fn status(code: impl Into<u16>) -> Self {
        Self { status: code.into(), headers: Headers::new(), body: Body::empty() }
    }

    /// Builder for responses that need a custom status, extra headers, or a
    /// chunked or streaming body.
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder { headers: Headers::new(), status: 200 }
    }

    /// Reassembles a response from its three parts.
    pub fn from_parts(status: u16, headers: Headers, body: impl Into<Body>) -> Self {
        Self { status, headers, body: body.into() }
    }

    /// Splits the response into `(status, headers, body)`.
    pub fn into_parts(self) -> (u16, Headers, Body) {
        (self.status, self.headers, self.body)
    }

    pub fn code(&self) -> u16 { self.status }
    pub fn headers(&self) -> &Headers { &self.headers }
    pub fn headers_mut(&mut self) -> &mut Headers { &mut self.headers }
    pub fn body(&self) -> &Body { &self.body }
    pub fn into_body(self) -> Body { self.body }

    fn with_type(content_type: &str, body: Body) -> Self {
        Self {
            status: 200,
            headers: Headers::from([("content-type", content_type)]),
            body,
        }
    }

    /// Converts into the `http` response hyper writes to the wire.
    ///
    /// Fails if the status is outside 100–999 or a header name or value is
    /// not valid on the wire.
    pub(crate) fn into_inner(self) -> Result<http::Response<UnsyncBoxBody<Bytes, Error>>, Error> {
        let mut builder = http::Response::builder().status(self.status);
        for (name, value) in self.headers {
            builder = builder.header(name, value);
        }
        Ok(builder.body(self.body.into_http_body())?)
    }
}

// ── ResponseBuilder ───────────────────────────────────────────────────────────

/// Fluent builder for [`Response`].
///
/// Obtain via [`Response::builder()`]. Defaults to `200 OK`.
/// Terminated by a typed body method — you always know what you're sending.
pub struct ResponseBuilder {
    headers: Headers,
    status: u16,
}

impl ResponseBuilder {
    pub fn status(mut self, code: impl Into<u16>) -> Self {
        self.status = code.into();
        self
    }

    /// Appends a header. Repeated names are kept (e.g. `set-cookie`).
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Terminate with a JSON body (`application/json`).
    pub fn json(self, body: Vec<u8>) -> Response {
        self.finish("application/json", body.into())
    }

    /// Terminate with a body sent as a sequence of elements.
    pub fn chunks<I, C>(self, content_type: ContentType, items: I) -> Response
    where
        I: IntoIterator<Item = C>,
        C: Chunk,
    {
        self.finish(content_type.as_str(), Body::chunks(items))
    }

    /// Terminate with any [`Body`], adding no content-type of its own.
    pub fn body(self, body: impl Into<Body>) -> Response {
        Response { status: self.status, headers: self.headers, body: body.into() }
    }

    fn finish(self, content_type: &str, body: Body) -> Response {
        let mut headers = Headers::from([("content-type", content_type)]);
        for (name, value) in self.headers {
            headers.append(&name, value);
        }
        Response { status: self.status, headers, body }
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into an HTTP [`Response`].
///
/// Implement on your own types to return them directly from handlers.
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response { self }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response { Response::text(self) }
}

impl IntoResponse for String {
    fn into_response(self) -> Response { Response::text(self) }
}

/// `200 OK` with the body and no content-type.
impl IntoResponse for Body {
    fn into_response(self) -> Response { Response::builder().body(self) }
}

/// Return a status directly from a handler: `return StatusCode::NOT_FOUND`
impl IntoResponse for http::StatusCode {
    fn into_response(self) -> Response { Response::status(self) }
}
