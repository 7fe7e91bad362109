//! `Content-Length` filter.
//!
//! Fills in `Content-Length` on the way out when the downstream response
//! does not have one and its length can be known without sending it.
//!
//! The header is left alone when:
//!
//! | Condition | Reason |
//! |---|---|
//! | `Content-Length` present (any casing, any value) | downstream already decided |
//! | `Transfer-Encoding` present (any value) | body is framed by the encoding |
//! | status is 1xx, 204, 205 or 304 | response has no body |
//! | body is a [`Body::Stream`](crate::body::Body::Stream) | length unknown until it runs |

use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::Error;
use crate::handler::{Endpoint, Handler, ResponseFuture, SharedEndpoint, private};
use crate::request::Request;
use crate::response::Response;
use crate::status::is_bodiless;

const CONTENT_LENGTH: &str = "Content-Length";
const TRANSFER_ENCODING: &str = "Transfer-Encoding";

/// Wraps a handler and sets `Content-Length` on the responses it returns.
///
/// ```rust
/// use tsu_length::middleware::ContentLength;
/// use tsu_length::{Method, Request, Response};
///
/// async fn hello(_req: Request) -> Response {
///     Response::text("Hello, World!")
/// }
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), tsu_length::Error> {
/// let res = ContentLength::new(hello)
///     .process(Request::new(Method::GET, "/"))
///     .await?;
///
/// assert_eq!(res.headers().get("content-length"), Some("13"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ContentLength {
    inner: SharedEndpoint,
}

impl ContentLength {
    pub fn new(handler: impl Handler) -> Self {
        Self { inner: handler.into_endpoint() }
    }

    /// Calls the wrapped handler once with `req` and post-processes its
    /// response with [`set_content_length`].
    pub async fn process(&self, req: Request) -> Result<Response, Error> {
        let mut res = self.inner.call(req).await?;
        set_content_length(&mut res)?;
        Ok(res)
    }
}

impl private::Sealed for ContentLength {}

impl Handler for ContentLength {
    fn into_endpoint(self) -> SharedEndpoint {
        Arc::new(self)
    }
}

impl Endpoint for ContentLength {
    fn call(&self, req: Request) -> ResponseFuture {
        let this = self.clone();
        Box::pin(async move { this.process(req).await })
    }
}

// ── Decision ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
    Set(u64),
    Skip(Skip),
}

/// Why the header was left as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Skip {
    AlreadySet,
    TransferEncoding,
    Bodiless(u16),
    Unmeasurable,
}

/// Sets `Content-Length` on `res` if it is missing and the body's length is
/// known, returning the length written.
///
/// The body is only borrowed: a `Chunks` body is measured by converting each
/// element and summing the lengths, and those converted bytes are what goes
/// out later. An element whose conversion fails aborts with [`Error::Chunk`]
/// and leaves the headers untouched.
pub fn set_content_length(res: &mut Response) -> Result<Option<u64>, Error> {
    match decide(res)? {
        Decision::Set(len) => {
            res.headers.insert(CONTENT_LENGTH, len.to_string());
            debug!(status = res.status, len, "content-length set");
            Ok(Some(len))
        }
        Decision::Skip(skip) => {
            trace!(status = res.status, ?skip, "content-length left unchanged");
            Ok(None)
        }
    }
}

fn decide(res: &Response) -> Result<Decision, Error> {
    let skip = if res.headers.contains(CONTENT_LENGTH) {
        Skip::AlreadySet
    } else if res.headers.contains(TRANSFER_ENCODING) {
        Skip::TransferEncoding
    } else if is_bodiless(res.status) {
        Skip::Bodiless(res.status)
    } else {
        return Ok(match res.body.measure()? {
            Some(len) => Decision::Set(len),
            None => Decision::Skip(Skip::Unmeasurable),
        });
    };
    Ok(Decision::Skip(skip))
}
