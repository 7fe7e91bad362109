//! Middleware layer.
//!
//! Middleware wraps a handler and post-processes what it returns. A filter is
//! itself a [`Handler`](crate::Handler), so it mounts on a route like any
//! other handler and can be wrapped again:
//!
//! ```rust,no_run
//! use tsu_length::middleware::ContentLength;
//! use tsu_length::{Method, Request, Response, Router};
//!
//! async fn hello(_req: Request) -> Response { Response::text("hello") }
//!
//! let app = Router::new().on(Method::GET, "/", ContentLength::new(hello));
//! ```
//!
//! Built-in middleware:
//! - [`content_length`] — fills in `Content-Length` when the body's size is known

pub mod content_length;

pub use content_length::{ContentLength, set_content_length};
