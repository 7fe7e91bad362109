//! # tsu-length
//!
//! A `Content-Length` filter for the tsu HTTP stack, plus the small framework
//! it runs in.
//!
//! Handlers return a [`Response`]: a status, a [`Headers`] mapping and a
//! [`Body`]. Wrap a handler in [`middleware::ContentLength`] and every
//! response it returns gets a `Content-Length` header, unless
//!
//! - the handler already set one, or set `Transfer-Encoding`,
//! - the status never has a body (1xx, 204, 205, 304), or
//! - the body is a stream whose size is unknown until it is sent.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use tsu_length::middleware::ContentLength;
//! use tsu_length::{ContentType, Method, Request, Response, Router, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), tsu_length::Error> {
//!     let app = Router::new()
//!         .on(Method::GET, "/users/{id}", ContentLength::new(get_user))
//!         .on(Method::GET, "/report",     ContentLength::new(report));
//!
//!     Server::bind("0.0.0.0:3000")?.serve(app).await
//! }
//!
//! async fn get_user(req: Request) -> Response {
//!     let id = req.param("id").unwrap_or("unknown");
//!     Response::json(format!(r#"{{"id":"{id}"}}"#).into_bytes())
//! }
//!
//! // Sent as three frames, with the total length announced up front.
//! async fn report(_req: Request) -> Response {
//!     Response::builder().chunks(ContentType::Csv, ["id,name\n", "1,alice\n", "2,bob\n"])
//! }
//! ```

mod error;
mod handler;
mod headers;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod body;
pub mod middleware;

pub use body::Body;
pub use error::Error;
pub use handler::Handler;
pub use headers::Headers;
pub use http::Method;
pub use request::Request;
pub use response::{ContentType, IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use status::{StatusCode, is_bodiless};
