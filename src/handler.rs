//! Handlers and the type-erased endpoints they are stored as.
//!
//! Every route and every filter ends up as an [`Endpoint`] trait object:
//! the router keeps one per route, and a filter such as
//! [`ContentLength`](crate::middleware::ContentLength) keeps the one it wraps.
//! Calling it is a single virtual call returning a boxed future.
//!
//! ```text
//! async fn report(req: Request) -> Response       plain handler
//! ContentLength::new(report)                      report.into_endpoint()
//! router.on(Method::GET, "/report", filter)       filter.into_endpoint()
//! endpoint.call(req).await                        Result<Response, Error>
//! ```
//!
//! Plain handlers cannot fail, so their futures always resolve to `Ok`.
//! Filters use the `Err` side to hand a broken response back to the caller
//! instead of sending it.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::Error;
use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// The future an [`Endpoint`] returns.
pub(crate) type ResponseFuture = Pin<Box<dyn Future<Output = Result<Response, Error>> + Send + 'static>>;

/// Object-safe call interface behind every [`Handler`].
///
/// Public only because [`Handler::into_endpoint`] names it.
#[doc(hidden)]
pub trait Endpoint {
    fn call(&self, req: Request) -> ResponseFuture;
}

/// An endpoint shared between the router and concurrent requests.
#[doc(hidden)]
pub type SharedEndpoint = Arc<dyn Endpoint + Send + Sync + 'static>;

/// Anything that can answer a request: an `async fn(Request) -> impl
/// IntoResponse`, a closure of the same shape, or a filter from
/// [`middleware`](crate::middleware).
///
/// Sealed; the crate provides every implementation.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_endpoint(self) -> SharedEndpoint;
}

pub(crate) mod private {
    pub trait Sealed {}
}

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_endpoint(self) -> SharedEndpoint {
        Arc::new(FnEndpoint(self))
    }
}

struct FnEndpoint<F>(F);

impl<F, Fut, R> Endpoint for FnEndpoint<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> ResponseFuture {
        let pending = (self.0)(req);
        Box::pin(async move { Ok(pending.await.into_response()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Method, StatusCode};

    #[tokio::test]
    async fn plain_handlers_always_resolve_ok() {
        async fn gone(_req: Request) -> StatusCode {
            StatusCode::GONE
        }

        let endpoint = gone.into_endpoint();
        let res = endpoint.call(Request::new(Method::GET, "/")).await.unwrap();
        assert_eq!(res.code(), 410);
    }

    #[tokio::test]
    async fn closures_see_the_request() {
        let endpoint = (|req: Request| async move { req.path().to_owned() }).into_endpoint();
        let res = endpoint.call(Request::new(Method::GET, "/echo")).await.unwrap();
        assert_eq!(res.into_body().collect().await.unwrap(), "/echo");
    }
}
