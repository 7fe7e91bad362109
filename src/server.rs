//! Accept loop, per-connection service and graceful stop.
//!
//! Every accepted socket becomes one task in a `JoinSet`, served by hyper's
//! `auto` connection builder (HTTP/1.1 or HTTP/2, as the client speaks).
//! Once the stop future resolves, no further sockets are accepted and the
//! call returns after the open connection tasks have finished.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::combinators::UnsyncBoxBody;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::error::Error;
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;
use crate::status::StatusCode;

/// Serves a [`Router`] over TCP.
pub struct Server {
    addr: SocketAddr,
}

impl Server {
    /// Parses `addr`; nothing is bound until [`serve`](Server::serve).
    ///
    /// ```rust,no_run
    /// use tsu_length::Server;
    /// let server = Server::bind("0.0.0.0:3000")?;
    /// # Ok::<(), tsu_length::Error>(())
    /// ```
    pub fn bind(addr: &str) -> Result<Self, Error> {
        Ok(Self { addr: addr.parse()? })
    }

    /// Binds the configured address and serves `router` until SIGTERM or
    /// Ctrl-C.
    pub async fn serve(self, router: Router) -> Result<(), Error> {
        let listener = TcpListener::bind(self.addr).await?;
        Self::serve_with_listener(listener, router).await
    }

    /// Serves `router` on an already bound listener until SIGTERM or Ctrl-C.
    ///
    /// Bind `127.0.0.1:0` and read [`TcpListener::local_addr`] to run on a
    /// free port.
    pub async fn serve_with_listener(listener: TcpListener, router: Router) -> Result<(), Error> {
        Self::serve_until(listener, router, shutdown_signal()).await
    }

    /// Serves `router` on `listener` until `stop` resolves, then waits for
    /// the connections already accepted.
    pub async fn serve_until(
        listener: TcpListener,
        router: Router,
        stop: impl Future<Output = ()>,
    ) -> Result<(), Error> {
        let local = listener.local_addr()?;
        let router = Arc::new(router);
        let mut connections = JoinSet::new();

        info!(addr = %local, "tsu-length listening");

        tokio::pin!(stop);
        loop {
            tokio::select! {
                biased;

                () = &mut stop => break,

                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        connections.spawn(serve_connection(Arc::clone(&router), stream, peer));
                    }
                    Err(e) => warn!("accept failed: {e}"),
                },

                Some(_) = connections.join_next(), if !connections.is_empty() => {}
            }
        }

        info!(open = connections.len(), "stop requested, waiting for open connections");
        while connections.join_next().await.is_some() {}
        info!("tsu-length stopped");
        Ok(())
    }
}

async fn serve_connection(router: Arc<Router>, stream: TcpStream, peer: SocketAddr) {
    let service = service_fn(move |req| dispatch(Arc::clone(&router), req, peer));

    let served = ConnBuilder::new(TokioExecutor::new())
        .serve_connection(TokioIo::new(stream), service)
        .await;
    if let Err(e) = served {
        error!(%peer, "connection error: {e}");
    }
}

/// Routes one request and produces one response.
///
/// Unmatched routes get `404`. An `Err` here (unreadable request, a handler
/// defect surfaced by a filter, an unsendable response) makes hyper drop the
/// connection.
async fn dispatch(
    router: Arc<Router>,
    req: hyper::Request<hyper::body::Incoming>,
    peer: SocketAddr,
) -> Result<http::Response<UnsyncBoxBody<Bytes, Error>>, Error> {
    debug!(%peer, method = %req.method(), path = req.uri().path(), "request");

    let response = match router.lookup(req.method(), req.uri().path()) {
        Some((handler, params)) => {
            let req = Request::from_hyper(req, params).await;
            match req {
                Ok(req) => handler.call(req).await,
                Err(e) => Err(e),
            }
        }
        None => Ok(Response::status(StatusCode::NOT_FOUND)),
    };

    response.and_then(Response::into_inner).inspect_err(|e| {
        error!(%peer, "request failed: {e}");
    })
}

/// Resolves on the first SIGTERM or Ctrl-C.
///
/// A handler that cannot be installed is logged and never fires.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Ctrl-C handler unavailable: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("SIGTERM handler unavailable: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => info!("Ctrl-C received"),
        () = terminate => info!("SIGTERM received"),
    }
}
