//! Unified error type.

use std::fmt;
use std::net::AddrParseError;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type returned by tsu-length's fallible operations.
///
/// Application-level errors (404, 422, etc.) are expressed as HTTP
/// [`Response`](crate::Response) values, not as `Error`s. This type surfaces
/// infrastructure failures and handler defects: binding to a port, reading a
/// request, building the outgoing response, or a body chunk that cannot
/// produce its bytes.
#[derive(Debug)]
pub enum Error {
    /// Binding or accepting on the listener failed.
    Io(std::io::Error),
    /// The bind address is not a valid `host:port`.
    Addr(AddrParseError),
    /// Reading the incoming request failed.
    Hyper(hyper::Error),
    /// A handler produced a status or header hyper cannot send.
    Http(http::Error),
    /// A body chunk could not be converted to bytes.
    Chunk(BoxError),
}

impl Error {
    /// Wraps the failure of a [`Chunk`](crate::body::Chunk) conversion.
    pub fn chunk(e: impl Into<BoxError>) -> Self {
        Self::Chunk(e.into())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e)    => write!(f, "io: {e}"),
            Self::Addr(e)  => write!(f, "invalid address: {e}"),
            Self::Hyper(e) => write!(f, "hyper: {e}"),
            Self::Http(e)  => write!(f, "http: {e}"),
            Self::Chunk(e) => write!(f, "body chunk: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e)    => Some(e),
            Self::Addr(e)  => Some(e),
            Self::Hyper(e) => Some(e),
            Self::Http(e)  => Some(e),
            Self::Chunk(e) => Some(&**e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<AddrParseError> for Error {
    fn from(e: AddrParseError) -> Self {
        Self::Addr(e)
    }
}

impl From<hyper::Error> for Error {
    fn from(e: hyper::Error) -> Self {
        Self::Hyper(e)
    }
}

impl From<http::Error> for Error {
    fn from(e: http::Error) -> Self {
        Self::Http(e)
    }
}

impl From<fmt::Error> for Error {
    fn from(e: fmt::Error) -> Self {
        Self::chunk(e)
    }
}
