//! Response bodies.
//!
//! A [`Body`] is one of three shapes, and the shape decides whether its byte
//! length can be known before anything is sent:
//!
//! | Shape | Built with | Length known up front? |
//! |---|---|---|
//! | `Full` | `From<&str>`, `From<String>`, `From<Vec<u8>>`, `From<Bytes>` | yes |
//! | `Chunks` | [`Body::chunks`] | yes — sum of each [`Chunk`]'s bytes |
//! | `Stream` | [`Body::stream`], [`Body::from_fn`] | no |
//!
//! Each `Chunks` element is converted at most once. Whichever comes first,
//! measuring or sending, fills a per-element cache and the other reads it, so
//! a measured length always matches what goes out. A `Stream` is polled
//! exactly once, when the body goes out; nothing looks inside it beforehand.

use std::fmt;
use std::sync::OnceLock;

use bytes::Bytes;
use futures_util::stream::{self, BoxStream, Stream, StreamExt, TryStreamExt};
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Full, StreamBody};
use hyper::body::Frame;

use crate::error::Error;

// ── Chunk ─────────────────────────────────────────────────────────────────────

/// A body element that knows its byte representation.
///
/// Inside a [`Body`], `to_bytes` runs once per element; the result is kept
/// and reused.
pub trait Chunk: Send + Sync + 'static {
    fn to_bytes(&self) -> Result<Bytes, Error>;
}

impl Chunk for Bytes {
    fn to_bytes(&self) -> Result<Bytes, Error> { Ok(self.clone()) }
}

impl Chunk for Vec<u8> {
    fn to_bytes(&self) -> Result<Bytes, Error> { Ok(Bytes::copy_from_slice(self)) }
}

impl Chunk for String {
    fn to_bytes(&self) -> Result<Bytes, Error> { Ok(Bytes::copy_from_slice(self.as_bytes())) }
}

impl Chunk for &'static str {
    fn to_bytes(&self) -> Result<Bytes, Error> { Ok(Bytes::from_static(self.as_bytes())) }
}

impl Chunk for &'static [u8] {
    fn to_bytes(&self) -> Result<Bytes, Error> { Ok(Bytes::from_static(self)) }
}

/// Sends any [`Display`](fmt::Display) value as its string form.
///
/// ```rust
/// use tsu_length::body::{Body, Text};
///
/// let body = Body::chunks([Text(42), Text(7)]);
/// assert_eq!(body.measure().unwrap(), Some(3));
/// ```
#[derive(Clone, Debug)]
pub struct Text<T>(pub T);

impl<T> Chunk for Text<T>
where
    T: fmt::Display + Send + Sync + 'static,
{
    fn to_bytes(&self) -> Result<Bytes, Error> {
        use std::fmt::Write;

        let mut out = String::new();
        write!(out, "{}", self.0)?;
        Ok(Bytes::from(out))
    }
}

// ── Part ──────────────────────────────────────────────────────────────────────

/// One element of a [`Body::Chunks`], together with its converted bytes once
/// they exist.
pub struct Part {
    chunk: Box<dyn Chunk>,
    bytes: OnceLock<Bytes>,
}

impl Part {
    fn new(chunk: impl Chunk) -> Self {
        Self { chunk: Box::new(chunk), bytes: OnceLock::new() }
    }

    /// The element as the handler supplied it.
    pub fn chunk(&self) -> &dyn Chunk {
        &*self.chunk
    }

    /// The element's bytes, converting on first use only.
    pub fn bytes(&self) -> Result<Bytes, Error> {
        if let Some(bytes) = self.bytes.get() {
            return Ok(bytes.clone());
        }
        let converted = self.chunk.to_bytes()?;
        Ok(self.bytes.get_or_init(|| converted).clone())
    }
}

// ── Body ──────────────────────────────────────────────────────────────────────

type ByteStream = BoxStream<'static, Result<Bytes, Error>>;

/// An outgoing response body.
pub enum Body {
    /// A single buffer.
    Full(Bytes),
    /// A finite sequence of elements, each converted at most once.
    Chunks(Vec<Part>),
    /// An opaque producer. Never inspected before it is sent.
    Stream(ByteStream),
}

impl Body {
    pub fn empty() -> Self {
        Self::Full(Bytes::new())
    }

    /// A body made of `items`, sent in order.
    pub fn chunks<I, C>(items: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Chunk,
    {
        Self::Chunks(items.into_iter().map(Part::new).collect())
    }

    /// Wraps an arbitrary byte stream.
    pub fn stream<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, Error>> + Send + 'static,
    {
        Self::Stream(stream.boxed())
    }

    /// A body that calls `f` when it is sent and yields what `f` returns.
    ///
    /// Because producing the bytes runs `f`, the length of this body is never
    /// computed ahead of time, even if `f` is pure.
    pub fn from_fn<F, B>(f: F) -> Self
    where
        F: FnOnce() -> B + Send + 'static,
        B: Into<Bytes>,
    {
        Self::stream(stream::once(async move { Ok(f().into()) }))
    }

    /// Byte length of the body, or `None` for a [`Body::Stream`].
    ///
    /// `Chunks` are summed element by element; an empty sequence is `0`.
    /// The bytes converted here are the ones later sent. The first element
    /// whose conversion fails aborts with its error.
    pub fn measure(&self) -> Result<Option<u64>, Error> {
        match self {
            Self::Full(bytes) => Ok(Some(bytes.len() as u64)),
            Self::Chunks(items) => {
                let mut total = 0u64;
                for item in items {
                    total += item.bytes()?.len() as u64;
                }
                Ok(Some(total))
            }
            Self::Stream(_) => Ok(None),
        }
    }

    /// The elements of a [`Body::Chunks`], if that is what this is.
    pub fn chunks_ref(&self) -> Option<&[Part]> {
        match self {
            Self::Chunks(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Converts into the boxed body type hyper sends.
    ///
    /// `Chunks` go out one frame per element, from the cache when the body
    /// was measured; a conversion failure surfaces as an error frame.
    pub fn into_http_body(self) -> UnsyncBoxBody<Bytes, Error> {
        match self {
            Self::Full(bytes) => Full::new(bytes)
                .map_err(|never| match never {})
                .boxed_unsync(),
            Self::Chunks(items) => {
                let frames = items.into_iter().map(|part| part.bytes().map(Frame::data));
                StreamBody::new(stream::iter(frames)).boxed_unsync()
            }
            Self::Stream(s) => StreamBody::new(s.map_ok(Frame::data)).boxed_unsync(),
        }
    }

    /// Consumes the body and concatenates everything it yields.
    pub async fn collect(self) -> Result<Bytes, Error> {
        let collected = BodyExt::collect(self.into_http_body()).await?;
        Ok(collected.to_bytes())
    }
}

impl Default for Body {
    fn default() -> Self { Self::empty() }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full(bytes)   => f.debug_tuple("Full").field(bytes).finish(),
            Self::Chunks(items) => f.debug_tuple("Chunks").field(&items.len()).finish(),
            Self::Stream(_)     => f.write_str("Stream"),
        }
    }
}

impl From<Bytes> for Body {
    fn from(b: Bytes) -> Self { Self::Full(b) }
}

impl From<Vec<u8>> for Body {
    fn from(b: Vec<u8>) -> Self { Self::Full(b.into()) }
}

impl From<String> for Body {
    fn from(s: String) -> Self { Self::Full(s.into()) }
}

impl From<&'static str> for Body {
    fn from(s: &'static str) -> Self { Self::Full(Bytes::from_static(s.as_bytes())) }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct Broken;

    impl fmt::Display for Broken {
        fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    #[test]
    fn full_length_counts_bytes_not_chars() {
        assert_eq!(Body::from("héllo").measure().unwrap(), Some(6));
        assert_eq!(Body::empty().measure().unwrap(), Some(0));
    }

    #[test]
    fn chunk_lengths_are_summed() {
        let body = Body::chunks(["Hello, ", "World!"]);
        assert_eq!(body.measure().unwrap(), Some(13));
        assert_eq!(Body::chunks(Vec::<String>::new()).measure().unwrap(), Some(0));
    }

    #[test]
    fn text_uses_display_form() {
        let body = Body::chunks([Text(3.5), Text(-12.0)]);
        assert_eq!(body.measure().unwrap(), Some(6));
    }

    #[test]
    fn streams_are_not_measured() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let body = Body::from_fn(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            "Hello World!"
        });

        assert_eq!(body.measure().unwrap(), None);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn failing_chunk_aborts_measurement() {
        let body = Body::chunks([Text(Broken)]);
        assert!(matches!(body.measure(), Err(Error::Chunk(_))));
    }

    #[tokio::test]
    async fn chunks_survive_measurement() {
        let body = Body::chunks([String::from("Hello, "), String::from("World!")]);
        assert_eq!(body.measure().unwrap(), Some(13));
        assert_eq!(body.collect().await.unwrap(), Bytes::from_static(b"Hello, World!"));
    }

    /// Writes one more `x` on every call.
    struct Growing(AtomicUsize);

    impl fmt::Display for Growing {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let n = self.0.fetch_add(1, Ordering::SeqCst);
            f.write_str(&"x".repeat(n + 1))
        }
    }

    #[tokio::test]
    async fn sends_the_bytes_it_measured() {
        let body = Body::chunks([Text(Growing(AtomicUsize::new(0)))]);
        assert_eq!(body.measure().unwrap(), Some(1));
        assert_eq!(body.measure().unwrap(), Some(1));
        assert_eq!(body.collect().await.unwrap(), Bytes::from_static(b"x"));
    }

    #[tokio::test]
    async fn from_fn_runs_once_when_collected() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let body = Body::from_fn(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            "Hello World!"
        });

        assert_eq!(body.collect().await.unwrap(), Bytes::from_static(b"Hello World!"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failing_chunk_surfaces_when_sent() {
        let body = Body::chunks([Text(Broken)]);
        assert!(matches!(body.collect().await, Err(Error::Chunk(_))));
    }
}
