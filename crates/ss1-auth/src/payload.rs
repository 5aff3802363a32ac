//! Payload normalization.
//!
//! A request body can arrive as text, as bytes already in memory, as a stream of
//! chunks, or as an async reader such as an open file. [`Payload::normalize`] turns
//! any of them into the single contiguous byte sequence that is fed into the
//! canonical message. The whole body is materialized; callers must bound the size of
//! streams and readers themselves.

use std::borrow::Cow;
use std::fmt;
use std::io;
use std::pin::Pin;

use bytes::{Bytes, BytesMut};
use futures::stream::{BoxStream, Stream, StreamExt};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::debug;

use crate::error::SignatureError;

/// A request body in one of the supported representations.
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use ss1_auth::Payload;
///
/// # tokio_test::block_on(async {
/// let text = Payload::from("the payload").normalize().await.unwrap();
/// let bytes = Payload::from(Bytes::from_static(b"the payload")).normalize().await.unwrap();
/// assert_eq!(text, bytes);
/// # });
/// ```
pub enum Payload<'a> {
    /// UTF-8 text.
    Text(Cow<'a, str>),
    /// Bytes already in memory, used as-is.
    Bytes(Bytes),
    /// A stream of chunks, concatenated in arrival order.
    Stream(BoxStream<'a, io::Result<Bytes>>),
    /// An async reader, read to the end.
    Reader(Pin<Box<dyn AsyncRead + Send + 'a>>),
}

impl<'a> Payload<'a> {
    /// An empty payload.
    #[must_use]
    pub fn empty() -> Self {
        Self::Bytes(Bytes::new())
    }

    /// Wrap a chunk stream.
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = io::Result<Bytes>> + Send + 'a,
    {
        Self::Stream(stream.boxed())
    }

    /// Wrap an async reader, e.g. a `tokio::fs::File`.
    pub fn from_reader<R>(reader: R) -> Self
    where
        R: AsyncRead + Send + 'a,
    {
        Self::Reader(Box::pin(reader))
    }

    /// Produce the canonical byte sequence for this payload.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::Payload`] if the stream or reader reports an I/O
    /// error before it is exhausted.
    pub async fn normalize(self) -> Result<Bytes, SignatureError> {
        match self {
            Self::Text(text) => Ok(Bytes::from(text.into_owned().into_bytes())),
            Self::Bytes(bytes) => Ok(bytes),
            Self::Stream(mut stream) => {
                let mut buf = BytesMut::new();
                let mut chunks = 0usize;
                while let Some(chunk) = stream.next().await {
                    let chunk = chunk.map_err(SignatureError::Payload)?;
                    buf.extend_from_slice(&chunk);
                    chunks += 1;
                }
                debug!(chunks, len = buf.len(), "Drained payload stream");
                Ok(buf.freeze())
            }
            Self::Reader(mut reader) => {
                let mut buf = Vec::new();
                reader
                    .read_to_end(&mut buf)
                    .await
                    .map_err(SignatureError::Payload)?;
                debug!(len = buf.len(), "Read payload to end");
                Ok(Bytes::from(buf))
            }
        }
    }
}

impl fmt::Debug for Payload<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(&text.len()).finish(),
            Self::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Self::Stream(_) => f.write_str("Stream(..)"),
            Self::Reader(_) => f.write_str("Reader(..)"),
        }
    }
}

impl<'a> From<&'a str> for Payload<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(Cow::Borrowed(text))
    }
}

impl From<String> for Payload<'_> {
    fn from(text: String) -> Self {
        Self::Text(Cow::Owned(text))
    }
}

impl From<Bytes> for Payload<'_> {
    fn from(bytes: Bytes) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<Vec<u8>> for Payload<'_> {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(Bytes::from(bytes))
    }
}

impl From<&[u8]> for Payload<'_> {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(Bytes::copy_from_slice(bytes))
    }
}
