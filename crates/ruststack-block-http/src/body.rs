//! Gateway response body.
//!
//! Every gateway response is known in full before it is sent: XML documents,
//! object windows and error bodies are built in memory, and 204/HEAD
//! responses carry nothing. [`BlockResponseBody`] therefore yields at most one
//! data frame and reports its exact length up front so hyper can set
//! `Content-Length`.

use std::convert::Infallible;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use http_body::{Frame, SizeHint};

/// Single-frame response body.
#[derive(Debug, Default)]
pub struct BlockResponseBody {
    /// Pending payload. `None` once sent, or when the body is empty.
    chunk: Option<Bytes>,
}

impl BlockResponseBody {
    /// Create a body carrying `data`. Empty data yields an empty body.
    #[must_use]
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        let data = data.into();
        Self {
            chunk: (!data.is_empty()).then_some(data),
        }
    }

    /// Create an empty body.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a body from a UTF-8 string.
    #[must_use]
    pub fn from_string(s: impl Into<String>) -> Self {
        Self::from_bytes(s.into())
    }

    /// Number of payload bytes not yet polled.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.chunk.as_ref().map_or(0, Bytes::len)
    }
}

impl http_body::Body for BlockResponseBody {
    type Data = Bytes;
    type Error = Infallible;

    fn poll_frame(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Bytes>, Infallible>>> {
        Poll::Ready(self.get_mut().chunk.take().map(|data| Ok(Frame::data(data))))
    }

    fn is_end_stream(&self) -> bool {
        self.chunk.is_none()
    }

    fn size_hint(&self) -> SizeHint {
        SizeHint::with_exact(self.remaining() as u64)
    }
}
