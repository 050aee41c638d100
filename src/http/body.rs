//! Fixed-size chunking of the upstream body.
//!
//! Each upstream read is handed to the client as soon as it arrives, split
//! into frames of at most `chunk_size` bytes. Nothing is buffered beyond the
//! current read. A read error is passed on once as the body's final item:
//! status and headers are already on the wire, so the HTTP layer aborts the
//! connection instead of completing the message, and the client sees a
//! truncated transfer.

use std::fmt::Display;
use std::io;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use bytes::Bytes;
use futures_util::{Stream, StreamExt};

use crate::observability::metrics;

/// Stream adapter yielding frames no larger than `chunk_size`.
pub struct ChunkedStream<S> {
    inner: S,
    chunk_size: usize,
    pending: Bytes,
    sent: u64,
    done: bool,
}

impl<S> ChunkedStream<S> {
    pub fn new(inner: S, chunk_size: usize) -> Self {
        Self {
            inner,
            chunk_size: chunk_size.max(1),
            pending: Bytes::new(),
            sent: 0,
            done: false,
        }
    }

    /// Bytes handed out so far.
    pub fn sent(&self) -> u64 {
        self.sent
    }
}

impl<S> Drop for ChunkedStream<S> {
    fn drop(&mut self) {
        metrics::record_stream_bytes(self.sent);
    }
}

impl<S, E> Stream for ChunkedStream<S>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Display,
{
    type Item = Result<Bytes, io::Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            if !self.pending.is_empty() {
                let n = self.chunk_size.min(self.pending.len());
                let chunk = self.pending.split_to(n);
                self.sent += n as u64;
                return Poll::Ready(Some(Ok(chunk)));
            }
            if self.done {
                return Poll::Ready(None);
            }

            match ready!(self.inner.poll_next_unpin(cx)) {
                Some(Ok(bytes)) => self.pending = bytes,
                Some(Err(e)) => {
                    tracing::debug!(error = %e, sent = self.sent, "Upstream stream interrupted");
                    self.done = true;
                    return Poll::Ready(Some(Err(io::Error::other(e.to_string()))));
                }
                None => {
                    tracing::debug!(sent = self.sent, "Upstream stream finished");
                    self.done = true;
                    return Poll::Ready(None);
                }
            }
        }
    }
}
