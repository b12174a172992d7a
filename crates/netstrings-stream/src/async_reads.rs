use std::io::ErrorKind;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::{Bytes, BytesMut};
use futures_core::Stream;
use tokio::io::{AsyncRead, ReadBuf};

/// Turn an async reader into a stream of non-empty chunks.
///
/// Same contract as [`reads`](crate::reads): each item comes from one read of
/// at most `max_chunk_size` bytes, and the stream ends at the first empty read
/// or after yielding an I/O error. Awaiting the next chunk is the only
/// suspension point.
pub fn async_reads<R: AsyncRead + Unpin>(source: R, max_chunk_size: usize) -> AsyncReads<R> {
    AsyncReads {
        inner: source,
        chunk_size: max_chunk_size.max(1),
        scratch: BytesMut::new(),
        done: false,
    }
}

/// Chunk stream returned by [`async_reads`].
#[derive(Debug)]
pub struct AsyncReads<R> {
    inner: R,
    chunk_size: usize,
    scratch: BytesMut,
    done: bool,
}

impl<R> AsyncReads<R> {
    /// Borrow the underlying reader.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Consume the stream and return the inner reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: AsyncRead + Unpin> Stream for AsyncReads<R> {
    type Item = std::io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.done {
            return Poll::Ready(None);
        }

        this.scratch.resize(this.chunk_size, 0);
        loop {
            let mut read_buf = ReadBuf::new(&mut this.scratch[..]);
            match Pin::new(&mut this.inner).poll_read(cx, &mut read_buf) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Err(err)) if err.kind() == ErrorKind::Interrupted => continue,
                Poll::Ready(Err(err)) => {
                    this.done = true;
                    return Poll::Ready(Some(Err(err)));
                }
                Poll::Ready(Ok(())) => {
                    let n = read_buf.filled().len();
                    if n == 0 {
                        this.done = true;
                        return Poll::Ready(None);
                    }
                    return Poll::Ready(Some(Ok(this.scratch.split_to(n).freeze())));
                }
            }
        }
    }
}
