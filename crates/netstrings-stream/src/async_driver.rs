use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_core::Stream;
use netstrings_frame::{FrameConfig, FrameError, Framer, ParseOutcome, Result};
use tokio::io::AsyncRead;
use tracing::debug;

use crate::async_reads::{async_reads, AsyncReads};

/// Decode a whole session from an async stream of chunks.
///
/// Same contract as [`stream`](crate::stream); pulling the next chunk is the
/// only suspension point, so scheduling never reorders frames.
pub fn async_stream<S, B>(source: S) -> AsyncFrames<S>
where
    S: Stream<Item = std::io::Result<B>> + Unpin,
    B: AsRef<[u8]>,
{
    async_stream_with_config(source, &FrameConfig::default())
}

/// [`async_stream`] with explicit framer configuration.
pub fn async_stream_with_config<S, B>(source: S, config: &FrameConfig) -> AsyncFrames<S>
where
    S: Stream<Item = std::io::Result<B>> + Unpin,
    B: AsRef<[u8]>,
{
    AsyncFrames {
        framer: Framer::with_config(config),
        source,
        done: false,
    }
}

/// Decode a whole session read from an async reader.
pub fn async_stream_reader<R: AsyncRead + Unpin>(reader: R) -> AsyncFrames<AsyncReads<R>> {
    async_stream_reader_with_config(reader, &FrameConfig::default())
}

/// [`async_stream_reader`] with explicit configuration.
pub fn async_stream_reader_with_config<R: AsyncRead + Unpin>(
    reader: R,
    config: &FrameConfig,
) -> AsyncFrames<AsyncReads<R>> {
    async_stream_with_config(async_reads(reader, config.read_chunk_size), config)
}

/// Frame stream returned by [`async_stream`] and [`async_stream_reader`].
#[derive(Debug)]
pub struct AsyncFrames<S> {
    framer: Framer,
    source: S,
    done: bool,
}

impl<S> AsyncFrames<S> {
    /// The session's framer.
    pub fn framer(&self) -> &Framer {
        &self.framer
    }

    /// Consume the stream and return the chunk source.
    pub fn into_source(self) -> S {
        self.source
    }
}

impl<S, B> Stream for AsyncFrames<S>
where
    S: Stream<Item = std::io::Result<B>> + Unpin,
    B: AsRef<[u8]>,
{
    type Item = Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.done {
            return Poll::Ready(None);
        }

        loop {
            match this.framer.next_event() {
                Ok(ParseOutcome::Frame(payload)) => return Poll::Ready(Some(Ok(payload))),
                Ok(ParseOutcome::NeedMoreData | ParseOutcome::ConnectionClosed) => {}
                Err(err) => {
                    this.done = true;
                    return Poll::Ready(Some(Err(err)));
                }
            }

            let fed = match Pin::new(&mut this.source).poll_next(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Some(Ok(chunk))) => this.framer.feed(chunk.as_ref()),
                Poll::Ready(Some(Err(err))) => Err(FrameError::from(err)),
                Poll::Ready(None) => {
                    this.done = true;
                    let (pending, _) = this.framer.trailing_data();
                    if !pending.is_empty() {
                        debug!(
                            buffered = pending.len(),
                            "chunk stream ended inside a netstring"
                        );
                    }
                    return Poll::Ready(None);
                }
            };

            if let Err(err) = fed {
                this.done = true;
                return Poll::Ready(Some(Err(err)));
            }
        }
    }
}
