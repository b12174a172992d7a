use std::io::Read;
use std::iter::FusedIterator;

use bytes::Bytes;
use netstrings_frame::{Drain, FrameConfig, FrameError, Framer, ParseOutcome, Result};
use tracing::debug;

use crate::reads::{reads, Reads};

/// Feed one chunk into `framer` and drain every frame it completes.
///
/// A failed feed is yielded as the only item.
pub fn stream_data<'a>(framer: &'a mut Framer, chunk: &[u8]) -> StreamData<'a> {
    match framer.feed(chunk) {
        Ok(()) => StreamData {
            feed_error: None,
            drain: Some(framer.drain()),
        },
        Err(err) => StreamData {
            feed_error: Some(err),
            drain: None,
        },
    }
}

/// Iterator returned by [`stream_data`].
#[derive(Debug)]
pub struct StreamData<'a> {
    feed_error: Option<FrameError>,
    drain: Option<Drain<'a>>,
}

impl Iterator for StreamData<'_> {
    type Item = Result<Bytes>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(err) = self.feed_error.take() {
            return Some(Err(err));
        }
        self.drain.as_mut()?.next()
    }
}

impl FusedIterator for StreamData<'_> {}

/// Decode a whole session from a sequence of chunks.
///
/// One [`Framer`] lives for the session. Frames are yielded in wire order,
/// and every frame completed by a chunk is yielded before the next chunk is
/// pulled. The first error (source I/O, malformed input, data after an empty
/// end-of-stream chunk) is yielded after the frames preceding it, then the
/// sequence ends.
pub fn stream<I, B>(source: I) -> Frames<I::IntoIter>
where
    I: IntoIterator<Item = std::io::Result<B>>,
    B: AsRef<[u8]>,
{
    stream_with_config(source, &FrameConfig::default())
}

/// [`stream`] with explicit framer configuration.
pub fn stream_with_config<I, B>(source: I, config: &FrameConfig) -> Frames<I::IntoIter>
where
    I: IntoIterator<Item = std::io::Result<B>>,
    B: AsRef<[u8]>,
{
    Frames {
        framer: Framer::with_config(config),
        source: source.into_iter(),
        done: false,
    }
}

/// Decode a whole session read from a blocking reader.
pub fn stream_reader<R: Read>(reader: R) -> Frames<Reads<R>> {
    stream_reader_with_config(reader, &FrameConfig::default())
}

/// [`stream_reader`] with explicit configuration.
pub fn stream_reader_with_config<R: Read>(reader: R, config: &FrameConfig) -> Frames<Reads<R>> {
    stream_with_config(reads(reader, config.read_chunk_size), config)
}

/// Frame iterator returned by [`stream`] and [`stream_reader`].
#[derive(Debug)]
pub struct Frames<I> {
    framer: Framer,
    source: I,
    done: bool,
}

impl<I> Frames<I> {
    /// The session's framer, e.g. to inspect a partial frame left at the end.
    pub fn framer(&self) -> &Framer {
        &self.framer
    }

    /// Consume the iterator and return the chunk source.
    pub fn into_source(self) -> I {
        self.source
    }

    fn fail(&mut self, err: FrameError) -> Option<Result<Bytes>> {
        self.done = true;
        Some(Err(err))
    }

    fn finish(&mut self) {
        self.done = true;
        let (pending, _) = self.framer.trailing_data();
        if !pending.is_empty() {
            debug!(
                buffered = pending.len(),
                "chunk source ended inside a netstring"
            );
        }
    }
}

impl<I, B> Iterator for Frames<I>
where
    I: Iterator<Item = std::io::Result<B>>,
    B: AsRef<[u8]>,
{
    type Item = Result<Bytes>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            match self.framer.next_event() {
                Ok(ParseOutcome::Frame(payload)) => return Some(Ok(payload)),
                Ok(ParseOutcome::NeedMoreData | ParseOutcome::ConnectionClosed) => {}
                Err(err) => return self.fail(err),
            }

            match self.source.next() {
                Some(Ok(chunk)) => {
                    if let Err(err) = self.framer.feed(chunk.as_ref()) {
                        return self.fail(err);
                    }
                }
                Some(Err(err)) => return self.fail(err.into()),
                None => {
                    self.finish();
                    return None;
                }
            }
        }
    }
}

impl<I, B> FusedIterator for Frames<I>
where
    I: Iterator<Item = std::io::Result<B>>,
    B: AsRef<[u8]>,
{
}
