use std::io::{ErrorKind, Read};
use std::iter::FusedIterator;

use bytes::{Bytes, BytesMut};

/// Turn a blocking reader into a sequence of non-empty chunks.
///
/// Each item is the result of one read of at most `max_chunk_size` bytes
/// (a size of zero is treated as one). The sequence ends at the first empty
/// read; interrupted reads are retried and any other I/O error is yielded once
/// before the sequence ends.
pub fn reads<R: Read>(source: R, max_chunk_size: usize) -> Reads<R> {
    Reads {
        inner: source,
        chunk_size: max_chunk_size.max(1),
        done: false,
    }
}

/// Chunk iterator returned by [`reads`].
#[derive(Debug)]
pub struct Reads<R> {
    inner: R,
    chunk_size: usize,
    done: bool,
}

impl<R> Reads<R> {
    /// Borrow the underlying reader.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Mutably borrow the underlying reader.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Consume the iterator and return the inner reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Iterator for Reads<R> {
    type Item = std::io::Result<Bytes>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut chunk = BytesMut::zeroed(self.chunk_size);
        loop {
            match self.inner.read(&mut chunk) {
                Ok(0) => {
                    self.done = true;
                    return None;
                }
                Ok(n) => {
                    chunk.truncate(n);
                    return Some(Ok(chunk.freeze()));
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            }
        }
    }
}

impl<R: Read> FusedIterator for Reads<R> {}
