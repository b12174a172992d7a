use std::iter::FusedIterator;

use bytes::{Bytes, BytesMut};
use tracing::{debug, trace, warn};

use crate::codec::{decode_frame, FrameConfig};
use crate::error::{FrameError, Result};

/// Result of a single decode attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// A complete payload was decoded and removed from the receive buffer.
    Frame(Bytes),
    /// The buffered bytes do not hold a complete netstring yet.
    NeedMoreData,
    /// The receiving end is closed; no further frames can be produced.
    ConnectionClosed,
}

/// Incremental netstring decoder.
///
/// A sans-io state machine: bytes go in through [`feed`](Self::feed), payloads
/// come out of [`next_event`](Self::next_event). It never blocks and never
/// touches a transport.
///
/// Once closed (end-of-stream, [`close`](Self::close) or a malformed frame) the
/// framer stays closed and its receive buffer stays empty. There is no
/// resynchronization after malformed input.
#[derive(Debug)]
pub struct Framer {
    buf: BytesMut,
    closed: bool,
}

impl Framer {
    /// Create a new framer with default configuration.
    pub fn new() -> Self {
        Self::with_config(&FrameConfig::default())
    }

    /// Create a new framer with explicit configuration.
    pub fn with_config(config: &FrameConfig) -> Self {
        Self {
            buf: BytesMut::with_capacity(config.initial_capacity),
            closed: false,
        }
    }

    /// Feed transport data into the receive buffer.
    ///
    /// This only stores the bytes; call [`next_event`](Self::next_event) to
    /// decode them. An empty chunk signals end-of-stream and closes the
    /// receiving end. Feeding non-empty data once closed fails with
    /// [`FrameError::InvalidState`] and leaves the framer untouched.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<()> {
        if chunk.is_empty() {
            if !self.closed {
                debug!(discarded = self.buf.len(), "end of stream, closing framer");
            }
            self.shutdown();
            return Ok(());
        }

        if self.closed {
            return Err(FrameError::InvalidState);
        }

        self.buf.extend_from_slice(chunk);
        Ok(())
    }

    /// Attempt to decode the next netstring from the receive buffer.
    ///
    /// On [`FrameError::MalformedFrame`] the framer closes itself before
    /// returning the error.
    pub fn next_event(&mut self) -> Result<ParseOutcome> {
        if self.buf.is_empty() {
            return Ok(self.idle());
        }

        match decode_frame(&mut self.buf) {
            Ok(Some(payload)) => {
                trace!(
                    len = payload.len(),
                    buffered = self.buf.len(),
                    "decoded netstring"
                );
                Ok(ParseOutcome::Frame(payload))
            }
            Ok(None) => Ok(self.idle()),
            Err(err) => {
                warn!(error = %err, discarded = self.buf.len(), "closing framer on malformed input");
                self.shutdown();
                Err(err)
            }
        }
    }

    /// Close the receiving end, discarding any buffered bytes.
    pub fn close(&mut self) {
        if !self.closed {
            debug!(discarded = self.buf.len(), "framer closed");
        }
        self.shutdown();
    }

    /// Whether the receiving end is closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Bytes received but not yet decoded, and whether the receiving end is closed.
    pub fn trailing_data(&self) -> (&[u8], bool) {
        (&self.buf[..], self.closed)
    }

    /// Iterate over every frame currently decodable.
    ///
    /// The iterator stops at the first `NeedMoreData`/`ConnectionClosed`, or
    /// after yielding an error. Call it again after the next
    /// [`feed`](Self::feed) to continue.
    pub fn drain(&mut self) -> Drain<'_> {
        Drain {
            framer: self,
            done: false,
        }
    }

    fn idle(&self) -> ParseOutcome {
        if self.closed {
            ParseOutcome::ConnectionClosed
        } else {
            ParseOutcome::NeedMoreData
        }
    }

    fn shutdown(&mut self) {
        self.closed = true;
        self.buf.clear();
    }
}

impl Default for Framer {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator returned by [`Framer::drain`].
#[derive(Debug)]
pub struct Drain<'a> {
    framer: &'a mut Framer,
    done: bool,
}

impl Iterator for Drain<'_> {
    type Item = Result<Bytes>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.framer.next_event() {
            Ok(ParseOutcome::Frame(payload)) => Some(Ok(payload)),
            Ok(ParseOutcome::NeedMoreData | ParseOutcome::ConnectionClosed) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl FusedIterator for Drain<'_> {}
