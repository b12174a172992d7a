//! Netstring framing for byte-oriented transports.
//!
//! A netstring carries one binary message as `<decimal-length>:<payload>,`,
//! so payloads never need escaping and receivers never scan for delimiters.
//!
//! # Crate Structure
//!
//! - [`frame`]: wire format, with the encoder, one-shot decoder and the incremental [`Framer`]
//! - [`stream`](mod@stream): chunk sources and session drivers, blocking and async (behind `async` feature)
//!
//! ```
//! use netstrings::{encode, Framer, ParseOutcome};
//!
//! let mut framer = Framer::new();
//! framer.feed(&encode(b"hello")).unwrap();
//! assert_eq!(framer.next_event().unwrap(), ParseOutcome::Frame("hello".into()));
//! assert_eq!(framer.next_event().unwrap(), ParseOutcome::NeedMoreData);
//! ```

/// Re-export frame types.
pub mod frame {
    pub use netstrings_frame::*;
}

/// Re-export stream drivers.
pub mod stream {
    pub use netstrings_stream::*;
}

pub use netstrings_frame::{decode, encode, FrameConfig, FrameError, Framer, ParseOutcome, Result};
pub use netstrings_stream::{reads, stream, stream_data, stream_reader};

#[cfg(feature = "async")]
pub use netstrings_frame::NetstringCodec;
#[cfg(feature = "async")]
pub use netstrings_stream::{async_reads, async_stream, async_stream_reader};
