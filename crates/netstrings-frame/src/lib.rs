//! Netstring wire format.
//!
//! Every message is framed as `<decimal-length>:<payload>,`:
//! - ASCII decimal digits giving the payload length in bytes
//! - a `:` separator
//! - the raw payload, never escaped or inspected
//! - a `,` terminator
//!
//! [`Framer`] is the incremental sans-io decoder. It buffers whatever the
//! transport delivers and hands back complete payloads one at a time.

pub mod codec;
pub mod error;
pub mod framer;

#[cfg(feature = "async")]
pub mod async_codec;

#[cfg(feature = "async")]
pub use async_codec::NetstringCodec;
pub use codec::{
    decode, decode_frame, encode, encode_into, encoded_len, FrameConfig,
    DEFAULT_INITIAL_CAPACITY, DEFAULT_READ_CHUNK_SIZE, SEPARATOR, TERMINATOR,
};
pub use error::{FrameError, Result};
pub use framer::{Drain, Framer, ParseOutcome};
