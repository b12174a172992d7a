//! Session drivers for the netstring framer.
//!
//! A chunk source ([`reads`], or any iterator of byte chunks) feeds one
//! [`Framer`](netstrings_frame::Framer) per session, and the driver yields the
//! decoded frames in wire order. With the `async` feature the same composition
//! is available over `AsyncRead` and `Stream` sources.

pub mod driver;
pub mod reads;

#[cfg(feature = "async")]
pub mod async_driver;
#[cfg(feature = "async")]
pub mod async_reads;

#[cfg(feature = "async")]
pub use async_driver::{
    async_stream, async_stream_reader, async_stream_reader_with_config, async_stream_with_config,
    AsyncFrames,
};
#[cfg(feature = "async")]
pub use async_reads::{async_reads, AsyncReads};
pub use driver::{
    stream, stream_data, stream_reader, stream_reader_with_config, stream_with_config, Frames,
    StreamData,
};
pub use reads::{reads, Reads};
