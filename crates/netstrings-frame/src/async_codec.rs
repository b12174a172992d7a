use bytes::{Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::warn;

use crate::codec::{decode_frame, encode_into};
use crate::error::FrameError;

/// Netstring codec for `tokio_util::codec::{FramedRead, FramedWrite, Framed}`.
///
/// Decoding follows the same policy as [`Framer`](crate::Framer): a malformed
/// netstring ends the session, and every later call returns
/// [`FrameError::InvalidState`].
#[derive(Debug, Default, Clone)]
pub struct NetstringCodec {
    poisoned: bool,
}

impl NetstringCodec {
    /// Create a codec ready to decode a fresh session.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Decoder for NetstringCodec {
    type Item = Bytes;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if self.poisoned {
            return Err(FrameError::InvalidState);
        }

        match decode_frame(src) {
            Err(err) => {
                warn!(error = %err, discarded = src.len(), "netstring codec poisoned");
                self.poisoned = true;
                src.clear();
                Err(err)
            }
            decoded => decoded,
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(src)? {
            Some(frame) => Ok(Some(frame)),
            None if src.is_empty() => Ok(None),
            None => Err(FrameError::Truncated {
                available: src.len(),
            }),
        }
    }
}

impl<T: AsRef<[u8]>> Encoder<T> for NetstringCodec {
    type Error = FrameError;

    fn encode(&mut self, item: T, dst: &mut BytesMut) -> Result<(), Self::Error> {
        encode_into(item.as_ref(), dst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use futures_util::{SinkExt, StreamExt};
    use tokio_util::codec::{FramedRead, FramedWrite};

    use super::*;

    #[test]
    fn decode_batched_frames() {
        let mut codec = NetstringCodec::new();
        let mut buf = BytesMut::from(&b"3:foo,3:bar,2:b"[..]);

        assert_eq!(codec.decode(&mut buf).unwrap().unwrap(), "foo");
        assert_eq!(codec.decode(&mut buf).unwrap().unwrap(), "bar");
        assert!(codec.decode(&mut buf).unwrap().is_none());
        assert_eq!(buf.as_ref(), b"2:b");
    }

    #[test]
    fn malformed_input_poisons_codec() {
        let mut codec = NetstringCodec::new();
        let mut buf = BytesMut::from(&b"5:Hello!"[..]);

        assert!(codec.decode(&mut buf).unwrap_err().is_malformed());
        assert!(buf.is_empty());

        buf.extend_from_slice(b"3:foo,");
        assert!(matches!(
            codec.decode(&mut buf),
            Err(FrameError::InvalidState)
        ));
    }

    #[test]
    fn eof_with_partial_frame_is_truncated() {
        let mut codec = NetstringCodec::new();
        let mut buf = BytesMut::from(&b"14:incomplete"[..]);

        let err = codec.decode_eof(&mut buf).unwrap_err();
        assert!(matches!(err, FrameError::Truncated { available: 13 }));
    }

    #[tokio::test]
    async fn framed_roundtrip_over_duplex() {
        let (client, server) = tokio::io::duplex(16);

        let writer = tokio::spawn(async move {
            let mut sink = FramedWrite::new(client, NetstringCodec::new());
            for payload in [&b"one"[..], &b""[..], &b"13:13:recursive1,"[..]] {
                sink.send(payload).await.unwrap();
            }
        });

        let frames: Vec<_> = FramedRead::new(server, NetstringCodec::new())
            .map(|frame| frame.unwrap())
            .collect()
            .await;
        writer.await.unwrap();

        assert_eq!(frames, vec![&b"one"[..], &b""[..], &b"13:13:recursive1,"[..]]);
    }
}
