use std::ops::Range;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Separator between the length prefix and the payload.
pub const SEPARATOR: u8 = b':';

/// Terminator following every payload.
pub const TERMINATOR: u8 = b',';

/// Decimal digits needed for the largest encodable length (`u64::MAX`).
pub const MAX_LENGTH_DIGITS: usize = 20;

/// Default initial receive buffer capacity: 8 KiB.
pub const DEFAULT_INITIAL_CAPACITY: usize = 8 * 1024;

/// Default size of a single bounded read from a chunk source: 8 KiB.
pub const DEFAULT_READ_CHUNK_SIZE: usize = 8 * 1024;

/// Configuration shared by the decoder and the stream drivers.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Capacity reserved for the receive buffer up front. Default: 8 KiB.
    pub initial_capacity: usize,
    /// Upper bound for one read when pulling chunks from a reader. Default: 8 KiB.
    pub read_chunk_size: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
        }
    }
}

/// Wire size of a netstring carrying `payload_len` bytes.
pub fn encoded_len(payload_len: usize) -> usize {
    digit_count(payload_len) + 1 + payload_len + 1
}

/// Encode one payload into a fresh netstring.
///
/// Wire format:
/// ```text
/// ┌──────────────────┬─────┬─────────────────┬─────┐
/// │ Length           │ ':' │ Payload         │ ',' │
/// │ (ASCII decimal)  │     │ (Length bytes)  │     │
/// └──────────────────┴─────┴─────────────────┴─────┘
/// ```
pub fn encode(payload: &[u8]) -> Bytes {
    let mut dst = BytesMut::with_capacity(encoded_len(payload.len()));
    encode_into(payload, &mut dst);
    dst.freeze()
}

/// Append the netstring encoding of `payload` to `dst`.
pub fn encode_into(payload: &[u8], dst: &mut BytesMut) {
    dst.reserve(encoded_len(payload.len()));
    put_decimal(dst, payload.len());
    dst.put_u8(SEPARATOR);
    dst.put_slice(payload);
    dst.put_u8(TERMINATOR);
}

/// Decode one netstring from the front of a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete netstring yet;
/// the buffer is left untouched in that case. On success, consumes exactly
/// the netstring's bytes from the buffer.
pub fn decode_frame(src: &mut BytesMut) -> Result<Option<Bytes>> {
    let Some(header) = complete_frame(src)? else {
        return Ok(None); // Need more data
    };

    src.advance(header.prefix_len);
    let payload = src.split_to(header.payload_len).freeze();
    src.advance(1);

    Ok(Some(payload))
}

/// Decode a byte slice holding exactly one complete netstring.
pub fn decode(data: &[u8]) -> Result<Bytes> {
    let header = complete_frame(data)?.ok_or(FrameError::Truncated {
        available: data.len(),
    })?;

    if data.len() > header.frame_len {
        return Err(FrameError::TrailingData {
            len: data.len() - header.frame_len,
        });
    }

    Ok(Bytes::copy_from_slice(&data[header.payload_range()]))
}

#[derive(Debug, Clone, Copy)]
struct Header {
    /// Digits plus separator.
    prefix_len: usize,
    payload_len: usize,
    /// Prefix, payload and terminator.
    frame_len: usize,
}

impl Header {
    fn payload_range(&self) -> Range<usize> {
        self.prefix_len..self.prefix_len + self.payload_len
    }
}

/// Validate the netstring at the front of `src` if all of its bytes are present.
fn complete_frame(src: &[u8]) -> Result<Option<Header>> {
    let Some(header) = parse_header(src)? else {
        return Ok(None);
    };

    if src.len() < header.frame_len {
        return Ok(None);
    }

    if src[header.frame_len - 1] != TERMINATOR {
        return Err(FrameError::malformed("missing ',' terminator"));
    }

    Ok(Some(header))
}

/// Parse the `<digits>:` prefix.
///
/// A buffer made only of digits (or empty) is a partial prefix and yields
/// `Ok(None)`.
fn parse_header(src: &[u8]) -> Result<Option<Header>> {
    let digits = src.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == src.len() {
        return Ok(None);
    }

    if src[digits] != SEPARATOR {
        return Err(FrameError::malformed("length prefix is not a decimal number"));
    }
    if digits == 0 {
        return Err(FrameError::malformed("empty length prefix"));
    }

    let payload_len = src[..digits]
        .iter()
        .try_fold(0usize, |acc, digit| {
            acc.checked_mul(10)?
                .checked_add(usize::from(digit - b'0'))
        })
        .ok_or(FrameError::malformed("declared length overflows"))?;

    let prefix_len = digits + 1;
    let frame_len = prefix_len
        .checked_add(payload_len)
        .and_then(|len| len.checked_add(1))
        .ok_or(FrameError::malformed("declared length overflows"))?;

    Ok(Some(Header {
        prefix_len,
        payload_len,
        frame_len,
    }))
}

fn digit_count(mut n: usize) -> usize {
    let mut count = 1;
    while n >= 10 {
        n /= 10;
        count += 1;
    }
    count
}

fn put_decimal(dst: &mut BytesMut, mut n: usize) {
    let mut digits = [0u8; MAX_LENGTH_DIGITS];
    let mut pos = digits.len();
    loop {
        pos -= 1;
        digits[pos] = b'0' + (n % 10) as u8;
        n /= 10;
        if n == 0 {
            break;
        }
    }
    dst.put_slice(&digits[pos..]);
}
