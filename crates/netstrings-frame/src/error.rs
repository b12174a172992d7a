/// Errors that can occur during netstring encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// Data was fed after the receiving end had been closed.
    #[error("cannot receive more data: receiving end is closed")]
    InvalidState,

    /// The length prefix or the terminator is malformed.
    ///
    /// Always fatal for the decoder that detected it.
    #[error("malformed netstring: {reason}")]
    MalformedFrame { reason: &'static str },

    /// The input ended before a complete netstring was available.
    #[error("incomplete netstring ({available} bytes buffered)")]
    Truncated { available: usize },

    /// Bytes were left over after a complete netstring.
    #[error("{len} unexpected bytes after netstring")]
    TrailingData { len: usize },

    /// An I/O error occurred while reading chunks or writing frames.
    #[error("netstring I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FrameError {
    pub(crate) fn malformed(reason: &'static str) -> Self {
        Self::MalformedFrame { reason }
    }

    /// Whether this error came from a malformed length prefix or terminator.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedFrame { .. })
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
