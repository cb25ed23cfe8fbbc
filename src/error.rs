//! Error types for btag

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, BtagError>;

/// Btag-specific error type
///
/// Every failure is recoverable and reported at the point it occurs; decode
/// errors leave no partially-populated compound behind.
#[derive(Debug, Error)]
pub enum BtagError {
    /// Compound keys are length-prefixed with a single byte on the wire.
    #[error("key is {len} bytes, limit is 255")]
    KeyTooLong { len: usize },

    /// Lookup miss.
    #[error("tag not found: {key:?}")]
    TagNotFound { key: String },

    /// Typed access found a different discriminant than requested.
    #[error("wrong type for {key:?}: expected {expected}, found {found}")]
    WrongType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Decoder hit a discriminant byte outside the fixed tag set.
    #[error("unknown type tag: 0x{0:02X}")]
    UnknownTypeTag(u8),

    /// Varint width selector must be 0-3.
    #[error("invalid varint width selector: {0}")]
    InvalidWidthSelector(u8),

    /// The same key appeared twice in one serialized compound.
    #[error("duplicate key in stream: {key:?}")]
    DuplicateKey { key: String },

    /// Compound nesting in the stream exceeded the decoder's depth limit.
    #[error("compound nesting exceeds {limit} levels")]
    NestingTooDeep { limit: usize },

    /// Reader ran out of bytes mid-decode.
    #[error("stream truncated mid-decode")]
    TruncatedStream,

    /// String payload is not valid UTF-8.
    #[error("invalid UTF-8 in string")]
    InvalidUtf8,

    /// Underlying reader/writer failure other than a short read.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl BtagError {
    /// Map an i/o error, folding short reads into `TruncatedStream`.
    pub(crate) fn from_read(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            BtagError::TruncatedStream
        } else {
            BtagError::Io(e)
        }
    }
}
