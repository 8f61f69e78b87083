use std::io;
use thiserror::Error;

/// Failure while decoding bytes produced by the option codec.
///
/// Per-record decode failures are recovered inside the registry codec; the
/// same type surfacing from a top-level read means the whole file is unusable.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Ran out of bytes in the middle of a value
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// String bytes were not valid UTF-8
    #[error("invalid UTF-8 in string: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// Boolean payload byte other than 0 or 1
    #[error("invalid boolean byte {0:#04x}")]
    InvalidBool(u8),

    /// A count or length prefix was negative
    #[error("negative length prefix {0}")]
    NegativeLength(i32),

    /// Varint length prefix used more than five bytes
    #[error("varint length prefix is too long")]
    VarintOverflow,

    /// A record claims more payload than the input holds
    #[error("record payload of {needed} bytes overruns input ({available} bytes left)")]
    RecordOverrun { needed: usize, available: usize },

    /// Any other read failure from the underlying source
    #[error("read failed: {0}")]
    Io(io::Error),
}

impl From<io::Error> for DecodeError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            DecodeError::UnexpectedEof
        } else {
            DecodeError::Io(err)
        }
    }
}

/// Error type for option store operations
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("Storage operation failed: {0}")]
    Io(#[from] io::Error),

    #[error("Option data corrupted: {0}")]
    Decode(#[from] DecodeError),

    #[error("Duplicate option key: {0}")]
    DuplicateKey(String),

    #[error("Unknown option key: {0}")]
    UnknownKey(String),

    #[error("Option {key} is a {expected}, got a {found} value")]
    KindMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for option store operations
pub type OptionsResult<T> = Result<T, OptionsError>;
