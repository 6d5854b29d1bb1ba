use serde::Serialize;
use thiserror::Error;

/// Terminal decode failures.
///
/// These are reserved for input that cannot be interpreted as the target
/// format at all. Recoverable anomalies are recorded as warnings on the
/// [`ParseResult`](crate::ParseResult) instead.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// I/O error while reading the movie
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The archive container cannot be opened or iterated
    #[error("Corrupt archive: {0}")]
    CorruptArchive(String),

    /// The data is not a movie of the expected format
    #[error("Invalid movie format: {0}")]
    InvalidFormat(String),

    /// The movie is too small to contain a header
    #[error("Movie too small: expected at least {expected} bytes, got {actual}")]
    TooSmall { expected: u64, actual: u64 },

    /// The input or one of its entries exceeds the configured size bound
    #[error("Input too large: {actual} bytes exceeds the {limit} byte limit")]
    TooLarge { limit: u64, actual: u64 },

    /// A decoder broke the archive accessor's consumption rules
    #[error("Decoder usage error: {0}")]
    InternalUsage(String),
}

/// Machine-readable classification of a [`DecodeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureKind {
    Io,
    CorruptArchive,
    InvalidFormat,
    TooSmall,
    TooLarge,
    InternalUsage,
}

impl DecodeError {
    pub fn corrupt_archive(msg: impl Into<String>) -> Self {
        Self::CorruptArchive(msg.into())
    }

    pub fn invalid_format(msg: impl Into<String>) -> Self {
        Self::InvalidFormat(msg.into())
    }

    pub fn internal_usage(msg: impl Into<String>) -> Self {
        Self::InternalUsage(msg.into())
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Io(_) => FailureKind::Io,
            Self::CorruptArchive(_) => FailureKind::CorruptArchive,
            Self::InvalidFormat(_) => FailureKind::InvalidFormat,
            Self::TooSmall { .. } => FailureKind::TooSmall,
            Self::TooLarge { .. } => FailureKind::TooLarge,
            Self::InternalUsage(_) => FailureKind::InternalUsage,
        }
    }
}
