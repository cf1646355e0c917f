//! Error types for the shapewire codec

use crate::codec::Mode;
use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Codec error types
#[derive(Debug, Error)]
pub enum Error {
    /// Fewer bytes were available than the primitive requires
    #[error("unexpected end of stream: needed {needed} bytes")]
    UnexpectedEndOfStream { needed: usize },

    /// Text longer than the 16-bit length prefix can describe
    #[error("value too large: {len} exceeds maximum of {max}")]
    ValueTooLarge { len: usize, max: usize },

    /// Negative length prefix read from the stream
    #[error("invalid length prefix: {0}")]
    InvalidLength(i16),

    /// Text outside the 7-bit ASCII range
    #[error("text contains non-ASCII characters")]
    NonAsciiText,

    /// The stream cannot move bytes in the direction the codec asked for
    #[error("stream does not support {0:?}")]
    WrongDirection(Mode),

    /// The stream cannot be rewound to its start
    #[error("stream cannot be rewound")]
    NotRewindable,

    /// Underlying I/O failure
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
