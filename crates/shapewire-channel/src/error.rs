//! Channel error types

use shapewire_core::Signature;
use thiserror::Error;

/// Result type alias using ChannelError
pub type Result<T> = std::result::Result<T, ChannelError>;

/// Registry and handshake errors
#[derive(Debug, Error)]
pub enum ChannelError {
    /// A type identity or name was registered twice
    #[error("duplicate type: {0}")]
    DuplicateType(String),

    /// Serialize/deserialize requested for a type this channel does not know
    #[error("type cannot be (de)serialized by this channel: {0}")]
    UnregisteredType(&'static str),

    /// Peer advertised a different number of types
    #[error("handshake entry count mismatch: local {local}, remote {remote}")]
    EntryCountMismatch { local: usize, remote: i64 },

    /// Peer walks a type with a different layout
    #[error("handshake checksum mismatch for {name}: local {local}, remote {remote}")]
    ChecksumMismatch {
        name: String,
        local: Signature,
        remote: Signature,
    },

    /// Peer advertised a name with no local registration
    #[error("handshake names missing or unregistered type: {0}")]
    UnknownOrUnregisteredType(String),

    /// Codec failure while walking a value or the handshake blob
    #[error("codec error: {0}")]
    Codec(#[from] shapewire_core::Error),
}
