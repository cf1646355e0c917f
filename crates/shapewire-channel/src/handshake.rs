//! Handshake blob
//!
//! Wire format:
//! - `i16` entry count (big-endian)
//! - per entry: `i16` name length, ASCII name bytes, `i32` checksum
//!
//! Entries appear in the emitter's registration order. Receivers match them
//! by name, so order does not matter for validation.

use crate::error::{ChannelError, Result};
use serde::{Deserialize, Serialize};
use shapewire_core::{ByteStream, Codec, Error, Mode, Signature};

/// One registered type as advertised to a peer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandshakeEntry {
    /// Stable type name
    pub name: String,
    /// Structural checksum of the type's field walk
    pub checksum: Signature,
}

/// Snapshot of a registry's schema, detached from the registry
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Handshake {
    pub entries: Vec<HandshakeEntry>,
}

impl Handshake {
    /// Write the blob to `sink`
    pub fn encode<S: ByteStream>(&self, sink: S) -> Result<()> {
        let mut codec = Codec::new(sink, Mode::Serialize);
        let mut count = entry_count(self.entries.len())?;
        codec.i16(&mut count)?;

        for entry in &self.entries {
            let mut name = entry.name.clone();
            let mut checksum = entry.checksum.value();
            codec.string(&mut name)?.i32(&mut checksum)?;
        }
        Ok(())
    }

    /// Encode into a fresh buffer
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = std::io::Cursor::new(Vec::new());
        self.encode(&mut buf)?;
        Ok(buf.into_inner())
    }

    /// Read a whole blob from `source`
    pub fn decode<S: ByteStream>(source: S) -> Result<Self> {
        let mut codec = Codec::new(source, Mode::Deserialize);
        let mut count = 0i16;
        codec.i16(&mut count)?;
        if count < 0 {
            return Err(Error::InvalidLength(count).into());
        }

        let mut entries = Vec::with_capacity(count as usize);
        for _ in 0..count {
            entries.push(read_entry(&mut codec)?);
        }
        Ok(Self { entries })
    }
}

pub(crate) fn entry_count(len: usize) -> Result<i16> {
    i16::try_from(len).map_err(|_| {
        ChannelError::Codec(Error::ValueTooLarge {
            len,
            max: i16::MAX as usize,
        })
    })
}

pub(crate) fn read_entry<S: ByteStream>(codec: &mut Codec<S>) -> Result<HandshakeEntry> {
    let mut name = String::new();
    let mut checksum = 0i32;
    codec.string(&mut name)?.i32(&mut checksum)?;
    Ok(HandshakeEntry {
        name,
        checksum: Signature(checksum),
    })
}
