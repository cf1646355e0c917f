//! Type registry and schema handshake
//!
//! Each registered type carries a field walk, a [`ValueFactory`] and the
//! checksum obtained by running the walk once against a throwaway codec. Peers
//! exchange these checksums before any payload so that a layout drift on
//! either side fails the handshake instead of mis-decoding data.
//!
//! Registration takes `&mut self`; every other operation takes `&self`, so a
//! fully built [`Channel`] can be shared across threads behind an `Arc`.

use crate::error::{ChannelError, Result};
use crate::factory::ValueFactory;
use crate::handshake::{entry_count, read_entry, Handshake, HandshakeEntry};
use shapewire_core::codec::MAX_TEXT_LEN;
use shapewire_core::{ByteStream, Codec, DynCodec, Error, Mode, Signature};
use std::any::{type_name, Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::io::Cursor;
use tracing::{debug, warn};

/// Field walk stored per registered type
type WalkFn<T> = dyn Fn(&mut T, &mut DynCodec<'_>) -> shapewire_core::Result<()> + Send + Sync;

/// A type that knows its own wire name and field walk
pub trait Exchange: Sized + Send + Sync + 'static {
    /// Name advertised in the handshake, stable across processes
    const NAME: &'static str;

    /// Run every field through `codec`
    fn walk<S: ByteStream>(&mut self, codec: &mut Codec<S>) -> shapewire_core::Result<()>;
}

struct Handler<T> {
    walk: Box<WalkFn<T>>,
    factory: ValueFactory<T>,
}

struct Entry {
    name: String,
    checksum: Signature,
    handler: Box<dyn Any + Send + Sync>,
}

/// Registry of exchangeable types
#[derive(Default)]
pub struct Channel {
    /// Registration order, which is also handshake order
    entries: Vec<Entry>,
    by_type: HashMap<TypeId, usize>,
    by_name: HashMap<String, usize>,
}

impl Channel {
    /// Create an empty channel
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` under `name`, returning its checksum.
    ///
    /// Fails with [`ChannelError::DuplicateType`] if either the Rust type or
    /// the name is already registered.
    pub fn register<T, F>(
        &mut self,
        name: impl Into<String>,
        walk: F,
        factory: ValueFactory<T>,
    ) -> Result<Signature>
    where
        T: Send + Sync + 'static,
        F: Fn(&mut T, &mut DynCodec<'_>) -> shapewire_core::Result<()> + Send + Sync + 'static,
    {
        let name = name.into();
        let type_id = TypeId::of::<T>();
        if self.by_type.contains_key(&type_id) || self.by_name.contains_key(&name) {
            return Err(ChannelError::DuplicateType(name));
        }
        if name.len() > MAX_TEXT_LEN {
            return Err(Error::ValueTooLarge {
                len: name.len(),
                max: MAX_TEXT_LEN,
            }
            .into());
        }
        if !name.is_ascii() {
            return Err(Error::NonAsciiText.into());
        }
        entry_count(self.entries.len() + 1)?;

        let handler = Handler {
            walk: Box::new(walk),
            factory,
        };
        let checksum = handler.checksum()?;
        debug!(name = %name, %checksum, "registered type");

        let index = self.entries.len();
        self.entries.push(Entry {
            name: name.clone(),
            checksum,
            handler: Box::new(handler),
        });
        self.by_type.insert(type_id, index);
        self.by_name.insert(name, index);
        Ok(checksum)
    }

    /// Register a type that describes itself through [`Exchange`]
    pub fn register_exchange<T: Exchange + Default>(&mut self) -> Result<Signature> {
        self.register(T::NAME, |value: &mut T, codec| value.walk(codec), ValueFactory::default())
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names in handshake order
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Checksum of a registered Rust type
    pub fn checksum<T: 'static>(&self) -> Option<Signature> {
        self.by_type
            .get(&TypeId::of::<T>())
            .map(|&i| self.entries[i].checksum)
    }

    /// Checksum of a registered name
    pub fn checksum_of(&self, name: &str) -> Option<Signature> {
        self.by_name.get(name).map(|&i| self.entries[i].checksum)
    }

    /// Snapshot of every registered name and checksum
    pub fn handshake(&self) -> Handshake {
        Handshake {
            entries: self
                .entries
                .iter()
                .map(|e| HandshakeEntry {
                    name: e.name.clone(),
                    checksum: e.checksum,
                })
                .collect(),
        }
    }

    /// Write the handshake blob to `sink`
    pub fn emit_handshake<S: ByteStream>(&self, sink: S) -> Result<()> {
        self.handshake().encode(sink)
    }

    /// Read a peer's handshake blob from `source` and check it against the
    /// local registry, failing on the first disagreement.
    pub fn validate_handshake<S: ByteStream>(&self, source: S) -> Result<()> {
        let mut codec = Codec::new(source, Mode::Deserialize);
        let mut count = -1i16;
        codec.i16(&mut count)?;
        self.check_count(count.into())?;

        let mut seen = HashSet::with_capacity(self.entries.len());
        for _ in 0..count {
            let entry = read_entry(&mut codec)?;
            self.check_entry(&entry, &mut seen)?;
        }
        Ok(())
    }

    /// Check an already decoded handshake against the local registry
    pub fn validate(&self, handshake: &Handshake) -> Result<()> {
        self.check_count(i64::try_from(handshake.entries.len()).unwrap_or(i64::MAX))?;

        let mut seen = HashSet::with_capacity(self.entries.len());
        for entry in &handshake.entries {
            self.check_entry(entry, &mut seen)?;
        }
        Ok(())
    }

    fn check_count(&self, remote: i64) -> Result<()> {
        if usize::try_from(remote).ok() != Some(self.entries.len()) {
            warn!(local = self.entries.len(), remote, "handshake entry count mismatch");
            return Err(ChannelError::EntryCountMismatch {
                local: self.entries.len(),
                remote,
            });
        }
        Ok(())
    }

    fn check_entry(&self, remote: &HandshakeEntry, seen: &mut HashSet<usize>) -> Result<()> {
        let Some(&index) = self.by_name.get(&remote.name) else {
            warn!(name = %remote.name, "handshake names unknown type");
            return Err(ChannelError::UnknownOrUnregisteredType(remote.name.clone()));
        };
        if !seen.insert(index) {
            warn!(name = %remote.name, "handshake repeats type");
            return Err(ChannelError::DuplicateType(remote.name.clone()));
        }

        let local = self.entries[index].checksum;
        if local != remote.checksum {
            warn!(name = %remote.name, %local, remote = %remote.checksum, "handshake checksum mismatch");
            return Err(ChannelError::ChecksumMismatch {
                name: remote.name.clone(),
                local,
                remote: remote.checksum,
            });
        }
        Ok(())
    }

    /// Serialize `value` into `sink` with its registered walk
    pub fn serialize<T, S>(&self, value: &T, mut sink: S) -> Result<()>
    where
        T: Clone + 'static,
        S: ByteStream,
    {
        let handler = self.handler::<T>()?;
        let mut value = value.clone();
        let mut codec = Codec::new(&mut sink as &mut dyn ByteStream, Mode::Serialize);
        (handler.walk)(&mut value, &mut codec)?;
        Ok(())
    }

    /// Deserialize a `T` from `source`, starting from its factory value
    pub fn deserialize<T, S>(&self, mut source: S) -> Result<T>
    where
        T: 'static,
        S: ByteStream,
    {
        let handler = self.handler::<T>()?;
        let mut value = handler.factory.make();
        let mut codec = Codec::new(&mut source as &mut dyn ByteStream, Mode::Deserialize);
        (handler.walk)(&mut value, &mut codec)?;
        Ok(value)
    }

    /// Serialize into a fresh buffer
    pub fn to_bytes<T: Clone + 'static>(&self, value: &T) -> Result<Vec<u8>> {
        let mut buf = Cursor::new(Vec::new());
        self.serialize(value, &mut buf)?;
        Ok(buf.into_inner())
    }

    /// Deserialize from a byte slice
    pub fn from_bytes<T: 'static>(&self, bytes: &[u8]) -> Result<T> {
        self.deserialize(bytes)
    }

    fn handler<T: 'static>(&self) -> Result<&Handler<T>> {
        self.by_type
            .get(&TypeId::of::<T>())
            .and_then(|&i| self.entries[i].handler.downcast_ref::<Handler<T>>())
            .ok_or(ChannelError::UnregisteredType(type_name::<T>()))
    }
}

impl<T> Handler<T> {
    /// Run the walk once over a scratch buffer and keep only its signature
    fn checksum(&self) -> Result<Signature> {
        let mut scratch = Cursor::new(Vec::new());
        let mut codec = Codec::new(&mut scratch as &mut dyn ByteStream, Mode::Serialize);
        let mut value = self.factory.make();
        (self.walk)(&mut value, &mut codec)?;
        Ok(codec.signature())
    }
}

impl std::fmt::Debug for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|e| (&e.name, e.checksum)))
            .finish()
    }
}
