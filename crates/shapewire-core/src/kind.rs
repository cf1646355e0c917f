//! Primitive tags and the structural signature
//!
//! Tags are never written to the stream. They are folded into a rolling
//! [`Signature`] so that two peers walking different field sequences arrive at
//! different checksums, while the data values themselves never influence it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire-level primitive tags (stable integers)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum PrimitiveKind {
    Invalid = 0,

    U8 = 1,
    I8 = 2,

    U16 = 3,
    I16 = 4,

    U32 = 5,
    I32 = 6,

    U64 = 7,
    I64 = 8,

    F32 = 9,
    F64 = 10,

    IFloat8 = 11,
    IFloat16 = 12,

    IDouble8 = 13,
    IDouble16 = 14,
    IDouble32 = 15,

    Char = 16,
    String = 17,
}

impl PrimitiveKind {
    /// Stable integer tag
    pub fn tag(self) -> i32 {
        self as i32
    }

    /// Number of bytes the kind occupies on the wire, `None` for variable length
    pub fn wire_size(self) -> Option<usize> {
        match self {
            Self::Invalid => Some(0),
            Self::U8 | Self::I8 | Self::IFloat8 | Self::IDouble8 | Self::Char => Some(1),
            Self::U16 | Self::I16 | Self::IFloat16 | Self::IDouble16 => Some(2),
            Self::U32 | Self::I32 | Self::F32 | Self::IDouble32 => Some(4),
            Self::U64 | Self::I64 | Self::F64 => Some(8),
            Self::String => None,
        }
    }
}

impl TryFrom<i32> for PrimitiveKind {
    type Error = i32;

    fn try_from(value: i32) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Invalid),
            1 => Ok(Self::U8),
            2 => Ok(Self::I8),
            3 => Ok(Self::U16),
            4 => Ok(Self::I16),
            5 => Ok(Self::U32),
            6 => Ok(Self::I32),
            7 => Ok(Self::U64),
            8 => Ok(Self::I64),
            9 => Ok(Self::F32),
            10 => Ok(Self::F64),
            11 => Ok(Self::IFloat8),
            12 => Ok(Self::IFloat16),
            13 => Ok(Self::IDouble8),
            14 => Ok(Self::IDouble16),
            15 => Ok(Self::IDouble32),
            16 => Ok(Self::Char),
            17 => Ok(Self::String),
            other => Err(other),
        }
    }
}

/// 32-bit rolling hash over the shape of an operation sequence.
///
/// `hash = hash * 9176 + contribution`, wrapping, seeded at 1009.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature(pub i32);

impl Signature {
    /// Seed every codec starts from
    pub const SEED: i32 = 1009;

    /// Multiplier applied before each contribution
    pub const MULTIPLIER: i32 = 9176;

    /// Fresh signature at the seed value
    pub const fn new() -> Self {
        Self(Self::SEED)
    }

    /// Raw checksum value
    pub fn value(self) -> i32 {
        self.0
    }

    /// Fold a primitive tag
    pub fn append_kind(&mut self, kind: PrimitiveKind) {
        self.append(kind.tag());
    }

    /// Fold the bit pattern of a single-precision resolution
    pub fn append_resolution_f32(&mut self, resolution: f32) {
        self.append(resolution.to_bits() as i32);
    }

    /// Fold a double-precision resolution, low 32 bits first
    pub fn append_resolution_f64(&mut self, resolution: f64) {
        let bits = resolution.to_bits();
        self.append(bits as u32 as i32);
        self.append((bits >> 32) as u32 as i32);
    }

    fn append(&mut self, contribution: i32) {
        self.0 = self
            .0
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(contribution);
    }
}

impl Default for Signature {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({:#010x})", self.0 as u32)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0 as u32)
    }
}
