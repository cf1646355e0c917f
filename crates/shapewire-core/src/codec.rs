//! Bidirectional primitive codec
//!
//! A [`Codec`] is a cursor over a [`ByteStream`] in one [`Mode`]. Every
//! primitive operation takes a mutable binding: in [`Mode::Serialize`] the
//! value is written big-endian, in [`Mode::Deserialize`] it is overwritten with
//! what was read. Either way the operation's [`PrimitiveKind`] (and the
//! resolution, for quantized kinds) is folded into the running [`Signature`],
//! so the same walk produces the same signature in both directions.
//!
//! ```
//! use shapewire_core::{Codec, Mode};
//! use std::io::Cursor;
//!
//! let (mut x, mut y) = (3i32, -3i32);
//! let mut codec = Codec::new(Cursor::new(Vec::new()), Mode::Serialize);
//! codec.i32(&mut x)?.i32(&mut y)?;
//! assert_eq!(codec.stream().get_ref(), &[0, 0, 0, 3, 0xFF, 0xFF, 0xFF, 0xFD]);
//! # Ok::<(), shapewire_core::Error>(())
//! ```
//!
//! A failed operation leaves both the bound value and the signature as they
//! were. The stream position is unspecified afterwards.

use crate::error::{Error, Result};
use crate::kind::{PrimitiveKind, Signature};
use crate::quantize;
use crate::stream::ByteStream;
use serde::{Deserialize, Serialize};

/// Direction a codec moves bytes in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Values are written to the stream
    Serialize,
    /// Values are read from the stream
    Deserialize,
}

/// Largest text length the 16-bit prefix can carry
pub const MAX_TEXT_LEN: usize = i16::MAX as usize;

/// Codec over a type-erased stream, the form registered field walks receive
pub type DynCodec<'a> = Codec<&'a mut dyn ByteStream>;

/// Stateful primitive codec bound to one stream
#[derive(Debug)]
pub struct Codec<S> {
    stream: S,
    mode: Mode,
    signature: Signature,
}

macro_rules! fixed_primitive {
    ($(#[$meta:meta])* $name:ident, $ty:ty, $kind:ident) => {
        $(#[$meta])*
        pub fn $name(&mut self, value: &mut $ty) -> Result<&mut Self> {
            match self.mode {
                Mode::Serialize => self.put(&value.to_be_bytes())?,
                Mode::Deserialize => *value = <$ty>::from_be_bytes(self.get()?),
            }
            self.signature.append_kind(PrimitiveKind::$kind);
            Ok(self)
        }
    };
}

macro_rules! quantized_primitive {
    (
        $(#[$meta:meta])*
        $name:ident, $float:ty => $raw:ty, $kind:ident,
        $encode:path, $decode:path, $append:ident
    ) => {
        $(#[$meta])*
        pub fn $name(&mut self, value: &mut $float, resolution: $float) -> Result<&mut Self> {
            match self.mode {
                Mode::Serialize => self.put(&$encode(*value, resolution).to_be_bytes())?,
                Mode::Deserialize => {
                    *value = $decode(<$raw>::from_be_bytes(self.get()?), resolution)
                }
            }
            self.signature.append_kind(PrimitiveKind::$kind);
            self.signature.$append(resolution);
            Ok(self)
        }
    };
}

impl<S: ByteStream> Codec<S> {
    /// Bind a codec to `stream` with a freshly seeded signature
    pub fn new(stream: S, mode: Mode) -> Self {
        Self {
            stream,
            mode,
            signature: Signature::new(),
        }
    }

    /// Current direction
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Signature accumulated since construction or the last reset
    pub fn signature(&self) -> Signature {
        self.signature
    }

    /// Borrow the underlying stream
    pub fn stream(&self) -> &S {
        &self.stream
    }

    /// Mutably borrow the underlying stream
    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    /// Release the underlying stream
    pub fn into_inner(self) -> S {
        self.stream
    }

    /// Switch mode and reseed the signature, leaving the stream where it is
    pub fn reset(&mut self, mode: Mode) {
        self.mode = mode;
        self.signature = Signature::new();
    }

    /// Reset and move the stream back to its start, so the same walk can be
    /// replayed in `mode`
    pub fn rewind(&mut self, mode: Mode) -> Result<()> {
        self.stream.rewind()?;
        self.reset(mode);
        Ok(())
    }

    fixed_primitive!(
        /// Unsigned byte
        u8, u8, U8
    );
    fixed_primitive!(
        /// Signed byte
        i8, i8, I8
    );
    fixed_primitive!(u16, u16, U16);
    fixed_primitive!(i16, i16, I16);
    fixed_primitive!(u32, u32, U32);
    fixed_primitive!(i32, i32, I32);
    fixed_primitive!(u64, u64, U64);
    fixed_primitive!(i64, i64, I64);
    fixed_primitive!(
        /// IEEE-754 single, bit pattern written big-endian
        f32, f32, F32
    );
    fixed_primitive!(
        /// IEEE-754 double, bit pattern written big-endian
        f64, f64, F64
    );

    quantized_primitive!(
        /// Single-precision value quantized into 16 bits at `resolution`
        ifloat16, f32 => i16, IFloat16,
        quantize::encode_f32_i16, quantize::decode_f32_i16, append_resolution_f32
    );
    quantized_primitive!(
        /// Single-precision value quantized into one signed byte at `resolution`
        ifloat8, f32 => i8, IFloat8,
        quantize::encode_f32_i8, quantize::decode_f32_i8, append_resolution_f32
    );
    quantized_primitive!(
        /// Double-precision value quantized into 32 bits at `resolution`
        idouble32, f64 => i32, IDouble32,
        quantize::encode_f64_i32, quantize::decode_f64_i32, append_resolution_f64
    );
    quantized_primitive!(
        /// Double-precision value quantized into 16 bits at `resolution`
        idouble16, f64 => i16, IDouble16,
        quantize::encode_f64_i16, quantize::decode_f64_i16, append_resolution_f64
    );
    quantized_primitive!(
        /// Double-precision value quantized into one signed byte at `resolution`
        idouble8, f64 => i8, IDouble8,
        quantize::encode_f64_i8, quantize::decode_f64_i8, append_resolution_f64
    );

    /// Single ASCII character as one byte
    pub fn char(&mut self, value: &mut char) -> Result<&mut Self> {
        match self.mode {
            Mode::Serialize => {
                if !value.is_ascii() {
                    return Err(Error::NonAsciiText);
                }
                self.put(&[*value as u8])?;
            }
            Mode::Deserialize => {
                let [byte] = self.get::<1>()?;
                if !byte.is_ascii() {
                    return Err(Error::NonAsciiText);
                }
                *value = char::from(byte);
            }
        }
        self.signature.append_kind(PrimitiveKind::Char);
        Ok(self)
    }

    /// ASCII text behind a signed 16-bit big-endian length prefix
    pub fn string(&mut self, value: &mut String) -> Result<&mut Self> {
        match self.mode {
            Mode::Serialize => {
                if value.len() > MAX_TEXT_LEN {
                    return Err(Error::ValueTooLarge {
                        len: value.len(),
                        max: MAX_TEXT_LEN,
                    });
                }
                if !value.is_ascii() {
                    return Err(Error::NonAsciiText);
                }
                self.put(&(value.len() as i16).to_be_bytes())?;
                self.put(value.as_bytes())?;
            }
            Mode::Deserialize => {
                let len = i16::from_be_bytes(self.get()?);
                if len < 0 {
                    return Err(Error::InvalidLength(len));
                }
                let mut buf = vec![0u8; len as usize];
                self.stream.read_exact_bytes(&mut buf)?;
                if !buf.is_ascii() {
                    return Err(Error::NonAsciiText);
                }
                *value = String::from_utf8(buf).map_err(|_| Error::NonAsciiText)?;
            }
        }
        self.signature.append_kind(PrimitiveKind::String);
        Ok(self)
    }

    fn put(&mut self, bytes: &[u8]) -> Result<()> {
        self.stream.write_all_bytes(bytes)
    }

    fn get<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.stream.read_exact_bytes(&mut buf)?;
        Ok(buf)
    }
}
