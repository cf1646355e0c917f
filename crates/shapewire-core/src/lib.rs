//! shapewire core library
//!
//! This crate provides the bidirectional primitive codec used by the
//! shapewire handshake protocol.
//!
//! # Modules
//!
//! - [`codec`]: The [`Codec`] cursor that writes or reads primitives depending on its [`Mode`]
//! - [`kind`]: Wire-level primitive tags and the rolling structural [`Signature`]
//! - [`quantize`]: Fixed-point mapping of floating values onto narrow integers
//! - [`stream`]: The [`ByteStream`] abstraction and its adapters
//! - [`error`]: Error types

pub mod codec;
pub mod error;
pub mod kind;
pub mod quantize;
pub mod stream;

#[cfg(test)]
mod test_vectors;

pub use codec::{Codec, DynCodec, Mode};
pub use error::{Error, Result};
pub use kind::{PrimitiveKind, Signature};
pub use stream::{ByteStream, Sink, Source};
