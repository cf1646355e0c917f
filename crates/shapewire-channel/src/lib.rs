//! Schema handshake channel for the shapewire protocol
//!
//! This crate provides:
//! - A type registry that fingerprints each exchangeable type's wire layout
//! - Handshake blob emission and validation between peers
//! - Per-type serialize/deserialize dispatch
//! - Length-prefixed framing for carrying handshakes and payloads

pub mod error;
pub mod factory;
pub mod framing;
pub mod handshake;
pub mod registry;

pub use error::{ChannelError, Result};
pub use factory::ValueFactory;
pub use framing::{Frame, FrameCodec, FrameError, FrameKind};
pub use handshake::{Handshake, HandshakeEntry};
pub use registry::{Channel, Exchange};
