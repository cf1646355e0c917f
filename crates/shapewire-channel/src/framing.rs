//! Message framing for carrying handshakes and payloads over a byte transport
//!
//! Provides length-prefixed frames tagged with a [`FrameKind`].

use bytes::{Buf, BufMut, BytesMut};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::codec::{Decoder, Encoder};

/// Maximum frame size (16 MB)
const MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;

/// Framing errors
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("Frame too large: {0} bytes (max {MAX_FRAME_SIZE})")]
    TooLarge(usize),
    #[error("Empty frame")]
    Empty,
    #[error("Unknown frame kind: {0}")]
    UnknownKind(u8),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A framed message
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Frame kind
    pub kind: FrameKind,
    /// Payload bytes
    pub payload: Vec<u8>,
}

/// Frame kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum FrameKind {
    /// Handshake blob
    Handshake = 0,
    /// Peer accepted our handshake
    Accept = 1,
    /// Peer rejected our handshake; payload is a UTF-8 reason
    Reject = 2,
    /// Serialized value of a registered type
    Payload = 16,
}

impl TryFrom<u8> for FrameKind {
    type Error = FrameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Handshake),
            1 => Ok(Self::Accept),
            2 => Ok(Self::Reject),
            16 => Ok(Self::Payload),
            _ => Err(FrameError::UnknownKind(value)),
        }
    }
}

/// Codec for length-prefixed frames
///
/// Wire format:
/// - 4 bytes: length (big-endian, includes kind byte)
/// - 1 byte: frame kind
/// - N bytes: payload
#[derive(Debug, Default)]
pub struct FrameCodec;

impl FrameCodec {
    /// Create a new codec
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for FrameCodec {
    type Item = Frame;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        // Need at least 5 bytes (4 length + 1 kind)
        if src.len() < 5 {
            return Ok(None);
        }

        let length = u32::from_be_bytes([src[0], src[1], src[2], src[3]]) as usize;

        if length > MAX_FRAME_SIZE {
            return Err(FrameError::TooLarge(length));
        }
        if length == 0 {
            return Err(FrameError::Empty);
        }

        if src.len() < 4 + length {
            src.reserve(4 + length - src.len());
            return Ok(None);
        }

        src.advance(4);
        let kind = FrameKind::try_from(src[0])?;
        src.advance(1);

        let payload = src.split_to(length - 1).to_vec();

        Ok(Some(Frame { kind, payload }))
    }
}

impl Encoder<Frame> for FrameCodec {
    type Error = FrameError;

    fn encode(&mut self, item: Frame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let length = 1 + item.payload.len();
        if length > MAX_FRAME_SIZE {
            return Err(FrameError::TooLarge(length));
        }

        dst.reserve(4 + length);
        dst.put_u32(length as u32);
        dst.put_u8(item.kind as u8);
        dst.put_slice(&item.payload);

        Ok(())
    }
}

impl Frame {
    /// Create a new frame
    pub fn new(kind: FrameKind, payload: Vec<u8>) -> Self {
        Self { kind, payload }
    }

    /// Handshake frame carrying `blob`
    pub fn handshake(blob: Vec<u8>) -> Self {
        Self::new(FrameKind::Handshake, blob)
    }

    /// Acceptance of the peer's handshake
    pub fn accept() -> Self {
        Self::new(FrameKind::Accept, vec![])
    }

    /// Rejection of the peer's handshake with a reason
    pub fn reject(reason: &str) -> Self {
        Self::new(FrameKind::Reject, reason.as_bytes().to_vec())
    }

    /// Payload frame
    pub fn payload(bytes: Vec<u8>) -> Self {
        Self::new(FrameKind::Payload, bytes)
    }
}
