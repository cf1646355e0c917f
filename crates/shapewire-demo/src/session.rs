//! Handshake and payload exchange over a framed byte transport
//!
//! The initiator sends its handshake blob and waits for an accept or reject.
//! The responder validates the blob against its own registry and answers.
//! Only after acceptance do payload frames flow.

use futures::{SinkExt, StreamExt};
use shapewire_channel::{Channel, ChannelError, Frame, FrameCodec, FrameError, FrameKind};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::Framed;
use tracing::{debug, info, warn};

/// Session errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),
    #[error("Peer rejected handshake: {0}")]
    Rejected(String),
    #[error("Unexpected {0:?} frame")]
    Unexpected(FrameKind),
    #[error("Connection closed")]
    ConnectionClosed,
}

/// One side of a connection, bound to a registry
pub struct Session<'a, T> {
    framed: Framed<T, FrameCodec>,
    channel: &'a Channel,
}

impl<'a, T> Session<'a, T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    /// Wrap a transport
    pub fn new(io: T, channel: &'a Channel) -> Self {
        Self {
            framed: Framed::new(io, FrameCodec::new()),
            channel,
        }
    }

    /// Send our handshake and wait for the peer's verdict
    pub async fn initiate(&mut self) -> Result<(), SessionError> {
        let blob = self.channel.handshake().to_bytes()?;
        debug!(blob = %hex::encode(&blob), "sending handshake");
        self.framed.send(Frame::handshake(blob)).await?;

        let reply = self.next_frame().await?;
        match reply.kind {
            FrameKind::Accept => {
                info!("handshake accepted");
                Ok(())
            }
            FrameKind::Reject => Err(SessionError::Rejected(
                String::from_utf8_lossy(&reply.payload).into_owned(),
            )),
            other => Err(SessionError::Unexpected(other)),
        }
    }

    /// Wait for the peer's handshake, validate it and answer
    pub async fn respond(&mut self) -> Result<(), SessionError> {
        let frame = self.next_frame().await?;
        if frame.kind != FrameKind::Handshake {
            return Err(SessionError::Unexpected(frame.kind));
        }

        match self.channel.validate_handshake(&frame.payload[..]) {
            Ok(()) => {
                self.framed.send(Frame::accept()).await?;
                info!(types = self.channel.len(), "handshake validated");
                Ok(())
            }
            Err(e) => {
                warn!("rejecting handshake: {}", e);
                self.framed.send(Frame::reject(&e.to_string())).await?;
                Err(e.into())
            }
        }
    }

    /// Serialize `value` into a payload frame
    pub async fn send<V: Clone + 'static>(&mut self, value: &V) -> Result<(), SessionError> {
        let bytes = self.channel.to_bytes(value)?;
        self.framed.send(Frame::payload(bytes)).await?;
        Ok(())
    }

    /// Receive the next payload as a `V`; `None` once the peer hangs up
    pub async fn recv<V: 'static>(&mut self) -> Result<Option<V>, SessionError> {
        match self.framed.next().await {
            None => Ok(None),
            Some(frame) => {
                let frame = frame?;
                if frame.kind != FrameKind::Payload {
                    return Err(SessionError::Unexpected(frame.kind));
                }
                Ok(Some(self.channel.from_bytes(&frame.payload)?))
            }
        }
    }

    async fn next_frame(&mut self) -> Result<Frame, SessionError> {
        match self.framed.next().await {
            Some(frame) => Ok(frame?),
            None => Err(SessionError::ConnectionClosed),
        }
    }
}
