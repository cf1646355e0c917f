//! shapewire-demo - handshake and payload exchange between two peers
//!
//! This crate provides:
//! - Command-line configuration
//! - The demo schema (`Point`, `Reading`)
//! - Async session helpers that run the handshake over framed transport

pub mod config;
pub mod schema;
pub mod session;

pub use config::Config;
pub use schema::{build_channel, Point, Reading};
pub use session::{Session, SessionError};
