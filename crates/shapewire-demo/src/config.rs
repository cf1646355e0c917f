//! Configuration for shapewire-demo

use clap::Parser;

/// shapewire-demo - schema handshake between two in-process peers
#[derive(Parser, Debug, Clone)]
#[command(name = "shapewire-demo")]
#[command(about = "Exchange a shapewire handshake and payloads over an in-memory pipe")]
pub struct Config {
    /// Resolution for the quantized temperature field
    #[arg(long, env = "SHAPEWIRE_RESOLUTION", default_value = "10.0")]
    pub resolution: f32,

    /// Resolution the responding peer uses (defaults to --resolution)
    #[arg(long, env = "SHAPEWIRE_PEER_RESOLUTION")]
    pub peer_resolution: Option<f32>,

    /// Number of readings to send after the handshake
    #[arg(short, long, default_value = "3")]
    pub messages: u32,

    /// In-memory pipe capacity in bytes
    #[arg(long, default_value = "256")]
    pub pipe_capacity: usize,

    /// Print the handshake snapshot as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Log format (json or pretty)
    #[arg(long, default_value = "pretty")]
    pub log_format: String,
}

impl Config {
    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(self.resolution.is_finite() && self.resolution > 0.0) {
            anyhow::bail!("Resolution must be a positive finite number");
        }
        if let Some(peer) = self.peer_resolution {
            if !(peer.is_finite() && peer > 0.0) {
                anyhow::bail!("Peer resolution must be a positive finite number");
            }
        }
        if self.pipe_capacity == 0 {
            anyhow::bail!("Pipe capacity cannot be zero");
        }
        if !matches!(self.log_format.as_str(), "json" | "pretty") {
            anyhow::bail!("Unknown log format: {}", self.log_format);
        }
        Ok(())
    }

    /// Resolution the responding peer registers with
    pub fn responder_resolution(&self) -> f32 {
        self.peer_resolution.unwrap_or(self.resolution)
    }
}
