//! shapewire-demo - schema handshake between two in-process peers
//!
//! Both peers register the same types (in opposite order), exchange a
//! handshake over an in-memory pipe and then stream a few readings. Pass
//! `--peer-resolution` to make the responder drift and watch the handshake fail.

use clap::Parser;
use shapewire_demo::{build_channel, Config, Point, Reading, Session, SessionError};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    // Parse configuration
    let config = Config::parse();

    // Initialize logging
    let default_level = if config.verbose {
        "shapewire_demo=debug,shapewire_channel=debug"
    } else {
        "shapewire_demo=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let json = config.log_format == "json";
    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(fmt::layer))
        .init();

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return ExitCode::FAILURE;
    }

    info!(
        "shapewire-demo v{} - schema handshake demo",
        env!("CARGO_PKG_VERSION")
    );

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    let initiator = build_channel(config.resolution, false)?;
    let responder = build_channel(config.responder_resolution(), true)?;

    let handshake = initiator.handshake();
    if config.json {
        println!("{}", serde_json::to_string_pretty(&handshake)?);
    } else {
        for entry in &handshake.entries {
            info!(name = %entry.name, checksum = %entry.checksum, "advertising type");
        }
        info!(blob = %hex::encode(handshake.to_bytes()?), "handshake blob");
    }

    let (left, right) = tokio::io::duplex(config.pipe_capacity);
    let messages = config.messages;

    let client = async {
        let mut session = Session::new(left, &initiator);
        session.initiate().await?;
        for seq in 0..messages {
            let reading = Reading {
                sensor: format!("sensor-{}", seq % 2),
                seq,
                temperature: 20.0 + seq as f32 * 1.37,
                position: Point {
                    x: seq as i32,
                    y: -(seq as i32),
                },
            };
            session.send(&reading).await?;
        }
        Ok::<_, SessionError>(())
    };

    let server = async {
        let mut session = Session::new(right, &responder);
        session.respond().await?;
        let mut received = 0u32;
        while let Some(reading) = session.recv::<Reading>().await? {
            info!(
                sensor = %reading.sensor,
                seq = reading.seq,
                temperature = reading.temperature,
                x = reading.position.x,
                y = reading.position.y,
                "received reading"
            );
            received += 1;
        }
        Ok::<_, SessionError>(received)
    };

    let ((), received) = tokio::try_join!(client, server)?;
    info!(received, "session complete");
    Ok(())
}
