//! Types the demo peers exchange

use shapewire_channel::{Channel, Exchange, Result, ValueFactory};
use shapewire_core::{ByteStream, Codec, DynCodec};

/// A position on an integer grid
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Exchange for Point {
    const NAME: &'static str = "shapewire_demo::Point";

    fn walk<S: ByteStream>(&mut self, codec: &mut Codec<S>) -> shapewire_core::Result<()> {
        codec.i32(&mut self.x)?.i32(&mut self.y)?;
        Ok(())
    }
}

/// A sensor sample; the temperature travels quantized
#[derive(Clone, Debug, PartialEq)]
pub struct Reading {
    pub sensor: String,
    pub seq: u32,
    pub temperature: f32,
    pub position: Point,
}

impl Reading {
    pub const NAME: &'static str = "shapewire_demo::Reading";

    fn walk(&mut self, codec: &mut DynCodec<'_>, resolution: f32) -> shapewire_core::Result<()> {
        codec
            .string(&mut self.sensor)?
            .u32(&mut self.seq)?
            .ifloat16(&mut self.temperature, resolution)?;
        self.position.walk(codec)
    }
}

/// Register the demo schema. `reverse` flips registration order, which must
/// not affect the handshake outcome.
pub fn build_channel(resolution: f32, reverse: bool) -> Result<Channel> {
    let mut channel = Channel::new();
    let register_reading = |channel: &mut Channel| {
        channel.register(
            Reading::NAME,
            move |reading: &mut Reading, codec| reading.walk(codec, resolution),
            ValueFactory::constructor(|| Reading {
                sensor: String::from("unknown"),
                seq: 0,
                temperature: 0.0,
                position: Point::default(),
            }),
        )
    };

    if reverse {
        register_reading(&mut channel)?;
        channel.register_exchange::<Point>()?;
    } else {
        channel.register_exchange::<Point>()?;
        register_reading(&mut channel)?;
    }
    Ok(channel)
}
