//! Declarative channel configuration.
//!
//! With the `serde` feature, configurations deserialize from documents such as:
//!
//! ```json
//! {
//!   "channels": [
//!     { "type": "ws2812", "channel": 0, "color_order": "GRB" },
//!     { "type": "apa102_clock", "channel": 1, "frequency": 2000000 },
//!     { "type": "apa102_data", "channel": 1, "color_order": "RGBV" },
//!     { "type": "draw_all" }
//!   ]
//! }
//! ```

use crate::body::Apa102DataBody;
use crate::color::ColorOrder;
use crate::error::Result;
use crate::factory::MessageFactory;
use crate::record::RecordType;

/// Default APA102 clock: 2 MHz.
pub const DEFAULT_APA102_FREQUENCY: u32 = 2_000_000;

/// Default APA102 brightness register value.
pub const DEFAULT_BRIGHTNESS: u8 = 0x1F;

/// Channel byte conventionally used for draw-all frames.
pub const DRAW_ALL_CHANNEL: u32 = 0xFF;

/// One configured output: everything needed to build its [`MessageFactory`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum ChannelConfig {
    /// WS2812-style pixel data.
    Ws2812 {
        channel: u32,
        color_order: ColorOrder,
    },
    /// APA102-style pixel data.
    Apa102Data {
        channel: u32,
        color_order: ColorOrder,
        #[cfg_attr(feature = "serde", serde(default = "default_frequency"))]
        frequency: u32,
        #[cfg_attr(feature = "serde", serde(default = "default_brightness"))]
        brightness: u8,
    },
    /// APA102-style clock frequency.
    Apa102Clock {
        channel: u32,
        #[cfg_attr(feature = "serde", serde(default = "default_frequency"))]
        frequency: u32,
    },
    /// Latch every channel.
    DrawAll {
        #[cfg_attr(feature = "serde", serde(default = "default_draw_all_channel"))]
        channel: u32,
    },
}

#[cfg(feature = "serde")]
fn default_frequency() -> u32 {
    DEFAULT_APA102_FREQUENCY
}

#[cfg(feature = "serde")]
fn default_brightness() -> u8 {
    DEFAULT_BRIGHTNESS
}

#[cfg(feature = "serde")]
fn default_draw_all_channel() -> u32 {
    DRAW_ALL_CHANNEL
}

impl ChannelConfig {
    pub fn channel(&self) -> u32 {
        match self {
            ChannelConfig::Ws2812 { channel, .. }
            | ChannelConfig::Apa102Data { channel, .. }
            | ChannelConfig::Apa102Clock { channel, .. }
            | ChannelConfig::DrawAll { channel } => *channel,
        }
    }

    pub fn record_type(&self) -> RecordType {
        match self {
            ChannelConfig::Ws2812 { .. } => RecordType::SetChannelWs2812,
            ChannelConfig::Apa102Data { .. } => RecordType::SetChannelApa102Data,
            ChannelConfig::Apa102Clock { .. } => RecordType::SetChannelApa102Clock,
            ChannelConfig::DrawAll { .. } => RecordType::DrawAll,
        }
    }

    /// Build the factory for this output.
    pub fn build(&self) -> Result<MessageFactory> {
        match self {
            ChannelConfig::Ws2812 {
                channel,
                color_order,
            } => Ok(MessageFactory::ws2812(*channel, color_order.clone())),
            ChannelConfig::Apa102Data {
                channel,
                color_order,
                frequency,
                brightness,
            } => {
                let body = Apa102DataBody::new(color_order.clone(), *frequency)?
                    .with_brightness(*brightness);
                Ok(MessageFactory::new(*channel, body))
            }
            ChannelConfig::Apa102Clock { channel, frequency } => {
                Ok(MessageFactory::apa102_clock(*channel, *frequency))
            }
            ChannelConfig::DrawAll { channel } => {
                Ok(MessageFactory::new(*channel, crate::body::DrawAllBody))
            }
        }
    }
}

/// All outputs of one expander.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExpanderConfig {
    #[cfg_attr(feature = "serde", serde(default))]
    pub channels: Vec<ChannelConfig>,
}

impl ExpanderConfig {
    /// Build every configured factory, in order. Stops at the first error.
    pub fn build_all(&self) -> Result<Vec<MessageFactory>> {
        self.channels.iter().map(ChannelConfig::build).collect()
    }

    /// Entries for `channel`, optionally narrowed to one record type.
    pub fn find(
        &self,
        channel: u32,
        record_type: Option<RecordType>,
    ) -> impl Iterator<Item = &ChannelConfig> + '_ {
        self.channels.iter().filter(move |entry| {
            entry.channel() == channel && record_type.is_none_or(|r| entry.record_type() == r)
        })
    }
}
