//! Checksummed wire frames for UPXL LED expander channels.
//!
//! Every message is framed with:
//! - The 4-byte magic `"UPXL"`
//! - A 1-byte channel id and a 1-byte record type
//! - A record-type specific body
//! - A CRC-32 of header and body, little-endian
//!
//! Frames are built by a [`MessageFactory`], configured once per channel and
//! reused for every frame sent to it.

pub mod body;
pub mod checksum;
pub mod color;
pub mod config;
pub mod error;
pub mod factory;
pub mod header;
pub mod record;

pub use body::{
    Apa102ClockBody, Apa102DataBody, BodyWriter, DrawAllBody, Ws2812Body, BYTES_PER_CHANNEL,
};
pub use checksum::{crc32, ChecksumAccumulator, CRC_SIZE};
pub use color::{color_bytes, ColorBytes, ColorOrder};
pub use config::{
    ChannelConfig, ExpanderConfig, DEFAULT_APA102_FREQUENCY, DEFAULT_BRIGHTNESS,
    DRAW_ALL_CHANNEL,
};
pub use error::{FrameError, Result};
pub use factory::MessageFactory;
pub use header::{Header, HEADER_SIZE, MAGIC};
pub use record::RecordType;
