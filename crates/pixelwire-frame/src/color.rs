//! Color orders: where each nominal channel lands on the wire.
//!
//! A color order maps the nominal channels R=0, G=1, B=2 and W/aux=3 to a
//! 2-bit wire position. The four positions pack into one byte, 2 bits per
//! nominal channel from low to high, which the expander receives verbatim.
//!
//! Packed colors are `0xWWRRGGBB`.

use std::borrow::Cow;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::str::FromStr;

use crate::error::{FrameError, Result};

/// Source byte of each nominal channel (R, G, B, W) within a packed color.
const SOURCE_BYTE: [u32; 4] = [2, 1, 0, 3];

/// Names of the nominal channels, used in error messages.
const CHANNEL_NAMES: [char; 4] = ['R', 'G', 'B', 'W'];

/// Wire position table for up to four nominal color channels.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColorOrder {
    name: Cow<'static, str>,
    positions: [u8; 4],
    num_elements: u8,
}

impl ColorOrder {
    /// Red, green, blue.
    pub const RGB: ColorOrder = ColorOrder::preset("RGB", [0, 1, 2, 0], 3);
    /// Red, green, blue, white.
    pub const RGBW: ColorOrder = ColorOrder::preset("RGBW", [0, 1, 2, 3], 4);
    /// Red, green, blue and a 4th channel the device reinterprets
    /// (the APA102 brightness register). Same layout as [`ColorOrder::RGBW`].
    pub const RGBV: ColorOrder = ColorOrder::preset("RGBV", [0, 1, 2, 3], 4);
    /// Green, red, blue: the native order of most WS2812 strands.
    pub const GRB: ColorOrder = ColorOrder::preset("GRB", [1, 0, 2, 0], 3);
    /// Green, red, blue, white.
    pub const GRBW: ColorOrder = ColorOrder::preset("GRBW", [1, 0, 2, 3], 4);
    /// Blue, green, red.
    pub const BGR: ColorOrder = ColorOrder::preset("BGR", [2, 1, 0, 0], 3);

    const fn preset(name: &'static str, positions: [u8; 4], num_elements: u8) -> Self {
        Self {
            name: Cow::Borrowed(name),
            positions,
            num_elements,
        }
    }

    /// Every named preset.
    pub fn presets() -> &'static [ColorOrder] {
        &PRESETS
    }

    /// Build a custom color order.
    ///
    /// `positions` holds the wire position of R, G, B and W in that order.
    /// The active positions `0..num_elements` must each be used exactly once;
    /// the W position is ignored for 3-element orders. The name may come
    /// from anywhere, e.g. a config file.
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        positions: [u8; 4],
        num_elements: u8,
    ) -> Result<Self> {
        let name = name.into();
        if !(3..=4).contains(&num_elements) {
            return Err(FrameError::InvalidColorOrder(format!(
                "{name}: num_elements must be 3 or 4, got {num_elements}"
            )));
        }

        let mut used = [false; 4];
        for (k, &pos) in positions.iter().take(num_elements as usize).enumerate() {
            if pos >= num_elements {
                return Err(FrameError::InvalidColorOrder(format!(
                    "{name}: {} wire position {pos} out of range for {num_elements} elements",
                    CHANNEL_NAMES[k]
                )));
            }
            if used[pos as usize] {
                return Err(FrameError::InvalidColorOrder(format!(
                    "{name}: wire position {pos} used more than once"
                )));
            }
            used[pos as usize] = true;
        }

        let mut positions = positions;
        if num_elements == 3 {
            positions[3] = 0;
        }

        Ok(Self {
            name,
            positions,
            num_elements,
        })
    }

    /// Preset or custom name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of bytes each pixel occupies on the wire (3 or 4).
    pub fn num_elements(&self) -> u8 {
        self.num_elements
    }

    /// Wire position of nominal channel `k` (0=R, 1=G, 2=B, 3=W), or `None`
    /// past W.
    pub fn position(&self, k: usize) -> Option<u8> {
        self.positions.get(k).map(|pos| pos & 0b11)
    }

    /// The packed order byte sent to the expander.
    pub const fn packed(&self) -> u8 {
        (self.positions[0] & 0b11)
            | ((self.positions[1] & 0b11) << 2)
            | ((self.positions[2] & 0b11) << 4)
            | ((self.positions[3] & 0b11) << 6)
    }

    /// Wire bytes for one packed color.
    pub fn color_bytes(&self, color: u32) -> ColorBytes {
        color_bytes(self.packed(), self.num_elements, color)
    }
}

impl fmt::Display for ColorOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl FromStr for ColorOrder {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self> {
        ColorOrder::presets()
            .iter()
            .find(|order| order.name.eq_ignore_ascii_case(s.trim()))
            .cloned()
            .ok_or_else(|| FrameError::InvalidColorOrder(format!("unknown preset {s:?}")))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ColorOrder {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.name)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ColorOrder {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = <String as serde::Deserialize>::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

static PRESETS: [ColorOrder; 6] = [
    ColorOrder::RGB,
    ColorOrder::RGBW,
    ColorOrder::RGBV,
    ColorOrder::GRB,
    ColorOrder::GRBW,
    ColorOrder::BGR,
];

/// Up to four wire bytes of a single pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorBytes {
    bytes: [u8; 4],
    len: usize,
}

impl ColorBytes {
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

impl Deref for ColorBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl DerefMut for ColorBytes {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.bytes[..self.len]
    }
}

/// Reorder a packed `0xWWRRGGBB` color into wire order.
///
/// Nominal channel `k` is read from its source byte and written to the wire
/// position stored in bits `2k..2k+2` of `order`. Positions are not checked
/// here: a table that repeats a position overwrites the earlier byte.
pub fn color_bytes(order: u8, num_elements: u8, color: u32) -> ColorBytes {
    let len = (num_elements as usize).min(4);
    let mut bytes = [0u8; 4];
    for (k, &source) in SOURCE_BYTE.iter().take(len).enumerate() {
        let pos = ((order >> (2 * k)) & 0b11) as usize;
        bytes[pos] = ((color >> (8 * source)) & 0xFF) as u8;
    }
    ColorBytes { bytes, len }
}
