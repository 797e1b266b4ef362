//! Record types carried in the frame header.
//!
//! The record type selects the body layout that follows the header.

/// Command kind encoded in byte 5 of every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RecordType {
    /// Pixel data for a WS2812-style (single wire) strand.
    SetChannelWs2812 = 1,
    /// Latch buffered pixels on every channel.
    DrawAll = 2,
    /// Pixel data for an APA102-style (clock + data) strand.
    SetChannelApa102Data = 3,
    /// Clock frequency for an APA102-style strand.
    SetChannelApa102Clock = 4,
}

impl RecordType {
    /// All known record types, in wire-value order.
    pub const ALL: [RecordType; 4] = [
        RecordType::SetChannelWs2812,
        RecordType::DrawAll,
        RecordType::SetChannelApa102Data,
        RecordType::SetChannelApa102Clock,
    ];

    /// The byte written to the wire.
    pub const fn wire_value(self) -> u8 {
        self as u8
    }

    /// Look up a record type by its wire byte.
    pub fn from_wire(value: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.wire_value() == value)
    }

    /// Returns a human-readable name for the record type.
    pub const fn name(self) -> &'static str {
        match self {
            RecordType::SetChannelWs2812 => "SET_CHANNEL_WS2812",
            RecordType::DrawAll => "DRAW_ALL",
            RecordType::SetChannelApa102Data => "SET_CHANNEL_APA102_DATA",
            RecordType::SetChannelApa102Clock => "SET_CHANNEL_APA102_CLOCK",
        }
    }

    /// Returns true if frames of this type carry pixel data.
    pub const fn carries_pixels(self) -> bool {
        matches!(
            self,
            RecordType::SetChannelWs2812 | RecordType::SetChannelApa102Data
        )
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_values_never_collide() {
        let mut seen = std::collections::HashSet::new();
        for record in RecordType::ALL {
            assert!(seen.insert(record.wire_value()), "duplicate {record}");
        }
    }

    #[test]
    fn from_wire_inverts_wire_value() {
        for record in RecordType::ALL {
            assert_eq!(RecordType::from_wire(record.wire_value()), Some(record));
        }
        assert_eq!(RecordType::from_wire(0), None);
        assert_eq!(RecordType::from_wire(0xFF), None);
    }

    #[test]
    fn known_wire_values() {
        assert_eq!(RecordType::SetChannelWs2812.wire_value(), 1);
        assert_eq!(RecordType::DrawAll.wire_value(), 2);
        assert_eq!(RecordType::SetChannelApa102Data.wire_value(), 3);
        assert_eq!(RecordType::SetChannelApa102Clock.wire_value(), 4);
    }

    #[test]
    fn pixel_carrying_types() {
        assert!(RecordType::SetChannelWs2812.carries_pixels());
        assert!(RecordType::SetChannelApa102Data.carries_pixels());
        assert!(!RecordType::SetChannelApa102Clock.carries_pixels());
        assert!(!RecordType::DrawAll.carries_pixels());
    }
}
