use bytes::BufMut;

use crate::record::RecordType;

/// Frame header: magic (4) + channel (1) + record type (1) = 6 bytes.
pub const HEADER_SIZE: usize = 6;

/// Magic bytes: "UPXL".
pub const MAGIC: [u8; 4] = *b"UPXL";

/// The fixed prefix of every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Output lane on the expander.
    pub channel: u8,
    /// Selects the body layout.
    pub record_type: RecordType,
}

impl Header {
    /// Create a header. Only the low 8 bits of `channel` are kept.
    pub fn new(channel: u32, record_type: RecordType) -> Self {
        Self {
            channel: (channel & 0xFF) as u8,
            record_type,
        }
    }

    /// Write the header and return the number of bytes written.
    ///
    /// Wire format:
    /// ```text
    /// ┌──────────────┬──────────┬─────────────┐
    /// │ Magic (4B)   │ Channel  │ Record type │
    /// │ "UPXL"       │ (1B)     │ (1B)        │
    /// └──────────────┴──────────┴─────────────┘
    /// ```
    pub fn write<B: BufMut>(&self, dst: &mut B) -> usize {
        dst.put_slice(&MAGIC);
        dst.put_u8(self.channel);
        dst.put_u8(self.record_type.wire_value());
        HEADER_SIZE
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        let mut dst = &mut out[..];
        self.write(&mut dst);
        out
    }
}
