//! CRC-32 frame checksum.

use crc32fast::Hasher;

/// Bytes occupied by the trailing checksum.
pub const CRC_SIZE: usize = 4;

/// Running CRC-32 (IEEE) over the header and body of one frame.
#[derive(Clone, Default)]
pub struct ChecksumAccumulator {
    hasher: Hasher,
}

impl std::fmt::Debug for ChecksumAccumulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChecksumAccumulator")
            .field("value", &format_args!("{:#010x}", self.value()))
            .finish()
    }
}

impl ChecksumAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return to the initial state.
    pub fn reset(&mut self) {
        self.hasher.reset();
    }

    /// Fold a byte range into the running value.
    pub fn update(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Current checksum value.
    pub fn value(&self) -> u32 {
        self.hasher.clone().finalize()
    }

    /// Current checksum value, little-endian.
    pub fn finalize_bytes(&self) -> [u8; CRC_SIZE] {
        self.value().to_le_bytes()
    }
}

/// CRC-32 of `data`.
pub fn crc32(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}
