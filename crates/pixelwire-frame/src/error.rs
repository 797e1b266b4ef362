/// Errors that can occur while building frames.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// The pixel payload does not fit the channel's hardware buffer.
    #[error("too many pixels for a single channel ({pixels} pixels need {needed} bytes, budget {budget})")]
    BufferOverflow {
        pixels: usize,
        needed: usize,
        budget: usize,
    },

    /// The color order does not have the component count the record type requires.
    #[error("color order {name} has {num_elements} elements; APA102 channels need 4 (e.g. RGBV)")]
    UnsupportedColorOrder { name: String, num_elements: u8 },

    /// A pixel refers to a palette slot that does not exist.
    #[error("color index {index} out of range (palette has {len} colors)")]
    ColorIndexOutOfRange { index: usize, len: usize },

    /// The color order table is malformed or the preset name is unknown.
    #[error("invalid color order: {0}")]
    InvalidColorOrder(String),
}

pub type Result<T> = std::result::Result<T, FrameError>;
