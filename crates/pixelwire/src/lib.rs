//! Encode UPXL frames for addressable-LED expander channels.
//!
//! pixelwire turns a palette of packed `0xWWRRGGBB` colors and a list of pixel
//! indices into checksummed frames for WS2812 and APA102 strands. Sending the
//! frames is left to the caller's transport.
//!
//! # Crate Structure
//!
//! - [`frame`]: record types, color orders, headers, bodies and the
//!   [`MessageFactory`](frame::MessageFactory)

/// Re-export frame types.
pub mod frame {
    pub use pixelwire_frame::*;
}
