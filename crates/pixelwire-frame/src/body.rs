//! Record-type specific body layouts.
//!
//! Each device type implements [`BodyWriter`]. A [`MessageFactory`] owns one
//! writer, chosen when the factory is configured.
//!
//! [`MessageFactory`]: crate::MessageFactory

use std::fmt;

use bytes::{BufMut, BytesMut};

use crate::color::ColorOrder;
use crate::config::DEFAULT_BRIGHTNESS;
use crate::error::{FrameError, Result};
use crate::record::RecordType;

/// Pixel buffer available on each expander channel, in bytes.
pub const BYTES_PER_CHANNEL: usize = 2048;

/// Writes the body of one record type.
pub trait BodyWriter: fmt::Debug + Send + Sync {
    /// Record type placed in the header.
    fn record_type(&self) -> RecordType;

    /// Body bytes when no pixels are sent.
    fn base_size(&self) -> usize;

    /// Body bytes added per pixel. Zero for messages without pixels.
    fn color_size(&self) -> usize;

    /// Bytes the pixels occupy in the channel's hardware buffer.
    fn buffer_space(&self, color_indices: &[usize]) -> usize {
        self.color_size() * color_indices.len()
    }

    /// Check the pixel list against the channel's limits.
    fn validate(&self, _color_indices: &[usize]) -> Result<()> {
        Ok(())
    }

    /// Append the body to `dst` and return the number of bytes written.
    ///
    /// All validation happens before the first byte is written.
    fn write_body(
        &self,
        dst: &mut BytesMut,
        color_indices: &[usize],
        colors: &[u32],
    ) -> Result<usize>;
}

/// Fail when `needed` bytes exceed the channel budget.
pub fn check_budget(needed: usize, pixels: usize) -> Result<()> {
    if needed > BYTES_PER_CHANNEL {
        return Err(FrameError::BufferOverflow {
            pixels,
            needed,
            budget: BYTES_PER_CHANNEL,
        });
    }
    Ok(())
}

/// Fail when a pixel refers past the end of the palette.
pub fn check_indices(color_indices: &[usize], colors: &[u32]) -> Result<()> {
    match color_indices.iter().find(|&&index| index >= colors.len()) {
        Some(&index) => Err(FrameError::ColorIndexOutOfRange {
            index,
            len: colors.len(),
        }),
        None => Ok(()),
    }
}

// Pixel counts that pass the channel budget always fit the u16 count field.
fn pixel_count(color_indices: &[usize]) -> u16 {
    color_indices.len() as u16
}

/// Pixel data for WS2812-style strands.
///
/// ```text
/// ┌──────────────┬────────────┬──────────────┬──────────────────┐
/// │ Elements(1B) │ Order (1B) │ Pixels (2B)  │ Pixel bytes      │
/// └──────────────┴────────────┴──────────────┴──────────────────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ws2812Body {
    order: ColorOrder,
}

impl Ws2812Body {
    pub fn new(order: ColorOrder) -> Self {
        Self { order }
    }

    pub fn color_order(&self) -> &ColorOrder {
        &self.order
    }
}

impl BodyWriter for Ws2812Body {
    fn record_type(&self) -> RecordType {
        RecordType::SetChannelWs2812
    }

    fn base_size(&self) -> usize {
        4
    }

    fn color_size(&self) -> usize {
        self.order.num_elements() as usize
    }

    fn validate(&self, color_indices: &[usize]) -> Result<()> {
        check_budget(self.buffer_space(color_indices), color_indices.len())
    }

    fn write_body(
        &self,
        dst: &mut BytesMut,
        color_indices: &[usize],
        colors: &[u32],
    ) -> Result<usize> {
        self.validate(color_indices)?;
        check_indices(color_indices, colors)?;

        let start = dst.len();
        dst.put_u8(self.order.num_elements());
        dst.put_u8(self.order.packed());
        dst.put_u16_le(pixel_count(color_indices));
        for &index in color_indices {
            dst.put_slice(&self.order.color_bytes(colors[index]));
        }
        Ok(dst.len() - start)
    }
}

/// Pixel data for APA102-style strands.
///
/// ```text
/// ┌────────────┬────────────┬──────────┬─────────────┬──────────────────┐
/// │ Clock (4B) │ Order (1B) │ Pad (1B) │ Pixels (2B) │ 4 bytes / pixel  │
/// └────────────┴────────────┴──────────┴─────────────┴──────────────────┘
/// ```
///
/// The byte at wire position 3 of every pixel carries the brightness register
/// instead of the color's 4th channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Apa102DataBody {
    order: ColorOrder,
    frequency: u32,
    brightness: u8,
}

impl Apa102DataBody {
    /// Create an APA102 data writer. The color order must have 4 elements.
    pub fn new(order: ColorOrder, frequency: u32) -> Result<Self> {
        check_four_elements(&order)?;
        Ok(Self {
            order,
            frequency,
            brightness: DEFAULT_BRIGHTNESS,
        })
    }

    /// Replace the brightness register value written into every pixel.
    pub fn with_brightness(mut self, brightness: u8) -> Self {
        self.brightness = brightness;
        self
    }

    pub fn color_order(&self) -> &ColorOrder {
        &self.order
    }

    pub fn frequency(&self) -> u32 {
        self.frequency
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }
}

fn check_four_elements(order: &ColorOrder) -> Result<()> {
    if order.num_elements() != 4 {
        return Err(FrameError::UnsupportedColorOrder {
            name: order.name().to_string(),
            num_elements: order.num_elements(),
        });
    }
    Ok(())
}

impl BodyWriter for Apa102DataBody {
    fn record_type(&self) -> RecordType {
        RecordType::SetChannelApa102Data
    }

    fn base_size(&self) -> usize {
        8
    }

    fn color_size(&self) -> usize {
        self.order.num_elements() as usize
    }

    /// Start and end frames take one 4-byte slot each.
    fn buffer_space(&self, color_indices: &[usize]) -> usize {
        4 * (color_indices.len() + 2)
    }

    fn validate(&self, color_indices: &[usize]) -> Result<()> {
        check_budget(self.buffer_space(color_indices), color_indices.len())?;
        check_four_elements(&self.order)
    }

    fn write_body(
        &self,
        dst: &mut BytesMut,
        color_indices: &[usize],
        colors: &[u32],
    ) -> Result<usize> {
        self.validate(color_indices)?;
        check_indices(color_indices, colors)?;

        let start = dst.len();
        dst.put_u32_le(self.frequency);
        dst.put_u8(self.order.packed());
        dst.put_u8(0x00);
        dst.put_u16_le(pixel_count(color_indices));
        for &index in color_indices {
            let mut pixel = self.order.color_bytes(colors[index]);
            pixel[3] = self.brightness;
            dst.put_slice(&pixel);
        }
        Ok(dst.len() - start)
    }
}

/// Clock frequency for APA102-style strands: a single `u32` LE in Hz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Apa102ClockBody {
    frequency: u32,
}

impl Apa102ClockBody {
    pub fn new(frequency: u32) -> Self {
        Self { frequency }
    }

    pub fn frequency(&self) -> u32 {
        self.frequency
    }
}

impl BodyWriter for Apa102ClockBody {
    fn record_type(&self) -> RecordType {
        RecordType::SetChannelApa102Clock
    }

    fn base_size(&self) -> usize {
        4
    }

    fn color_size(&self) -> usize {
        0
    }

    fn write_body(&self, dst: &mut BytesMut, _: &[usize], _: &[u32]) -> Result<usize> {
        dst.put_u32_le(self.frequency);
        Ok(4)
    }
}

/// Latches the buffered pixels of every channel. Header only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawAllBody;

impl BodyWriter for DrawAllBody {
    fn record_type(&self) -> RecordType {
        RecordType::DrawAll
    }

    fn base_size(&self) -> usize {
        0
    }

    fn color_size(&self) -> usize {
        0
    }

    fn write_body(&self, _: &mut BytesMut, _: &[usize], _: &[u32]) -> Result<usize> {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body<W: BodyWriter>(writer: &W, indices: &[usize], colors: &[u32]) -> Result<Vec<u8>> {
        let mut buf = BytesMut::new();
        let written = writer.write_body(&mut buf, indices, colors)?;
        assert_eq!(written, buf.len());
        Ok(buf.to_vec())
    }

    #[test]
    fn ws2812_rgb_single_pixel() {
        let writer = Ws2812Body::new(ColorOrder::RGB);
        let out = body(&writer, &[0], &[0x00112233]).unwrap();
        assert_eq!(out, [0x03, 0x24, 0x01, 0x00, 0x11, 0x22, 0x33]);
    }

    #[test]
    fn ws2812_emits_pixels_in_index_order() {
        let writer = Ws2812Body::new(ColorOrder::GRB);
        let colors = [0x00AA0000, 0x0000BB00, 0x000000CC];
        let out = body(&writer, &[2, 0, 0], &colors).unwrap();
        assert_eq!(
            out,
            [0x03, 0x21, 0x03, 0x00, 0x00, 0x00, 0xCC, 0x00, 0xAA, 0x00, 0x00, 0xAA, 0x00]
        );
    }

    #[test]
    fn ws2812_rgbw_uses_four_bytes_per_pixel() {
        let writer = Ws2812Body::new(ColorOrder::RGBW);
        assert_eq!(writer.color_size(), 4);
        let out = body(&writer, &[0], &[0x44112233]).unwrap();
        assert_eq!(out, [0x04, 0xE4, 0x01, 0x00, 0x11, 0x22, 0x33, 0x44]);
    }

    #[test]
    fn ws2812_budget_boundary() {
        let writer = Ws2812Body::new(ColorOrder::RGBW);
        // 512 * 4 = 2048 fits exactly.
        let at_limit = vec![0usize; 512];
        assert_eq!(writer.buffer_space(&at_limit), 2048);
        assert!(writer.validate(&at_limit).is_ok());

        let past_limit = vec![0usize; 513];
        assert_eq!(
            writer.validate(&past_limit),
            Err(FrameError::BufferOverflow {
                pixels: 513,
                needed: 2052,
                budget: BYTES_PER_CHANNEL,
            })
        );
    }

    #[test]
    fn ws2812_rgb_budget_boundary() {
        let writer = Ws2812Body::new(ColorOrder::RGB);
        // 682 * 3 = 2046, 683 * 3 = 2049.
        assert!(writer.validate(&vec![0; 682]).is_ok());
        assert!(matches!(
            writer.validate(&vec![0; 683]),
            Err(FrameError::BufferOverflow { needed: 2049, .. })
        ));
    }

    #[test]
    fn overflow_writes_nothing() {
        let writer = Ws2812Body::new(ColorOrder::RGB);
        let mut buf = BytesMut::new();
        let err = writer
            .write_body(&mut buf, &vec![0; 700], &[0])
            .unwrap_err();
        assert!(matches!(err, FrameError::BufferOverflow { .. }));
        assert!(buf.is_empty());
    }

    #[test]
    fn out_of_range_index_writes_nothing() {
        let writer = Ws2812Body::new(ColorOrder::RGB);
        let mut buf = BytesMut::new();
        let err = writer.write_body(&mut buf, &[0, 3], &[1, 2]).unwrap_err();
        assert_eq!(err, FrameError::ColorIndexOutOfRange { index: 3, len: 2 });
        assert!(buf.is_empty());
    }

    #[test]
    fn apa102_data_layout_and_brightness() {
        let writer = Apa102DataBody::new(ColorOrder::RGBV, 2_000_000).unwrap();
        let out = body(&writer, &[0, 1], &[0x44112233, 0xFFAABBCC]).unwrap();
        assert_eq!(
            out,
            [
                0x80, 0x84, 0x1E, 0x00, // 2 MHz
                0xE4, 0x00, // order, pad
                0x02, 0x00, // pixels
                0x11, 0x22, 0x33, 0x1F, //
                0xAA, 0xBB, 0xCC, 0x1F,
            ]
        );
    }

    #[test]
    fn apa102_fourth_byte_is_brightness_for_any_order() {
        let order = ColorOrder::new("WRGB", [1, 2, 3, 0], 4).unwrap();
        let writer = Apa102DataBody::new(order, 1_000_000)
            .unwrap()
            .with_brightness(0x07);
        let out = body(&writer, &[0, 0, 0], &[0x12345678]).unwrap();
        for pixel in out[8..].chunks(4) {
            assert_eq!(pixel[3], 0x07);
        }
        // B lands on position 3 and is discarded.
        assert_eq!(&out[8..12], &[0x12, 0x34, 0x56, 0x07]);
    }

    #[test]
    fn apa102_rejects_three_element_order() {
        let err = Apa102DataBody::new(ColorOrder::RGB, 1_000_000).unwrap_err();
        assert_eq!(
            err,
            FrameError::UnsupportedColorOrder {
                name: "RGB".to_string(),
                num_elements: 3,
            }
        );
    }

    #[test]
    fn apa102_budget_counts_start_and_end_frames() {
        let writer = Apa102DataBody::new(ColorOrder::RGBV, 1).unwrap();
        // 4 * (510 + 2) = 2048 fits, 4 * (511 + 2) = 2052 does not.
        assert_eq!(writer.buffer_space(&vec![0; 510]), 2048);
        assert!(writer.validate(&vec![0; 510]).is_ok());
        assert!(matches!(
            writer.validate(&vec![0; 511]),
            Err(FrameError::BufferOverflow {
                pixels: 511,
                needed: 2052,
                ..
            })
        ));
        assert_eq!(writer.buffer_space(&[]), 8);
    }

    #[test]
    fn apa102_clock_body_is_frequency_only() {
        let writer = Apa102ClockBody::new(0x0102_0304);
        assert_eq!(writer.color_size(), 0);
        assert_eq!(body(&writer, &[], &[]).unwrap(), [0x04, 0x03, 0x02, 0x01]);
    }

    #[test]
    fn draw_all_body_is_empty() {
        assert!(body(&DrawAllBody, &[], &[]).unwrap().is_empty());
        assert_eq!(DrawAllBody.record_type(), RecordType::DrawAll);
    }
}
