use bytes::{BufMut, Bytes, BytesMut};

use crate::body::{Apa102ClockBody, Apa102DataBody, BodyWriter, DrawAllBody, Ws2812Body};
use crate::checksum::{ChecksumAccumulator, CRC_SIZE};
use crate::color::ColorOrder;
use crate::config::DRAW_ALL_CHANNEL;
use crate::error::Result;
use crate::header::{Header, HEADER_SIZE};
use crate::record::RecordType;

/// Builds complete frames for one channel configuration.
///
/// Frame layout:
/// ```text
/// ┌─────────────┬──────────┬─────────────┬──────────────┬──────────────┐
/// │ "UPXL" (4B) │ Chan(1B) │ Record (1B) │ Body         │ CRC-32 (4B)  │
/// │             │          │             │ (body_size)  │ LE           │
/// └─────────────┴──────────┴─────────────┴──────────────┴──────────────┘
/// ```
///
/// The checksum state lives on the stack of each call, so one factory can
/// be shared between threads.
#[derive(Debug)]
pub struct MessageFactory {
    channel: u32,
    body: Box<dyn BodyWriter>,
}

impl MessageFactory {
    /// Create a factory around any body writer.
    pub fn new(channel: u32, body: impl BodyWriter + 'static) -> Self {
        tracing::debug!(
            record_type = %body.record_type(),
            channel,
            base_size = body.base_size(),
            color_size = body.color_size(),
            "message factory configured"
        );
        Self {
            channel,
            body: Box::new(body),
        }
    }

    /// Pixel data for a WS2812-style strand.
    pub fn ws2812(channel: u32, order: ColorOrder) -> Self {
        Self::new(channel, Ws2812Body::new(order))
    }

    /// Pixel data for an APA102-style strand clocked at `frequency` Hz.
    ///
    /// Fails with [`FrameError::UnsupportedColorOrder`] unless the order has
    /// 4 elements.
    ///
    /// [`FrameError::UnsupportedColorOrder`]: crate::FrameError::UnsupportedColorOrder
    pub fn apa102_data(channel: u32, order: ColorOrder, frequency: u32) -> Result<Self> {
        Ok(Self::new(channel, Apa102DataBody::new(order, frequency)?))
    }

    /// Clock frequency for an APA102-style strand.
    pub fn apa102_clock(channel: u32, frequency: u32) -> Self {
        Self::new(channel, Apa102ClockBody::new(frequency))
    }

    /// Header-only frame that latches every channel.
    pub fn draw_all() -> Self {
        Self::new(DRAW_ALL_CHANNEL, DrawAllBody)
    }

    pub fn record_type(&self) -> RecordType {
        self.body.record_type()
    }

    /// Default channel used by [`MessageFactory::message`].
    pub fn channel(&self) -> u32 {
        self.channel
    }

    pub fn base_size(&self) -> usize {
        self.body.base_size()
    }

    pub fn color_size(&self) -> usize {
        self.body.color_size()
    }

    /// Bytes between header and checksum.
    pub fn body_size(&self, color_indices: &[usize]) -> usize {
        self.body.base_size() + color_indices.len() * self.body.color_size()
    }

    /// Bytes in the complete frame.
    pub fn message_size(&self, color_indices: &[usize]) -> usize {
        HEADER_SIZE + self.body_size(color_indices) + CRC_SIZE
    }

    /// Bytes the pixels occupy in the channel's hardware buffer.
    pub fn buffer_space(&self, color_indices: &[usize]) -> usize {
        self.body.buffer_space(color_indices)
    }

    /// Check the pixel list against the channel's limits without encoding.
    pub fn validate(&self, color_indices: &[usize]) -> Result<()> {
        self.body.validate(color_indices)
    }

    /// Encode one frame.
    ///
    /// `color_indices` lists, in emission order, which entry of `colors`
    /// each pixel shows. `channel` is truncated to its low 8 bits.
    ///
    /// # Panics
    ///
    /// If the body writer appends a byte count different from
    /// [`MessageFactory::body_size`], or reports a count other than what it
    /// appended.
    pub fn get_message(
        &self,
        channel: u32,
        color_indices: &[usize],
        colors: &[u32],
    ) -> Result<Bytes> {
        let mut crc = ChecksumAccumulator::new();
        let body_size = self.body_size(color_indices);
        let message_size = HEADER_SIZE + body_size + CRC_SIZE;

        let mut dst = BytesMut::with_capacity(message_size);
        let header = Header::new(channel, self.body.record_type());
        let header_len = header.write(&mut dst);

        let body_written = self.body.write_body(&mut dst, color_indices, colors)?;
        let appended = dst.len() - header_len;
        assert_eq!(
            appended,
            body_size,
            "{} body writer appended {appended} bytes, expected {body_size}",
            header.record_type
        );
        assert_eq!(
            body_written,
            appended,
            "{} body writer reported {body_written} bytes, appended {appended}",
            header.record_type
        );

        crc.update(&dst);
        dst.put_slice(&crc.finalize_bytes());

        tracing::trace!(
            record_type = %header.record_type,
            channel = header.channel,
            pixels = color_indices.len(),
            size = dst.len(),
            crc = crc.value(),
            "frame encoded"
        );

        Ok(dst.freeze())
    }

    /// Encode a frame on the configured channel.
    pub fn message_for(&self, color_indices: &[usize], colors: &[u32]) -> Result<Bytes> {
        self.get_message(self.channel, color_indices, colors)
    }

    /// Encode a frame on the configured channel with no pixels.
    ///
    /// Used for clock and draw-all frames.
    pub fn message(&self) -> Result<Bytes> {
        self.get_message(self.channel, &[], &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::crc32;
    use crate::error::FrameError;
    use crate::header::MAGIC;

    fn trailing_crc(frame: &[u8]) -> u32 {
        let tail = &frame[frame.len() - CRC_SIZE..];
        u32::from_le_bytes(tail.try_into().unwrap())
    }

    fn assert_well_formed(factory: &MessageFactory, indices: &[usize], frame: &[u8]) {
        assert_eq!(frame.len(), factory.message_size(indices));
        assert_eq!(frame[..4], MAGIC);
        assert_eq!(frame[5], factory.record_type().wire_value());
        assert_eq!(trailing_crc(frame), crc32(&frame[..frame.len() - CRC_SIZE]));
    }

    #[test]
    fn ws2812_frame() {
        let factory = MessageFactory::ws2812(2, ColorOrder::RGB);
        let frame = factory.message_for(&[0], &[0x00112233]).unwrap();

        assert_well_formed(&factory, &[0], &frame);
        assert_eq!(&frame[..6], b"UPXL\x02\x01");
        assert_eq!(&frame[6..13], &[0x03, 0x24, 0x01, 0x00, 0x11, 0x22, 0x33]);
        assert_eq!(frame.len(), 6 + 7 + 4);
    }

    #[test]
    fn apa102_data_frame() {
        let factory = MessageFactory::apa102_data(1, ColorOrder::RGBV, 4_000_000).unwrap();
        let colors = [0xAB102030, 0x00405060, 0xFF708090];
        let indices = [0, 1, 2, 1];
        let frame = factory.message_for(&indices, &colors).unwrap();

        assert_well_formed(&factory, &indices, &frame);
        assert_eq!(factory.body_size(&indices), 8 + 4 * 4);
        for pixel in frame[14..frame.len() - CRC_SIZE].chunks(4) {
            assert_eq!(pixel[3], 0x1F);
        }
    }

    #[test]
    fn apa102_clock_frame() {
        let factory = MessageFactory::apa102_clock(3, 8_000_000);
        let frame = factory.message().unwrap();

        assert_well_formed(&factory, &[], &frame);
        assert_eq!(frame.len(), 6 + 4 + 4);
        assert_eq!(&frame[6..10], &8_000_000u32.to_le_bytes());
    }

    #[test]
    fn draw_all_frame_is_header_and_crc() {
        let factory = MessageFactory::draw_all();
        let frame = factory.message().unwrap();

        assert_well_formed(&factory, &[], &frame);
        assert_eq!(frame.len(), 10);
        assert_eq!(&frame[..6], b"UPXL\xFF\x02");
    }

    #[test]
    fn empty_pixel_list_still_framed() {
        let factory = MessageFactory::ws2812(0, ColorOrder::GRB);
        let frame = factory.message().unwrap();
        assert_well_formed(&factory, &[], &frame);
        assert_eq!(&frame[6..10], &[0x03, 0x21, 0x00, 0x00]);
    }

    #[test]
    fn explicit_channel_overrides_and_truncates() {
        let factory = MessageFactory::ws2812(0, ColorOrder::RGB);
        let frame = factory.get_message(0x305, &[0], &[0]).unwrap();
        assert_eq!(frame[4], 0x05);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let factory = MessageFactory::apa102_data(4, ColorOrder::RGBW, 1_000_000).unwrap();
        let colors = [0x11223344, 0x55667788];
        let first = factory.message_for(&[1, 0], &colors).unwrap();
        let second = factory.message_for(&[1, 0], &colors).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn shared_between_threads() {
        let factory = std::sync::Arc::new(MessageFactory::ws2812(1, ColorOrder::GRB));
        let expected = factory.message_for(&[0, 1], &[0x010203, 0x040506]).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let factory = std::sync::Arc::clone(&factory);
                std::thread::spawn(move || {
                    factory.message_for(&[0, 1], &[0x010203, 0x040506]).unwrap()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }

    #[test]
    fn apa102_with_rgb_fails_at_construction() {
        let err = MessageFactory::apa102_data(0, ColorOrder::RGB, 1_000_000).unwrap_err();
        assert!(matches!(err, FrameError::UnsupportedColorOrder { num_elements: 3, .. }));
    }

    #[test]
    fn overflow_surfaces_before_encoding() {
        let factory = MessageFactory::ws2812(0, ColorOrder::RGBW);
        let indices = vec![0usize; 513];
        let err = factory.message_for(&indices, &[0]).unwrap_err();
        assert!(matches!(err, FrameError::BufferOverflow { pixels: 513, .. }));
        assert!(factory.validate(&indices).is_err());
        assert!(factory.validate(&indices[..512]).is_ok());
    }

    #[derive(Debug)]
    struct ShortWriter;

    impl BodyWriter for ShortWriter {
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
            dst.put_u16_le(0);
            Ok(2)
        }
    }

    #[test]
    #[should_panic(expected = "body writer appended 2 bytes, expected 4")]
    fn body_size_mismatch_panics() {
        let factory = MessageFactory::new(0, ShortWriter);
        let _ = factory.message();
    }

    /// Appends six bytes but claims the four its sizes promise.
    #[derive(Debug)]
    struct OverReportingWriter;

    impl BodyWriter for OverReportingWriter {
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
            dst.put_u32_le(0);
            dst.put_u16_le(0);
            Ok(4)
        }
    }

    #[test]
    #[should_panic(expected = "body writer appended 6 bytes, expected 4")]
    fn appended_bytes_are_measured_not_trusted() {
        let factory = MessageFactory::new(0, OverReportingWriter);
        let _ = factory.message();
    }

    #[derive(Debug)]
    struct MiscountingWriter;

    impl BodyWriter for MiscountingWriter {
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
            dst.put_u32_le(0);
            Ok(0)
        }
    }

    #[test]
    #[should_panic(expected = "body writer reported 0 bytes, appended 4")]
    fn reported_count_must_match_appended() {
        let factory = MessageFactory::new(0, MiscountingWriter);
        let _ = factory.message();
    }
}
