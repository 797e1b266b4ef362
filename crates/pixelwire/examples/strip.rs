//! Strip example: encode one WS2812 frame, its draw-all latch, and an APA102 pair.
//!
//! Run with:
//!   cargo run --example strip

use pixelwire::frame::{ColorOrder, MessageFactory};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let palette = [0x00FF0000, 0x0000FF00, 0x000000FF];
    let pixels: Vec<usize> = (0..30).map(|i| i % palette.len()).collect();

    let strip = MessageFactory::ws2812(0, ColorOrder::GRB);
    let frame = strip.message_for(&pixels, &palette)?;
    println!("ws2812 channel 0: {} bytes", frame.len());

    let clock = MessageFactory::apa102_clock(1, 2_000_000);
    let data = MessageFactory::apa102_data(1, ColorOrder::RGBV, 2_000_000)?;
    println!("apa102 clock: {} bytes", clock.message()?.len());
    println!(
        "apa102 data: {} bytes",
        data.message_for(&pixels, &palette)?.len()
    );

    let latch = MessageFactory::draw_all().message()?;
    println!("draw all: {:02x?}", &latch[..]);
    Ok(())
}
