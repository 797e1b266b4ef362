use std::fmt::Write as _;
use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use pixelwire_frame::{crc32, MessageFactory, CRC_SIZE};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// Summary of one encoded frame.
#[derive(Serialize)]
pub struct FrameReport {
    pub record_type: &'static str,
    pub channel: u8,
    pub pixels: usize,
    pub body_size: usize,
    pub size: usize,
    pub crc: String,
    pub hex: String,
}

impl FrameReport {
    pub fn new(factory: &MessageFactory, pixels: usize, frame: &[u8]) -> Self {
        let crc = crc32(&frame[..frame.len() - CRC_SIZE]);
        Self {
            record_type: factory.record_type().name(),
            channel: frame[4],
            pixels,
            body_size: frame.len() - pixelwire_frame::HEADER_SIZE - CRC_SIZE,
            size: frame.len(),
            crc: format!("{crc:#010x}"),
            hex: hex::encode(frame),
        }
    }
}

pub fn print_frame(report: &FrameReport, frame: &[u8], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(report),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["RECORD", "CHANNEL", "PIXELS", "SIZE", "CRC"])
                .add_row(vec![
                    report.record_type.to_string(),
                    report.channel.to_string(),
                    report.pixels.to_string(),
                    report.size.to_string(),
                    report.crc.clone(),
                ]);
            println!("{table}");
            println!("{}", report.hex);
        }
        OutputFormat::Pretty => {
            println!(
                "record={} channel={} pixels={} size={} crc={}",
                report.record_type, report.channel, report.pixels, report.size, report.crc
            );
            print!("{}", hex_dump(frame));
        }
        OutputFormat::Raw => print_raw(frame),
    }
}

pub fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

/// Offset-prefixed dump, 16 bytes per line.
pub fn hex_dump(data: &[u8]) -> String {
    let mut out = String::new();
    for (line, chunk) in data.chunks(16).enumerate() {
        let _ = write!(out, "{:08x} ", line * 16);
        for byte in chunk {
            let _ = write!(out, " {byte:02x}");
        }
        out.push('\n');
    }
    out
}
