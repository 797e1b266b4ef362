use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use pixelwire_frame::{MessageFactory, BYTES_PER_CHANNEL};
use serde::Serialize;

use crate::cmd::SizesArgs;
use crate::exit::{frame_error, CliResult, SUCCESS};
use crate::output::{print_json, OutputFormat};

#[derive(Serialize)]
struct SizesOutput {
    record_type: &'static str,
    color_order: Option<String>,
    pixels: usize,
    body_size: usize,
    message_size: usize,
    buffer_space: usize,
    budget: usize,
    fits: bool,
    max_pixels: Option<usize>,
}

pub fn run(args: SizesArgs, format: OutputFormat) -> CliResult<i32> {
    let entry = args.channel.to_config()?;
    let factory = entry
        .build()
        .map_err(|err| frame_error("invalid channel configuration", err))?;

    let pixels = if factory.record_type().carries_pixels() {
        args.pixels
    } else {
        0
    };
    let indices = vec![0usize; pixels];
    let out = SizesOutput {
        record_type: factory.record_type().name(),
        color_order: factory
            .record_type()
            .carries_pixels()
            .then(|| args.channel.color_order.to_uppercase()),
        pixels,
        body_size: factory.body_size(&indices),
        message_size: factory.message_size(&indices),
        buffer_space: factory.buffer_space(&indices),
        budget: BYTES_PER_CHANNEL,
        fits: factory.validate(&indices).is_ok(),
        max_pixels: max_pixels(&factory),
    };

    print_sizes(&out, format);
    Ok(SUCCESS)
}

/// Largest pixel count the channel accepts, or `None` for records without pixels.
fn max_pixels(factory: &MessageFactory) -> Option<usize> {
    if !factory.record_type().carries_pixels() {
        return None;
    }
    let mut indices = Vec::new();
    while factory.validate(&indices).is_ok() {
        indices.push(0);
    }
    indices.len().checked_sub(1)
}

fn print_sizes(out: &SizesOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json | OutputFormat::Raw => print_json(out),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"]);
            for (field, value) in rows(out) {
                table.add_row(vec![field.to_string(), value]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for (field, value) in rows(out) {
                println!("{field}: {value}");
            }
        }
    }
}

fn rows(out: &SizesOutput) -> Vec<(&'static str, String)> {
    vec![
        ("record_type", out.record_type.to_string()),
        (
            "color_order",
            out.color_order.clone().unwrap_or_else(|| "-".to_string()),
        ),
        ("pixels", out.pixels.to_string()),
        ("body_size", out.body_size.to_string()),
        ("message_size", out.message_size.to_string()),
        ("buffer_space", out.buffer_space.to_string()),
        ("budget", out.budget.to_string()),
        ("fits", out.fits.to_string()),
        (
            "max_pixels",
            out.max_pixels
                .map(|n| n.to_string())
                .unwrap_or_else(|| "-".to_string()),
        ),
    ]
}
