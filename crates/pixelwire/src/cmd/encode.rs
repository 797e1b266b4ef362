use pixelwire_frame::ChannelConfig;

use crate::cmd::EncodeArgs;
use crate::config::{load_config, select_entry};
use crate::exit::{frame_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_frame, FrameReport, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let entry = resolve_entry(&args)?;
    let factory = entry
        .build()
        .map_err(|err| frame_error("invalid channel configuration", err))?;

    let colors = args
        .colors
        .iter()
        .map(|s| parse_color(s))
        .collect::<CliResult<Vec<u32>>>()?;
    let mut indices = args
        .indices
        .clone()
        .unwrap_or_else(|| (0..colors.len()).collect());

    if !factory.record_type().carries_pixels() && !indices.is_empty() {
        tracing::warn!(
            record_type = %factory.record_type(),
            pixels = indices.len(),
            "record type carries no pixels; ignoring colors"
        );
        indices.clear();
    }

    let frame = factory
        .message_for(&indices, &colors)
        .map_err(|err| frame_error("encode failed", err))?;
    tracing::info!(
        record_type = %factory.record_type(),
        channel = factory.channel(),
        size = frame.len(),
        "frame encoded"
    );

    let report = FrameReport::new(&factory, indices.len(), &frame);
    print_frame(&report, &frame, format);
    Ok(SUCCESS)
}

fn resolve_entry(args: &EncodeArgs) -> CliResult<ChannelConfig> {
    match &args.config {
        Some(path) => {
            let config = load_config(path)?;
            select_entry(
                &config,
                args.channel.channel,
                args.channel.kind.map(Into::into),
            )
        }
        None => args.channel.to_config(),
    }
}

/// Parse `0xWWRRGGBB`, `#RRGGBB` or decimal.
fn parse_color(input: &str) -> CliResult<u32> {
    let input = input.trim();
    let parsed = if let Some(hex) = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .or_else(|| input.strip_prefix('#'))
    {
        u32::from_str_radix(hex, 16)
    } else {
        input.parse()
    };
    parsed.map_err(|_| CliError::new(USAGE, format!("invalid color value: {input:?}")))
}
