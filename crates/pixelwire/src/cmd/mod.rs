use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use pixelwire_frame::{
    ChannelConfig, ColorOrder, RecordType, DEFAULT_APA102_FREQUENCY, DEFAULT_BRIGHTNESS,
    DRAW_ALL_CHANNEL,
};

use crate::exit::{frame_error, CliResult};
use crate::output::OutputFormat;

pub mod encode;
pub mod presets;
pub mod sizes;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode a single frame.
    Encode(EncodeArgs),
    /// Report frame sizes and channel buffer usage.
    Sizes(SizesArgs),
    /// List color order presets.
    Presets(PresetsArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format),
        Command::Sizes(args) => sizes::run(args, format),
        Command::Presets(args) => presets::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Record kind selectable on the command line.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    Ws2812,
    Apa102Data,
    Apa102Clock,
    DrawAll,
}

impl From<Kind> for RecordType {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Ws2812 => RecordType::SetChannelWs2812,
            Kind::Apa102Data => RecordType::SetChannelApa102Data,
            Kind::Apa102Clock => RecordType::SetChannelApa102Clock,
            Kind::DrawAll => RecordType::DrawAll,
        }
    }
}

/// Channel settings given directly as flags.
#[derive(Args, Debug, Clone)]
pub struct ChannelArgs {
    /// Record kind.
    #[arg(long, short = 'k', value_enum)]
    pub kind: Option<Kind>,
    /// Channel number (only the low 8 bits reach the wire).
    #[arg(long, short = 'c')]
    pub channel: Option<u32>,
    /// Color order preset (RGB, RGBW, RGBV, GRB, GRBW, BGR).
    #[arg(long, default_value = "RGB")]
    pub color_order: String,
    /// APA102 clock frequency in Hz.
    #[arg(long, default_value_t = DEFAULT_APA102_FREQUENCY)]
    pub frequency: u32,
    /// APA102 brightness register value.
    #[arg(long, default_value_t = DEFAULT_BRIGHTNESS)]
    pub brightness: u8,
}

impl ChannelArgs {
    /// Build a channel configuration from the flags.
    pub fn to_config(&self) -> CliResult<ChannelConfig> {
        let kind = self.kind.unwrap_or(Kind::Ws2812);
        if kind == Kind::DrawAll {
            return Ok(ChannelConfig::DrawAll {
                channel: self.channel.unwrap_or(DRAW_ALL_CHANNEL),
            });
        }

        let channel = self.channel.unwrap_or(0);
        if kind == Kind::Apa102Clock {
            return Ok(ChannelConfig::Apa102Clock {
                channel,
                frequency: self.frequency,
            });
        }

        let color_order: ColorOrder = self
            .color_order
            .parse()
            .map_err(|err| frame_error("invalid --color-order", err))?;
        Ok(match kind {
            Kind::Apa102Data => ChannelConfig::Apa102Data {
                channel,
                color_order,
                frequency: self.frequency,
                brightness: self.brightness,
            },
            _ => ChannelConfig::Ws2812 {
                channel,
                color_order,
            },
        })
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    #[command(flatten)]
    pub channel: ChannelArgs,
    /// Expander configuration file (JSON). Selects the entry matching
    /// --channel and, when given, --kind.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Palette of packed 0xWWRRGGBB colors (comma-separated; hex, #RRGGBB or decimal).
    #[arg(long, value_delimiter = ',')]
    pub colors: Vec<String>,
    /// Palette slot of each pixel, in emission order (comma-separated).
    /// Default: every palette slot once.
    #[arg(long, value_delimiter = ',')]
    pub indices: Option<Vec<usize>>,
}

#[derive(Args, Debug)]
pub struct SizesArgs {
    #[command(flatten)]
    pub channel: ChannelArgs,
    /// Number of pixels to account for.
    #[arg(long, short = 'n', default_value_t = 0)]
    pub pixels: usize,
}

#[derive(Args, Debug, Default)]
pub struct PresetsArgs {}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
