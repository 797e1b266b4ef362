use clap::ValueEnum;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Crates whose events follow `--log-level`.
const ENCODER_TARGETS: [&str; 2] = ["pixelwire", "pixelwire_frame"];

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// `debug` shows factory setup; `trace` adds one event per encoded frame.
#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Encoder crates log at `level`; everything else is capped at warn.
pub fn encoder_targets(level: LogLevel) -> Targets {
    let level = LevelFilter::from(level);
    ENCODER_TARGETS
        .iter()
        .fold(Targets::new(), |targets, &target| {
            targets.with_target(target, level)
        })
        .with_default(level.min(LevelFilter::WARN))
}

/// Install the stderr subscriber. Frames go to stdout, so logs never mix with them.
pub fn init_logging(format: LogFormat, level: LogLevel) {
    let filter = encoder_targets(level);
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false);

    let _ = match format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(layer.with_target(false))
            .with(filter)
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(layer.json())
            .with(filter)
            .try_init(),
    };
}
