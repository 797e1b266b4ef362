use std::fs;
use std::path::Path;

use pixelwire_frame::{ChannelConfig, ExpanderConfig, RecordType};

use crate::exit::{config_error, io_error, CliError, CliResult, DATA_INVALID};

/// Upper bound on configuration file size.
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// Read an expander configuration from a JSON file.
pub fn load_config(path: &Path) -> CliResult<ExpanderConfig> {
    let context = format!("failed reading {}", path.display());
    let meta = fs::metadata(path).map_err(|err| io_error(&context, err))?;
    if meta.len() > MAX_CONFIG_FILE_SIZE {
        return Err(CliError::new(
            DATA_INVALID,
            format!(
                "{context}: file is {} bytes, max {MAX_CONFIG_FILE_SIZE}",
                meta.len()
            ),
        ));
    }

    let text = fs::read_to_string(path).map_err(|err| io_error(&context, err))?;
    let config: ExpanderConfig = serde_json::from_str(&text)
        .map_err(|err| config_error(&format!("invalid config {}", path.display()), err))?;
    tracing::debug!(
        path = %path.display(),
        entries = config.channels.len(),
        "expander config loaded"
    );
    Ok(config)
}

/// Pick the single entry for `channel`, narrowed by `record_type` when given.
pub fn select_entry(
    config: &ExpanderConfig,
    channel: Option<u32>,
    record_type: Option<RecordType>,
) -> CliResult<ChannelConfig> {
    let channel = channel.ok_or_else(|| CliError::usage("--config requires --channel"))?;
    let matches: Vec<&ChannelConfig> = config.find(channel, record_type).collect();
    match matches.as_slice() {
        [entry] => Ok((*entry).clone()),
        [] => Err(CliError::usage(format!(
            "no configured entry for channel {channel}{}",
            record_type
                .map(|r| format!(" with kind {r}"))
                .unwrap_or_default()
        ))),
        _ => Err(CliError::usage(format!(
            "{} entries for channel {channel}; pass --kind to choose one",
            matches.len()
        ))),
    }
}
