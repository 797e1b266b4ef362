use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use pixelwire_frame::ColorOrder;
use serde::Serialize;

use crate::cmd::PresetsArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_json, OutputFormat};

#[derive(Serialize)]
struct PresetInfo {
    name: &'static str,
    num_elements: u8,
    packed: String,
    positions: [u8; 4],
}

pub fn run(_args: PresetsArgs, format: OutputFormat) -> CliResult<i32> {
    let presets: Vec<PresetInfo> = ColorOrder::presets()
        .iter()
        .map(|order| PresetInfo {
            name: order.name(),
            num_elements: order.num_elements(),
            packed: format!("{:#04x}", order.packed()),
            positions: [0, 1, 2, 3].map(|k| order.position(k).unwrap_or_default()),
        })
        .collect();

    match format {
        OutputFormat::Json | OutputFormat::Raw => print_json(&presets),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["NAME", "ELEMENTS", "PACKED", "R", "G", "B", "W"]);
            for preset in &presets {
                let mut row = vec![
                    preset.name.to_string(),
                    preset.num_elements.to_string(),
                    preset.packed.clone(),
                ];
                row.extend(preset.positions.iter().map(|p| p.to_string()));
                table.add_row(row);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for preset in &presets {
                println!(
                    "{} elements={} packed={}",
                    preset.name, preset.num_elements, preset.packed
                );
            }
        }
    }
    Ok(SUCCESS)
}
