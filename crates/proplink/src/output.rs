use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use proplink_directory::{PropertyDirectory, PropertyValue};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
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

#[derive(Serialize)]
struct PropertyRow<'a> {
    name: &'a str,
    id: u8,
    #[serde(rename = "type")]
    kind: &'a str,
}

pub fn print_directory(directory: &PropertyDirectory, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let rows: Vec<PropertyRow> = directory
                .iter()
                .map(|(name, desc)| PropertyRow {
                    name,
                    id: desc.id,
                    kind: desc.kind.tag(),
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string(&rows).unwrap_or_else(|_| "[]".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["NAME", "ID", "TYPE"]);
            for (name, desc) in directory.iter() {
                table.add_row(vec![
                    name.to_string(),
                    desc.id.to_string(),
                    desc.kind.tag().to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for (name, desc) in directory.iter() {
                println!("{name} id={} type={}", desc.id, desc.kind.tag());
            }
        }
    }
}

pub fn print_update(name: &str, value: &PropertyValue, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = serde_json::json!({
                "property": name,
                "value": value_to_json(value),
            });
            println!("{out}");
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("{name} = {value}");
        }
    }
}

fn value_to_json(value: &PropertyValue) -> serde_json::Value {
    match value {
        PropertyValue::Int(v) => serde_json::json!(v),
        PropertyValue::Float(v) => serde_json::json!(v),
        PropertyValue::Bool(v) => serde_json::json!(v),
    }
}
