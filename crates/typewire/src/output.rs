use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use serde_json::Value as Json;
use typewire::descriptor::LayoutEntry;

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

#[derive(Serialize)]
struct EncodedOutput<'a> {
    schema: &'a str,
    size: usize,
    hex: String,
}

#[derive(Serialize)]
struct LayoutOutput<'a> {
    path: &'a str,
    #[serde(rename = "type")]
    ty: &'a str,
    encoding: &'a str,
}

pub fn print_encoded(schema: &str, wire: &[u8], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = EncodedOutput {
                schema,
                size: wire.len(),
                hex: hex::encode(wire),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["SCHEMA", "SIZE", "HEX"])
                .add_row(vec![
                    schema.to_string(),
                    wire.len().to_string(),
                    spaced_hex(wire),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => println!("{}", spaced_hex(wire)),
        OutputFormat::Raw => print_raw(wire),
    }
}

pub fn print_decoded(value: &Json, format: OutputFormat) {
    match format {
        OutputFormat::Json | OutputFormat::Raw => println!("{value}"),
        OutputFormat::Pretty => println!(
            "{}",
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        ),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic);
            match value {
                Json::Object(fields) => {
                    table.set_header(vec!["FIELD", "VALUE"]);
                    for (name, field) in fields {
                        table.add_row(vec![name.clone(), field.to_string()]);
                    }
                }
                other => {
                    table.set_header(vec!["VALUE"]);
                    table.add_row(vec![other.to_string()]);
                }
            }
            println!("{table}");
        }
    }
}

pub fn print_layout(rows: &[LayoutEntry], format: OutputFormat) {
    match format {
        OutputFormat::Json | OutputFormat::Raw => {
            let out: Vec<LayoutOutput<'_>> = rows
                .iter()
                .map(|row| LayoutOutput {
                    path: &row.path,
                    ty: &row.ty,
                    encoding: row.encoding,
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "[]".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["PATH", "TYPE", "ENCODING"]);
            for row in rows {
                table.add_row(vec![row.path.clone(), row.ty.clone(), row.encoding.to_string()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for row in rows {
                println!("{} {} ({})", row.path, row.ty, row.encoding);
            }
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

/// Hex bytes separated by spaces, e.g. `fb ff ff ff`.
fn spaced_hex(data: &[u8]) -> String {
    data.iter()
        .map(|byte| format!("{byte:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}
