use std::fs;

use bytes::Bytes;
use typewire::descriptor::decode_from_bytes;

use crate::cmd::{load_schema, DecodeArgs};
use crate::exit::{descriptor_error, io_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_decoded, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let descriptor = load_schema(&args.schema)?;
    let wire = match (args.hex, args.file) {
        (Some(text), None) => parse_hex(&text)?,
        (None, Some(path)) => fs::read(&path)
            .map(Bytes::from)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?,
        _ => {
            return Err(CliError::new(
                USAGE,
                "exactly one of --hex or --file is required",
            ))
        }
    };

    tracing::debug!(root = %descriptor, size = wire.len(), "decoding");
    let value = decode_from_bytes(&descriptor, wire)
        .map_err(|err| descriptor_error("decode failed", err))?;
    let json = descriptor
        .value_to_json(&value)
        .map_err(|err| descriptor_error("decode failed", err))?;

    print_decoded(&json, format);
    Ok(SUCCESS)
}

/// Parse hex text, ignoring any whitespace between digits.
pub fn parse_hex(text: &str) -> CliResult<Bytes> {
    let digits: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(digits)
        .map(Bytes::from)
        .map_err(|err| CliError::new(USAGE, format!("invalid --hex value: {err}")))
}
