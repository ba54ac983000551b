use std::fs;

use typewire::descriptor::encode_to_bytes;

use crate::cmd::{load_schema, EncodeArgs};
use crate::exit::{descriptor_error, io_error, CliError, CliResult, DATA_INVALID, SUCCESS, USAGE};
use crate::output::{print_encoded, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let descriptor = load_schema(&args.schema)?;
    let text = match (args.json, args.file) {
        (Some(json), None) => json,
        (None, Some(path)) => fs::read_to_string(&path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?,
        _ => {
            return Err(CliError::new(
                USAGE,
                "exactly one of --json or --file is required",
            ))
        }
    };

    let json: serde_json::Value = serde_json::from_str(&text)
        .map_err(|err| CliError::new(DATA_INVALID, format!("invalid JSON value: {err}")))?;
    let value = descriptor
        .value_from_json(&json)
        .map_err(|err| descriptor_error("value does not match schema", err))?;
    let wire = encode_to_bytes(&descriptor, &value)
        .map_err(|err| descriptor_error("encode failed", err))?;

    tracing::debug!(root = %descriptor, size = wire.len(), "encoded value");
    print_encoded(&descriptor.to_string(), &wire, format);
    Ok(SUCCESS)
}
