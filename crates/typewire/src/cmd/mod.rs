use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use typewire::descriptor::{DynamicType, TypeSchema};

use crate::exit::{descriptor_error, io_error, CliResult};
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod inspect;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode a JSON value with a schema.
    Encode(EncodeArgs),
    /// Decode bytes with a schema.
    Decode(DecodeArgs),
    /// Show the wire layout of a schema.
    Inspect(InspectArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Inspect(args) => inspect::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Schema file (JSON).
    pub schema: PathBuf,
    /// Value to encode, as JSON.
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    pub json: Option<String>,
    /// Read the JSON value from a file.
    #[arg(long, conflicts_with = "json")]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Schema file (JSON).
    pub schema: PathBuf,
    /// Encoded bytes as hex; whitespace is ignored.
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    pub hex: Option<String>,
    /// Read the encoded bytes from a binary file.
    #[arg(long, conflicts_with = "hex")]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Schema file (JSON).
    pub schema: PathBuf,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Read, parse and compile a schema file.
pub fn load_schema(path: &Path) -> CliResult<DynamicType> {
    let text = fs::read_to_string(path)
        .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?;
    let context = format!("invalid schema {}", path.display());
    let schema = TypeSchema::from_json(&text).map_err(|err| descriptor_error(&context, err))?;
    let compiled = schema
        .compile()
        .map_err(|err| descriptor_error(&context, err))?;
    tracing::debug!(path = %path.display(), root = %compiled, "loaded schema");
    Ok(compiled)
}
