use crate::cmd::{load_schema, InspectArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_layout, OutputFormat};

pub fn run(args: InspectArgs, format: OutputFormat) -> CliResult<i32> {
    let descriptor = load_schema(&args.schema)?;
    print_layout(&descriptor.layout(), format);
    Ok(SUCCESS)
}
