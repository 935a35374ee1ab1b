use proplink_bridge::BridgeClient;

use crate::cmd::{parse_duration, ListArgs};
use crate::exit::{bridge_error, CliResult, SUCCESS};
use crate::output::{print_directory, OutputFormat};

pub fn run(args: ListArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_duration(&args.timeout)?;

    let mut client = BridgeClient::connect(args.addr.as_str())
        .map_err(|err| bridge_error("connect failed", err))?;
    let directory = client
        .fetch_directory(timeout)
        .map_err(|err| bridge_error("discovery failed", err))?;

    print_directory(directory, format);
    Ok(SUCCESS)
}
