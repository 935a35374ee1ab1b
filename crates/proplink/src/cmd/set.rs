use proplink_bridge::BridgeClient;

use crate::cmd::{parse_duration, SetArgs};
use crate::exit::{bridge_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_update, OutputFormat};

pub fn run(args: SetArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_duration(&args.timeout)?;

    let mut client = BridgeClient::connect(args.addr.as_str())
        .map_err(|err| bridge_error("connect failed", err))?;
    let directory = client
        .fetch_directory(timeout)
        .map_err(|err| bridge_error("discovery failed", err))?;

    let descriptor = directory.get(&args.name).copied().ok_or_else(|| {
        CliError::new(
            USAGE,
            format!("bridge announces no property named {:?}", args.name),
        )
    })?;
    let value = descriptor
        .kind
        .parse_value(&args.value)
        .map_err(|err| CliError::new(USAGE, err.to_string()))?;

    client
        .set(&args.name, value)
        .map_err(|err| bridge_error("set failed", err))?;

    print_update(&args.name, &value, format);
    Ok(SUCCESS)
}
