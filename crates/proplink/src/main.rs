mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "proplink", version, about = "Property bridge CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_serve_subcommand() {
        let cli = Cli::try_parse_from([
            "proplink",
            "serve",
            "127.0.0.1:7850",
            "--property",
            "rpm:int:0",
            "--property",
            "alarm:bool",
        ])
        .expect("serve args should parse");

        assert!(matches!(cli.command, Command::Serve(_)));
    }

    #[test]
    fn parses_set_subcommand() {
        let cli = Cli::try_parse_from([
            "proplink",
            "set",
            "127.0.0.1:7850",
            "rpm",
            "4200",
            "--timeout",
            "2s",
        ])
        .expect("set args should parse");

        match cli.command {
            Command::Set(args) => {
                assert_eq!(args.name, "rpm");
                assert_eq!(args.value, "4200");
            }
            other => panic!("expected set, got {other:?}"),
        }
    }

    #[test]
    fn parses_list_with_global_format() {
        let cli = Cli::try_parse_from([
            "proplink",
            "list",
            "127.0.0.1:7850",
            "--format",
            "json",
        ])
        .expect("list args should parse");

        assert!(matches!(cli.command, Command::List(_)));
        assert!(matches!(cli.format, Some(OutputFormat::Json)));
    }
}
