mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "acilink", version, about = "ACI transport simulator CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr). ACILINK_LOG overrides it.
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
    use crate::cmd::Driver;

    #[test]
    fn parses_simulate_subcommand() {
        let cli = Cli::try_parse_from([
            "acilink",
            "simulate",
            "--command",
            "090909",
            "-c",
            "0a",
            "--event",
            "8102",
            "--driver",
            "edge",
        ])
        .expect("simulate args should parse");

        let Command::Simulate(args) = cli.command else {
            panic!("expected simulate");
        };
        assert_eq!(args.commands, vec!["090909", "0a"]);
        assert_eq!(args.events, vec!["8102"]);
        assert_eq!(args.driver, Driver::Edge);
        assert_eq!(args.max_cycles, 256);
    }

    #[test]
    fn rejects_out_of_range_status() {
        let err = Cli::try_parse_from(["acilink", "simulate", "--status", "300"])
            .expect_err("status must fit a byte");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn parses_version_subcommand() {
        let cli = Cli::try_parse_from(["acilink", "version", "--extended"])
            .expect("version args should parse");
        assert!(matches!(cli.command, Command::Version(_)));
    }
}
