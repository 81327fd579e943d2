use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod simulate;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Drive the transport against a simulated radio.
    Simulate(SimulateArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Simulate(args) => simulate::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Which context drives transfers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Driver {
    /// The application polls for events.
    #[default]
    Poll,
    /// A READY edge handler runs cycles; the application only dequeues.
    Edge,
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Command payload to send, as hex (repeatable).
    #[arg(long = "command", short = 'c', value_name = "HEX")]
    pub commands: Vec<String>,
    /// Event payload the radio delivers, as hex (repeatable).
    #[arg(long = "event", short = 'e', value_name = "HEX")]
    pub events: Vec<String>,
    /// Status byte attached to events given with --event.
    #[arg(long, default_value = "0")]
    pub status: u8,
    /// JSON script with commands, events and transport settings.
    #[arg(long, value_name = "FILE")]
    pub script: Option<PathBuf>,
    /// Driving context.
    #[arg(long, value_enum, default_value = "poll")]
    pub driver: Driver,
    /// Give up after this many cycles.
    #[arg(long, default_value = "256")]
    pub max_cycles: usize,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
