use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    anomalies::{self, AnomaliesArgs},
    assemble::{self, AssembleArgs},
    check::{self, CheckArgs},
    enumerate::{self, EnumerateArgs},
    verify::{self, VerifyArgs},
    version::{self, VersionArgs},
};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "bsm", about = "Gauge-invariant model builder for BSM Lagrangians")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a model file and print the declaration/validation checklist.
    Check(CheckArgs),
    /// Stream gauge-invariant candidate terms for the declared fields.
    Enumerate(EnumerateArgs),
    /// Assemble a model file and emit its canonical Lagrangian.
    Assemble(AssembleArgs),
    /// Report gauge and mixed gravitational anomalies.
    Anomalies(AnomaliesArgs),
    /// Re-read a canonical Lagrangian and rebuild it from scratch.
    Verify(VerifyArgs),
    /// Print the tool and schema version.
    Version(VersionArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Check(args) => check::run(&args),
        Command::Enumerate(args) => enumerate::run(&args),
        Command::Assemble(args) => assemble::run(&args),
        Command::Anomalies(args) => anomalies::run(&args),
        Command::Verify(args) => verify::run(&args),
        Command::Version(args) => version::run(&args),
    }
}
