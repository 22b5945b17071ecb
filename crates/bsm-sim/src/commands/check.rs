use std::error::Error;
use std::path::PathBuf;

use clap::Args;

use super::{emit_json, ModelInput};

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub input: ModelInput,
    /// Exit with an error when any check fails.
    #[arg(long)]
    pub strict: bool,
    /// Write the checklist here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub fn run(args: &CheckArgs) -> Result<(), Box<dyn Error>> {
    let (_, report) = args.input.load()?;
    emit_json(args.out.as_deref(), &report)?;
    if args.strict && !report.passed_all() {
        return Err(format!("{} checks passed", report.score()).into());
    }
    Ok(())
}
