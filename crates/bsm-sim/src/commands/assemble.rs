use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use tracing::warn;

use super::{emit_json, write_text, ModelInput};

#[derive(Args, Debug)]
pub struct AssembleArgs {
    #[command(flatten)]
    pub input: ModelInput,
    /// Refuse to assemble when gauge anomalies do not cancel.
    #[arg(long)]
    pub require_anomaly_free: bool,
    /// Refuse to assemble when any declaration or term failed its check.
    #[arg(long)]
    pub strict: bool,
    /// Write the canonical model here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Also write the load checklist to this path.
    #[arg(long)]
    pub report: Option<PathBuf>,
}

pub fn run(args: &AssembleArgs) -> Result<(), Box<dyn Error>> {
    let mut config = args.input.engine_config()?;
    config.require_anomaly_free |= args.require_anomaly_free;
    let (mut model, report) = args.input.load_with(config)?;

    if let Some(path) = &args.report {
        emit_json(Some(path.as_path()), &report)?;
    }
    if !report.passed_all() {
        if args.strict {
            return Err(format!("{} checks passed", report.score()).into());
        }
        warn!(score = %report.score(), "assembling without the failed entries");
    }

    model.assemble()?;
    let canonical = model.canonical()?;
    match &args.out {
        Some(path) => {
            let bytes = canonical.to_json_bytes()?;
            write_text(path, &String::from_utf8(bytes)?)
        }
        None => emit_json(None, &canonical),
    }
}
