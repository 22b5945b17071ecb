use std::error::Error;
use std::path::PathBuf;

use clap::Args;

use super::{emit_json, ModelInput};

#[derive(Args, Debug)]
pub struct AnomaliesArgs {
    #[command(flatten)]
    pub input: ModelInput,
    /// Exit with an error when an anomaly does not cancel.
    #[arg(long)]
    pub strict: bool,
    /// Write the report here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub fn run(args: &AnomaliesArgs) -> Result<(), Box<dyn Error>> {
    let (model, _) = args.input.load()?;
    let report = model.anomalies()?;
    emit_json(args.out.as_deref(), &report)?;
    if args.strict && !report.is_anomaly_free() {
        return Err(format!("uncancelled anomalies: {}", report.summary()).into());
    }
    Ok(())
}
