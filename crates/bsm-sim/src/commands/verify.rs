use std::error::Error;
use std::fs;
use std::path::PathBuf;

use bsm_lagrangian::CanonicalModel;
use clap::Args;
use serde::Serialize;

use super::emit_json;

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Canonical model written by `bsm assemble --out`.
    #[arg(long = "in")]
    pub input: PathBuf,
}

#[derive(Debug, Serialize)]
struct VerifySummary {
    fingerprint: String,
    schema: String,
    particles: usize,
    terms: usize,
    mass_terms: usize,
}

pub fn run(args: &VerifyArgs) -> Result<(), Box<dyn Error>> {
    let bytes = fs::read(&args.input)?;
    let canonical = CanonicalModel::from_json_slice(&bytes)?;
    let rebuilt = canonical.reconstruct()?;
    let summary = VerifySummary {
        fingerprint: canonical.fingerprint.clone(),
        schema: canonical.schema.to_string(),
        particles: rebuilt.registry.particles().len(),
        terms: rebuilt.lagrangian.len(),
        mass_terms: rebuilt.lagrangian.mass_terms().len(),
    };
    emit_json(None, &summary)
}
