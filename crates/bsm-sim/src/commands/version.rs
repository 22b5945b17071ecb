use std::error::Error;

use bsm_core::SchemaVersion;
use clap::Args;
use serde::Serialize;

use super::emit_json;

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Emit the canonical schema version alongside the tool version.
    #[arg(long)]
    pub long: bool,
}

#[derive(Debug, Serialize)]
struct VersionInfo {
    version: String,
    schema: String,
}

pub fn run(args: &VersionArgs) -> Result<(), Box<dyn Error>> {
    if !args.long {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    emit_json(
        None,
        &VersionInfo {
            version: env!("CARGO_PKG_VERSION").to_string(),
            schema: SchemaVersion::CURRENT.to_string(),
        },
    )
}
