pub mod anomalies;
pub mod assemble;
pub mod check;
pub mod enumerate;
pub mod verify;
pub mod version;

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use bsm_core::serde::to_canonical_json_pretty;
use bsm_lagrangian::{EngineConfig, Model, ModelFile, ModelReport};
use clap::Args;
use serde::Serialize;
use tracing::info;

/// Inputs shared by every command that starts from a model file.
#[derive(Args, Debug)]
pub struct ModelInput {
    /// JSON model file with groups, particles, multiplets, VEVs and interactions.
    #[arg(long)]
    pub model: PathBuf,
    /// Optional YAML engine configuration.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Worker threads for batch validation, overriding the configuration.
    #[arg(long)]
    pub threads: Option<usize>,
}

impl ModelInput {
    pub fn engine_config(&self) -> Result<EngineConfig, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::from_yaml_path(path)?,
            None => EngineConfig::default(),
        };
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn load(&self) -> Result<(Model, ModelReport), Box<dyn Error>> {
        self.load_with(self.engine_config()?)
    }

    pub fn load_with(&self, config: EngineConfig) -> Result<(Model, ModelReport), Box<dyn Error>> {
        let file = ModelFile::from_path(&self.model)?;
        let (model, report) = file.load(config)?;
        info!(
            model = %self.model.display(),
            score = %report.score(),
            "loaded model file"
        );
        Ok((model, report))
    }
}

/// Writes canonical pretty JSON to `out`, or to stdout when absent.
pub fn emit_json<T: Serialize>(out: Option<&Path>, value: &T) -> Result<(), Box<dyn Error>> {
    let json = to_canonical_json_pretty(value)?;
    match out {
        Some(path) => write_text(path, &json),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

pub fn write_text(path: &Path, text: &str) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, text)?;
    Ok(())
}
