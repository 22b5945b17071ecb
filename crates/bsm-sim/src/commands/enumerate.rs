use std::error::Error;
use std::path::PathBuf;

use bsm_core::rational::{self, Rational};
use bsm_model::InteractionTerm;
use bsm_terms::TermKind;
use clap::Args;
use serde::Serialize;

use super::{emit_json, ModelInput};

#[derive(Args, Debug)]
pub struct EnumerateArgs {
    #[command(flatten)]
    pub input: ModelInput,
    /// Largest mass dimension, e.g. `4` or `9/2`; overrides the configuration.
    #[arg(long, value_parser = rational::parse_rational)]
    pub max_dimension: Option<Rational>,
    /// Longest participant list; overrides the configuration.
    #[arg(long)]
    pub max_fields: Option<usize>,
    /// Keep only candidates that also pass full validation.
    #[arg(long)]
    pub validate: bool,
    /// Stop after this many candidates.
    #[arg(long)]
    pub limit: Option<usize>,
    /// Write the candidate list here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct Candidate {
    term: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<TermKind>,
}

#[derive(Debug, Serialize)]
struct EnumerationReport {
    #[serde(with = "rational::serde_str")]
    max_dimension: Rational,
    max_fields: usize,
    count: usize,
    candidates: Vec<Candidate>,
}

pub fn run(args: &EnumerateArgs) -> Result<(), Box<dyn Error>> {
    let mut config = args.input.engine_config()?;
    if let Some(max_dimension) = args.max_dimension {
        config.max_dimension = max_dimension;
    }
    if let Some(max_fields) = args.max_fields {
        config.max_fields = max_fields;
    }
    config.validate()?;
    let (model, _) = args.input.load_with(config)?;

    let mut candidates = Vec::new();
    for candidate in model.enumerate() {
        if args.limit.is_some_and(|limit| candidates.len() >= limit) {
            break;
        }
        let term: InteractionTerm = candidate?;
        if args.validate {
            if let Ok(validated) = model.validate(&term) {
                candidates.push(Candidate {
                    term: validated.term.to_string(),
                    kind: Some(validated.kind),
                });
            }
        } else {
            candidates.push(Candidate {
                term: term.to_string(),
                kind: None,
            });
        }
    }

    let report = EnumerationReport {
        max_dimension: model.config().max_dimension,
        max_fields: model.config().max_fields,
        count: candidates.len(),
        candidates,
    };
    emit_json(args.out.as_deref(), &report)
}
