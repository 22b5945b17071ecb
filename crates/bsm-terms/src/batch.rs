use bsm_core::errors::{ErrorInfo, ModelError};
use bsm_model::{FieldRegistry, InteractionTerm};
use rayon::prelude::*;
use tracing::debug;

use crate::validate::{ValidatedTerm, Validator, ValidatorOpts};

/// Validates `terms` on a dedicated pool of `threads` workers.
///
/// Each term gets its own result, in input order. The outer error only reports
/// a pool that could not be built.
pub fn validate_batch(
    registry: &FieldRegistry,
    terms: &[InteractionTerm],
    opts: &ValidatorOpts,
    threads: usize,
) -> Result<Vec<Result<ValidatedTerm, ModelError>>, ModelError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .build()
        .map_err(|err| ModelError::Config(ErrorInfo::new("thread-pool", err.to_string())))?;
    let validator = Validator::new(registry, opts.clone());
    debug!(terms = terms.len(), threads = threads.max(1), "validating batch");

    let mut ordered: Vec<(usize, Result<ValidatedTerm, ModelError>)> = pool.install(|| {
        terms
            .par_iter()
            .enumerate()
            .map(|(index, term)| (index, validator.validate(term)))
            .collect()
    });
    ordered.sort_by_key(|(index, _)| *index);
    Ok(ordered.into_iter().map(|(_, result)| result).collect())
}
