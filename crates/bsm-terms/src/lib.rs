#![deny(missing_docs)]
#![doc = "Term enumeration, consistency validation and anomaly checks for BSM models."]

/// Optional gauge anomaly report.
pub mod anomaly;
/// Parallel validation of candidate slices.
pub mod batch;
/// Lazy enumeration of gauge-invariant candidates.
pub mod enumerate;
/// Gauge, Lorentz, dimension and charge checks.
pub mod validate;

pub use anomaly::{check_anomalies, AnomalyEntry, AnomalyReport};
pub use batch::validate_batch;
pub use enumerate::{Candidates, EnumerateOpts, TermEnumerator};
pub use validate::{
    validate, TermKind, ValidatedTerm, Validator, ValidatorOpts, RENORMALIZABLE_DIMENSION,
};
