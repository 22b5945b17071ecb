//! Exact group invariants of irreps: quadratic Casimir, Dynkin index and cubic
//! anomaly coefficient.

use bsm_core::errors::ModelError;
use bsm_core::Rational;
use serde::{Deserialize, Serialize};

use crate::irrep::Irrep;

/// Invariants of one irrep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrrepInvariants {
    /// Dimension.
    pub dimension: u64,
    /// Quadratic Casimir `C2(R)`; `q²` for a U(1) charge.
    #[serde(with = "bsm_core::rational::serde_str")]
    pub casimir: Rational,
    /// Dynkin index `T(R)`, normalised to `1/2` for the fundamental.
    #[serde(with = "bsm_core::rational::serde_str")]
    pub dynkin_index: Rational,
    /// Cubic anomaly `A(R)`, normalised to `1` for the fundamental of SU(n≥3).
    #[serde(with = "bsm_core::rational::serde_str")]
    pub anomaly: Rational,
}

impl IrrepInvariants {
    /// Computes every invariant of `irrep`.
    pub fn of(irrep: &Irrep) -> Result<Self, ModelError> {
        let dimension = irrep.dimension()?;
        Ok(Self {
            dimension,
            casimir: quadratic_casimir(irrep),
            dynkin_index: dynkin_index(irrep)?,
            anomaly: anomaly_coefficient(irrep)?,
        })
    }
}

/// Shifted row lengths `λ_i − |λ|/n + (n+1)/2 − i`, with `i` starting at 1.
fn shifted_rows(rows: &[u32]) -> Vec<Rational> {
    let n = rows.len() as i64;
    let boxes: i64 = rows.iter().map(|&r| r as i64).sum();
    rows.iter()
        .enumerate()
        .map(|(idx, &r)| {
            Rational::from_integer(r as i64) - Rational::new(boxes, n)
                + Rational::new(n + 1, 2)
                - Rational::from_integer(idx as i64 + 1)
        })
        .collect()
}

fn power_sum(values: &[Rational], power: u32) -> Rational {
    values.iter().fold(Rational::from_integer(0), |acc, v| {
        acc + (0..power).fold(Rational::from_integer(1), |term, _| term * v)
    })
}

/// Quadratic Casimir.
pub fn quadratic_casimir(irrep: &Irrep) -> Rational {
    match irrep {
        Irrep::Charge(q) => q * q,
        Irrep::Dynkin(labels) => {
            let rows = irrep.partition();
            let rho = shifted_rows(&vec![0; labels.len() + 1]);
            (power_sum(&shifted_rows(&rows), 2) - power_sum(&rho, 2)) / Rational::from_integer(2)
        }
    }
}

/// Dynkin index `dim(R)·C2(R) / dim(G)`.
pub fn dynkin_index(irrep: &Irrep) -> Result<Rational, ModelError> {
    match irrep {
        Irrep::Charge(q) => Ok(q * q),
        Irrep::Dynkin(labels) => {
            let n = labels.len() as i64 + 1;
            let dim = irrep.dimension()? as i64;
            Ok(quadratic_casimir(irrep) * Rational::from_integer(dim)
                / Rational::from_integer(n * n - 1))
        }
    }
}

/// Cubic anomaly coefficient; zero for SU(2), whose irreps are all self-conjugate.
pub fn anomaly_coefficient(irrep: &Irrep) -> Result<Rational, ModelError> {
    match irrep {
        Irrep::Charge(q) => Ok(q * q * q),
        Irrep::Dynkin(labels) if labels.len() < 2 => Ok(Rational::from_integer(0)),
        Irrep::Dynkin(labels) => {
            let n = labels.len() as u32 + 1;
            let dim = irrep.dimension()? as i64;
            let own = power_sum(&shifted_rows(&irrep.partition()), 3);
            let fundamental = power_sum(&shifted_rows(&Irrep::fundamental(n).partition()), 3);
            Ok(own * Rational::from_integer(dim) / (fundamental * Rational::from_integer(n as i64)))
        }
    }
}
