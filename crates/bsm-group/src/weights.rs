//! Weight states of SU(n) irreps in the defining basis and Cartan eigenvalues.
//!
//! A weight state is described by its content: how many tensor indices take
//! each value `1..n`. A content occurs in the irrep with Young diagram `λ`
//! exactly when its sorted form is dominated by `λ`.

use bsm_core::errors::{ErrorInfo, ModelError};
use bsm_core::Rational;

use crate::family::GeneratorKind;
use crate::irrep::Irrep;

const MAX_WEIGHT_STATES: usize = 1 << 16;

/// Distinct weight contents of `irrep`, highest weight first.
///
/// U(1) charges have a single state with empty content.
pub fn weight_states(irrep: &Irrep) -> Result<Vec<Vec<u32>>, ModelError> {
    let rows = irrep.partition();
    if rows.is_empty() {
        return Ok(vec![Vec::new()]);
    }
    let boxes: u32 = rows.iter().sum();
    let mut states = Vec::new();
    let mut content = vec![0u32; rows.len()];
    compositions(&rows, boxes, 0, &mut content, &mut states)?;
    Ok(states)
}

fn compositions(
    rows: &[u32],
    remaining: u32,
    position: usize,
    content: &mut [u32],
    out: &mut Vec<Vec<u32>>,
) -> Result<(), ModelError> {
    if position + 1 == content.len() {
        content[position] = remaining;
        if dominated(content, rows) {
            if out.len() == MAX_WEIGHT_STATES {
                return Err(ModelError::InvalidRepresentation(
                    ErrorInfo::new("weights-limit", "irrep has too many weight states")
                        .with_context("irrep", Irrep::from_partition(rows).to_string())
                        .with_context("required", MAX_WEIGHT_STATES.to_string()),
                ));
            }
            out.push(content.to_vec());
        }
        return Ok(());
    }
    for value in (0..=remaining.min(rows[0])).rev() {
        content[position] = value;
        compositions(rows, remaining - value, position + 1, content, out)?;
    }
    content[position] = 0;
    Ok(())
}

fn dominated(content: &[u32], rows: &[u32]) -> bool {
    let mut sorted = content.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    let mut lhs = 0u32;
    let mut rhs = 0u32;
    sorted.iter().zip(rows).all(|(&c, &r)| {
        lhs += c;
        rhs += r;
        lhs <= rhs
    })
}

/// Eigenvalue of a diagonal generator on a weight state.
///
/// `H_k` acts as `(n_1 + … + n_k − k·n_{k+1}) / 2`; the U(1) charge acts as
/// `charge`. Off-diagonal generators have no eigenvalue.
pub fn eigenvalue(kind: GeneratorKind, content: &[u32], charge: Rational) -> Option<Rational> {
    match kind {
        GeneratorKind::Charge => Some(charge),
        GeneratorKind::Diagonal { k } => {
            let k = k as usize;
            let below: i64 = content.iter().take(k).map(|&c| c as i64).sum();
            let next = *content.get(k)? as i64;
            Some(Rational::new(below - k as i64 * next, 2))
        }
        GeneratorKind::Symmetric { .. } | GeneratorKind::Antisymmetric { .. } => None,
    }
}
