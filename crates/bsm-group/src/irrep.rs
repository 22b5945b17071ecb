//! Irreducible representations: validity, dimension, conjugation and reality.

use std::fmt;

use bsm_core::errors::{ErrorInfo, ModelError};
use bsm_core::rational::{self, format_rational, Rational};
use bsm_core::GroupId;
use serde::{Deserialize, Serialize};

use crate::family::GroupFamily;

/// Largest dimension accepted by [`resolve_dimension`].
const MAX_RESOLVE_DIMENSION: u64 = 1 << 20;

/// Irreducible representation label.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Irrep {
    /// U(1) charge.
    Charge(#[serde(with = "rational::serde_str")] Rational),
    /// SU(n) Dynkin labels, `n - 1` of them.
    Dynkin(Vec<u32>),
}

/// Reality class of an irrep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reality {
    /// Not equivalent to its conjugate.
    Complex,
    /// Self-conjugate with a symmetric invariant.
    Real,
    /// Self-conjugate with an antisymmetric invariant.
    Pseudoreal,
}

impl Irrep {
    /// The trivial representation of `family`.
    pub fn singlet(family: GroupFamily) -> Irrep {
        match family {
            GroupFamily::Abelian => Irrep::Charge(Rational::from_integer(0)),
            GroupFamily::SpecialUnitary { n } => Irrep::Dynkin(vec![0; n as usize - 1]),
        }
    }

    /// U(1) charge from a rational.
    pub fn charge(value: Rational) -> Irrep {
        Irrep::Charge(value)
    }

    /// Defining representation of SU(n).
    pub fn fundamental(n: u32) -> Irrep {
        let mut labels = vec![0; n.saturating_sub(1) as usize];
        if let Some(first) = labels.first_mut() {
            *first = 1;
        }
        Irrep::Dynkin(labels)
    }

    /// Conjugate of the defining representation of SU(n).
    pub fn antifundamental(n: u32) -> Irrep {
        Irrep::fundamental(n).conjugate()
    }

    /// Adjoint representation of SU(n).
    pub fn adjoint(n: u32) -> Irrep {
        let mut labels = vec![0; n.saturating_sub(1) as usize];
        let last = labels.len().saturating_sub(1);
        if let Some(first) = labels.first_mut() {
            *first += 1;
        }
        if let Some(end) = labels.get_mut(last) {
            *end += 1;
        }
        Irrep::Dynkin(labels)
    }

    /// Checks the irrep against the family of `group`.
    pub fn validate(&self, group: &GroupId, family: GroupFamily) -> Result<(), ModelError> {
        let ok = match (self, family) {
            (Irrep::Charge(_), GroupFamily::Abelian) => true,
            (Irrep::Dynkin(labels), GroupFamily::SpecialUnitary { n }) => {
                labels.len() == n as usize - 1
            }
            _ => false,
        };
        if ok {
            return self.dimension().map(|_| ());
        }
        Err(ModelError::InvalidRepresentation(
            ErrorInfo::new(
                "irrep-family",
                format!("{self} is not an irreducible representation of {family}"),
            )
            .with_context("group", group.as_str())
            .with_context("family", family.to_string())
            .with_context("irrep", self.to_string()),
        ))
    }

    /// Returns true for the trivial representation.
    pub fn is_singlet(&self) -> bool {
        match self {
            Irrep::Charge(q) => *q.numer() == 0,
            Irrep::Dynkin(labels) => labels.iter().all(|&a| a == 0),
        }
    }

    /// Complex conjugate: negated charge or reversed Dynkin labels.
    pub fn conjugate(&self) -> Irrep {
        match self {
            Irrep::Charge(q) => Irrep::Charge(-*q),
            Irrep::Dynkin(labels) => Irrep::Dynkin(labels.iter().rev().copied().collect()),
        }
    }

    /// U(1) charge, if any.
    pub fn as_charge(&self) -> Option<Rational> {
        match self {
            Irrep::Charge(q) => Some(*q),
            Irrep::Dynkin(_) => None,
        }
    }

    /// Young diagram row lengths of length `n`; the last row is always 0.
    pub fn partition(&self) -> Vec<u32> {
        match self {
            Irrep::Charge(_) => Vec::new(),
            Irrep::Dynkin(labels) => {
                let mut rows = vec![0u32; labels.len() + 1];
                for idx in (0..labels.len()).rev() {
                    rows[idx] = rows[idx + 1] + labels[idx];
                }
                rows
            }
        }
    }

    /// Inverse of [`Irrep::partition`]; full columns are dropped.
    pub fn from_partition(rows: &[u32]) -> Irrep {
        Irrep::Dynkin(rows.windows(2).map(|pair| pair[0] - pair[1]).collect())
    }

    /// Number of boxes of the Young diagram modulo `n`.
    pub fn n_ality(&self) -> u32 {
        match self {
            Irrep::Charge(_) => 0,
            Irrep::Dynkin(labels) => {
                let n = labels.len() as u32 + 1;
                let boxes: u64 = labels
                    .iter()
                    .enumerate()
                    .map(|(idx, &a)| (idx as u64 + 1) * a as u64)
                    .sum();
                (boxes % n as u64) as u32
            }
        }
    }

    /// Dimension from the Weyl formula, computed exactly.
    pub fn dimension(&self) -> Result<u64, ModelError> {
        match self {
            Irrep::Charge(_) => Ok(1),
            Irrep::Dynkin(_) => weyl_dimension(&self.partition()).ok_or_else(|| {
                ModelError::InvalidRepresentation(
                    ErrorInfo::new("dimension-overflow", "irrep dimension exceeds 64 bits")
                        .with_context("irrep", self.to_string()),
                )
            }),
        }
    }

    /// Reality class; U(1) charges are real only when zero.
    pub fn reality(&self) -> Reality {
        if self.conjugate() != *self {
            return Reality::Complex;
        }
        match self {
            Irrep::Charge(_) => Reality::Real,
            Irrep::Dynkin(labels) => {
                let n = labels.len() + 1;
                if n % 4 == 2 && labels[(n / 2) - 1] % 2 == 1 {
                    Reality::Pseudoreal
                } else {
                    Reality::Real
                }
            }
        }
    }
}

impl fmt::Display for Irrep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Irrep::Charge(q) => f.write_str(&format_rational(q)),
            Irrep::Dynkin(labels) => {
                f.write_str("[")?;
                for (idx, label) in labels.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{label}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Product over `i < j` of `(λ_i − λ_j + j − i) / (j − i)`.
pub(crate) fn weyl_dimension(rows: &[u32]) -> Option<u64> {
    let mut numerator: u128 = 1;
    let mut denominator: u128 = 1;
    for i in 0..rows.len() {
        for j in (i + 1)..rows.len() {
            let gap = (j - i) as u128;
            let diff = (rows[i] - rows[j]) as u128 + gap;
            numerator = numerator.checked_mul(diff)?;
            denominator = denominator.checked_mul(gap)?;
            let common = gcd(numerator, denominator);
            numerator /= common;
            denominator /= common;
        }
    }
    u64::try_from(numerator / denominator).ok()
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// An irrep of a particular group, as assigned to a particle.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Representation {
    /// Group the irrep belongs to.
    pub group: GroupId,
    /// Irrep label.
    pub irrep: Irrep,
}

impl Representation {
    /// Creates a representation record.
    pub fn new(group: impl Into<GroupId>, irrep: Irrep) -> Self {
        Self {
            group: group.into(),
            irrep,
        }
    }

    /// Dimension of the irrep.
    pub fn dimension(&self) -> Result<u64, ModelError> {
        self.irrep.dimension()
    }

    /// Representation of the conjugate field.
    pub fn conjugate(&self) -> Representation {
        Representation {
            group: self.group.clone(),
            irrep: self.irrep.conjugate(),
        }
    }
}

/// Finds the SU(n) irrep with dimension `dim`.
///
/// Within a conjugate pair the lexicographically greatest label tuple is the
/// unbarred irrep; `conjugate` selects its partner. Dimensions shared by more
/// than one inequivalent pair are ambiguous and rejected.
pub fn resolve_dimension(n: u32, dim: u64, conjugate: bool) -> Result<Irrep, ModelError> {
    let unresolved = |code: &str, message: String| {
        ErrorInfo::new(code, message)
            .with_context("family", format!("SU{n}"))
            .with_context("dimension", dim.to_string())
    };
    if n < 2 {
        return Err(ModelError::InvalidRepresentation(unresolved(
            "resolve-family",
            format!("SU{n} has no irreps"),
        )));
    }
    if dim == 0 || dim > MAX_RESOLVE_DIMENSION {
        return Err(ModelError::InvalidRepresentation(unresolved(
            "resolve-range",
            format!("dimension {dim} is out of range"),
        )));
    }
    let mut found = Vec::new();
    let mut labels = vec![0u32; n as usize - 1];
    search_dimension(&mut labels, 0, dim, &mut found);

    let mut classes: Vec<Irrep> = Vec::new();
    for irrep in found {
        let conj = irrep.conjugate();
        let representative = if conj > irrep { conj } else { irrep };
        if !classes.contains(&representative) {
            classes.push(representative);
        }
    }
    match classes.as_slice() {
        [] => Err(ModelError::InvalidRepresentation(unresolved(
            "resolve-missing",
            format!("SU{n} has no irrep of dimension {dim}"),
        ))),
        [single] => Ok(if conjugate {
            single.conjugate()
        } else {
            single.clone()
        }),
        many => Err(ModelError::InvalidRepresentation(
            unresolved(
                "resolve-ambiguous",
                format!(
                    "dimension {dim} of SU{n} is ambiguous between {}",
                    many.iter()
                        .map(Irrep::to_string)
                        .collect::<Vec<_>>()
                        .join(" and ")
                ),
            )
            .with_hint("give the Dynkin labels explicitly"),
        )),
    }
}

/// Depth-first search over label tuples; the dimension grows in every label,
/// so a partial tuple whose dimension already exceeds the target is pruned.
fn search_dimension(labels: &mut Vec<u32>, position: usize, target: u64, found: &mut Vec<Irrep>) {
    if position == labels.len() {
        let irrep = Irrep::Dynkin(labels.clone());
        if irrep.dimension().ok() == Some(target) {
            found.push(irrep);
        }
        return;
    }
    loop {
        let irrep = Irrep::Dynkin(labels.clone());
        match irrep.dimension() {
            Ok(d) if d <= target => search_dimension(labels, position + 1, target, found),
            _ => break,
        }
        labels[position] += 1;
    }
    labels[position] = 0;
}
