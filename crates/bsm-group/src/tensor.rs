//! Explicit tensor realisation of SU(n) irreps.
//!
//! The irrep with Young diagram `λ` is spanned by lowering operators applied to
//! the product of antisymmetrised columns `e_1 ∧ … ∧ e_h` inside `V^{⊗|λ|}`.
//! Vectors are sparse maps from index words to exact rationals, so invariant
//! subspaces come out of plain Gaussian elimination.

use std::collections::{BTreeMap, VecDeque};

use bsm_core::errors::{ErrorInfo, ModelError};
use bsm_core::rational::{checked_add, checked_mul, checked_sub};
use bsm_core::Rational;

use crate::family::GeneratorKind;
use crate::irrep::Irrep;
use crate::weights::eigenvalue;

const MAX_MODULE_DIMENSION: u64 = 1 << 12;
const MAX_TENSOR_TERMS: u64 = 1 << 16;

/// Sparse vector of `V^{⊗m}` keyed by index words with entries in `1..=n`.
pub type Tensor = BTreeMap<Vec<u32>, Rational>;

fn limit_error(irrep: &Irrep, what: &str, required: u64) -> ModelError {
    ModelError::InvalidRepresentation(
        ErrorInfo::new("weights-limit", format!("irrep {irrep} has too many {what}"))
            .with_context("irrep", irrep.to_string())
            .with_context("required", required.to_string()),
    )
}

fn zero() -> Rational {
    Rational::from_integer(0)
}

/// Adds `scale · source` to `target`, dropping entries that cancel.
fn add_scaled(target: &mut Tensor, scale: Rational, source: &Tensor) -> Result<(), ModelError> {
    for (word, value) in source {
        let term = checked_mul(scale, *value)?;
        let entry = target.entry(word.clone()).or_insert_with(zero);
        *entry = checked_add(*entry, term)?;
        if *entry.numer() == 0 {
            target.remove(word);
        }
    }
    Ok(())
}

/// `E_ab`: replaces one index `b` by `a`, summed over positions.
fn raise(a: u32, b: u32, tensor: &Tensor) -> Result<Tensor, ModelError> {
    let mut out = Tensor::new();
    for (word, value) in tensor {
        for position in 0..word.len() {
            if word[position] != b {
                continue;
            }
            let mut moved = word.clone();
            moved[position] = a;
            let entry = out.entry(moved.clone()).or_insert_with(zero);
            *entry = checked_add(*entry, *value)?;
            if *entry.numer() == 0 {
                out.remove(&moved);
            }
        }
    }
    Ok(out)
}

/// Index content of a word: how often each of `1..=n` occurs.
fn word_content(word: &[u32], n: u32) -> Vec<u32> {
    let mut content = vec![0u32; n as usize];
    for &index in word {
        content[index as usize - 1] += 1;
    }
    content
}

/// Action of an SU(n) generator on a tensor of `V^{⊗m}`, up to an overall
/// constant factor.
///
/// Off-diagonal pairs act as `E_ij + E_ji` and `E_ij − E_ji`, which share
/// their kernels with the hermitian generators.
pub fn act(kind: GeneratorKind, n: u32, tensor: &Tensor) -> Result<Tensor, ModelError> {
    match kind {
        GeneratorKind::Symmetric { i, j } => {
            let mut out = raise(i, j, tensor)?;
            add_scaled(&mut out, Rational::from_integer(1), &raise(j, i, tensor)?)?;
            Ok(out)
        }
        GeneratorKind::Antisymmetric { i, j } => {
            let mut out = raise(i, j, tensor)?;
            add_scaled(&mut out, Rational::from_integer(-1), &raise(j, i, tensor)?)?;
            Ok(out)
        }
        GeneratorKind::Diagonal { .. } => {
            let mut out = Tensor::new();
            for (word, value) in tensor {
                let weight = eigenvalue(kind, &word_content(word, n), zero()).unwrap_or_else(zero);
                let scaled = checked_mul(weight, *value)?;
                if *scaled.numer() != 0 {
                    out.insert(word.clone(), scaled);
                }
            }
            Ok(out)
        }
        GeneratorKind::Charge => Err(ModelError::InvalidRepresentation(
            ErrorInfo::new("generator-family", "a U(1) charge does not act on SU(n) tensors"),
        )),
    }
}

fn permutations(items: &mut Vec<u32>, start: usize, sign: i64, out: &mut Vec<(Vec<u32>, i64)>) {
    if start == items.len() {
        out.push((items.clone(), sign));
        return;
    }
    for idx in start..items.len() {
        items.swap(start, idx);
        let flipped = if idx == start { sign } else { -sign };
        permutations(items, start + 1, flipped, out);
        items.swap(start, idx);
    }
}

/// `Σ_σ sgn(σ) e_σ(1) ⊗ … ⊗ e_σ(h)`.
fn column(height: u32) -> Tensor {
    let mut terms = Vec::new();
    permutations(&mut (1..=height).collect(), 0, 1, &mut terms);
    terms
        .into_iter()
        .map(|(word, sign)| (word, Rational::from_integer(sign)))
        .collect()
}

fn tensor_product(left: &Tensor, right: &Tensor) -> Result<Tensor, ModelError> {
    let mut out = Tensor::new();
    for (a, x) in left {
        for (b, y) in right {
            let mut word = a.clone();
            word.extend_from_slice(b);
            out.insert(word, checked_mul(*x, *y)?);
        }
    }
    Ok(out)
}

/// One basis vector of a [`TensorModule`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightVector {
    /// Index content shared by every word of the vector.
    pub content: Vec<u32>,
    /// The vector itself.
    pub tensor: Tensor,
}

/// Weight basis of an SU(n) irrep realised in `V^{⊗m}`.
#[derive(Debug, Clone)]
pub struct TensorModule {
    n: u32,
    basis: Vec<WeightVector>,
}

impl TensorModule {
    /// Builds the weight basis of `irrep`, highest weight first.
    pub fn new(irrep: &Irrep) -> Result<Self, ModelError> {
        let Irrep::Dynkin(labels) = irrep else {
            return Err(ModelError::InvalidRepresentation(
                ErrorInfo::new("generator-family", "U(1) charges have no tensor realisation")
                    .with_context("irrep", irrep.to_string()),
            ));
        };
        let n = labels.len() as u32 + 1;
        let dimension = irrep.dimension()?;
        if dimension > MAX_MODULE_DIMENSION {
            return Err(limit_error(irrep, "states", MAX_MODULE_DIMENSION));
        }
        let rows = irrep.partition();
        let width = rows.first().copied().unwrap_or(0);
        let heights: Vec<u32> = (0..width)
            .map(|col| rows.iter().filter(|&&row| row > col).count() as u32)
            .collect();
        let terms = heights
            .iter()
            .try_fold(1u64, |acc, &h| (1..=u64::from(h)).try_fold(acc, u64::checked_mul));
        if terms.map_or(true, |terms| terms > MAX_TENSOR_TERMS) {
            return Err(limit_error(irrep, "tensor components", MAX_TENSOR_TERMS));
        }

        let mut highest = Tensor::new();
        highest.insert(Vec::new(), Rational::from_integer(1));
        for &height in &heights {
            highest = tensor_product(&highest, &column(height))?;
        }

        let mut module = Self {
            n,
            basis: Vec::new(),
        };
        let mut echelon: BTreeMap<Vec<u32>, Vec<(Vec<u32>, Tensor)>> = BTreeMap::new();
        let mut queue = VecDeque::new();
        if let Some(vector) = module.insert(&mut echelon, highest)? {
            queue.push_back(vector);
        }
        while let Some(tensor) = queue.pop_front() {
            for k in 1..n {
                let lowered = raise(k + 1, k, &tensor)?;
                if lowered.is_empty() {
                    continue;
                }
                if let Some(vector) = module.insert(&mut echelon, lowered)? {
                    queue.push_back(vector);
                }
            }
            if module.basis.len() as u64 > dimension {
                break;
            }
        }
        if module.basis.len() as u64 != dimension {
            return Err(ModelError::InvalidRepresentation(
                ErrorInfo::new("module-dimension", "tensor realisation has the wrong dimension")
                    .with_context("irrep", irrep.to_string())
                    .with_context("computed", module.basis.len().to_string())
                    .with_context("required", dimension.to_string()),
            ));
        }
        Ok(module)
    }

    /// Reduces `tensor` against the stored vectors of its weight and keeps it
    /// when independent.
    fn insert(
        &mut self,
        echelon: &mut BTreeMap<Vec<u32>, Vec<(Vec<u32>, Tensor)>>,
        mut tensor: Tensor,
    ) -> Result<Option<Tensor>, ModelError> {
        let Some(first) = tensor.keys().next() else {
            return Ok(None);
        };
        let content = word_content(first, self.n);
        let rows = echelon.entry(content.clone()).or_default();
        for (pivot, row) in rows.iter() {
            if let Some(&coefficient) = tensor.get(pivot) {
                add_scaled(&mut tensor, checked_sub(zero(), coefficient)?, row)?;
            }
        }
        let Some((pivot, &lead)) = tensor.iter().next() else {
            return Ok(None);
        };
        let pivot = pivot.clone();
        let mut normalised = Tensor::new();
        add_scaled(&mut normalised, lead.recip(), &tensor)?;
        rows.push((pivot, normalised.clone()));
        self.basis.push(WeightVector {
            content,
            tensor: normalised.clone(),
        });
        Ok(Some(normalised))
    }

    /// Rank `n` of the group.
    pub fn n(&self) -> u32 {
        self.n
    }

    /// Weight basis, highest weight first.
    pub fn basis(&self) -> &[WeightVector] {
        &self.basis
    }

    /// Basis of the vectors in the span of `members` (indices into
    /// [`TensorModule::basis`]) annihilated by every generator in `constraints`.
    ///
    /// Each returned vector is scaled so that its first component is `1`.
    pub fn invariant_subspace(
        &self,
        members: &[usize],
        constraints: &[GeneratorKind],
    ) -> Result<Vec<Tensor>, ModelError> {
        let width = members.len();
        let mut rows: BTreeMap<(usize, Vec<u32>), Vec<Rational>> = BTreeMap::new();
        for (column, &member) in members.iter().enumerate() {
            for (slot, &kind) in constraints.iter().enumerate() {
                for (word, value) in act(kind, self.n, &self.basis[member].tensor)? {
                    rows.entry((slot, word)).or_insert_with(|| vec![zero(); width])[column] = value;
                }
            }
        }
        let mut kernel = Vec::new();
        for coefficients in null_space(rows.into_values().collect(), width)? {
            let mut tensor = Tensor::new();
            for (&member, coefficient) in members.iter().zip(&coefficients) {
                if *coefficient.numer() != 0 {
                    add_scaled(&mut tensor, *coefficient, &self.basis[member].tensor)?;
                }
            }
            let Some(&lead) = tensor.values().next() else {
                continue;
            };
            let mut scaled = Tensor::new();
            add_scaled(&mut scaled, lead.recip(), &tensor)?;
            kernel.push(scaled);
        }
        Ok(kernel)
    }
}

/// Kernel basis of the matrix with the given rows, one vector per free column.
fn null_space(mut rows: Vec<Vec<Rational>>, width: usize) -> Result<Vec<Vec<Rational>>, ModelError> {
    let mut pivots = Vec::new();
    for column in 0..width {
        let rank = pivots.len();
        let Some(found) = (rank..rows.len()).find(|&r| *rows[r][column].numer() != 0) else {
            continue;
        };
        rows.swap(rank, found);
        let inverse = rows[rank][column].recip();
        for entry in rows[rank].iter_mut() {
            *entry = checked_mul(*entry, inverse)?;
        }
        let pivot_row = rows[rank].clone();
        for (r, row) in rows.iter_mut().enumerate() {
            let factor = row[column];
            if r == rank || *factor.numer() == 0 {
                continue;
            }
            for (entry, &pivot_entry) in row.iter_mut().zip(&pivot_row) {
                *entry = checked_sub(*entry, checked_mul(factor, pivot_entry)?)?;
            }
        }
        pivots.push(column);
        if pivots.len() == rows.len() {
            break;
        }
    }
    let mut kernel = Vec::new();
    for free in (0..width).filter(|column| !pivots.contains(column)) {
        let mut vector = vec![zero(); width];
        vector[free] = Rational::from_integer(1);
        for (row, &pivot) in pivots.iter().enumerate() {
            vector[pivot] = checked_sub(zero(), rows[row][free])?;
        }
        kernel.push(vector);
    }
    Ok(kernel)
}
