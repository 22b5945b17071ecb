//! Tensor-product decomposition, singlet extraction and the memoised group algebra.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use bsm_core::errors::{ErrorInfo, ModelError};
use bsm_core::GroupId;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::family::{GaugeGroup, GroupFamily};
use crate::irrep::Irrep;
use crate::young::lr_product;

/// One irreducible summand with its multiplicity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summand {
    /// Irrep label.
    pub irrep: Irrep,
    /// How many times it occurs.
    pub multiplicity: u64,
}

/// Direct sum of irreducible representations, ordered by irrep label.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Decomposition {
    summands: Vec<Summand>,
}

impl Decomposition {
    /// Decomposition holding a single irrep once.
    pub fn single(irrep: Irrep) -> Self {
        Self {
            summands: vec![Summand {
                irrep,
                multiplicity: 1,
            }],
        }
    }

    fn from_map(map: BTreeMap<Irrep, u64>) -> Self {
        Self {
            summands: map
                .into_iter()
                .map(|(irrep, multiplicity)| Summand {
                    irrep,
                    multiplicity,
                })
                .collect(),
        }
    }

    /// Summands in label order.
    pub fn summands(&self) -> &[Summand] {
        &self.summands
    }

    /// Distinct irreps in label order.
    pub fn irreps(&self) -> impl Iterator<Item = &Irrep> {
        self.summands.iter().map(|s| &s.irrep)
    }

    /// Multiplicity of `irrep`, zero when absent.
    pub fn multiplicity(&self, irrep: &Irrep) -> u64 {
        self.summands
            .binary_search_by(|s| s.irrep.cmp(irrep))
            .map(|idx| self.summands[idx].multiplicity)
            .unwrap_or(0)
    }

    /// Returns true when `irrep` occurs.
    pub fn contains(&self, irrep: &Irrep) -> bool {
        self.multiplicity(irrep) > 0
    }

    /// Returns true when the trivial representation occurs.
    pub fn contains_singlet(&self) -> bool {
        self.summands.iter().any(|s| s.irrep.is_singlet())
    }

    /// Sum of multiplicity times dimension.
    pub fn total_dimension(&self) -> Result<u64, ModelError> {
        self.summands.iter().try_fold(0u64, |acc, s| {
            Ok(acc.saturating_add(s.multiplicity.saturating_mul(s.irrep.dimension()?)))
        })
    }
}

impl fmt::Display for Decomposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, summand) in self.summands.iter().enumerate() {
            if idx > 0 {
                f.write_str(" + ")?;
            }
            if summand.multiplicity > 1 {
                write!(f, "{}*", summand.multiplicity)?;
            }
            write!(f, "{}", summand.irrep)?;
        }
        Ok(())
    }
}

/// Pure tensor-product decomposition of two irreps of one group family.
pub fn decompose(family: GroupFamily, a: &Irrep, b: &Irrep) -> Result<Decomposition, ModelError> {
    match (family, a, b) {
        (GroupFamily::Abelian, Irrep::Charge(x), Irrep::Charge(y)) => {
            Ok(Decomposition::single(Irrep::Charge(x + y)))
        }
        (GroupFamily::SpecialUnitary { n }, Irrep::Dynkin(la), Irrep::Dynkin(lb))
            if la.len() == n as usize - 1 && lb.len() == n as usize - 1 =>
        {
            // the diagram with fewer boxes supplies the labelled strips
            let (pa, pb) = (a.partition(), b.partition());
            let (big, small) = if pa.iter().sum::<u32>() >= pb.iter().sum::<u32>() {
                (pa, pb)
            } else {
                (pb, pa)
            };
            let product = lr_product(&big, &small, n as usize);
            let mut summands = BTreeMap::new();
            for (rows, multiplicity) in product {
                *summands.entry(Irrep::from_partition(&rows)).or_insert(0) += multiplicity;
            }
            Ok(Decomposition::from_map(summands))
        }
        (family, a, b) => Err(ModelError::InvalidRepresentation(
            ErrorInfo::new(
                "irrep-family",
                format!("{a} and {b} are not both irreducible representations of {family}"),
            )
            .with_context("family", family.to_string())
            .with_context("lhs", a.to_string())
            .with_context("rhs", b.to_string()),
        )),
    }
}

type CacheKey = (GroupId, Irrep, Irrep);

/// Declared gauge groups plus a memo of pairwise decompositions.
///
/// Group structure is immutable once declared, so cached products never go
/// stale. The cache sits behind a lock so one algebra can be shared by
/// reference across validation workers.
pub struct GroupAlgebra {
    groups: Vec<GaugeGroup>,
    cache: RwLock<HashMap<CacheKey, Arc<Decomposition>>>,
}

impl Default for GroupAlgebra {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for GroupAlgebra {
    fn clone(&self) -> Self {
        Self {
            groups: self.groups.clone(),
            cache: RwLock::new(HashMap::new()),
        }
    }
}

impl fmt::Debug for GroupAlgebra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupAlgebra")
            .field("groups", &self.groups)
            .field("cached_products", &self.cached_products())
            .finish()
    }
}

impl GroupAlgebra {
    /// Creates an algebra with no groups.
    pub fn new() -> Self {
        Self {
            groups: Vec::new(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Declares a group; identifiers must be unique.
    pub fn declare_group(&mut self, group: GaugeGroup) -> Result<GroupId, ModelError> {
        if self.groups.iter().any(|g| g.id == group.id) {
            return Err(ModelError::DuplicateDefinition(
                ErrorInfo::new("duplicate-group", format!("group '{}' already declared", group.id))
                    .with_context("group", group.id.as_str()),
            ));
        }
        let id = group.id.clone();
        self.groups.push(group);
        Ok(id)
    }

    /// Declared groups in declaration order.
    pub fn groups(&self) -> &[GaugeGroup] {
        &self.groups
    }

    /// Looks up a group by identifier.
    pub fn group(&self, id: &GroupId) -> Result<&GaugeGroup, ModelError> {
        self.groups.iter().find(|g| &g.id == id).ok_or_else(|| {
            ModelError::UndefinedReference(
                ErrorInfo::new("unknown-group", format!("group '{id}' is not declared"))
                    .with_context("group", id.as_str()),
            )
        })
    }

    /// Number of memoised products.
    pub fn cached_products(&self) -> usize {
        self.cache.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Memoised decomposition of `a ⊗ b` for the group `group`.
    pub fn decompose(
        &self,
        group: &GroupId,
        a: &Irrep,
        b: &Irrep,
    ) -> Result<Arc<Decomposition>, ModelError> {
        let family = self.group(group)?.family;
        let (lhs, rhs) = if a <= b { (a, b) } else { (b, a) };
        let key = (group.clone(), lhs.clone(), rhs.clone());
        if let Some(hit) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(Arc::clone(hit));
        }
        let product = Arc::new(decompose(family, lhs, rhs).map_err(|err| match err {
            ModelError::InvalidRepresentation(info) => {
                ModelError::InvalidRepresentation(info.with_context("group", group.as_str()))
            }
            other => other,
        })?);
        debug!(
            group = %group,
            lhs = %lhs,
            rhs = %rhs,
            summands = product.summands().len(),
            "decomposition cache miss"
        );
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, Arc::clone(&product));
        Ok(product)
    }

    /// Folds [`GroupAlgebra::decompose`] across `reps`; an empty list is the singlet.
    pub fn fuse_all(&self, group: &GroupId, reps: &[Irrep]) -> Result<Decomposition, ModelError> {
        let family = self.group(group)?.family;
        let mut iter = reps.iter();
        let mut current = match iter.next() {
            Some(first) => {
                first.validate(group, family)?;
                Decomposition::single(first.clone())
            }
            None => return Ok(Decomposition::single(Irrep::singlet(family))),
        };
        for next in iter {
            next.validate(group, family)?;
            let mut acc: BTreeMap<Irrep, u64> = BTreeMap::new();
            for summand in current.summands() {
                let product = self.decompose(group, &summand.irrep, next)?;
                for piece in product.summands() {
                    let entry = acc.entry(piece.irrep.clone()).or_insert(0);
                    *entry = entry
                        .saturating_add(summand.multiplicity.saturating_mul(piece.multiplicity));
                }
            }
            current = Decomposition::from_map(acc);
        }
        Ok(current)
    }

    /// Returns true when the product of `reps` contains the trivial representation.
    ///
    /// The last factor is matched against the product of the others: a singlet
    /// exists exactly when the conjugate of the last irrep occurs there.
    pub fn contains_singlet(&self, group: &GroupId, reps: &[Irrep]) -> Result<bool, ModelError> {
        let family = self.group(group)?.family;
        let Some((last, rest)) = reps.split_last() else {
            return Ok(true);
        };
        for irrep in reps {
            irrep.validate(group, family)?;
        }
        match family {
            GroupFamily::Abelian => {
                let total = reps
                    .iter()
                    .filter_map(Irrep::as_charge)
                    .fold(bsm_core::Rational::from_integer(0), |acc, q| acc + q);
                Ok(*total.numer() == 0)
            }
            GroupFamily::SpecialUnitary { n } => {
                let boxes: u32 = reps.iter().map(Irrep::n_ality).sum();
                if boxes % n != 0 {
                    return Ok(false);
                }
                let partial = self.fuse_all(group, rest)?;
                Ok(partial.contains(&last.conjugate()))
            }
        }
    }
}
