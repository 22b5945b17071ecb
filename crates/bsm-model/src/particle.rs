//! Particle records: spin, chirality and per-group representations.

use std::collections::BTreeMap;
use std::fmt;

use bsm_core::rational::{self, Rational};
use bsm_core::{GroupId, ParticleId};
use bsm_group::{Irrep, Representation};
use serde::{Deserialize, Serialize};

/// Spin class of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Spin {
    /// Spin 0.
    Scalar,
    /// Spin 1/2, two-component Weyl or Majorana.
    Fermion,
    /// Spin 1.
    Vector,
}

impl Spin {
    /// Canonical mass dimension of a field of this spin.
    pub fn mass_dimension(&self) -> Rational {
        match self {
            Spin::Scalar | Spin::Vector => Rational::from_integer(1),
            Spin::Fermion => Rational::new(3, 2),
        }
    }

    /// Bosons are scalars and vectors.
    pub fn is_boson(&self) -> bool {
        !matches!(self, Spin::Fermion)
    }
}

impl fmt::Display for Spin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Spin::Scalar => "scalar",
            Spin::Fermion => "fermion",
            Spin::Vector => "vector",
        })
    }
}

/// Chirality of a fermion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Chirality {
    /// Left-handed Weyl fermion.
    Left,
    /// Right-handed Weyl fermion.
    Right,
    /// Self-conjugate Majorana fermion.
    Majorana,
}

fn default_generations() -> u32 {
    1
}

fn is_one(value: &u32) -> bool {
    *value == 1
}

/// A declared field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Particle {
    /// Unique identifier.
    pub id: ParticleId,
    /// Spin class.
    pub spin: Spin,
    /// Chirality, fermions only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chirality: Option<Chirality>,
    /// One representation per declared group, in group declaration order once registered.
    #[serde(default)]
    pub reps: Vec<Representation>,
    /// Field equals its own conjugate (real scalar, Majorana fermion).
    #[serde(default)]
    pub self_conjugate: bool,
    /// Number of flavour copies.
    #[serde(default = "default_generations", skip_serializing_if = "is_one")]
    pub generations: u32,
    /// Global quantum numbers such as lepton or baryon number.
    #[serde(default, with = "rational::serde_map", skip_serializing_if = "BTreeMap::is_empty")]
    pub quantum_numbers: BTreeMap<String, Rational>,
}

impl Particle {
    fn with_spin(id: impl Into<ParticleId>, spin: Spin, chirality: Option<Chirality>) -> Self {
        Self {
            id: id.into(),
            spin,
            chirality,
            reps: Vec::new(),
            self_conjugate: matches!(chirality, Some(Chirality::Majorana)),
            generations: 1,
            quantum_numbers: BTreeMap::new(),
        }
    }

    /// A complex scalar.
    pub fn scalar(id: impl Into<ParticleId>) -> Self {
        Self::with_spin(id, Spin::Scalar, None)
    }

    /// A fermion of the given chirality.
    pub fn fermion(id: impl Into<ParticleId>, chirality: Chirality) -> Self {
        Self::with_spin(id, Spin::Fermion, Some(chirality))
    }

    /// A vector field.
    pub fn vector(id: impl Into<ParticleId>) -> Self {
        Self::with_spin(id, Spin::Vector, None)
    }

    /// Assigns an irrep under `group`.
    pub fn with_rep(mut self, group: impl Into<GroupId>, irrep: Irrep) -> Self {
        self.reps.push(Representation::new(group, irrep));
        self
    }

    /// Assigns a U(1) charge under `group`.
    pub fn with_charge(self, group: impl Into<GroupId>, charge: Rational) -> Self {
        self.with_rep(group, Irrep::Charge(charge))
    }

    /// Marks the field as its own conjugate.
    pub fn self_conjugate(mut self) -> Self {
        self.self_conjugate = true;
        self
    }

    /// Sets the number of generations.
    pub fn with_generations(mut self, generations: u32) -> Self {
        self.generations = generations;
        self
    }

    /// Sets a global quantum number.
    pub fn with_quantum_number(mut self, name: impl Into<String>, value: Rational) -> Self {
        self.quantum_numbers.insert(name.into(), value);
        self
    }

    /// Mass dimension contributed by one insertion of the field.
    pub fn mass_dimension(&self) -> Rational {
        self.spin.mass_dimension()
    }

    /// Irrep under `group`, if assigned.
    pub fn irrep(&self, group: &GroupId) -> Option<&Irrep> {
        self.reps
            .iter()
            .find(|rep| &rep.group == group)
            .map(|rep| &rep.irrep)
    }

    /// Irreps only, in stored order.
    pub fn irreps(&self) -> impl Iterator<Item = &Irrep> {
        self.reps.iter().map(|rep| &rep.irrep)
    }

    /// Global quantum number, zero when absent.
    pub fn quantum_number(&self, name: &str) -> Rational {
        self.quantum_numbers
            .get(name)
            .copied()
            .unwrap_or_else(|| Rational::from_integer(0))
    }
}
