//! Final merge of accepted terms and VEV-induced mass terms.
//!
//! Assembly is the single write barrier of a model: it deduplicates, orders
//! and weights the accepted terms, then freezes the registry.

use std::collections::{BTreeMap, BTreeSet};

use bsm_core::errors::{ErrorInfo, ModelError};
use bsm_core::rational::{self, Rational};
use bsm_model::{FieldRegistry, InteractionTerm, MassTerm, Participant, VevManager};
use bsm_terms::{TermKind, ValidatedTerm};
use serde::{Deserialize, Serialize};
use tracing::info;

/// One accepted term with its symmetry factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LagrangianTerm {
    /// The term.
    pub term: InteractionTerm,
    /// Total mass dimension.
    #[serde(with = "rational::serde_str")]
    pub mass_dimension: Rational,
    /// Classification from validation.
    pub kind: TermKind,
    /// `Π 1/n!` over groups of identical bosonic insertions.
    #[serde(with = "rational::serde_str")]
    pub symmetry_factor: Rational,
}

/// Deduplicated, ordered Lagrangian of a frozen model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lagrangian {
    terms: Vec<LagrangianTerm>,
    mass_terms: Vec<MassTerm>,
}

impl Lagrangian {
    /// Terms ordered by mass dimension, then sorted participants.
    pub fn terms(&self) -> &[LagrangianTerm] {
        &self.terms
    }

    /// VEV-induced bilinears, sorted.
    pub fn mass_terms(&self) -> &[MassTerm] {
        &self.mass_terms
    }

    /// Number of interaction terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// True when there are neither terms nor mass terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() && self.mass_terms.is_empty()
    }

    /// Coupling symbols, sorted.
    pub fn couplings(&self) -> BTreeSet<&str> {
        self.terms
            .iter()
            .map(|entry| entry.term.coupling.as_str())
            .collect()
    }
}

fn factorial(n: usize) -> i64 {
    (1..=n as i64).product()
}

/// `Π 1/n!` over runs of identical bosonic insertions (same field, same role).
pub fn symmetry_factor(registry: &FieldRegistry, term: &InteractionTerm) -> Result<Rational, ModelError> {
    let mut counts: BTreeMap<&Participant, usize> = BTreeMap::new();
    for participant in &term.participants {
        if registry.lookup(&participant.particle)?.spin.is_boson() {
            *counts.entry(participant).or_insert(0) += 1;
        }
    }
    Ok(counts
        .values()
        .fold(Rational::from_integer(1), |acc, &n| acc / factorial(n)))
}

/// Assembles `accepted` with the mass terms induced by `vevs`, then freezes `registry`.
///
/// Terms sharing a sorted participant list keep their first occurrence.
pub fn assemble(
    registry: &mut FieldRegistry,
    accepted: Vec<ValidatedTerm>,
    vevs: &VevManager,
) -> Result<Lagrangian, ModelError> {
    if registry.is_frozen() {
        return Err(ModelError::RegistryFrozen(
            ErrorInfo::new("frozen", "the registry was already assembled")
                .with_hint("assemble a registry exactly once"),
        ));
    }
    for vev in vevs.vevs() {
        registry.lookup(&vev.particle)?;
    }

    let mut seen = BTreeSet::new();
    let mut keyed = Vec::with_capacity(accepted.len());
    for validated in accepted {
        for participant in &validated.term.participants {
            registry.lookup(&participant.particle).map_err(|err| match err {
                ModelError::UndefinedReference(info) => ModelError::UndefinedReference(
                    info.with_context("participants", validated.term.participant_list()),
                ),
                other => other,
            })?;
        }
        let key = validated.term.canonical_key();
        if seen.insert(key.clone()) {
            keyed.push((validated.mass_dimension, key, validated));
        }
    }
    keyed.sort_by(|a, b| (a.0, &a.1).cmp(&(b.0, &b.1)));

    let mut terms = Vec::with_capacity(keyed.len());
    for (_, _, validated) in keyed {
        terms.push(LagrangianTerm {
            symmetry_factor: symmetry_factor(registry, &validated.term)?,
            mass_dimension: validated.mass_dimension,
            kind: validated.kind,
            term: validated.term,
        });
    }
    let plain: Vec<InteractionTerm> = terms.iter().map(|entry| entry.term.clone()).collect();
    let mass_terms = vevs.mass_contributions(&plain);

    if terms.is_empty() && mass_terms.is_empty() {
        return Err(ModelError::EmptyModel(
            ErrorInfo::new("empty-model", "no accepted terms and no VEV-induced mass terms")
                .with_hint("accept at least one validated term"),
        ));
    }
    registry.freeze();
    info!(
        terms = terms.len(),
        mass_terms = mass_terms.len(),
        "assembled lagrangian"
    );
    Ok(Lagrangian { terms, mass_terms })
}
