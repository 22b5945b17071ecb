//! Consistency validation of interaction terms.
//!
//! Checks run in a fixed order and stop at the first failure: references,
//! gauge invariance under the non-abelian groups, Lorentz structure, the
//! renormalizability bound, then abelian and global charge conservation.
//!
//! The dimension bound is fixed at four; only a suppression scale admits an
//! operator above it, however deep the enumerator is configured to search.

use std::collections::BTreeSet;

use bsm_core::errors::{ErrorInfo, ModelError};
use bsm_core::rational::{self, checked_add, checked_sub, checked_sum, format_rational, Rational};
use bsm_group::Irrep;
use bsm_model::{Chirality, FieldRegistry, InteractionTerm, Particle, Spin};
use serde::{Deserialize, Serialize};

/// Largest mass dimension accepted without a suppression scale.
pub const RENORMALIZABLE_DIMENSION: i64 = 4;

fn default_enforce_global_numbers() -> bool {
    true
}

/// Options controlling validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorOpts {
    /// Require global quantum numbers to be conserved like abelian charges.
    #[serde(default = "default_enforce_global_numbers")]
    pub enforce_global_numbers: bool,
}

impl Default for ValidatorOpts {
    fn default() -> Self {
        Self {
            enforce_global_numbers: default_enforce_global_numbers(),
        }
    }
}

/// Classification of an accepted term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermKind {
    /// Operator above dimension four.
    Effective,
    /// Term with derivatives.
    Kinetic,
    /// Term with a vector field.
    Gauge,
    /// Two fermions and one scalar.
    Yukawa,
    /// Fermion bilinear.
    FermionMass,
    /// Scalar bilinear.
    ScalarMass,
    /// Cubic or quartic scalar interaction.
    ScalarPotential,
    /// Anything else.
    Other,
}

/// A term that passed every check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedTerm {
    /// The term as submitted.
    pub term: InteractionTerm,
    /// Total mass dimension.
    #[serde(with = "rational::serde_str")]
    pub mass_dimension: Rational,
    /// Classification.
    pub kind: TermKind,
}

/// Validates terms against a registry snapshot. Holds no mutable state.
#[derive(Debug, Clone)]
pub struct Validator<'a> {
    registry: &'a FieldRegistry,
    opts: ValidatorOpts,
}

impl<'a> Validator<'a> {
    /// Creates a validator over `registry`.
    pub fn new(registry: &'a FieldRegistry, opts: ValidatorOpts) -> Self {
        Self { registry, opts }
    }

    /// Options in use.
    pub fn opts(&self) -> &ValidatorOpts {
        &self.opts
    }

    /// Runs every check on `term`.
    pub fn validate(&self, term: &InteractionTerm) -> Result<ValidatedTerm, ModelError> {
        let particles = self.resolve(term)?;
        self.check_gauge(term, &particles)?;
        self.check_lorentz(term, &particles)?;
        let mass_dimension = self.check_dimension(term, &particles)?;
        self.check_charges(term, &particles)?;
        Ok(ValidatedTerm {
            kind: classify(term, &particles, mass_dimension),
            term: term.clone(),
            mass_dimension,
        })
    }

    fn resolve(&self, term: &InteractionTerm) -> Result<Vec<&'a Particle>, ModelError> {
        term.participants
            .iter()
            .map(|participant| {
                self.registry
                    .lookup(&participant.particle)
                    .map_err(|err| match err {
                        ModelError::UndefinedReference(info) => ModelError::UndefinedReference(
                            info.with_context("participants", term.participant_list()),
                        ),
                        other => other,
                    })
            })
            .collect()
    }

    fn check_gauge(&self, term: &InteractionTerm, particles: &[&Particle]) -> Result<(), ModelError> {
        for group in self.registry.groups() {
            if group.family.is_abelian() {
                continue;
            }
            let irreps: Vec<Irrep> = term
                .participants
                .iter()
                .zip(particles)
                .map(|(participant, particle)| {
                    participant
                        .irrep(particle, &group.id)
                        .unwrap_or_else(|| Irrep::singlet(group.family))
                })
                .collect();
            if !self.registry.algebra().contains_singlet(&group.id, &irreps)? {
                let listed: Vec<String> = irreps.iter().map(Irrep::to_string).collect();
                return Err(ModelError::GaugeInvarianceViolation(
                    ErrorInfo::new(
                        "no-singlet",
                        format!("'{}' contains no singlet of {}", term.participant_list(), group.id),
                    )
                    .with_context("group", group.id.as_str())
                    .with_context("participants", term.participant_list())
                    .with_context("computed", listed.join(" x "))
                    .with_context("required", "singlet"),
                ));
            }
        }
        Ok(())
    }

    fn check_lorentz(&self, term: &InteractionTerm, particles: &[&Particle]) -> Result<(), ModelError> {
        let (mut left, mut right, mut majorana, mut vectors) = (0u32, 0u32, 0u32, 0u32);
        let mut derivatives = 0u32;
        for (participant, particle) in term.participants.iter().zip(particles) {
            derivatives += participant.role.derivatives;
            // Conjugation flips the chirality a field enters the bilinear with.
            let conjugate = participant.role.conjugate;
            match (particle.spin, particle.chirality) {
                (Spin::Fermion, Some(Chirality::Left)) if conjugate => right += 1,
                (Spin::Fermion, Some(Chirality::Left)) => left += 1,
                (Spin::Fermion, Some(Chirality::Right)) if conjugate => left += 1,
                (Spin::Fermion, Some(Chirality::Right)) => right += 1,
                (Spin::Fermion, _) => majorana += 1,
                (Spin::Vector, _) => vectors += 1,
                (Spin::Scalar, _) => {}
            }
        }
        let message = if term.participants.is_empty() {
            "an empty term has no Lorentz structure"
        } else if (left + right + majorana) % 2 == 1 {
            "an odd number of fermions cannot be contracted"
        } else if !contraction_exists(left, right, majorana, vectors + derivatives) {
            "vector indices are left uncontracted"
        } else {
            return Ok(());
        };
        Err(ModelError::LorentzStructureMismatch(
            ErrorInfo::new("lorentz", message)
                .with_context("participants", term.participant_list())
                .with_context(
                    "computed",
                    format!("L={left} R={right} M={majorana} vector={}", vectors + derivatives),
                ),
        ))
    }

    fn check_dimension(
        &self,
        term: &InteractionTerm,
        particles: &[&Particle],
    ) -> Result<Rational, ModelError> {
        let total = checked_sum(
            term.participants
                .iter()
                .zip(particles)
                .map(|(participant, particle)| participant.mass_dimension(particle)),
        )?;
        let bound = Rational::from_integer(RENORMALIZABLE_DIMENSION);
        if total > bound && term.suppression.is_none() {
            return Err(ModelError::NonRenormalizableTerm(
                ErrorInfo::new(
                    "dimension",
                    format!("'{}' has mass dimension {}", term.participant_list(), format_rational(&total)),
                )
                .with_context("participants", term.participant_list())
                .with_context("computed", format_rational(&total))
                .with_context("required", format!("<= {RENORMALIZABLE_DIMENSION}"))
                .with_hint("attach a suppression scale to accept an effective operator"),
            ));
        }
        Ok(total)
    }

    fn check_charges(&self, term: &InteractionTerm, particles: &[&Particle]) -> Result<(), ModelError> {
        let signed = |acc: Rational, conjugate: bool, value: Rational| {
            if conjugate {
                checked_sub(acc, value)
            } else {
                checked_add(acc, value)
            }
        };
        for group in self.registry.groups() {
            if !group.family.is_abelian() {
                continue;
            }
            let total = term.participants.iter().zip(particles).try_fold(
                Rational::from_integer(0),
                |acc, (participant, particle)| {
                    let charge = particle
                        .irrep(&group.id)
                        .and_then(Irrep::as_charge)
                        .unwrap_or_else(|| Rational::from_integer(0));
                    signed(acc, participant.role.conjugate, charge)
                },
            )?;
            if *total.numer() != 0 {
                return Err(charge_error(term, "group", group.id.as_str(), total));
            }
        }
        if self.opts.enforce_global_numbers {
            let names: BTreeSet<&str> = particles
                .iter()
                .flat_map(|particle| particle.quantum_numbers.keys().map(String::as_str))
                .collect();
            for name in names {
                let total = term.participants.iter().zip(particles).try_fold(
                    Rational::from_integer(0),
                    |acc, (participant, particle)| {
                        signed(acc, participant.role.conjugate, particle.quantum_number(name))
                    },
                )?;
                if *total.numer() != 0 {
                    return Err(charge_error(term, "quantum_number", name, total));
                }
            }
        }
        Ok(())
    }
}

fn charge_error(term: &InteractionTerm, key: &str, name: &str, total: Rational) -> ModelError {
    ModelError::ChargeNotConserved(
        ErrorInfo::new(
            "charge-sum",
            format!(
                "charges of '{}' under {name} sum to {}",
                term.participant_list(),
                format_rational(&total)
            ),
        )
        .with_context(key, name)
        .with_context("participants", term.participant_list())
        .with_context("computed", format_rational(&total))
        .with_context("required", "0"),
    )
}

/// Searches fermion pairings for one leaving an even number of vector indices.
///
/// `left` and `right` count fermions by the chirality they carry after
/// conjugation. Two fermions of the same effective chirality (`ψ_L ψ_L`,
/// `ψ̄_L ψ_R`) form a Lorentz scalar, mixed pairs (`ψ̄_L ψ_L`) a vector
/// current; pairs involving a Majorana fermion are scalars. `vector_indices`
/// counts vector fields plus derivatives.
fn contraction_exists(left: u32, right: u32, majorana: u32, vector_indices: u32) -> bool {
    for with_left in 0..=majorana.min(left) {
        for with_right in 0..=(majorana - with_left).min(right) {
            if (majorana - with_left - with_right) % 2 == 1 {
                continue;
            }
            let (l, r) = (left - with_left, right - with_right);
            for mixed in 0..=l.min(r) {
                if (l - mixed) % 2 == 1 || (r - mixed) % 2 == 1 {
                    continue;
                }
                if (mixed + vector_indices) % 2 == 0 {
                    return true;
                }
            }
        }
    }
    false
}

fn classify(term: &InteractionTerm, particles: &[&Particle], dimension: Rational) -> TermKind {
    if dimension > Rational::from_integer(RENORMALIZABLE_DIMENSION) {
        return TermKind::Effective;
    }
    if term.participants.iter().any(|p| p.role.derivatives > 0) {
        return TermKind::Kinetic;
    }
    let count = |spin: Spin| particles.iter().filter(|p| p.spin == spin).count();
    let (scalars, fermions, vectors) = (count(Spin::Scalar), count(Spin::Fermion), count(Spin::Vector));
    match (fermions, scalars, vectors) {
        (_, _, v) if v > 0 => TermKind::Gauge,
        (2, 1, 0) => TermKind::Yukawa,
        (2, 0, 0) => TermKind::FermionMass,
        (0, 2, 0) => TermKind::ScalarMass,
        (0, 3..=4, 0) => TermKind::ScalarPotential,
        _ => TermKind::Other,
    }
}

/// Validates one term with a fresh [`Validator`].
pub fn validate(
    registry: &FieldRegistry,
    term: &InteractionTerm,
    opts: &ValidatorOpts,
) -> Result<ValidatedTerm, ModelError> {
    Validator::new(registry, opts.clone()).validate(term)
}
