//! Interaction terms: participants with Lorentz roles, couplings and markers.

use std::fmt;
use std::str::FromStr;

use bsm_core::errors::{ErrorInfo, ModelError};
use bsm_core::rational::checked_add;
use bsm_core::{GroupId, ParticleId, Rational};
use bsm_group::Irrep;
use serde::{Deserialize, Serialize};

use crate::particle::Particle;
use crate::registry::FieldRegistry;

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

/// How a field enters a term.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct LorentzRole {
    /// The field enters barred: irreps and charges conjugate. Its chirality
    /// label is kept, so a barred left field pairs with a right one into a scalar.
    #[serde(default, skip_serializing_if = "is_false")]
    pub conjugate: bool,
    /// Number of derivatives acting on the field.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub derivatives: u32,
}

impl LorentzRole {
    /// Unconjugated field without derivatives.
    pub const PLAIN: LorentzRole = LorentzRole {
        conjugate: false,
        derivatives: 0,
    };

    /// Conjugated field without derivatives.
    pub const CONJUGATE: LorentzRole = LorentzRole {
        conjugate: true,
        derivatives: 0,
    };

    /// Same role with `derivatives` derivatives.
    pub fn with_derivatives(mut self, derivatives: u32) -> Self {
        self.derivatives = derivatives;
        self
    }
}

/// One field insertion in a term.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Participant {
    /// Referenced particle.
    pub particle: ParticleId,
    /// Lorentz role of the insertion.
    #[serde(flatten)]
    pub role: LorentzRole,
}

impl Participant {
    /// Creates a participant.
    pub fn new(particle: impl Into<ParticleId>, role: LorentzRole) -> Self {
        Self {
            particle: particle.into(),
            role,
        }
    }

    /// Unconjugated insertion.
    pub fn plain(particle: impl Into<ParticleId>) -> Self {
        Self::new(particle, LorentzRole::PLAIN)
    }

    /// Conjugated insertion.
    pub fn conjugated(particle: impl Into<ParticleId>) -> Self {
        Self::new(particle, LorentzRole::CONJUGATE)
    }

    /// Irrep carried by this insertion under `group`.
    pub fn irrep(&self, particle: &Particle, group: &GroupId) -> Option<Irrep> {
        let irrep = particle.irrep(group)?;
        Some(if self.role.conjugate {
            irrep.conjugate()
        } else {
            irrep.clone()
        })
    }

    /// Mass dimension of the insertion, derivatives included.
    pub fn mass_dimension(&self, particle: &Particle) -> Rational {
        particle.mass_dimension() + Rational::from_integer(self.role.derivatives as i64)
    }

    /// The same insertion with the conjugation flipped.
    pub fn conjugate(&self) -> Participant {
        Participant {
            particle: self.particle.clone(),
            role: LorentzRole {
                conjugate: !self.role.conjugate,
                derivatives: self.role.derivatives,
            },
        }
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.particle.as_str())?;
        if self.role.conjugate {
            f.write_str("~")?;
        }
        for _ in 0..self.role.derivatives {
            f.write_str("'")?;
        }
        Ok(())
    }
}

/// Parses `name`, `name~`, `name'`, `name~'`: `~` conjugates, each `'` adds a derivative.
impl FromStr for Participant {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut name = s.trim();
        let mut role = LorentzRole::PLAIN;
        loop {
            if let Some(rest) = name.strip_suffix('\'') {
                role.derivatives += 1;
                name = rest;
            } else if let Some(rest) = name.strip_suffix('~') {
                if role.conjugate {
                    break;
                }
                role.conjugate = true;
                name = rest;
            } else {
                break;
            }
        }
        if name.is_empty() || name.ends_with('~') {
            return Err(ModelError::UndefinedReference(
                ErrorInfo::new("participant-syntax", format!("cannot read participant '{s}'"))
                    .with_context("input", s),
            ));
        }
        Ok(Participant::new(name, role))
    }
}

/// Marks an operator as an allowed non-renormalizable term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuppressionScale {
    /// Symbol of the cutoff, e.g. `Lambda`.
    pub symbol: String,
    /// Numerical value, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

/// A proposed or accepted interaction term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionTerm {
    /// Field insertions in written order.
    pub participants: Vec<Participant>,
    /// Coupling symbol.
    pub coupling: String,
    /// Suppression scale of a non-renormalizable operator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suppression: Option<SuppressionScale>,
    /// Whether `+ h.c.` accompanies the term.
    #[serde(default, skip_serializing_if = "is_false")]
    pub hermitian_conjugate: bool,
}

impl InteractionTerm {
    /// Creates a renormalizable term without `+ h.c.`.
    pub fn new(coupling: impl Into<String>, participants: Vec<Participant>) -> Self {
        Self {
            participants,
            coupling: coupling.into(),
            suppression: None,
            hermitian_conjugate: false,
        }
    }

    /// Marks the term as a non-renormalizable operator suppressed by `scale`.
    pub fn with_suppression(mut self, scale: SuppressionScale) -> Self {
        self.suppression = Some(scale);
        self
    }

    /// Sets the `+ h.c.` flag.
    pub fn with_hermitian_conjugate(mut self, flag: bool) -> Self {
        self.hermitian_conjugate = flag;
        self
    }

    /// Participants sorted; terms related by permutation share this key.
    pub fn canonical_key(&self) -> Vec<Participant> {
        let mut key = self.participants.clone();
        key.sort();
        key
    }

    /// Sum of participant mass dimensions.
    pub fn mass_dimension(&self, registry: &FieldRegistry) -> Result<Rational, ModelError> {
        self.participants
            .iter()
            .try_fold(Rational::from_integer(0), |acc, participant| {
                let particle = registry.lookup(&participant.particle)?;
                checked_add(acc, participant.mass_dimension(particle))
            })
    }

    /// Space separated participants, used in diagnostics.
    pub fn participant_list(&self) -> String {
        self.participants
            .iter()
            .map(Participant::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for InteractionTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.coupling, self.participant_list())?;
        if let Some(scale) = &self.suppression {
            write!(f, " / {}", scale.symbol)?;
        }
        if self.hermitian_conjugate {
            f.write_str(" + h.c.")?;
        }
        Ok(())
    }
}
