//! Field registry: the arena owning gauge groups, particles and multiplets.

use std::collections::{BTreeSet, HashMap};

use bsm_core::errors::{ErrorInfo, ModelError};
use bsm_core::{GroupId, ParticleId};
use bsm_group::{GaugeGroup, GroupAlgebra, Irrep, Reality, Representation};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::particle::{Chirality, Particle, Spin};

fn invalid(code: &str, particle: &ParticleId, message: impl Into<String>) -> ModelError {
    ModelError::InvalidRepresentation(
        ErrorInfo::new(code, message).with_context("particle", particle.as_str()),
    )
}

/// Named group of particles sharing one representation tuple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Multiplet {
    /// Multiplet name.
    pub name: String,
    /// Member particles in declaration order.
    pub members: Vec<ParticleId>,
}

/// Owns every declared group, particle and multiplet.
///
/// Particles are stored in declaration order and addressed by identifier.
/// Once frozen, every mutator fails with `RegistryFrozen`.
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    algebra: GroupAlgebra,
    particles: Vec<Particle>,
    index: HashMap<ParticleId, usize>,
    multiplets: Vec<Multiplet>,
    frozen: bool,
}

impl FieldRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_mutable(&self, action: &str) -> Result<(), ModelError> {
        if self.frozen {
            return Err(ModelError::RegistryFrozen(
                ErrorInfo::new("frozen", format!("cannot {action}: the registry is frozen"))
                    .with_hint("build a new model to change fields after assembly"),
            ));
        }
        Ok(())
    }

    /// Declares a gauge group; existing particles become singlets of it.
    pub fn declare_group(&mut self, group: GaugeGroup) -> Result<GroupId, ModelError> {
        self.ensure_mutable("declare a group")?;
        let singlet = Irrep::singlet(group.family);
        let id = self.algebra.declare_group(group)?;
        for particle in &mut self.particles {
            particle
                .reps
                .push(Representation::new(id.clone(), singlet.clone()));
        }
        Ok(id)
    }

    /// Declares a particle after validating its spin data and representations.
    pub fn declare(&mut self, mut particle: Particle) -> Result<ParticleId, ModelError> {
        self.ensure_mutable("declare a particle")?;
        let id = particle.id.clone();
        if self.index.contains_key(&id) {
            return Err(ModelError::DuplicateDefinition(
                ErrorInfo::new("duplicate-particle", format!("particle '{id}' already declared"))
                    .with_context("particle", id.as_str()),
            ));
        }
        match (particle.spin, particle.chirality) {
            (Spin::Fermion, None) => {
                return Err(invalid("chirality", &id, "fermions need a chirality"));
            }
            (Spin::Scalar | Spin::Vector, Some(_)) => {
                return Err(invalid("chirality", &id, "only fermions carry a chirality"));
            }
            _ => {}
        }
        if particle.generations == 0
            || (particle.generations > 1 && particle.spin != Spin::Fermion)
        {
            return Err(ModelError::InvalidRepresentation(
                ErrorInfo::new(
                    "generations",
                    "generations must be at least 1 and only fermions may repeat",
                )
                .with_context("particle", id.as_str())
                .with_context("computed", particle.generations.to_string()),
            ));
        }
        if particle.chirality == Some(Chirality::Majorana) {
            particle.self_conjugate = true;
        }

        let mut assigned: HashMap<GroupId, Irrep> = HashMap::new();
        for rep in &particle.reps {
            let group = self.algebra.group(&rep.group)?;
            if assigned.contains_key(&rep.group) {
                return Err(invalid(
                    "group-assigned-twice",
                    &id,
                    format!("group '{}' is assigned more than once", rep.group),
                ));
            }
            rep.irrep.validate(&rep.group, group.family).map_err(|err| match err {
                ModelError::InvalidRepresentation(info) => {
                    ModelError::InvalidRepresentation(info.with_context("particle", id.as_str()))
                }
                other => other,
            })?;
            assigned.insert(rep.group.clone(), rep.irrep.clone());
        }

        let reps: Vec<Representation> = self
            .algebra
            .groups()
            .iter()
            .map(|group| {
                let irrep = assigned
                    .remove(&group.id)
                    .unwrap_or_else(|| Irrep::singlet(group.family));
                Representation::new(group.id.clone(), irrep)
            })
            .collect();
        if particle.self_conjugate {
            if let Some(rep) = reps.iter().find(|rep| rep.irrep.reality() != Reality::Real) {
                return Err(invalid(
                    "self-conjugate-complex",
                    &id,
                    format!(
                        "self-conjugate field needs real irreps, {} under '{}' is not",
                        rep.irrep, rep.group
                    ),
                ));
            }
        }
        particle.reps = reps;

        self.index.insert(id.clone(), self.particles.len());
        self.particles.push(particle);
        Ok(id)
    }

    /// Declares a multiplet; members must share spin, chirality and representations.
    pub fn declare_multiplet(
        &mut self,
        name: impl Into<String>,
        members: Vec<ParticleId>,
    ) -> Result<(), ModelError> {
        self.ensure_mutable("declare a multiplet")?;
        let name = name.into();
        if self.multiplet(&name).is_some() || self.index.contains_key(name.as_str()) {
            return Err(ModelError::DuplicateDefinition(
                ErrorInfo::new("duplicate-multiplet", format!("name '{name}' already declared"))
                    .with_context("multiplet", name.as_str()),
            ));
        }
        let inconsistent = |message: String| {
            ModelError::InconsistentMultiplet(
                ErrorInfo::new("multiplet-mismatch", message).with_context("multiplet", name.as_str()),
            )
        };
        let Some(first) = members.first() else {
            return Err(inconsistent("a multiplet needs at least one member".to_string()));
        };
        let reference = self.lookup(first)?;
        for member in &members[1..] {
            let particle = self.lookup(member)?;
            if particle.reps != reference.reps {
                return Err(inconsistent(format!(
                    "'{}' and '{}' carry different representations",
                    reference.id, particle.id
                )));
            }
            if particle.spin != reference.spin || particle.chirality != reference.chirality {
                return Err(inconsistent(format!(
                    "'{}' and '{}' differ in spin or chirality",
                    reference.id, particle.id
                )));
            }
        }
        let unique: BTreeSet<&ParticleId> = members.iter().collect();
        if unique.len() != members.len() {
            return Err(inconsistent("a member is listed twice".to_string()));
        }
        self.multiplets.push(Multiplet { name, members });
        Ok(())
    }

    /// Returns the particle with identifier `id`.
    pub fn lookup(&self, id: &ParticleId) -> Result<&Particle, ModelError> {
        self.index
            .get(id)
            .map(|&idx| &self.particles[idx])
            .ok_or_else(|| {
                ModelError::UndefinedReference(
                    ErrorInfo::new("unknown-particle", format!("particle '{id}' is not declared"))
                        .with_context("particle", id.as_str()),
                )
            })
    }

    /// Returns true when `id` is declared.
    pub fn contains(&self, id: &ParticleId) -> bool {
        self.index.contains_key(id)
    }

    /// Particles in declaration order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Multiplets in declaration order.
    pub fn multiplets(&self) -> &[Multiplet] {
        &self.multiplets
    }

    /// Multiplet named `name`.
    pub fn multiplet(&self, name: &str) -> Option<&Multiplet> {
        self.multiplets.iter().find(|m| m.name == name)
    }

    /// Expands a particle identifier or multiplet name into particle identifiers.
    pub fn resolve(&self, name: &str) -> Result<Vec<ParticleId>, ModelError> {
        if let Some(&idx) = self.index.get(name) {
            return Ok(vec![self.particles[idx].id.clone()]);
        }
        if let Some(multiplet) = self.multiplet(name) {
            return Ok(multiplet.members.clone());
        }
        Err(ModelError::UndefinedReference(
            ErrorInfo::new("unknown-name", format!("'{name}' is neither a particle nor a multiplet"))
                .with_context("name", name),
        ))
    }

    /// Group algebra holding the declared groups and the fusion memo.
    pub fn algebra(&self) -> &GroupAlgebra {
        &self.algebra
    }

    /// Declared groups in declaration order.
    pub fn groups(&self) -> &[GaugeGroup] {
        self.algebra.groups()
    }

    /// Group with identifier `id`.
    pub fn group(&self, id: &GroupId) -> Result<&GaugeGroup, ModelError> {
        self.algebra.group(id)
    }

    /// Freezes the registry; this cannot be undone.
    pub fn freeze(&mut self) {
        if !self.frozen {
            info!(
                particles = self.particles.len(),
                groups = self.groups().len(),
                "field registry frozen"
            );
        }
        self.frozen = true;
    }

    /// Returns true after [`FieldRegistry::freeze`].
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}
