//! Canonical, writer-facing snapshot of an assembled model.

use bsm_core::errors::{ErrorInfo, ModelError};
use bsm_core::serde::{from_json_slice, to_canonical_json_bytes};
use bsm_core::{stable_hash_string, SchemaVersion};
use bsm_group::GaugeGroup;
use bsm_model::{FieldRegistry, MassTerm, Multiplet, Particle, Vev, VevManager};
use bsm_terms::{ValidatedTerm, Validator, ValidatorOpts};
use serde::{Deserialize, Serialize};

use crate::assemble::{assemble, Lagrangian, LagrangianTerm};

fn canonical_error(code: &str, message: impl Into<String>) -> ModelError {
    ModelError::Serde(ErrorInfo::new(code, message.into()))
}

/// A gauge group with its breaking status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalGroup {
    /// The declared group.
    #[serde(flatten)]
    pub group: GaugeGroup,
    /// Whether any VEV breaks one of its generators.
    pub broken: bool,
}

/// Ordered groups, particles, multiplets, VEVs, terms and mass terms of a
/// frozen model, with a SHA-256 fingerprint over the canonical JSON payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalModel {
    /// Schema of the payload.
    pub schema: SchemaVersion,
    /// Validation options the terms were accepted under.
    pub validation: ValidatorOpts,
    /// Groups in declaration order.
    pub groups: Vec<CanonicalGroup>,
    /// Particles in declaration order with full representation tuples.
    pub particles: Vec<Particle>,
    /// Multiplets in declaration order.
    pub multiplets: Vec<Multiplet>,
    /// VEVs in registration order.
    pub vevs: Vec<Vev>,
    /// Lagrangian terms with couplings and symmetry factors.
    pub terms: Vec<LagrangianTerm>,
    /// VEV-induced bilinears.
    pub mass_terms: Vec<MassTerm>,
    /// Hash of the payload with this field empty.
    pub fingerprint: String,
}

/// Registry, VEVs and Lagrangian rebuilt from a canonical model.
#[derive(Debug, Clone)]
pub struct Reconstruction {
    /// Frozen registry.
    pub registry: FieldRegistry,
    /// Re-registered VEVs.
    pub vevs: VevManager,
    /// Re-assembled Lagrangian.
    pub lagrangian: Lagrangian,
}

impl CanonicalModel {
    /// Captures a frozen model.
    pub fn capture(
        registry: &FieldRegistry,
        vevs: &VevManager,
        lagrangian: &Lagrangian,
        validation: &ValidatorOpts,
    ) -> Result<Self, ModelError> {
        let broken = vevs.broken_groups();
        let mut model = Self {
            schema: SchemaVersion::CURRENT,
            validation: validation.clone(),
            groups: registry
                .groups()
                .iter()
                .map(|group| CanonicalGroup {
                    broken: broken.contains(&group.id),
                    group: group.clone(),
                })
                .collect(),
            particles: registry.particles().to_vec(),
            multiplets: registry.multiplets().to_vec(),
            vevs: vevs.vevs().to_vec(),
            terms: lagrangian.terms().to_vec(),
            mass_terms: lagrangian.mass_terms().to_vec(),
            fingerprint: String::new(),
        };
        model.fingerprint = model.compute_fingerprint()?;
        Ok(model)
    }

    fn compute_fingerprint(&self) -> Result<String, ModelError> {
        let mut unsigned = self.clone();
        unsigned.fingerprint.clear();
        stable_hash_string(&unsigned)
    }

    /// Canonical JSON bytes.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, ModelError> {
        to_canonical_json_bytes(self)
    }

    /// Parses canonical JSON, checking the schema and the fingerprint.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ModelError> {
        let model: CanonicalModel = from_json_slice(bytes)?;
        if !model.schema.is_readable_by(&SchemaVersion::CURRENT) {
            return Err(ModelError::Serde(
                ErrorInfo::new("schema-version", "unsupported canonical model schema")
                    .with_context("computed", model.schema.to_string())
                    .with_context("required", SchemaVersion::CURRENT.to_string()),
            ));
        }
        let expected = model.compute_fingerprint()?;
        if expected != model.fingerprint {
            return Err(ModelError::Serde(
                ErrorInfo::new("fingerprint-mismatch", "canonical model payload was altered")
                    .with_context("computed", expected)
                    .with_context("required", model.fingerprint.clone()),
            ));
        }
        Ok(model)
    }

    /// Re-declares and re-validates everything, then re-assembles.
    ///
    /// Fails unless the rebuilt terms, symmetry factors and mass terms equal
    /// the captured ones.
    pub fn reconstruct(&self) -> Result<Reconstruction, ModelError> {
        let mut registry = FieldRegistry::new();
        for entry in &self.groups {
            registry.declare_group(entry.group.clone())?;
        }
        for particle in &self.particles {
            registry.declare(particle.clone())?;
        }
        for multiplet in &self.multiplets {
            registry.declare_multiplet(multiplet.name.clone(), multiplet.members.clone())?;
        }

        let mut vevs = VevManager::new();
        for vev in &self.vevs {
            let rebuilt = vevs.register_vev_with_residuals(
                &registry,
                &vev.particle,
                vev.scale.clone(),
                vev.broken.iter().cloned(),
                vev.residuals.clone(),
            )?;
            if rebuilt.direction != vev.direction {
                return Err(canonical_error(
                    "vev-direction",
                    format!("vacuum direction of '{}' changed on reconstruction", vev.particle),
                ));
            }
        }

        let validator = Validator::new(&registry, self.validation.clone());
        let accepted = self
            .terms
            .iter()
            .map(|entry| validator.validate(&entry.term))
            .collect::<Result<Vec<ValidatedTerm>, ModelError>>()?;
        let lagrangian = assemble(&mut registry, accepted, &vevs)?;
        if lagrangian.terms() != self.terms.as_slice()
            || lagrangian.mass_terms() != self.mass_terms.as_slice()
        {
            return Err(canonical_error(
                "reconstruct-mismatch",
                "reassembled terms differ from the captured ones",
            ));
        }
        Ok(Reconstruction {
            registry,
            vevs,
            lagrangian,
        })
    }
}
