//! Declarative JSON model files.
//!
//! Loading never stops at the first failure: each declaration, VEV and
//! interaction becomes one entry of a [`ModelReport`].

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use bsm_core::errors::{ErrorInfo, ModelError};
use bsm_core::rational::{parse_rational, Rational};
use bsm_core::ParticleId;
use bsm_group::{resolve_dimension, GaugeGroup, GeneratorRef, GroupFamily, Irrep};
use bsm_model::{
    Chirality, FieldRegistry, InteractionTerm, Participant, Particle, ResidualCharge,
    ResidualComponent, Scale, Spin, SuppressionScale,
};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::model::Model;
use crate::report::ModelReport;

/// Group declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupEntry {
    /// Identifier, e.g. `SU2L`.
    pub id: String,
    /// Family string such as `U1`, `SU_3` or `SU(2)`.
    pub family: String,
    /// Gauge coupling symbol.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupling: Option<String>,
    /// Gauge boson label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boson: Option<String>,
    /// Charge label of an abelian group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charge: Option<String>,
    /// Custom generator labels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generators: Option<Vec<String>>,
}

/// Field kinds accepted in model files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Complex scalar.
    Scalar,
    /// Real scalar.
    Real,
    /// Complex scalar, spelled out.
    Complex,
    /// Fermion; needs a chirality.
    Fermion,
    /// Vector.
    Vector,
}

/// Irrep as written in a model file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RepValue {
    /// Dynkin labels.
    Labels(Vec<u32>),
    /// Integer charge, or dimension for SU(n).
    Integer(i64),
    /// Charge text (`"-1/2"`), name (`fnd`, `antifnd`, `adj`, `singlet`) or
    /// dimension (`"3"`, `"3bar"`).
    Text(String),
}

impl RepValue {
    /// Resolves the value against `family`.
    pub fn to_irrep(&self, family: GroupFamily) -> Result<Irrep, ModelError> {
        let invalid = |message: String| {
            ModelError::InvalidRepresentation(
                ErrorInfo::new("irrep-name", message).with_context("family", family.to_string()),
            )
        };
        match (family, self) {
            (GroupFamily::Abelian, RepValue::Integer(q)) => Ok(Irrep::charge(Rational::from_integer(*q))),
            (GroupFamily::Abelian, RepValue::Text(text)) if text == "singlet" => {
                Ok(Irrep::singlet(family))
            }
            (GroupFamily::Abelian, RepValue::Text(text)) => parse_rational(text)
                .map(Irrep::charge)
                .map_err(|_| invalid(format!("'{text}' is not a U(1) charge"))),
            (GroupFamily::Abelian, RepValue::Labels(_)) => {
                Err(invalid("U(1) charges are numbers, not label lists".to_string()))
            }
            (GroupFamily::SpecialUnitary { .. }, RepValue::Labels(labels)) => {
                Ok(Irrep::Dynkin(labels.clone()))
            }
            (GroupFamily::SpecialUnitary { n }, RepValue::Integer(dim)) => {
                let dim = u64::try_from(*dim)
                    .map_err(|_| invalid(format!("dimension {dim} is negative")))?;
                resolve_dimension(n, dim, false)
            }
            (GroupFamily::SpecialUnitary { n }, RepValue::Text(text)) => {
                let name = text.trim();
                match name {
                    "singlet" | "1" => Ok(Irrep::singlet(family)),
                    "fnd" | "fundamental" => Ok(Irrep::fundamental(n)),
                    "antifnd" | "antifundamental" => Ok(Irrep::antifundamental(n)),
                    "adj" | "adjoint" => Ok(Irrep::adjoint(n)),
                    _ => {
                        let (digits, conjugate) = match name.strip_suffix("bar") {
                            Some(digits) => (digits, true),
                            None => (name, false),
                        };
                        let dim: u64 = digits
                            .parse()
                            .map_err(|_| invalid(format!("'{text}' is not an irrep name")))?;
                        resolve_dimension(n, dim, conjugate)
                    }
                }
            }
        }
    }
}

/// Particle declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticleEntry {
    /// Identifier.
    pub id: String,
    /// Field kind.
    #[serde(rename = "type")]
    pub kind: FieldKind,
    /// Chirality of a fermion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chirality: Option<Chirality>,
    /// Irreps keyed by group identifier; omitted groups are singlets.
    #[serde(default)]
    pub reps: BTreeMap<String, RepValue>,
    /// Flavour copies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generations: Option<u32>,
    /// Marks the field as its own conjugate.
    #[serde(default)]
    pub self_conjugate: bool,
    /// Global quantum numbers, as rational strings.
    #[serde(default)]
    pub quantum_numbers: BTreeMap<String, String>,
}

/// Multiplet declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultipletEntry {
    /// Name.
    pub name: String,
    /// Member particle identifiers.
    pub members: Vec<String>,
}

/// One component of a residual charge: a bare generator or a weighted one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ComponentEntry {
    /// Unit coefficient.
    Generator(GeneratorRef),
    /// Explicit coefficient.
    Weighted(ResidualComponent),
}

/// Residual charge declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidualEntry {
    /// Name, e.g. `Q`.
    pub name: String,
    /// Components.
    pub components: Vec<ComponentEntry>,
}

/// VEV declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VevEntry {
    /// Scalar acquiring the VEV.
    pub particle: String,
    /// Scale symbol.
    pub symbol: String,
    /// Numerical value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Broken generators, `GROUP:LABEL`.
    #[serde(default)]
    pub broken: Vec<GeneratorRef>,
    /// Unbroken combinations of broken diagonal generators.
    #[serde(default)]
    pub residuals: Vec<ResidualEntry>,
}

/// Interaction declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionEntry {
    /// Participants by particle or multiplet name; `~` conjugates, `'` adds a derivative.
    pub participants: Vec<String>,
    /// Coupling symbol.
    pub coupling: String,
    /// Suppression scale of an effective operator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suppression: Option<SuppressionScale>,
    /// Adds `+ h.c.`.
    #[serde(default, alias = "hc")]
    pub hermitian_conjugate: bool,
}

/// A complete declarative model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelFile {
    /// Gauge groups.
    #[serde(default)]
    pub groups: Vec<GroupEntry>,
    /// Particles.
    #[serde(default)]
    pub particles: Vec<ParticleEntry>,
    /// Multiplets.
    #[serde(default)]
    pub multiplets: Vec<MultipletEntry>,
    /// VEVs.
    #[serde(default)]
    pub vevs: Vec<VevEntry>,
    /// Interaction terms.
    #[serde(default)]
    pub interactions: Vec<InteractionEntry>,
}

impl GroupEntry {
    fn to_group(&self) -> Result<GaugeGroup, ModelError> {
        let mut group = GaugeGroup::parse(self.id.as_str(), &self.family)?;
        if let Some(label) = &self.charge {
            group = group.with_charge_label(label.as_str());
        }
        if let Some(labels) = &self.generators {
            group = group.with_generators(labels.clone())?;
        }
        if let Some(coupling) = &self.coupling {
            group = group.with_coupling(coupling.as_str());
        }
        if let Some(boson) = &self.boson {
            group = group.with_boson(boson.as_str());
        }
        Ok(group)
    }
}

impl ParticleEntry {
    fn to_particle(&self, registry: &FieldRegistry) -> Result<Particle, ModelError> {
        let spin = match self.kind {
            FieldKind::Scalar | FieldKind::Real | FieldKind::Complex => Spin::Scalar,
            FieldKind::Fermion => Spin::Fermion,
            FieldKind::Vector => Spin::Vector,
        };
        // The registry enforces the chirality rules and Majorana self-conjugacy.
        let mut particle = Particle::scalar(self.id.as_str());
        particle.spin = spin;
        particle.chirality = self.chirality;
        for (group_id, value) in &self.reps {
            let group = registry.group(&group_id.as_str().into())?;
            let irrep = value.to_irrep(group.family).map_err(|err| match err {
                ModelError::InvalidRepresentation(info) => ModelError::InvalidRepresentation(
                    info.with_context("particle", self.id.as_str())
                        .with_context("group", group_id.as_str()),
                ),
                other => other,
            })?;
            particle = particle.with_rep(group_id.as_str(), irrep);
        }
        if self.self_conjugate || self.kind == FieldKind::Real {
            particle = particle.self_conjugate();
        }
        if let Some(generations) = self.generations {
            particle = particle.with_generations(generations);
        }
        for (name, value) in &self.quantum_numbers {
            particle = particle.with_quantum_number(name.as_str(), parse_rational(value)?);
        }
        Ok(particle)
    }
}

impl VevEntry {
    fn residual_charges(&self) -> Vec<ResidualCharge> {
        self.residuals
            .iter()
            .map(|entry| ResidualCharge {
                name: entry.name.clone(),
                components: entry
                    .components
                    .iter()
                    .map(|component| match component {
                        ComponentEntry::Generator(generator) => ResidualComponent {
                            generator: generator.clone(),
                            coefficient: Rational::from_integer(1),
                        },
                        ComponentEntry::Weighted(weighted) => weighted.clone(),
                    })
                    .collect(),
            })
            .collect()
    }
}

impl InteractionEntry {
    /// Expands multiplet names into one term per member combination.
    fn expand(&self, registry: &FieldRegistry) -> Result<Vec<InteractionTerm>, ModelError> {
        let mut combinations: Vec<Vec<Participant>> = vec![Vec::new()];
        for token in &self.participants {
            let parsed: Participant = token.parse()?;
            let role = parsed.role;
            let members = registry.resolve(parsed.particle.as_str())?;
            combinations = combinations
                .into_iter()
                .flat_map(|prefix| {
                    members.iter().map(move |member| {
                        let mut next = prefix.clone();
                        next.push(Participant::new(member.clone(), role));
                        next
                    })
                })
                .collect();
        }
        Ok(combinations
            .into_iter()
            .map(|participants| {
                let mut term = InteractionTerm::new(self.coupling.as_str(), participants)
                    .with_hermitian_conjugate(self.hermitian_conjugate);
                term.suppression = self.suppression.clone();
                term
            })
            .collect())
    }

    fn label(&self) -> String {
        format!("interaction {}: {}", self.coupling, self.participants.join(" "))
    }
}

impl ModelFile {
    /// Parses a JSON model file.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ModelError> {
        bsm_core::serde::from_json_slice(bytes)
    }

    /// Reads and parses a JSON model file.
    pub fn from_path(path: &Path) -> Result<Self, ModelError> {
        let bytes = fs::read(path).map_err(|err| {
            ModelError::Serde(
                ErrorInfo::new("model-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        Self::from_json_slice(&bytes)
    }

    /// Builds a model, recording one check per declaration, VEV and term.
    ///
    /// Only an invalid `config` aborts; every other failure lands in the report.
    pub fn load(&self, config: EngineConfig) -> Result<(Model, ModelReport), ModelError> {
        let mut model = Model::new(config)?;
        let mut report = ModelReport::default();

        for entry in &self.groups {
            let declared = entry.to_group().and_then(|group| model.declare_group(group));
            report.record(format!("group {}", entry.id), "declare", declared);
        }
        for entry in &self.particles {
            let declared = entry
                .to_particle(model.registry())
                .and_then(|particle| model.declare(particle));
            report.record(format!("particle {}", entry.id), "declare", declared);
        }
        for entry in &self.multiplets {
            let members: Vec<ParticleId> =
                entry.members.iter().map(|m| ParticleId::new(m.as_str())).collect();
            let declared = model.declare_multiplet(entry.name.as_str(), members);
            report.record(format!("multiplet {}", entry.name), "declare", declared);
        }
        for entry in &self.vevs {
            let scale = Scale {
                symbol: entry.symbol.clone(),
                value: entry.value,
            };
            let registered = model
                .register_vev(
                    &ParticleId::new(entry.particle.as_str()),
                    scale,
                    entry.broken.clone(),
                    entry.residual_charges(),
                )
                .map(|_| ());
            report.record(format!("vev {}", entry.particle), "register", registered);
        }
        for entry in &self.interactions {
            let Some(terms) = report.record(entry.label(), "resolve", entry.expand(model.registry()))
            else {
                continue;
            };
            for term in terms {
                let accepted = model.accept(&term).map(|_| ());
                report.record(
                    format!("interaction {}: {}", term.coupling, term.participant_list()),
                    "validate",
                    accepted,
                );
            }
        }
        Ok((model, report))
    }
}
