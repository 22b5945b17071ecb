//! Vacuum expectation values, vacuum direction search and VEV-induced mass terms.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use bsm_core::errors::{ErrorInfo, ModelError};
use bsm_core::rational::{self, checked_add, checked_mul, format_rational, Rational};
use bsm_core::{GroupId, ParticleId};
use bsm_group::{eigenvalue, GeneratorKind, GeneratorRef, Irrep, Tensor, TensorModule};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::particle::Spin;
use crate::registry::FieldRegistry;
use crate::term::{InteractionTerm, Participant};

/// Symbol used for `√2` in VEV-induced coefficients.
pub const SQRT2: &str = "sqrt2";

fn one() -> Rational {
    Rational::from_integer(1)
}

fn no_direction(particle: &ParticleId, message: impl Into<String>) -> ModelError {
    ModelError::NoInvariantDirection(
        ErrorInfo::new("no-invariant-direction", message)
            .with_context("particle", particle.as_str()),
    )
}

fn undefined_generator(generator: &GeneratorRef) -> ModelError {
    ModelError::UndefinedReference(
        ErrorInfo::new(
            "unknown-generator",
            format!("generator '{generator}' is not declared"),
        )
        .with_context("generator", generator.to_string()),
    )
}

/// Symbolic scale of a VEV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    /// Symbol, e.g. `v`.
    pub symbol: String,
    /// Numerical value, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl Scale {
    /// Symbolic scale without a value.
    pub fn symbol(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            value: None,
        }
    }

    /// Scale with a numerical value.
    pub fn valued(symbol: impl Into<String>, value: f64) -> Self {
        Self {
            symbol: symbol.into(),
            value: Some(value),
        }
    }
}

/// One diagonal generator inside a residual charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidualComponent {
    /// Diagonal generator.
    pub generator: GeneratorRef,
    /// Coefficient multiplying the generator.
    #[serde(default = "one", with = "rational::serde_str")]
    pub coefficient: Rational,
}

/// Unbroken combination of diagonal generators, e.g. `Q = T3 + Y`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidualCharge {
    /// Name of the residual charge.
    pub name: String,
    /// Weighted diagonal generators.
    pub components: Vec<ResidualComponent>,
}

impl ResidualCharge {
    /// Residual charge with unit coefficients.
    pub fn sum(name: impl Into<String>, generators: Vec<GeneratorRef>) -> Self {
        Self {
            name: name.into(),
            components: generators
                .into_iter()
                .map(|generator| ResidualComponent {
                    generator,
                    coefficient: one(),
                })
                .collect(),
        }
    }
}

/// One entry of a vacuum direction in the tensor basis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TensorComponent {
    /// Index word, entries in `1..=n`; empty for U(1) and singlets.
    pub indices: Vec<u32>,
    /// Coefficient of the word.
    #[serde(with = "rational::serde_str")]
    pub coefficient: Rational,
}

/// Vacuum direction of the VEV-carrying field under one group.
///
/// The direction is a linear combination of weight states, stored as an
/// explicit tensor whose first component has coefficient `1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionComponent {
    /// Group.
    pub group: GroupId,
    /// Index contents of the weight states in the combination; `[[]]` for U(1).
    pub weights: Vec<Vec<u32>>,
    /// The direction itself.
    pub tensor: Vec<TensorComponent>,
}

impl DirectionComponent {
    fn from_tensor(group: GroupId, n: u32, tensor: &Tensor) -> Self {
        let weights: BTreeSet<Vec<u32>> = tensor.keys().map(|word| content_of(word, n)).collect();
        Self {
            group,
            weights: weights.into_iter().rev().collect(),
            tensor: tensor
                .iter()
                .map(|(word, coefficient)| TensorComponent {
                    indices: word.clone(),
                    coefficient: *coefficient,
                })
                .collect(),
        }
    }

    fn charge(group: GroupId) -> Self {
        Self {
            group,
            weights: vec![Vec::new()],
            tensor: vec![TensorComponent {
                indices: Vec::new(),
                coefficient: one(),
            }],
        }
    }
}

fn content_of(word: &[u32], n: u32) -> Vec<u32> {
    let mut content = vec![0u32; n as usize];
    for &index in word {
        if let Some(slot) = content.get_mut(index as usize - 1) {
            *slot += 1;
        }
    }
    content
}

/// A registered vacuum expectation value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vev {
    /// Scalar acquiring the VEV.
    pub particle: ParticleId,
    /// Scale of the VEV.
    pub scale: Scale,
    /// Generators broken by the VEV.
    pub broken: BTreeSet<GeneratorRef>,
    /// Unbroken combinations of broken diagonal generators.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub residuals: Vec<ResidualCharge>,
    /// Vacuum direction, one component per declared group.
    pub direction: Vec<DirectionComponent>,
}

/// Product of a rational factor and symbols raised to integer powers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Monomial {
    /// Rational prefactor.
    #[serde(with = "rational::serde_str")]
    pub factor: Rational,
    /// Symbol powers, zero powers omitted.
    pub symbols: BTreeMap<String, i32>,
}

impl Monomial {
    /// A bare symbol.
    pub fn symbol(symbol: impl Into<String>) -> Self {
        let mut symbols = BTreeMap::new();
        symbols.insert(symbol.into(), 1);
        Self {
            factor: one(),
            symbols,
        }
    }

    /// Multiplies by `symbol^power`.
    pub fn times_symbol(mut self, symbol: &str, power: i32) -> Self {
        let entry = self.symbols.entry(symbol.to_string()).or_insert(0);
        *entry += power;
        if *entry == 0 {
            self.symbols.remove(symbol);
        }
        self
    }

    /// Multiplies by a rational factor.
    pub fn times(mut self, factor: Rational) -> Self {
        self.factor *= factor;
        self
    }
}

impl fmt::Display for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.factor != one() || self.symbols.is_empty() {
            parts.push(format_rational(&self.factor));
        }
        for (symbol, power) in &self.symbols {
            if *power == 1 {
                parts.push(symbol.clone());
            } else {
                parts.push(format!("{symbol}^{power}"));
            }
        }
        f.write_str(&parts.join("*"))
    }
}

/// Bilinear left over after replacing VEV-carrying fields by their VEVs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MassTerm {
    /// First remaining field.
    pub first: Participant,
    /// Second remaining field.
    pub second: Participant,
    /// Coefficient `coupling · k · Π (scale / √2)`.
    pub coefficient: Monomial,
}

impl MassTerm {
    /// Returns true when `particle` is one of the two fields.
    pub fn involves(&self, particle: &ParticleId) -> bool {
        &self.first.particle == particle || &self.second.particle == particle
    }
}

/// Records VEVs and derives the mass terms they induce.
#[derive(Debug, Clone, Default)]
pub struct VevManager {
    vevs: Vec<Vev>,
}

impl VevManager {
    /// Creates an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a VEV breaking `broken`.
    pub fn register_vev(
        &mut self,
        registry: &FieldRegistry,
        particle: &ParticleId,
        scale: Scale,
        broken: impl IntoIterator<Item = GeneratorRef>,
    ) -> Result<&Vev, ModelError> {
        self.register_vev_with_residuals(registry, particle, scale, broken, Vec::new())
    }

    /// Registers a VEV breaking `broken` while leaving each residual charge unbroken.
    pub fn register_vev_with_residuals(
        &mut self,
        registry: &FieldRegistry,
        particle: &ParticleId,
        scale: Scale,
        broken: impl IntoIterator<Item = GeneratorRef>,
        residuals: Vec<ResidualCharge>,
    ) -> Result<&Vev, ModelError> {
        if registry.is_frozen() {
            return Err(ModelError::RegistryFrozen(
                ErrorInfo::new("frozen", "cannot register a VEV: the registry is frozen")
                    .with_context("particle", particle.as_str()),
            ));
        }
        let field = registry.lookup(particle)?;
        let broken: BTreeSet<GeneratorRef> = broken.into_iter().collect();
        for generator in &broken {
            let group = registry.group(&generator.group)?;
            if group.generator_kind(&generator.label).is_none() {
                return Err(undefined_generator(generator));
            }
        }
        for residual in &residuals {
            for component in &residual.components {
                let group = registry.group(&component.generator.group)?;
                match group.generator_kind(&component.generator.label) {
                    None => return Err(undefined_generator(&component.generator)),
                    Some(kind) if !kind.is_diagonal() => {
                        return Err(ModelError::InvalidRepresentation(
                            ErrorInfo::new(
                                "residual-off-diagonal",
                                format!(
                                    "residual charge '{}' uses off-diagonal generator '{}'",
                                    residual.name, component.generator
                                ),
                            )
                            .with_context("generator", component.generator.to_string()),
                        ));
                    }
                    Some(_) => {}
                }
            }
        }
        if self.vev(particle).is_some() {
            return Err(ModelError::DuplicateDefinition(
                ErrorInfo::new("duplicate-vev", format!("'{particle}' already has a VEV"))
                    .with_context("particle", particle.as_str()),
            ));
        }
        if field.spin != Spin::Scalar {
            return Err(no_direction(
                particle,
                format!("only scalars can acquire a VEV, '{particle}' is a {}", field.spin),
            ));
        }

        let direction = find_direction(registry, particle, &broken, &residuals)?;
        debug!(
            particle = %particle,
            scale = %scale.symbol,
            broken = broken.len(),
            "vev registered"
        );
        self.vevs.push(Vev {
            particle: particle.clone(),
            scale,
            broken,
            residuals,
            direction,
        });
        let last = self.vevs.len() - 1;
        Ok(&self.vevs[last])
    }

    /// Registered VEVs in registration order.
    pub fn vevs(&self) -> &[Vev] {
        &self.vevs
    }

    /// VEV of `particle`, if any.
    pub fn vev(&self, particle: &ParticleId) -> Option<&Vev> {
        self.vevs.iter().find(|vev| &vev.particle == particle)
    }

    /// Groups with at least one broken generator.
    pub fn broken_groups(&self) -> BTreeSet<GroupId> {
        self.vevs
            .iter()
            .flat_map(|vev| vev.broken.iter().map(|g| g.group.clone()))
            .collect()
    }

    /// Particles transforming non-trivially under a broken group, in declaration order.
    pub fn charged_under_broken(&self, registry: &FieldRegistry) -> Vec<ParticleId> {
        let broken = self.broken_groups();
        registry
            .particles()
            .iter()
            .filter(|particle| {
                particle
                    .reps
                    .iter()
                    .any(|rep| broken.contains(&rep.group) && !rep.irrep.is_singlet())
            })
            .map(|particle| particle.id.clone())
            .collect()
    }

    /// Mass terms involving `particle` induced by `terms`.
    pub fn mass_contribution(
        &self,
        particle: &ParticleId,
        terms: &[InteractionTerm],
    ) -> Vec<MassTerm> {
        self.mass_contributions(terms)
            .into_iter()
            .filter(|mass| mass.involves(particle))
            .collect()
    }

    /// Every mass term induced by `terms`, sorted and deduplicated.
    ///
    /// For a term with `n ≥ 3` insertions, every choice of `n − 2` VEV-carrying
    /// insertions without derivatives is replaced by `scale / √2`; the `k`
    /// choices leaving the same bilinear are summed into one coefficient.
    pub fn mass_contributions(&self, terms: &[InteractionTerm]) -> Vec<MassTerm> {
        let mut out = BTreeSet::new();
        for term in terms {
            let n = term.participants.len();
            if n < 3 {
                continue;
            }
            let carriers: Vec<usize> = (0..n)
                .filter(|&idx| {
                    let participant = &term.participants[idx];
                    participant.role.derivatives == 0 && self.vev(&participant.particle).is_some()
                })
                .collect();
            let mut bilinears: BTreeMap<(Participant, Participant), (Vec<String>, i64)> =
                BTreeMap::new();
            for chosen in choose(&carriers, n - 2) {
                let remaining: Vec<&Participant> = (0..n)
                    .filter(|idx| !chosen.contains(idx))
                    .map(|idx| &term.participants[idx])
                    .collect();
                let (a, b) = (remaining[0].clone(), remaining[1].clone());
                let key = if a <= b { (a, b) } else { (b, a) };
                let scales: Vec<String> = chosen
                    .iter()
                    .filter_map(|&idx| self.vev(&term.participants[idx].particle))
                    .map(|vev| vev.scale.symbol.clone())
                    .collect();
                bilinears.entry(key).or_insert((scales, 0)).1 += 1;
            }
            for ((first, second), (scales, ways)) in bilinears {
                let mut coefficient = Monomial::symbol(term.coupling.as_str())
                    .times(Rational::from_integer(ways))
                    .times_symbol(SQRT2, -(scales.len() as i32));
                for symbol in &scales {
                    coefficient = coefficient.times_symbol(symbol, 1);
                }
                out.insert(MassTerm {
                    first,
                    second,
                    coefficient,
                });
            }
        }
        out.into_iter().collect()
    }
}

/// All `k`-element subsets of `items`, in lexicographic order of positions.
fn choose(items: &[usize], k: usize) -> Vec<Vec<usize>> {
    if k == 0 {
        return vec![Vec::new()];
    }
    if items.len() < k {
        return Vec::new();
    }
    let mut subsets = Vec::new();
    for (pos, &head) in items.iter().enumerate() {
        for mut tail in choose(&items[pos + 1..], k - 1) {
            tail.insert(0, head);
            subsets.push(tail);
        }
    }
    subsets
}

/// An invariant direction under one group together with what the residual
/// charges need to know about it.
struct Candidate {
    content: Vec<u32>,
    charge: Rational,
    component: DirectionComponent,
}

struct GroupCandidates {
    group: GroupId,
    candidates: Vec<Candidate>,
}

/// Invariant directions of `particle` under every group, then a combination
/// neutral under every residual charge.
///
/// Under SU(n) the weight basis is split into classes sharing the eigenvalues
/// of the diagonal generators named by the residual charges; each class
/// contributes the first vector of its subspace annihilated by every unbroken
/// generator.
fn find_direction(
    registry: &FieldRegistry,
    particle: &ParticleId,
    broken: &BTreeSet<GeneratorRef>,
    residuals: &[ResidualCharge],
) -> Result<Vec<DirectionComponent>, ModelError> {
    let field = registry.lookup(particle)?;
    let mut per_group = Vec::new();
    for group in registry.groups() {
        let irrep = field
            .irrep(&group.id)
            .cloned()
            .unwrap_or_else(|| Irrep::singlet(group.family));
        let unbroken: Vec<GeneratorKind> = group
            .generators
            .iter()
            .filter(|label| {
                !broken.contains(&GeneratorRef::new(group.id.clone(), label.as_str()))
            })
            .filter_map(|label| group.generator_kind(label))
            .collect();

        let mut candidates = Vec::new();
        if let Some(charge) = irrep.as_charge() {
            if *charge.numer() == 0 || !unbroken.contains(&GeneratorKind::Charge) {
                candidates.push(Candidate {
                    content: Vec::new(),
                    charge,
                    component: DirectionComponent::charge(group.id.clone()),
                });
            }
        } else {
            let diagonals: Vec<GeneratorKind> = residuals
                .iter()
                .flat_map(|residual| &residual.components)
                .filter(|component| component.generator.group == group.id)
                .filter_map(|component| group.generator_kind(&component.generator.label))
                .collect();
            let module = TensorModule::new(&irrep)?;
            let mut classes: Vec<(Vec<Option<Rational>>, Vec<usize>)> = Vec::new();
            for (idx, vector) in module.basis().iter().enumerate() {
                let key: Vec<Option<Rational>> = diagonals
                    .iter()
                    .map(|&kind| eigenvalue(kind, &vector.content, Rational::from_integer(0)))
                    .collect();
                match classes.iter_mut().find(|(existing, _)| *existing == key) {
                    Some((_, members)) => members.push(idx),
                    None => classes.push((key, vec![idx])),
                }
            }
            for (_, members) in &classes {
                let Some(tensor) = module
                    .invariant_subspace(members, &unbroken)?
                    .into_iter()
                    .next()
                else {
                    continue;
                };
                candidates.push(Candidate {
                    content: module.basis()[members[0]].content.clone(),
                    charge: Rational::from_integer(0),
                    component: DirectionComponent::from_tensor(group.id.clone(), module.n(), &tensor),
                });
            }
        }

        if candidates.is_empty() {
            return Err(ModelError::NoInvariantDirection(
                ErrorInfo::new(
                    "no-invariant-direction",
                    format!(
                        "no vector of {irrep} under '{}' is invariant under the unbroken generators",
                        group.id
                    ),
                )
                .with_context("particle", particle.as_str())
                .with_context("group", group.id.as_str())
                .with_context("unbroken", unbroken.len().to_string()),
            ));
        }
        debug!(group = %group.id, candidates = candidates.len(), "invariant directions");
        per_group.push(GroupCandidates {
            group: group.id.clone(),
            candidates,
        });
    }

    let mut chosen = vec![0usize; per_group.len()];
    if search_residuals(registry, &per_group, residuals, 0, &mut chosen)? {
        return Ok(per_group
            .iter()
            .zip(&chosen)
            .map(|(group, &idx)| group.candidates[idx].component.clone())
            .collect());
    }
    let names: Vec<&str> = residuals.iter().map(|r| r.name.as_str()).collect();
    Err(ModelError::NoInvariantDirection(
        ErrorInfo::new(
            "residual-charge",
            format!("no invariant direction of '{particle}' is neutral under every residual charge"),
        )
        .with_context("particle", particle.as_str())
        .with_context("residuals", names.join(", ")),
    ))
}

fn search_residuals(
    registry: &FieldRegistry,
    per_group: &[GroupCandidates],
    residuals: &[ResidualCharge],
    position: usize,
    chosen: &mut [usize],
) -> Result<bool, ModelError> {
    if position == per_group.len() {
        for residual in residuals {
            let mut total = Rational::from_integer(0);
            for component in &residual.components {
                let Some(slot) = per_group
                    .iter()
                    .position(|group| group.group == component.generator.group)
                else {
                    continue;
                };
                let kind = registry
                    .group(&component.generator.group)?
                    .generator_kind(&component.generator.label)
                    .ok_or_else(|| undefined_generator(&component.generator))?;
                let candidate = &per_group[slot].candidates[chosen[slot]];
                if let Some(value) = eigenvalue(kind, &candidate.content, candidate.charge) {
                    total = checked_add(total, checked_mul(value, component.coefficient)?)?;
                }
            }
            if *total.numer() != 0 {
                return Ok(false);
            }
        }
        return Ok(true);
    }
    for idx in 0..per_group[position].candidates.len() {
        chosen[position] = idx;
        if search_residuals(registry, per_group, residuals, position + 1, chosen)? {
            return Ok(true);
        }
    }
    Ok(false)
}
