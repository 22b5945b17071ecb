//! Facade owning a registry, its VEVs and the accepted terms.

use bsm_core::errors::{ErrorInfo, ModelError};
use bsm_core::{GroupId, ParticleId};
use bsm_group::{GaugeGroup, GeneratorRef};
use bsm_model::{
    FieldRegistry, InteractionTerm, MassTerm, Particle, ResidualCharge, Scale, Vev, VevManager,
};
use bsm_terms::{
    check_anomalies, validate_batch, AnomalyReport, Candidates, TermEnumerator, ValidatedTerm,
    Validator,
};

use crate::assemble::{assemble, Lagrangian};
use crate::canonical::CanonicalModel;
use crate::config::EngineConfig;

/// A model under construction, and after [`Model::assemble`], a frozen one.
#[derive(Debug, Clone)]
pub struct Model {
    config: EngineConfig,
    registry: FieldRegistry,
    vevs: VevManager,
    accepted: Vec<ValidatedTerm>,
    lagrangian: Option<Lagrangian>,
}

impl Model {
    /// Creates an empty model after checking `config`.
    pub fn new(config: EngineConfig) -> Result<Self, ModelError> {
        config.validate()?;
        Ok(Self {
            config,
            registry: FieldRegistry::new(),
            vevs: VevManager::new(),
            accepted: Vec::new(),
            lagrangian: None,
        })
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Field registry.
    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    /// Registered VEVs.
    pub fn vevs(&self) -> &VevManager {
        &self.vevs
    }

    /// Terms accepted so far, in acceptance order.
    pub fn accepted(&self) -> &[ValidatedTerm] {
        &self.accepted
    }

    /// The assembled Lagrangian, once assembled.
    pub fn lagrangian(&self) -> Option<&Lagrangian> {
        self.lagrangian.as_ref()
    }

    /// Declares a gauge group.
    pub fn declare_group(&mut self, group: GaugeGroup) -> Result<GroupId, ModelError> {
        self.registry.declare_group(group)
    }

    /// Declares a particle.
    pub fn declare(&mut self, particle: Particle) -> Result<ParticleId, ModelError> {
        self.registry.declare(particle)
    }

    /// Declares a multiplet.
    pub fn declare_multiplet(
        &mut self,
        name: impl Into<String>,
        members: Vec<ParticleId>,
    ) -> Result<(), ModelError> {
        self.registry.declare_multiplet(name, members)
    }

    /// Registers a VEV with optional residual charges.
    pub fn register_vev(
        &mut self,
        particle: &ParticleId,
        scale: Scale,
        broken: Vec<GeneratorRef>,
        residuals: Vec<ResidualCharge>,
    ) -> Result<&Vev, ModelError> {
        self.vevs
            .register_vev_with_residuals(&self.registry, particle, scale, broken, residuals)
    }

    /// Lazy candidate stream under the configured limits.
    pub fn enumerate(&self) -> Candidates<'_> {
        TermEnumerator::new(&self.registry, self.config.enumerate_opts()).candidates()
    }

    /// Validates without accepting.
    pub fn validate(&self, term: &InteractionTerm) -> Result<ValidatedTerm, ModelError> {
        Validator::new(&self.registry, self.config.validator_opts()).validate(term)
    }

    fn ensure_open(&self) -> Result<(), ModelError> {
        if self.registry.is_frozen() {
            return Err(ModelError::RegistryFrozen(
                ErrorInfo::new("frozen", "cannot accept terms after assembly")
                    .with_hint("build a new model to add terms"),
            ));
        }
        Ok(())
    }

    /// Validates `term` and keeps it for assembly.
    pub fn accept(&mut self, term: &InteractionTerm) -> Result<&ValidatedTerm, ModelError> {
        self.ensure_open()?;
        let validated = self.validate(term)?;
        self.accepted.push(validated);
        let last = self.accepted.len() - 1;
        Ok(&self.accepted[last])
    }

    /// Validates `terms` on the configured worker count and keeps the valid ones.
    ///
    /// Returns one result per input term, in input order.
    pub fn accept_batch(
        &mut self,
        terms: &[InteractionTerm],
    ) -> Result<Vec<Result<(), ModelError>>, ModelError> {
        self.ensure_open()?;
        let results = validate_batch(
            &self.registry,
            terms,
            &self.config.validator_opts(),
            self.config.threads,
        )?;
        Ok(results
            .into_iter()
            .map(|result| result.map(|validated| self.accepted.push(validated)))
            .collect())
    }

    /// Anomaly report over the declared fermions.
    pub fn anomalies(&self) -> Result<AnomalyReport, ModelError> {
        check_anomalies(&self.registry)
    }

    /// Mass terms the current VEVs induce from the accepted terms.
    pub fn mass_terms(&self) -> Vec<MassTerm> {
        let terms: Vec<InteractionTerm> = self.accepted.iter().map(|v| v.term.clone()).collect();
        self.vevs.mass_contributions(&terms)
    }

    /// Assembles the Lagrangian and freezes the model.
    pub fn assemble(&mut self) -> Result<&Lagrangian, ModelError> {
        if self.config.require_anomaly_free {
            let report = self.anomalies()?;
            if !report.is_anomaly_free() {
                return Err(ModelError::GaugeInvarianceViolation(
                    ErrorInfo::new("gauge-anomaly", "gauge anomalies do not cancel")
                        .with_context("computed", report.summary())
                        .with_context("required", "0")
                        .with_hint("add fermions that cancel the listed anomalies"),
                ));
            }
        }
        let lagrangian = assemble(&mut self.registry, self.accepted.clone(), &self.vevs)?;
        Ok(self.lagrangian.insert(lagrangian))
    }

    /// Canonical snapshot of the assembled model.
    pub fn canonical(&self) -> Result<CanonicalModel, ModelError> {
        let Some(lagrangian) = &self.lagrangian else {
            return Err(ModelError::EmptyModel(
                ErrorInfo::new("not-assembled", "the model has not been assembled")
                    .with_hint("call assemble before exporting"),
            ));
        };
        CanonicalModel::capture(
            &self.registry,
            &self.vevs,
            lagrangian,
            &self.config.validator_opts(),
        )
    }
}
