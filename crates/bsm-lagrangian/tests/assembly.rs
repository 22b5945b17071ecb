mod common;

use bsm_core::{ErrorKind, Rational};
use bsm_group::{GaugeGroup, GroupFamily};
use bsm_lagrangian::{EngineConfig, Model};
use bsm_model::{Particle, SuppressionScale};
use bsm_terms::TermKind;
use common::{electroweak_model, term};

#[test]
fn assembling_nothing_is_an_empty_model() {
    let mut model = Model::new(EngineConfig::default()).expect("config");
    model
        .declare_group(GaugeGroup::new("U1X", GroupFamily::Abelian))
        .expect("group");
    let err = model.assemble().expect_err("no terms");
    assert_eq!(err.kind(), ErrorKind::EmptyModel);
    assert!(!model.registry().is_frozen());
}

#[test]
fn deeper_enumeration_keeps_the_renormalizability_bound() {
    let config = EngineConfig {
        max_dimension: Rational::from_integer(5),
        ..EngineConfig::default()
    };
    let mut model = electroweak_model(config);
    model.declare(Particle::scalar("S")).expect("singlet");
    assert_eq!(model.config().enumerate_opts().max_dimension, Rational::from_integer(5));

    let quintic = model.validate(&term("c5", "S S S S S")).expect_err("dimension five");
    assert_eq!(quintic.kind(), ErrorKind::NonRenormalizableTerm);
    assert_eq!(quintic.info().context.get("computed").map(String::as_str), Some("5"));
    assert_eq!(quintic.info().context.get("required").map(String::as_str), Some("<= 4"));

    let weinberg = term("c5", "LL LL H H");
    let err = model.validate(&weinberg).expect_err("unsuppressed");
    assert_eq!(err.kind(), ErrorKind::NonRenormalizableTerm);
    let accepted = model
        .validate(&weinberg.with_suppression(SuppressionScale {
            symbol: "Lambda".into(),
            value: None,
        }))
        .expect("suppressed");
    assert_eq!(accepted.kind, TermKind::Effective);
}

#[test]
fn terms_are_deduplicated_and_ordered_by_dimension() {
    let mut model = electroweak_model(EngineConfig::default());
    model.accept(&term("ye", "LL~ eR H")).expect("yukawa");
    model.accept(&term("mu2", "H H~")).expect("mass");
    model.accept(&term("mu2b", "H~ H")).expect("permuted mass");
    model.accept(&term("lam", "H~ H H~ H")).expect("quartic");
    let lagrangian = model.assemble().expect("assemble");

    let couplings: Vec<&str> = lagrangian
        .terms()
        .iter()
        .map(|entry| entry.term.coupling.as_str())
        .collect();
    assert_eq!(couplings, vec!["mu2", "lam", "ye"]);
    let kinds: Vec<TermKind> = lagrangian.terms().iter().map(|entry| entry.kind).collect();
    assert_eq!(
        kinds,
        vec![TermKind::ScalarMass, TermKind::ScalarPotential, TermKind::Yukawa]
    );
}

#[test]
fn identical_bosons_carry_symmetry_factors() {
    let mut model = electroweak_model(EngineConfig::default());
    model.declare(Particle::scalar("S").self_conjugate()).expect("S");
    model.accept(&term("mS", "S S")).expect("singlet mass");
    model.accept(&term("lam", "H H H~ H~")).expect("quartic");
    model.accept(&term("ye", "LL~ eR H")).expect("yukawa");
    model.accept(&term("kin", "LL~ LL'")).expect("kinetic");
    let lagrangian = model.assemble().expect("assemble");

    let factor = |coupling: &str| {
        lagrangian
            .terms()
            .iter()
            .find(|entry| entry.term.coupling == coupling)
            .map(|entry| entry.symmetry_factor)
            .expect(coupling)
    };
    assert_eq!(factor("mS"), Rational::new(1, 2));
    assert_eq!(factor("lam"), Rational::new(1, 4));
    assert_eq!(factor("ye"), Rational::from_integer(1));
    assert_eq!(factor("kin"), Rational::from_integer(1));
}

#[test]
fn vev_mass_terms_are_folded_in() {
    let mut model = electroweak_model(EngineConfig::default());
    model.accept(&term("ye", "LL~ eR H")).expect("yukawa");
    assert_eq!(model.mass_terms().len(), 1);
    let lagrangian = model.assemble().expect("assemble");
    let mass = &lagrangian.mass_terms()[0];
    assert_eq!(mass.first.to_string(), "LL~");
    assert_eq!(mass.second.to_string(), "eR");
    assert_eq!(mass.coefficient.to_string(), "sqrt2^-1*v*ye");
}

#[test]
fn assembly_freezes_the_model() {
    let mut model = electroweak_model(EngineConfig::default());
    model.accept(&term("mu2", "H H~")).expect("mass");
    model.assemble().expect("assemble");
    assert!(model.registry().is_frozen());
    assert!(model.lagrangian().is_some());

    let declared = model.declare(Particle::scalar("S")).expect_err("frozen");
    assert_eq!(declared.kind(), ErrorKind::RegistryFrozen);
    let accepted = model.accept(&term("lam", "H H H~ H~")).expect_err("frozen");
    assert_eq!(accepted.kind(), ErrorKind::RegistryFrozen);
    let again = model.assemble().expect_err("assembled twice");
    assert_eq!(again.kind(), ErrorKind::RegistryFrozen);
}

#[test]
fn batch_acceptance_keeps_only_valid_terms() {
    let config = EngineConfig {
        threads: 3,
        ..EngineConfig::default()
    };
    let mut model = electroweak_model(config);
    let results = model
        .accept_batch(&[term("ye", "LL~ eR H"), term("bad", "LL eR"), term("mu2", "H H~")])
        .expect("pool");
    let outcome: Vec<bool> = results.iter().map(Result::is_ok).collect();
    assert_eq!(outcome, vec![true, false, true]);
    let couplings: Vec<&str> = model
        .accepted()
        .iter()
        .map(|v| v.term.coupling.as_str())
        .collect();
    assert_eq!(couplings, vec!["ye", "mu2"]);
}

#[test]
fn anomalous_models_can_be_refused() {
    let config = EngineConfig {
        require_anomaly_free: true,
        ..EngineConfig::default()
    };
    let mut model = electroweak_model(config);
    model.accept(&term("ye", "LL~ eR H")).expect("yukawa");
    let err = model.assemble().expect_err("leptons alone are anomalous");
    assert_eq!(err.kind(), ErrorKind::GaugeInvarianceViolation);
    assert_eq!(err.code(), "gauge-anomaly");
    assert!(!model.registry().is_frozen());
}

#[test]
fn enumerated_candidates_feed_the_facade() {
    let model = electroweak_model(EngineConfig::default());
    let accepted: Vec<String> = model
        .enumerate()
        .filter_map(|candidate| candidate.ok())
        .filter_map(|candidate| model.validate(&candidate).ok())
        .map(|validated| validated.term.to_string())
        .collect();
    assert_eq!(
        accepted,
        vec!["c1 H H~", "c6 H H H~ H~", "c7 H LL~ eR + h.c."]
    );
}
