#![allow(dead_code)]

use bsm_core::Rational;
use bsm_group::{GaugeGroup, GroupFamily, Irrep};
use bsm_model::{Chirality, FieldRegistry, InteractionTerm, Participant, Particle};

pub fn q(num: i64, den: i64) -> Rational {
    Rational::new(num, den)
}

pub fn term(coupling: &str, participants: &str) -> InteractionTerm {
    let parsed = participants
        .split_whitespace()
        .map(|p| p.parse::<Participant>().expect("participant"))
        .collect();
    InteractionTerm::new(coupling, parsed)
}

/// Single U(1) with `eL`, `eR` and `H` at the given hypercharges.
pub fn hypercharge_only(y_right: Rational, y_higgs: Rational) -> FieldRegistry {
    let mut registry = FieldRegistry::new();
    registry
        .declare_group(GaugeGroup::new("U1_Y", GroupFamily::Abelian))
        .expect("U1_Y");
    registry
        .declare(Particle::fermion("eL", Chirality::Left).with_charge("U1_Y", q(-1, 2)))
        .expect("eL");
    registry
        .declare(Particle::fermion("eR", Chirality::Right).with_charge("U1_Y", y_right))
        .expect("eR");
    registry
        .declare(Particle::scalar("H").with_charge("U1_Y", y_higgs))
        .expect("H");
    registry
}

/// SU(2)_L x U(1)_Y with one lepton family, the Higgs doublet and a Majorana singlet.
pub fn electroweak(with_singlet: bool) -> FieldRegistry {
    let mut registry = FieldRegistry::new();
    registry
        .declare_group(GaugeGroup::new("SU2L", GroupFamily::SpecialUnitary { n: 2 }))
        .expect("SU2L");
    registry
        .declare_group(GaugeGroup::new("U1Y", GroupFamily::Abelian).with_charge_label("Y"))
        .expect("U1Y");
    registry
        .declare(
            Particle::fermion("LL", Chirality::Left)
                .with_rep("SU2L", Irrep::fundamental(2))
                .with_charge("U1Y", q(-1, 2))
                .with_quantum_number("LeptonNumber", q(1, 1)),
        )
        .expect("LL");
    registry
        .declare(
            Particle::fermion("eR", Chirality::Right)
                .with_charge("U1Y", q(-1, 1))
                .with_quantum_number("LeptonNumber", q(1, 1)),
        )
        .expect("eR");
    registry
        .declare(
            Particle::scalar("H")
                .with_rep("SU2L", Irrep::fundamental(2))
                .with_charge("U1Y", q(1, 2)),
        )
        .expect("H");
    if with_singlet {
        registry
            .declare(
                Particle::fermion("N", Chirality::Majorana)
                    .with_quantum_number("LeptonNumber", q(1, 1)),
            )
            .expect("N");
    }
    registry
}

/// One family of the Standard Model, optionally with gauged B-L.
pub fn standard_model(generations: u32, gauged_bl: Option<bool>) -> FieldRegistry {
    let mut registry = FieldRegistry::new();
    registry
        .declare_group(GaugeGroup::new("SU3C", GroupFamily::SpecialUnitary { n: 3 }))
        .expect("SU3C");
    registry
        .declare_group(GaugeGroup::new("SU2L", GroupFamily::SpecialUnitary { n: 2 }))
        .expect("SU2L");
    registry
        .declare_group(GaugeGroup::new("U1Y", GroupFamily::Abelian))
        .expect("U1Y");
    if gauged_bl.is_some() {
        registry
            .declare_group(GaugeGroup::new("U1BL", GroupFamily::Abelian))
            .expect("U1BL");
    }

    let quark = q(1, 3);
    let lepton = q(-1, 1);
    let fields = [
        ("QL", Chirality::Left, Some(Irrep::fundamental(3)), Some(Irrep::fundamental(2)), q(1, 6), quark),
        ("uR", Chirality::Right, Some(Irrep::fundamental(3)), None, q(2, 3), quark),
        ("dR", Chirality::Right, Some(Irrep::fundamental(3)), None, q(-1, 3), quark),
        ("LL", Chirality::Left, None, Some(Irrep::fundamental(2)), q(-1, 2), lepton),
        ("eR", Chirality::Right, None, None, q(-1, 1), lepton),
    ];
    for (name, chirality, colour, isospin, hypercharge, bl) in fields {
        let mut particle = Particle::fermion(name, chirality)
            .with_charge("U1Y", hypercharge)
            .with_generations(generations);
        if let Some(irrep) = colour {
            particle = particle.with_rep("SU3C", irrep);
        }
        if let Some(irrep) = isospin {
            particle = particle.with_rep("SU2L", irrep);
        }
        if gauged_bl.is_some() {
            particle = particle.with_charge("U1BL", bl);
        }
        registry.declare(particle).expect(name);
    }
    if gauged_bl == Some(true) {
        registry
            .declare(
                Particle::fermion("nuR", Chirality::Right)
                    .with_charge("U1BL", lepton)
                    .with_generations(generations),
            )
            .expect("nuR");
    }
    registry
        .declare(
            Particle::scalar("H")
                .with_rep("SU2L", Irrep::fundamental(2))
                .with_charge("U1Y", q(1, 2)),
        )
        .expect("H");
    registry
}
