#![allow(dead_code)]

use bsm_core::{ParticleId, Rational};
use bsm_group::{GaugeGroup, GroupFamily, Irrep};
use bsm_model::{Chirality, FieldRegistry, Particle};

pub fn half(num: i64) -> Rational {
    Rational::new(num, 2)
}

/// SU(2)_L x U(1)_Y with one lepton family and the Higgs doublet.
pub fn electroweak() -> FieldRegistry {
    let mut registry = FieldRegistry::new();
    registry
        .declare_group(
            GaugeGroup::new("SU2L", GroupFamily::SpecialUnitary { n: 2 })
                .with_coupling("gw")
                .with_boson("W"),
        )
        .expect("SU2L");
    registry
        .declare_group(
            GaugeGroup::new("U1Y", GroupFamily::Abelian)
                .with_charge_label("Y")
                .with_coupling("g1")
                .with_boson("B"),
        )
        .expect("U1Y");
    registry
        .declare(
            Particle::fermion("LL", Chirality::Left)
                .with_rep("SU2L", Irrep::fundamental(2))
                .with_charge("U1Y", half(-1))
                .with_quantum_number("LeptonNumber", Rational::from_integer(1)),
        )
        .expect("LL");
    registry
        .declare(
            Particle::fermion("eR", Chirality::Right)
                .with_charge("U1Y", Rational::from_integer(-1))
                .with_quantum_number("LeptonNumber", Rational::from_integer(1)),
        )
        .expect("eR");
    registry
        .declare(
            Particle::scalar("H")
                .with_rep("SU2L", Irrep::fundamental(2))
                .with_charge("U1Y", half(1)),
        )
        .expect("H");
    registry
}

pub fn id(name: &str) -> ParticleId {
    ParticleId::new(name)
}
