#![allow(dead_code)]

use bsm_core::{ParticleId, Rational};
use bsm_group::{GaugeGroup, GeneratorRef, GroupFamily, Irrep};
use bsm_lagrangian::{EngineConfig, Model};
use bsm_model::{Chirality, InteractionTerm, Participant, Particle, ResidualCharge, Scale};

pub const ELECTROWEAK_JSON: &str = r#"{
  "groups": [
    {"id": "SU2L", "family": "SU(2)", "coupling": "gw", "boson": "W"},
    {"id": "U1Y", "family": "U_1", "charge": "Y", "coupling": "g1", "boson": "B"}
  ],
  "particles": [
    {"id": "LL", "type": "fermion", "chirality": "left",
     "reps": {"SU2L": "fnd", "U1Y": "-1/2"}, "quantum_numbers": {"LeptonNumber": "1"}},
    {"id": "eR", "type": "fermion", "chirality": "right",
     "reps": {"U1Y": -1}, "quantum_numbers": {"LeptonNumber": "1"}},
    {"id": "muR", "type": "fermion", "chirality": "right",
     "reps": {"U1Y": -1}, "quantum_numbers": {"LeptonNumber": "1"}},
    {"id": "H", "type": "complex", "reps": {"SU2L": "2", "U1Y": "1/2"}},
    {"id": "S", "type": "real"},
    {"id": "psi", "type": "fermion"}
  ],
  "multiplets": [{"name": "ER", "members": ["eR", "muR"]}],
  "vevs": [
    {"particle": "H", "symbol": "v", "value": 246.0,
     "broken": ["SU2L:T1", "SU2L:T2", "SU2L:T3", "U1Y:Y"],
     "residuals": [{"name": "Q", "components": ["SU2L:T3", "U1Y:Y"]}]}
  ],
  "interactions": [
    {"participants": ["LL~", "ER", "H"], "coupling": "ye", "hc": true},
    {"participants": ["H", "H~"], "coupling": "mu2"},
    {"participants": ["H", "H", "H~", "H~"], "coupling": "lam"},
    {"participants": ["S", "S"], "coupling": "mS"},
    {"participants": ["LL", "eR"], "coupling": "bad"},
    {"participants": ["X", "H"], "coupling": "oops"}
  ]
}"#;

pub fn term(coupling: &str, participants: &str) -> InteractionTerm {
    let parsed = participants
        .split_whitespace()
        .map(|p| p.parse::<Participant>().expect("participant"))
        .collect();
    InteractionTerm::new(coupling, parsed)
}

pub fn generators(refs: &[&str]) -> Vec<GeneratorRef> {
    refs.iter().map(|r| r.parse().expect("generator")).collect()
}

/// Leptons and the Higgs doublet, declared through the facade, with the Higgs VEV.
pub fn electroweak_model(config: EngineConfig) -> Model {
    let mut model = Model::new(config).expect("config");
    model
        .declare_group(GaugeGroup::new("SU2L", GroupFamily::SpecialUnitary { n: 2 }))
        .expect("SU2L");
    model
        .declare_group(GaugeGroup::new("U1Y", GroupFamily::Abelian).with_charge_label("Y"))
        .expect("U1Y");
    model
        .declare(
            Particle::fermion("LL", Chirality::Left)
                .with_rep("SU2L", Irrep::fundamental(2))
                .with_charge("U1Y", Rational::new(-1, 2)),
        )
        .expect("LL");
    model
        .declare(Particle::fermion("eR", Chirality::Right).with_charge("U1Y", Rational::from_integer(-1)))
        .expect("eR");
    model
        .declare(
            Particle::scalar("H")
                .with_rep("SU2L", Irrep::fundamental(2))
                .with_charge("U1Y", Rational::new(1, 2)),
        )
        .expect("H");
    model
        .register_vev(
            &ParticleId::new("H"),
            Scale::valued("v", 246.0),
            generators(&["SU2L:T1", "SU2L:T2", "SU2L:T3", "U1Y:Y"]),
            vec![ResidualCharge::sum("Q", generators(&["SU2L:T3", "U1Y:Y"]))],
        )
        .expect("vev");
    model
}
