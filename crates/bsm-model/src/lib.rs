#![deny(missing_docs)]
#![doc = "Model graph records: particles and multiplets owned by the field registry, interaction terms referencing them by identifier, and the VEV manager."]

mod particle;
mod registry;
mod term;
mod vev;

pub use particle::{Chirality, Particle, Spin};
pub use registry::{FieldRegistry, Multiplet};
pub use term::{InteractionTerm, LorentzRole, Participant, SuppressionScale};
pub use vev::{
    DirectionComponent, MassTerm, Monomial, ResidualCharge, ResidualComponent, Scale,
    TensorComponent, Vev, VevManager, SQRT2,
};
