#![deny(missing_docs)]
#![doc = "Lagrangian assembly, canonical export, engine configuration and model files."]

/// Deduplication, ordering and symmetry factors of accepted terms.
pub mod assemble;
/// Writer-facing canonical snapshot and reconstruction.
pub mod canonical;
/// YAML engine configuration.
pub mod config;
/// Model facade.
pub mod model;
/// Declarative JSON model files.
pub mod model_file;
/// Load checklist.
pub mod report;

pub use assemble::{assemble, symmetry_factor, Lagrangian, LagrangianTerm};
pub use canonical::{CanonicalGroup, CanonicalModel, Reconstruction};
pub use config::EngineConfig;
pub use model::Model;
pub use model_file::{
    ComponentEntry, FieldKind, GroupEntry, InteractionEntry, ModelFile, MultipletEntry,
    ParticleEntry, RepValue, ResidualEntry, VevEntry,
};
pub use report::{CheckEntry, ModelReport};
