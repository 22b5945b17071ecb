#![deny(missing_docs)]
#![doc = "Shared building blocks for the BSM model engine: the error taxonomy, interned identifiers, exact rational charges, canonical JSON and stable hashing."]

pub mod errors;
pub mod hash;
pub mod ids;
pub mod provenance;
pub mod rational;
pub mod serde;

pub use errors::{ErrorInfo, ErrorKind, ModelError, ModelResult};
pub use hash::stable_hash_string;
pub use ids::{GroupId, ParticleId};
pub use provenance::SchemaVersion;
pub use rational::{format_rational, parse_rational, Rational};
