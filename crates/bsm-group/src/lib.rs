#![deny(missing_docs)]
#![doc = "Gauge group algebra: U(1) and SU(n) families, irreducible representations, Littlewood–Richardson fusion, memoised singlet extraction, weight states, tensor realisations and group invariants."]

mod decompose;
mod family;
mod invariants;
mod irrep;
mod tensor;
mod weights;
mod young;

pub use decompose::{decompose, Decomposition, GroupAlgebra, Summand};
pub use family::{GaugeGroup, GeneratorKind, GeneratorRef, GroupFamily};
pub use invariants::{anomaly_coefficient, dynkin_index, quadratic_casimir, IrrepInvariants};
pub use irrep::{resolve_dimension, Irrep, Reality, Representation};
pub use tensor::{act, Tensor, TensorModule, WeightVector};
pub use weights::{eigenvalue, weight_states};
