//! Gauge group families, generator labelling and generator references.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use bsm_core::errors::{ErrorInfo, ModelError};
use bsm_core::GroupId;
use serde::{Deserialize, Serialize};

fn family_error(text: &str) -> ModelError {
    ModelError::UnknownGroupFamily(
        ErrorInfo::new("unknown-family", format!("group family '{text}' is not supported"))
            .with_context("family", text)
            .with_hint("supported families are U(1) and SU(n) with n >= 2"),
    )
}

/// Closed set of supported gauge group families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GroupFamily {
    /// U(1): irreps are labelled by a rational charge.
    Abelian,
    /// SU(n) with `n >= 2`: irreps are labelled by `n - 1` Dynkin labels.
    SpecialUnitary {
        /// Degree of the group.
        n: u32,
    },
}

impl GroupFamily {
    /// Parses `U1`, `U_1`, `U(1)`, `SU3`, `SU_3`, `SU(3)` and similar spellings.
    pub fn parse(text: &str) -> Result<Self, ModelError> {
        let compact: String = text
            .chars()
            .filter(|c| !matches!(c, '_' | '(' | ')' | ' '))
            .collect::<String>()
            .to_ascii_uppercase();
        if compact == "U1" {
            return Ok(GroupFamily::Abelian);
        }
        match compact.strip_prefix("SU").map(str::parse::<u32>) {
            Some(Ok(n)) if n >= 2 => Ok(GroupFamily::SpecialUnitary { n }),
            _ => Err(family_error(text)),
        }
    }

    /// Returns true for U(1).
    pub fn is_abelian(&self) -> bool {
        matches!(self, GroupFamily::Abelian)
    }

    /// Rank of the group: 1 for U(1), `n - 1` for SU(n).
    pub fn rank(&self) -> usize {
        match self {
            GroupFamily::Abelian => 1,
            GroupFamily::SpecialUnitary { n } => *n as usize - 1,
        }
    }

    /// Number of generators: 1 for U(1), `n² - 1` for SU(n).
    pub fn generator_count(&self) -> usize {
        match self {
            GroupFamily::Abelian => 1,
            GroupFamily::SpecialUnitary { n } => (*n as usize).pow(2) - 1,
        }
    }

    /// Generator kinds in generalised Gell-Mann order.
    pub fn generator_kinds(&self) -> Vec<GeneratorKind> {
        match self {
            GroupFamily::Abelian => vec![GeneratorKind::Charge],
            GroupFamily::SpecialUnitary { n } => {
                let mut kinds = Vec::with_capacity(self.generator_count());
                for j in 2..=*n {
                    for i in 1..j {
                        kinds.push(GeneratorKind::Symmetric { i, j });
                        kinds.push(GeneratorKind::Antisymmetric { i, j });
                    }
                    kinds.push(GeneratorKind::Diagonal { k: j - 1 });
                }
                kinds
            }
        }
    }
}

impl fmt::Display for GroupFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupFamily::Abelian => f.write_str("U1"),
            GroupFamily::SpecialUnitary { n } => write!(f, "SU{n}"),
        }
    }
}

impl FromStr for GroupFamily {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GroupFamily::parse(s)
    }
}

impl TryFrom<String> for GroupFamily {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        GroupFamily::parse(&value)
    }
}

impl From<GroupFamily> for String {
    fn from(value: GroupFamily) -> Self {
        value.to_string()
    }
}

/// Action of a single generator in the defining basis, indices are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeneratorKind {
    /// The U(1) charge operator.
    Charge,
    /// Symmetric off-diagonal generator on the pair `(i, j)`.
    Symmetric {
        /// Lower index.
        i: u32,
        /// Upper index.
        j: u32,
    },
    /// Antisymmetric off-diagonal generator on the pair `(i, j)`.
    Antisymmetric {
        /// Lower index.
        i: u32,
        /// Upper index.
        j: u32,
    },
    /// Cartan generator `H_k`.
    Diagonal {
        /// Cartan index, `1..n`.
        k: u32,
    },
}

impl GeneratorKind {
    /// Diagonal generators commute with each other and have weight eigenvalues.
    pub fn is_diagonal(&self) -> bool {
        matches!(self, GeneratorKind::Charge | GeneratorKind::Diagonal { .. })
    }
}

/// A declared gauge group with its generator labels and writer metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GaugeGroup {
    /// Unique identifier within the model.
    pub id: GroupId,
    /// Immutable family.
    pub family: GroupFamily,
    /// Generator labels in generalised Gell-Mann order.
    pub generators: Vec<String>,
    /// Gauge coupling symbol, e.g. `g1`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupling: Option<String>,
    /// Gauge boson label, e.g. `B`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boson: Option<String>,
    /// Charge label of an abelian group, e.g. `Y`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charge: Option<String>,
}

impl GaugeGroup {
    /// Creates a group with default generator labels.
    pub fn new(id: impl Into<GroupId>, family: GroupFamily) -> Self {
        let generators = match family {
            GroupFamily::Abelian => vec!["Q".to_string()],
            GroupFamily::SpecialUnitary { .. } => (1..=family.generator_count())
                .map(|idx| format!("T{idx}"))
                .collect(),
        };
        Self {
            id: id.into(),
            family,
            generators,
            coupling: None,
            boson: None,
            charge: None,
        }
    }

    /// Parses the family string and creates the group.
    pub fn parse(id: impl Into<GroupId>, family: &str) -> Result<Self, ModelError> {
        Ok(Self::new(id, GroupFamily::parse(family)?))
    }

    /// Replaces the generator labels; the count must match and labels must be unique.
    pub fn with_generators(mut self, labels: Vec<String>) -> Result<Self, ModelError> {
        let unique: BTreeSet<&str> = labels.iter().map(String::as_str).collect();
        if labels.len() != self.family.generator_count() || unique.len() != labels.len() {
            return Err(ModelError::InvalidRepresentation(
                ErrorInfo::new(
                    "generator-labels",
                    "generator labels must be unique and match the group dimension",
                )
                .with_context("group", self.id.as_str())
                .with_context("required", self.family.generator_count().to_string())
                .with_context("computed", labels.len().to_string()),
            ));
        }
        self.generators = labels;
        Ok(self)
    }

    /// Sets the gauge coupling symbol.
    pub fn with_coupling(mut self, coupling: impl Into<String>) -> Self {
        self.coupling = Some(coupling.into());
        self
    }

    /// Sets the gauge boson label.
    pub fn with_boson(mut self, boson: impl Into<String>) -> Self {
        self.boson = Some(boson.into());
        self
    }

    /// Sets the charge label of an abelian group; it also names its generator.
    pub fn with_charge_label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        if self.family.is_abelian() {
            self.generators = vec![label.clone()];
        }
        self.charge = Some(label);
        self
    }

    /// Looks up the action of a generator by label.
    pub fn generator_kind(&self, label: &str) -> Option<GeneratorKind> {
        let position = self.generators.iter().position(|g| g == label)?;
        self.family.generator_kinds().get(position).copied()
    }
}

/// Reference to one generator of one group, written `GROUP:LABEL`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GeneratorRef {
    /// Group the generator belongs to.
    pub group: GroupId,
    /// Generator label within the group.
    pub label: String,
}

impl GeneratorRef {
    /// Creates a generator reference.
    pub fn new(group: impl Into<GroupId>, label: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            label: label.into(),
        }
    }
}

impl fmt::Display for GeneratorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.label)
    }
}

impl FromStr for GeneratorRef {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((group, label)) if !group.trim().is_empty() && !label.trim().is_empty() => {
                Ok(GeneratorRef::new(group.trim(), label.trim()))
            }
            _ => Err(ModelError::UndefinedReference(
                ErrorInfo::new("generator-ref", format!("'{s}' is not of the form GROUP:LABEL"))
                    .with_context("input", s),
            )),
        }
    }
}

impl TryFrom<String> for GeneratorRef {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GeneratorRef> for String {
    fn from(value: GeneratorRef) -> Self {
        value.to_string()
    }
}
