//! Structured error types shared across the model-building crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`ModelError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (participants, group, computed vs required values).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller amend the model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

/// Fieldless discriminant of [`ModelError`], convenient for matching at call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// A group family outside the supported set.
    UnknownGroupFamily,
    /// A representation that is not a valid irrep of its group.
    InvalidRepresentation,
    /// An identifier declared twice.
    DuplicateDefinition,
    /// Multiplet members with differing assignments.
    InconsistentMultiplet,
    /// A reference to an undeclared group, particle or generator.
    UndefinedReference,
    /// A mutation attempted after assembly.
    RegistryFrozen,
    /// A VEV without a direction invariant under the unbroken generators.
    NoInvariantDirection,
    /// A term without a gauge singlet.
    GaugeInvarianceViolation,
    /// A term whose spin indices cannot be fully contracted.
    LorentzStructureMismatch,
    /// A term above the renormalizable dimension bound.
    NonRenormalizableTerm,
    /// A term whose abelian or global charges do not sum to zero.
    ChargeNotConserved,
    /// An assembly with nothing to assemble.
    EmptyModel,
    /// Encoding or decoding failures.
    Serde,
    /// Invalid engine configuration.
    Config,
}

/// Canonical error type for model construction and validation.
///
/// Every variant is a local, recoverable validation failure. The payload names
/// the offending participants or declarations so callers can amend the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "kind", content = "detail")]
pub enum ModelError {
    /// Unsupported gauge group family.
    #[error("unknown group family: {0}")]
    UnknownGroupFamily(ErrorInfo),
    /// Representation not valid for its group.
    #[error("invalid representation: {0}")]
    InvalidRepresentation(ErrorInfo),
    /// Identifier declared more than once.
    #[error("duplicate definition: {0}")]
    DuplicateDefinition(ErrorInfo),
    /// Multiplet members disagree.
    #[error("inconsistent multiplet: {0}")]
    InconsistentMultiplet(ErrorInfo),
    /// Reference to something that does not exist.
    #[error("undefined reference: {0}")]
    UndefinedReference(ErrorInfo),
    /// Registry is frozen after Lagrangian assembly.
    #[error("registry frozen: {0}")]
    RegistryFrozen(ErrorInfo),
    /// No vacuum direction survives the claimed unbroken subgroup.
    #[error("no invariant direction: {0}")]
    NoInvariantDirection(ErrorInfo),
    /// Term is not a gauge singlet.
    #[error("gauge invariance violation: {0}")]
    GaugeInvarianceViolation(ErrorInfo),
    /// Term does not admit a full Lorentz contraction.
    #[error("lorentz structure mismatch: {0}")]
    LorentzStructureMismatch(ErrorInfo),
    /// Term exceeds the renormalizable dimension bound.
    #[error("non-renormalizable term: {0}")]
    NonRenormalizableTerm(ErrorInfo),
    /// Charges do not sum to zero.
    #[error("charge not conserved: {0}")]
    ChargeNotConserved(ErrorInfo),
    /// Nothing to assemble.
    #[error("empty model: {0}")]
    EmptyModel(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
    /// Engine configuration errors.
    #[error("config error: {0}")]
    Config(ErrorInfo),
}

impl ModelError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            ModelError::UnknownGroupFamily(info)
            | ModelError::InvalidRepresentation(info)
            | ModelError::DuplicateDefinition(info)
            | ModelError::InconsistentMultiplet(info)
            | ModelError::UndefinedReference(info)
            | ModelError::RegistryFrozen(info)
            | ModelError::NoInvariantDirection(info)
            | ModelError::GaugeInvarianceViolation(info)
            | ModelError::LorentzStructureMismatch(info)
            | ModelError::NonRenormalizableTerm(info)
            | ModelError::ChargeNotConserved(info)
            | ModelError::EmptyModel(info)
            | ModelError::Serde(info)
            | ModelError::Config(info) => info,
        }
    }

    /// Returns the fieldless kind of the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ModelError::UnknownGroupFamily(_) => ErrorKind::UnknownGroupFamily,
            ModelError::InvalidRepresentation(_) => ErrorKind::InvalidRepresentation,
            ModelError::DuplicateDefinition(_) => ErrorKind::DuplicateDefinition,
            ModelError::InconsistentMultiplet(_) => ErrorKind::InconsistentMultiplet,
            ModelError::UndefinedReference(_) => ErrorKind::UndefinedReference,
            ModelError::RegistryFrozen(_) => ErrorKind::RegistryFrozen,
            ModelError::NoInvariantDirection(_) => ErrorKind::NoInvariantDirection,
            ModelError::GaugeInvarianceViolation(_) => ErrorKind::GaugeInvarianceViolation,
            ModelError::LorentzStructureMismatch(_) => ErrorKind::LorentzStructureMismatch,
            ModelError::NonRenormalizableTerm(_) => ErrorKind::NonRenormalizableTerm,
            ModelError::ChargeNotConserved(_) => ErrorKind::ChargeNotConserved,
            ModelError::EmptyModel(_) => ErrorKind::EmptyModel,
            ModelError::Serde(_) => ErrorKind::Serde,
            ModelError::Config(_) => ErrorKind::Config,
        }
    }

    /// Returns the stable error code stored in the payload.
    pub fn code(&self) -> &str {
        &self.info().code
    }
}

/// Convenience alias used throughout the workspace.
pub type ModelResult<T> = Result<T, ModelError>;
