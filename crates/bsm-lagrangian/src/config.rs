use std::fs;
use std::path::Path;

use bsm_core::errors::{ErrorInfo, ModelError};
use bsm_core::rational::{self, format_rational, Rational};
use bsm_terms::{EnumerateOpts, ValidatorOpts};
use serde::{Deserialize, Serialize};

/// Deepest enumeration the engine accepts.
const MAX_ENUMERATION_DIMENSION: i64 = 64;

fn config_error(code: &str, message: impl Into<String>) -> ModelError {
    ModelError::Config(ErrorInfo::new(code, message.into()))
}

/// Engine settings shared by enumeration, validation and assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Largest total mass dimension the enumerator proposes.
    ///
    /// Validation always bounds unsuppressed terms at dimension four.
    #[serde(
        default = "EngineConfig::default_max_dimension",
        with = "rational::serde_str"
    )]
    pub max_dimension: Rational,
    /// Longest participant list the enumerator proposes.
    #[serde(default = "EngineConfig::default_max_fields")]
    pub max_fields: usize,
    /// Offer conjugated insertions during enumeration.
    #[serde(default = "EngineConfig::default_true")]
    pub include_conjugates: bool,
    /// Collapse hermitian-conjugate pairs into one `+ h.c.` candidate.
    #[serde(default = "EngineConfig::default_true")]
    pub skip_hermitian_duplicates: bool,
    /// Conserve global quantum numbers during validation.
    #[serde(default = "EngineConfig::default_true")]
    pub enforce_global_numbers: bool,
    /// Workers used for batch validation.
    #[serde(default = "EngineConfig::default_threads")]
    pub threads: usize,
    /// Refuse to assemble a model with uncancelled gauge anomalies.
    #[serde(default)]
    pub require_anomaly_free: bool,
}

impl EngineConfig {
    fn default_max_dimension() -> Rational {
        Rational::from_integer(4)
    }

    const fn default_max_fields() -> usize {
        4
    }

    const fn default_true() -> bool {
        true
    }

    const fn default_threads() -> usize {
        1
    }

    /// Parses a YAML document; omitted keys take their defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self, ModelError> {
        let config: EngineConfig = bsm_core::serde::from_yaml_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a YAML file.
    pub fn from_yaml_path(path: &Path) -> Result<Self, ModelError> {
        let text = fs::read_to_string(path).map_err(|err| {
            ModelError::Config(
                ErrorInfo::new("config-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        Self::from_yaml_str(&text)
    }

    /// Rejects settings under which the engine cannot run.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.max_dimension <= Rational::from_integer(0) {
            return Err(config_error(
                "max-dimension",
                format!(
                    "max_dimension must be positive, got {}",
                    format_rational(&self.max_dimension)
                ),
            ));
        }
        if self.max_dimension > Rational::from_integer(MAX_ENUMERATION_DIMENSION) {
            return Err(config_error(
                "max-dimension",
                format!(
                    "max_dimension must not exceed {MAX_ENUMERATION_DIMENSION}, got {}",
                    format_rational(&self.max_dimension)
                ),
            ));
        }
        if self.max_fields == 0 {
            return Err(config_error("max-fields", "max_fields must be at least 1"));
        }
        if self.threads == 0 {
            return Err(config_error("threads", "threads must be at least 1"));
        }
        Ok(())
    }

    /// Enumeration options derived from this configuration.
    pub fn enumerate_opts(&self) -> EnumerateOpts {
        EnumerateOpts {
            max_dimension: self.max_dimension,
            max_fields: self.max_fields,
            include_conjugates: self.include_conjugates,
            skip_hermitian_duplicates: self.skip_hermitian_duplicates,
        }
    }

    /// Validation options derived from this configuration.
    pub fn validator_opts(&self) -> ValidatorOpts {
        ValidatorOpts {
            enforce_global_numbers: self.enforce_global_numbers,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_dimension: Self::default_max_dimension(),
            max_fields: Self::default_max_fields(),
            include_conjugates: Self::default_true(),
            skip_hermitian_duplicates: Self::default_true(),
            enforce_global_numbers: Self::default_true(),
            threads: Self::default_threads(),
            require_anomaly_free: false,
        }
    }
}
