use bsm_core::errors::ModelError;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Outcome of one check performed while loading a model file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckEntry {
    /// Declaration or term the check ran on, e.g. `particle LL`.
    pub item: String,
    /// Stable check name, e.g. `declare` or `validate`.
    pub check: String,
    /// Whether the check passed.
    pub passed: bool,
    /// Failure, when the check did not pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ModelError>,
}

/// Checklist accumulated while loading a model file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelReport {
    /// Entries in execution order.
    pub entries: Vec<CheckEntry>,
}

impl ModelReport {
    /// Records the outcome of `result` and hands back its value on success.
    pub fn record<T>(
        &mut self,
        item: impl Into<String>,
        check: &str,
        result: Result<T, ModelError>,
    ) -> Option<T> {
        let item = item.into();
        match result {
            Ok(value) => {
                self.entries.push(CheckEntry {
                    item,
                    check: check.to_string(),
                    passed: true,
                    error: None,
                });
                Some(value)
            }
            Err(err) => {
                warn!(item = %item, check, error = %err, "check failed");
                self.entries.push(CheckEntry {
                    item,
                    check: check.to_string(),
                    passed: false,
                    error: Some(err),
                });
                None
            }
        }
    }

    /// Number of passing entries.
    pub fn passed(&self) -> usize {
        self.entries.iter().filter(|entry| entry.passed).count()
    }

    /// `passed/total`.
    pub fn score(&self) -> String {
        format!("{}/{}", self.passed(), self.entries.len())
    }

    /// True when every entry passed.
    pub fn passed_all(&self) -> bool {
        self.entries.iter().all(|entry| entry.passed)
    }

    /// Failing entries.
    pub fn failures(&self) -> Vec<&CheckEntry> {
        self.entries.iter().filter(|entry| !entry.passed).collect()
    }
}
