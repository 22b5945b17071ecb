//! Canonical JSON encoding with recursively sorted object keys, plus YAML reading.

use std::collections::BTreeMap;

use ::serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::errors::{ErrorInfo, ModelError};

fn serde_error(code: &str, err: impl ToString) -> ModelError {
    ModelError::Serde(ErrorInfo::new(code, err.to_string()))
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let ordered: BTreeMap<String, Value> = map
                .into_iter()
                .map(|(key, val)| (key, canonicalize(val)))
                .collect();
            Value::Object(ordered.into_iter().collect::<Map<String, Value>>())
        }
        Value::Array(values) => Value::Array(values.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

/// Serializes a value into canonical JSON bytes with deterministic key ordering.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, ModelError> {
    let value = serde_json::to_value(value).map_err(|err| serde_error("json-encode", err))?;
    let mut bytes = Vec::new();
    serde_json::to_writer(&mut bytes, &canonicalize(value))
        .map_err(|err| serde_error("json-write", err))?;
    Ok(bytes)
}

/// Pretty-printed canonical JSON, used for human facing output.
pub fn to_canonical_json_pretty<T: Serialize>(value: &T) -> Result<String, ModelError> {
    let value = serde_json::to_value(value).map_err(|err| serde_error("json-encode", err))?;
    serde_json::to_string_pretty(&canonicalize(value)).map_err(|err| serde_error("json-write", err))
}

/// Restores a value from JSON bytes.
pub fn from_json_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, ModelError> {
    serde_json::from_slice(data).map_err(|err| serde_error("json-read", err))
}

/// Restores a value from a YAML document.
pub fn from_yaml_str<T: DeserializeOwned>(text: &str) -> Result<T, ModelError> {
    serde_yaml::from_str(text).map_err(|err| serde_error("yaml-read", err))
}
