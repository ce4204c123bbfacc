use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{PlanError, Result};

/// Flat name -> value mapping used for `$variable` substitution and as the
/// fallback source of `interval_s` / `step_s`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Parameters(BTreeMap<String, String>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Load from a JSON file when `source` names an existing file, otherwise parse
    /// `source` itself as inline JSON.
    pub fn load(source: &str) -> Result<Self> {
        let path = Path::new(source);
        if path.is_file() {
            let raw = std::fs::read_to_string(path).map_err(|source| PlanError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            return Self::from_json_str(&raw);
        }
        let value: Value = serde_json::from_str(source).map_err(|err| {
            PlanError::InvalidParameters(format!(
                "{source:?} is neither an existing file nor inline JSON ({err})"
            ))
        })?;
        Self::from_json_value(value)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        Self::from_json_value(serde_json::from_str(raw)?)
    }

    /// Strings are kept verbatim, numbers and booleans use their JSON spelling.
    pub fn from_json_value(value: Value) -> Result<Self> {
        let Value::Object(fields) = value else {
            return Err(PlanError::InvalidParameters(
                "expected a JSON object of name/value pairs".to_string(),
            ));
        };
        let mut parameters = Self::new();
        for (name, value) in fields {
            let text = match value {
                Value::String(text) => text,
                Value::Number(number) => number.to_string(),
                Value::Bool(flag) => flag.to_string(),
                Value::Null | Value::Array(_) | Value::Object(_) => {
                    return Err(PlanError::InvalidParameters(format!(
                        "parameter {name} must be a string, number or boolean"
                    )));
                }
            };
            parameters.insert(name, text);
        }
        Ok(parameters)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}
