// qualis-core/src/domain/params.rs

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;

use crate::domain::error::DomainError;

/// Free-form `parametros` block of a rule, passed verbatim to the analysis handler.
/// Typed accessors fall back to the handler default when the key is absent and
/// fail with `InvalidParameter` when it is present with the wrong shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleParams(BTreeMap<String, Value>);

impl RuleParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn f64_or(&self, key: &str, default: f64) -> Result<f64, DomainError> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(default),
            Some(v) => v.as_f64().ok_or_else(|| invalid(key, "expected a number", v)),
        }
    }

    pub fn usize_or(&self, key: &str, default: usize) -> Result<usize, DomainError> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(default),
            Some(v) => v
                .as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .ok_or_else(|| invalid(key, "expected a non-negative integer", v)),
        }
    }

    pub fn str_or<'a>(&'a self, key: &str, default: &'a str) -> Result<&'a str, DomainError> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(default),
            Some(v) => v.as_str().ok_or_else(|| invalid(key, "expected a string", v)),
        }
    }

    pub fn f64_list_or(&self, key: &str, default: &[f64]) -> Result<Vec<f64>, DomainError> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(default.to_vec()),
            Some(Value::Sequence(items)) => items
                .iter()
                .map(|item| {
                    item.as_f64()
                        .ok_or_else(|| invalid(key, "expected a list of numbers", item))
                })
                .collect(),
            Some(v) => Err(invalid(key, "expected a list of numbers", v)),
        }
    }
}

fn invalid(key: &str, expectation: &str, found: &Value) -> DomainError {
    DomainError::InvalidParameter {
        key: key.to_string(),
        reason: format!("{}, found {:?}", expectation, found),
    }
}
