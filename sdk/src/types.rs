//! Capability argument types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Named arguments for a single capability invocation.
///
/// Arguments arrive as a JSON object chosen by the model. The `*_or`
/// accessors never fail: a missing or differently-typed value falls back
/// to the caller-supplied default, so a capability can honor its
/// never-raise contract without inspecting the payload first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CapabilityArgs {
    values: HashMap<String, serde_json::Value>,
}

impl CapabilityArgs {
    /// Create an empty argument set
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse arguments from a JSON string.
    ///
    /// Accepts a JSON object or `null` (treated as no arguments). Any
    /// other payload is rejected so the registry can report it as text.
    pub fn from_json(raw: &str) -> Result<Self, ArgError> {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| ArgError::InvalidPayload(e.to_string()))?;
        match value {
            serde_json::Value::Null => Ok(Self::new()),
            serde_json::Value::Object(map) => Ok(Self {
                values: map.into_iter().collect(),
            }),
            other => Err(ArgError::InvalidPayload(format!(
                "expected a JSON object, got {other}"
            ))),
        }
    }

    /// Add an argument
    pub fn with(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    /// Get a raw argument value
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.values.get(key)
    }

    /// Get a required string argument
    pub fn str(&self, key: &str) -> Result<String, ArgError> {
        match self.values.get(key) {
            None => Err(ArgError::Missing(key.to_string())),
            Some(serde_json::Value::String(s)) => Ok(s.clone()),
            Some(_) => Err(ArgError::WrongKind {
                name: key.to_string(),
                expected: "string",
            }),
        }
    }

    /// Get a required integer argument
    pub fn i64(&self, key: &str) -> Result<i64, ArgError> {
        match self.values.get(key) {
            None => Err(ArgError::Missing(key.to_string())),
            Some(v) => v.as_i64().ok_or_else(|| ArgError::WrongKind {
                name: key.to_string(),
                expected: "integer",
            }),
        }
    }

    /// Get a required boolean argument
    pub fn bool(&self, key: &str) -> Result<bool, ArgError> {
        match self.values.get(key) {
            None => Err(ArgError::Missing(key.to_string())),
            Some(v) => v.as_bool().ok_or_else(|| ArgError::WrongKind {
                name: key.to_string(),
                expected: "boolean",
            }),
        }
    }

    /// Get a string argument, falling back to `default`.
    ///
    /// Numbers and booleans are rendered to text rather than rejected.
    pub fn str_or(&self, key: &str, default: &str) -> String {
        match self.values.get(key) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Number(n)) => n.to_string(),
            Some(serde_json::Value::Bool(b)) => b.to_string(),
            _ => default.to_string(),
        }
    }

    /// Get an integer argument, falling back to `default`
    pub fn i64_or(&self, key: &str, default: i64) -> i64 {
        self.values
            .get(key)
            .and_then(|v| v.as_i64())
            .unwrap_or(default)
    }

    /// Get a boolean argument, falling back to `default`
    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        self.values
            .get(key)
            .and_then(|v| v.as_bool())
            .unwrap_or(default)
    }

    /// Number of arguments supplied
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if no arguments were supplied
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Argument-level errors
#[derive(Debug, thiserror::Error)]
pub enum ArgError {
    #[error("Missing argument: {0}")]
    Missing(String),

    #[error("Argument '{name}' is not a {expected}")]
    WrongKind { name: String, expected: &'static str },

    #[error("Invalid arguments payload: {0}")]
    InvalidPayload(String),
}
