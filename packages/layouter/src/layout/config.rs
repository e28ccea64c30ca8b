//! JSON layout configuration with dotted-path access.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{LayoutError, Result};

/// A parsed layout file.
///
/// Keys are looked up by dotted path (`axes.show_ticks`). Absent keys are
/// reported as `MissingConfigKey` with the full path, ill-typed ones as
/// `MalformedValue`.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    root: Map<String, Value>,
}

impl LayoutConfig {
    /// Wrap an already-parsed JSON value.
    ///
    /// # Errors
    /// `MalformedValue` if the value is not a JSON object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(LayoutError::MalformedValue(format!(
                "layout must be a JSON object, got {}",
                value_type_name(&other)
            ))),
        }
    }

    /// Parse layout JSON text.
    ///
    /// # Errors
    /// `Json` for invalid JSON, `MalformedValue` for a non-object root.
    pub fn parse(text: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(text)?)
    }

    /// Read and parse a layout file.
    ///
    /// # Errors
    /// `Io` if the file cannot be read, otherwise as [`LayoutConfig::parse`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Look up a value by dotted path.
    ///
    /// # Errors
    /// `MissingConfigKey` naming the full path when any segment is absent,
    /// `MalformedValue` when an intermediate segment is not an object.
    pub fn get(&self, path: &str) -> Result<&Value> {
        let mut segments = path.split('.');
        let first = segments.next().unwrap_or_default();
        let mut current = self
            .root
            .get(first)
            .ok_or_else(|| LayoutError::MissingConfigKey(path.to_string()))?;

        for segment in segments {
            current = match current {
                Value::Object(map) => map
                    .get(segment)
                    .ok_or_else(|| LayoutError::MissingConfigKey(path.to_string()))?,
                other => {
                    return Err(LayoutError::MalformedValue(format!(
                        "'{path}': expected object before '{segment}', got {}",
                        value_type_name(other)
                    )))
                }
            };
        }
        Ok(current)
    }

    /// Look up a boolean.
    ///
    /// # Errors
    /// As [`LayoutConfig::get`], plus `MalformedValue` for a non-boolean.
    pub fn bool(&self, path: &str) -> Result<bool> {
        let value = self.get(path)?;
        value
            .as_bool()
            .ok_or_else(|| type_mismatch(path, "boolean", value))
    }

    /// Look up a string.
    ///
    /// # Errors
    /// As [`LayoutConfig::get`], plus `MalformedValue` for a non-string.
    pub fn str(&self, path: &str) -> Result<&str> {
        let value = self.get(path)?;
        value
            .as_str()
            .ok_or_else(|| type_mismatch(path, "string", value))
    }

    /// Look up an object.
    ///
    /// # Errors
    /// As [`LayoutConfig::get`], plus `MalformedValue` for a non-object.
    pub fn object(&self, path: &str) -> Result<&Map<String, Value>> {
        let value = self.get(path)?;
        value
            .as_object()
            .ok_or_else(|| type_mismatch(path, "object", value))
    }
}

fn type_mismatch(path: &str, expected: &str, actual: &Value) -> LayoutError {
    LayoutError::MalformedValue(format!(
        "'{path}': expected {expected}, got {}",
        value_type_name(actual)
    ))
}

/// Get the type name of a JSON value for error messages.
pub(crate) fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
