//! Document header
//!
//! The header is a JSON object loaded from a template. Only `name` and
//! `version` are overwritten for each run; every other key passes through in
//! template order.

use crate::types::{ConverterError, Result};
use serde_json::{Map, Value};
use std::path::Path;

/// Template bundled with the crate
pub const DEFAULT_TEMPLATE: &str = include_str!("../assets/header.json");

/// Header object of the output document
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    fields: Map<String, Value>,
}

impl Header {
    /// Header built from the bundled template
    pub fn from_default_template() -> Result<Self> {
        Self::from_json_str(DEFAULT_TEMPLATE)
    }

    /// Header built from a template given as JSON text
    pub fn from_json_str(template: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(template)
            .map_err(|e| ConverterError::HeaderError(e.to_string()))?;

        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(ConverterError::HeaderError(format!(
                "template must be a JSON object, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// Header built from a template file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConverterError::HeaderError(format!("Failed to read {:?}: {}", path, e))
        })?;
        Self::from_json_str(&content)
    }

    /// Overwrite `name` and `version`, keeping every other key
    pub fn merge(mut self, name: &str, version: &str) -> Self {
        self.fields
            .insert("name".to_string(), Value::String(name.to_string()));
        self.fields
            .insert("version".to_string(), Value::String(version.to_string()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }
}

/// Dataset name of an input path: base name without extension
pub fn dataset_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
