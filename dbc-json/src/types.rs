//! Core types for the DBC to JSON converter
//!
//! This module defines the error type shared by every stage of the converter
//! and the semantic value types assigned to signals in the output document.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for converter operations
pub type Result<T> = std::result::Result<T, ConverterError>;

/// Errors that can occur while loading a database or producing the document
#[derive(Debug, thiserror::Error)]
pub enum ConverterError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to parse DBC file: {0}")]
    DbcParseError(String),

    #[error("Invalid header template: {0}")]
    HeaderError(String),

    #[error("Serialization error: {0}")]
    SerializeError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Native value representation of a signal, as consumed by the middleware
///
/// Serialized in lowercase (`"float"`, `"uint8"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Float,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
}

impl ValueType {
    /// Name used in the JSON document
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Float => "float",
            ValueType::Int8 => "int8",
            ValueType::Int16 => "int16",
            ValueType::Int32 => "int32",
            ValueType::Int64 => "int64",
            ValueType::Uint8 => "uint8",
            ValueType::Uint16 => "uint16",
            ValueType::Uint32 => "uint32",
            ValueType::Uint64 => "uint64",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
