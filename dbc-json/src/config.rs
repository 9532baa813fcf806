//! Converter configuration types
//!
//! This module defines the run configuration consumed by the converter: the
//! dataset version, the bus label, the capability flags copied onto every
//! message record and the frame orientation flags.

use crate::types::{ConverterError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default dataset version written to the header
pub const DEFAULT_VERSION: &str = "0.0";

/// Default bus label written to every message record
pub const DEFAULT_BUS: &str = "hs";

/// Extension an input database must carry
pub const DBC_EXTENSION: &str = "dbc";

/// Configuration for one conversion run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertConfig {
    /// Dataset version written to the header `version` key
    #[serde(default = "default_version")]
    pub version: String,

    /// Bus label (e.g. "hs", "ls")
    #[serde(default = "default_bus")]
    pub bus: String,

    /// Signals are writable
    #[serde(default)]
    pub writable: bool,

    /// Messages use J1939
    #[serde(default)]
    pub j1939: bool,

    /// Messages use CAN-FD
    #[serde(default)]
    pub fd: bool,

    /// Bit positions are reversed
    #[serde(default)]
    pub reversed: bool,

    /// Byte positions are big endian
    #[serde(default)]
    pub big_endian: bool,

    /// Byte positions are little endian
    #[serde(default)]
    pub little_endian: bool,
}

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

fn default_bus() -> String {
    DEFAULT_BUS.to_string()
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            bus: default_bus(),
            writable: false,
            j1939: false,
            fd: false,
            reversed: false,
            big_endian: false,
            little_endian: false,
        }
    }
}

/// Frame orientation requested for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Orientation {
    pub byte_frame_is_big_endian: bool,
    pub bit_position_reversed: bool,
}

impl ConvertConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the dataset version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Builder method: set the bus label
    pub fn with_bus(mut self, bus: impl Into<String>) -> Self {
        self.bus = bus.into();
        self
    }

    /// Builder method: mark signals writable
    pub fn with_writable(mut self, enabled: bool) -> Self {
        self.writable = enabled;
        self
    }

    /// Builder method: mark messages as J1939
    pub fn with_j1939(mut self, enabled: bool) -> Self {
        self.j1939 = enabled;
        self
    }

    /// Builder method: mark messages as CAN-FD
    pub fn with_fd(mut self, enabled: bool) -> Self {
        self.fd = enabled;
        self
    }

    /// Builder method: reverse bit positions
    pub fn with_reversed(mut self, enabled: bool) -> Self {
        self.reversed = enabled;
        self
    }

    /// Builder method: big endian byte frames
    pub fn with_big_endian(mut self, enabled: bool) -> Self {
        self.big_endian = enabled;
        self
    }

    /// Builder method: little endian byte frames
    pub fn with_little_endian(mut self, enabled: bool) -> Self {
        self.little_endian = enabled;
        self
    }

    /// Check the configuration for conflicting flags
    pub fn validate(&self) -> Result<()> {
        if self.big_endian && self.little_endian {
            return Err(ConverterError::ConfigError(
                "Little and big endian flag can't be used together".to_string(),
            ));
        }
        Ok(())
    }

    /// Orientation block to emit, if any orientation flag is set
    pub fn orientation(&self) -> Option<Orientation> {
        if self.reversed || self.big_endian || self.little_endian {
            Some(Orientation {
                byte_frame_is_big_endian: self.big_endian,
                bit_position_reversed: self.reversed,
            })
        } else {
            None
        }
    }
}

/// Check that an input path names a DBC database
pub fn validate_input_path(path: &Path) -> Result<()> {
    let is_dbc = path
        .to_str()
        .map(|p| p.ends_with(&format!(".{}", DBC_EXTENSION)))
        .unwrap_or(false);

    if !is_dbc {
        return Err(ConverterError::ConfigError(format!(
            "Wrong input file type (must be .{}): {:?}",
            DBC_EXTENSION, path
        )));
    }
    Ok(())
}
