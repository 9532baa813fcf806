//! Run configuration file
//!
//! An optional TOML file holding the same settings as the command line.
//! Command line flags override or extend what the file sets.

use anyhow::{Context, Result};
use dbc_json::{ConvertConfig, TextEncoding};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration (loaded from a TOML file)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub conversion: ConvertConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InputConfig {
    /// DBC file to convert
    pub file: Option<PathBuf>,
    #[serde(default)]
    pub encoding: TextEncoding,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Output file (default: stdout)
    pub file: Option<PathBuf>,
    /// Header template replacing the bundled one
    pub header: Option<PathBuf>,
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            [input]
            file = "powertrain.dbc"
            encoding = "latin-1"

            [output]
            file = "powertrain.json"

            [conversion]
            version = "2.0"
            bus = "ls"
            fd = true
            big_endian = true
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.input.file, Some(PathBuf::from("powertrain.dbc")));
        assert_eq!(config.input.encoding, TextEncoding::Latin1);
        assert_eq!(config.output.file, Some(PathBuf::from("powertrain.json")));
        assert_eq!(config.output.header, None);
        assert_eq!(config.conversion.version, "2.0");
        assert_eq!(config.conversion.bus, "ls");
        assert!(config.conversion.fd);
        assert!(config.conversion.big_endian);
        assert!(!config.conversion.little_endian);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.input.file, None);
        assert_eq!(config.input.encoding, TextEncoding::Utf8);
        assert_eq!(config.conversion, ConvertConfig::default());
    }

    #[test]
    fn test_missing_config_file() {
        assert!(load_config(Path::new("/nonexistent/dbc2json.toml")).is_err());
    }
}
