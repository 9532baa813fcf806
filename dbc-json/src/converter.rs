//! Main converter API
//!
//! This module provides the primary interface for the library. The
//! [`Converter`] validates the run configuration, projects a database into
//! message records and assembles them with the header into a [`Document`].

use crate::config::{validate_input_path, ConvertConfig};
use crate::header::{dataset_name, Header};
use crate::projector::project_messages;
use crate::schema::{CanData, MessageRecord, SCHEMA_VERSION};
use crate::signals::{dbc, Database, TextEncoding};
use crate::types::{ConverterError, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::io::Write;
use std::path::Path;

/// Indentation of the serialized document
const INDENT: &[u8] = b"    ";

/// The converter - entry point for all conversion operations
pub struct Converter {
    config: ConvertConfig,
    header: Header,
}

impl Converter {
    /// Create a converter using the bundled header template
    ///
    /// Fails if the configuration has conflicting flags.
    ///
    /// # Example
    /// ```no_run
    /// use dbc_json::{ConvertConfig, Converter, TextEncoding};
    /// use std::path::Path;
    ///
    /// let converter = Converter::new(ConvertConfig::new().with_version("1.0")).unwrap();
    /// let document = converter
    ///     .convert_file(Path::new("powertrain.dbc"), TextEncoding::Utf8)
    ///     .unwrap();
    /// document.write_to(std::io::stdout()).unwrap();
    /// ```
    pub fn new(config: ConvertConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            header: Header::from_default_template()?,
        })
    }

    /// Replace the header template
    pub fn with_header(mut self, header: Header) -> Self {
        self.header = header;
        self
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Load a DBC file and convert it
    ///
    /// The dataset name written to the header is the file's base name.
    pub fn convert_file(&self, path: &Path, encoding: TextEncoding) -> Result<Document> {
        validate_input_path(path)?;

        let database = dbc::parse_dbc_file(path, encoding)?;
        self.convert(&dataset_name(path), &database)
    }

    /// Convert an in-memory database
    pub fn convert(&self, dataset_name: &str, database: &Database) -> Result<Document> {
        let stats = database.stats();
        log::info!(
            "Converting {} messages / {} signals (schema v{})",
            stats.num_messages,
            stats.num_signals,
            SCHEMA_VERSION
        );

        let items = project_messages(database, &self.config);
        let header = self
            .header
            .clone()
            .merge(dataset_name, &self.config.version);

        Document::assemble(header, items)
    }
}

/// A fully assembled output document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Map<String, Value>,
}

impl Document {
    /// Attach the message records under `data` in the merged header
    pub fn assemble(header: Header, items: Vec<MessageRecord>) -> Result<Self> {
        let data = serde_json::to_value(CanData::new(items))?;

        let mut root = header.into_map();
        root.insert("data".to_string(), data);
        Ok(Self { root })
    }

    /// Root object of the document
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }

    /// Serialize with four-space indentation and a trailing newline
    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.root.serialize(&mut serializer)?;
        buf.push(b'\n');
        Ok(buf)
    }

    pub fn to_json_string(&self) -> Result<String> {
        String::from_utf8(self.to_json_bytes()?).map_err(|e| {
            ConverterError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }

    /// Write the serialized document to a sink
    ///
    /// The document is serialized fully before the first byte is written.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        let bytes = self.to_json_bytes()?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::{ByteOrder, MessageDefinition, SignalDefinition};

    fn database() -> Database {
        Database::from(vec![MessageDefinition {
            id: 0x100,
            name: "Status".to_string(),
            size: 8,
            is_extended: false,
            cycle_time_ms: Some(100.0),
            signals: vec![SignalDefinition {
                name: "Temp".to_string(),
                start_bit: 0,
                length: 8,
                byte_order: ByteOrder::LittleEndian,
                factor: 1.0,
                offset: 0.0,
                min: Some(0.0),
                max: Some(200.0),
                unit: Some("°C".to_string()),
                is_multiplexer: false,
                multiplexer_ids: Vec::new(),
                value_table: None,
            }],
        }])
    }

    #[test]
    fn test_conflicting_config_rejected() {
        let config = ConvertConfig::new()
            .with_big_endian(true)
            .with_little_endian(true);
        assert!(matches!(
            Converter::new(config),
            Err(ConverterError::ConfigError(_))
        ));
    }

    #[test]
    fn test_document_layout() {
        let converter = Converter::new(ConvertConfig::new().with_version("2.1"))
            .unwrap()
            .with_header(Header::from_json_str(r#"{"author": "me", "name": "x"}"#).unwrap());
        let document = converter.convert("status", &database()).unwrap();

        let keys: Vec<&str> = document.as_map().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["author", "name", "version", "data"]);

        let value = document.into_value();
        assert_eq!(value["name"], "status");
        assert_eq!(value["version"], "2.1");
        assert_eq!(value["data"]["canEncodeMode"], 1);
        let item = &value["data"]["canItems"][0];
        assert_eq!(item["canId"], 256);
        assert_eq!(item["msg_max_frequency"], 10.0);
        assert_eq!(item["signals"][0]["signalIndex"], 1);
        assert_eq!(item["signals"][0]["value_type"], "uint8");
    }

    #[test]
    fn test_serialized_text() {
        let converter = Converter::new(ConvertConfig::new()).unwrap();
        let text = converter
            .convert("status", &database())
            .unwrap()
            .to_json_string()
            .unwrap();

        assert!(text.ends_with("}\n"));
        assert!(!text.ends_with("\n\n"));
        assert!(text.contains("\n    \"data\": {"));
        // Non-ASCII characters are written verbatim
        assert!(text.contains("\"unit\": \"°C\""));
        assert!(text.contains("\"factor\": 1.0"));
    }

    #[test]
    fn test_write_to_sink() {
        let converter = Converter::new(ConvertConfig::new()).unwrap();
        let document = converter.convert("status", &database()).unwrap();

        let mut sink = Vec::new();
        document.write_to(&mut sink).unwrap();
        assert_eq!(sink, document.to_json_bytes().unwrap());
    }

    #[test]
    fn test_convert_file_rejects_wrong_extension() {
        let converter = Converter::new(ConvertConfig::new()).unwrap();
        let err = converter
            .convert_file(Path::new("powertrain.json"), TextEncoding::Utf8)
            .unwrap_err();
        assert!(matches!(err, ConverterError::ConfigError(_)));
    }
}
