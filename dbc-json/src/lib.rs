//! DBC to JSON Converter Library
//!
//! Converts a CAN database (messages and their signals) into the JSON signal
//! description consumed by the AGL low-level CAN service.
//!
//! # Architecture
//!
//! The conversion is a single forward pass over an in-memory [`Database`]:
//! - Each signal gets a native value type inferred from its scaling and range
//! - Value tables become ordered `{name, value}` enumeration lists
//! - Messages and signals are projected into records, with a signal index
//!   running across the whole document
//! - The records are nested under `data.canItems` of a header object built
//!   from a template
//!
//! The DBC loader is a separate step: callers can build a [`Database`]
//! themselves or load one with [`signals::dbc::parse_dbc_file`].
//!
//! # Example Usage
//!
//! ```no_run
//! use dbc_json::{ConvertConfig, Converter, TextEncoding};
//! use std::path::Path;
//!
//! let config = ConvertConfig::new()
//!     .with_version("1.0")
//!     .with_bus("hs")
//!     .with_fd(true);
//!
//! let converter = Converter::new(config).unwrap();
//! let document = converter
//!     .convert_file(Path::new("powertrain.dbc"), TextEncoding::Utf8)
//!     .unwrap();
//!
//! print!("{}", document.to_json_string().unwrap());
//! ```

// Public modules
pub mod config;
pub mod converter;
pub mod header;
pub mod projector;
pub mod schema;
pub mod signals;
pub mod types;

// Re-export main types for convenience
pub use config::{validate_input_path, ConvertConfig, Orientation};
pub use converter::{Converter, Document};
pub use header::Header;
pub use schema::{infer_value_type, extract_enums, MessageRecord, SignalRecord, SCHEMA_VERSION};
pub use signals::{Database, MessageDefinition, SignalDefinition, TextEncoding};
pub use types::{ConverterError, Result, ValueType};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
