//! CAN database model and DBC loader
//!
//! This module contains the in-memory database consumed by the converter and
//! the DBC parser that produces it.

pub mod dbc;
pub mod database;

// Re-export key types for convenience
pub use database::{
    ByteOrder, Database, DatabaseStats, MessageDefinition, SignalDefinition, ValueTable,
};
pub use dbc::TextEncoding;
