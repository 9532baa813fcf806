//! In-memory CAN database
//!
//! The structured model the converter consumes. It is produced by the DBC
//! loader (or built directly by callers) and is never mutated by the
//! conversion pipeline.

use serde::{Deserialize, Serialize};

/// A complete CAN message definition
#[derive(Debug, Clone, PartialEq)]
pub struct MessageDefinition {
    /// CAN frame identifier (extended flag bit stripped)
    pub id: u32,
    /// Message name
    pub name: String,
    /// Message size in bytes
    pub size: u64,
    /// True if this is an extended (29-bit) frame
    pub is_extended: bool,
    /// Nominal transmission period in milliseconds
    pub cycle_time_ms: Option<f64>,
    /// All signals in this message, in source order
    pub signals: Vec<SignalDefinition>,
}

/// A CAN signal definition
#[derive(Debug, Clone, PartialEq)]
pub struct SignalDefinition {
    /// Signal name
    pub name: String,
    /// Start bit in the CAN frame
    pub start_bit: u64,
    /// Length in bits
    pub length: u64,
    /// Byte order of the signal
    pub byte_order: ByteOrder,
    /// Scale factor to convert raw value to physical value
    pub factor: f64,
    /// Offset to add after scaling
    pub offset: f64,
    /// Minimum physical value
    pub min: Option<f64>,
    /// Maximum physical value
    pub max: Option<f64>,
    /// Engineering unit (e.g., "km/h", "V")
    pub unit: Option<String>,
    /// True if this signal selects the multiplexed signals of its message
    pub is_multiplexer: bool,
    /// Multiplexer values for which this signal is active
    pub multiplexer_ids: Vec<u64>,
    /// Value table for enum-like values
    pub value_table: Option<ValueTable>,
}

/// Byte order of a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ByteOrder {
    /// Little-endian (Intel format)
    LittleEndian,
    /// Big-endian (Motorola format)
    BigEndian,
}

/// Ordered mapping of raw values to labels
///
/// Kept as a list so that the source order and duplicate entries survive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueTable {
    entries: Vec<(i64, String)>,
}

impl ValueTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, keeping insertion order
    pub fn push(&mut self, raw: i64, label: impl Into<String>) {
        self.entries.push((raw, label.into()));
    }

    /// Iterate over `(raw value, label)` pairs in source order
    pub fn iter(&self) -> impl Iterator<Item = (i64, &str)> {
        self.entries.iter().map(|(raw, label)| (*raw, label.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(i64, String)> for ValueTable {
    fn from_iter<T: IntoIterator<Item = (i64, String)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// An ordered set of message definitions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Database {
    messages: Vec<MessageDefinition>,
}

impl Database {
    /// Create a new empty database
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a message definition, keeping source order
    pub fn add_message(&mut self, message: MessageDefinition) {
        self.messages.push(message);
    }

    /// All messages in source order
    pub fn messages(&self) -> &[MessageDefinition] {
        &self.messages
    }

    /// Get database statistics
    pub fn stats(&self) -> DatabaseStats {
        DatabaseStats {
            num_messages: self.messages.len(),
            num_signals: self.messages.iter().map(|msg| msg.signals.len()).sum(),
        }
    }
}

impl From<Vec<MessageDefinition>> for Database {
    fn from(messages: Vec<MessageDefinition>) -> Self {
        Self { messages }
    }
}

/// Database statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatabaseStats {
    /// Total number of message definitions
    pub num_messages: usize,
    /// Total number of signal definitions
    pub num_signals: usize,
}
