//! Output schema
//!
//! Record types of the JSON document. Field declaration order is the key order
//! of the serialized output, so reordering fields changes the document.
//!
//! Only one schema is produced: the nested layout where messages live under
//! `data.canItems` and carry `canId`/`channelId`, and signals carry
//! `signalIndex`. See [`SCHEMA_VERSION`].

pub mod enums;
pub mod value_type;

pub use enums::extract_enums;
pub use value_type::infer_value_type;

use crate::config::Orientation;
use crate::signals::ByteOrder;
use crate::types::ValueType;
use serde::Serialize;

/// Version of the nested `data.canItems` schema emitted by this crate
pub const SCHEMA_VERSION: u32 = 2;

/// Channel identifier written to every message record
pub const CHANNEL_ID: u8 = 1;

/// Encode mode marker written to the `data` object
pub const CAN_ENCODE_MODE: u8 = 1;

/// Unit written when a signal has none
pub const NO_UNIT: &str = "none";

/// One entry of a signal's conversion table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumEntry {
    /// Human readable label
    pub name: String,
    /// Raw value the label stands for
    pub value: i64,
}

/// Output record of one signal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalRecord {
    #[serde(rename = "signalName")]
    pub name: String,
    /// 1-based index, unique across the whole document
    #[serde(rename = "signalIndex")]
    pub index: u32,
    #[serde(rename = "startBit")]
    pub start_bit: u64,
    pub length: u64,
    pub factor: f64,
    pub offset: f64,
    pub byte_order: ByteOrder,
    pub max_frequency: f64,
    pub unit: String,
    /// `0.0` when the database has no minimum
    pub min: f64,
    /// `0.0` when the database has no maximum
    pub max: f64,
    pub multiplexer: bool,
    pub multiplexer_ids: Vec<u64>,
    pub value_type: ValueType,
    pub enums: Vec<EnumEntry>,
}

/// Identifying and transport fields shared by both message record shapes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageIdentity {
    #[serde(rename = "canId")]
    pub can_id: u32,
    #[serde(rename = "channelId")]
    pub channel_id: u8,
    pub name: String,
    pub bus: String,
    pub length: u64,
    pub is_fd: bool,
    pub is_j1939: bool,
    pub is_writable: bool,
    pub is_extended: bool,
}

/// Message record emitted when an orientation flag was given
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrientedMessage {
    #[serde(flatten)]
    pub identity: MessageIdentity,
    pub byte_frame_is_big_endian: bool,
    pub bit_position_reversed: bool,
    pub msg_max_frequency: f64,
    pub signals: Vec<SignalRecord>,
}

/// Message record emitted when no orientation flag was given
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlainMessage {
    #[serde(flatten)]
    pub identity: MessageIdentity,
    pub msg_max_frequency: f64,
    pub signals: Vec<SignalRecord>,
}

/// Output record of one message
///
/// The orientation fields are either both present or both absent; consumers
/// branch on their presence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MessageRecord {
    WithOrientation(OrientedMessage),
    WithoutOrientation(PlainMessage),
}

impl MessageRecord {
    /// Build the record shape matching the requested orientation
    pub fn new(
        identity: MessageIdentity,
        orientation: Option<Orientation>,
        msg_max_frequency: f64,
        signals: Vec<SignalRecord>,
    ) -> Self {
        match orientation {
            Some(orientation) => MessageRecord::WithOrientation(OrientedMessage {
                identity,
                byte_frame_is_big_endian: orientation.byte_frame_is_big_endian,
                bit_position_reversed: orientation.bit_position_reversed,
                msg_max_frequency,
                signals,
            }),
            None => MessageRecord::WithoutOrientation(PlainMessage {
                identity,
                msg_max_frequency,
                signals,
            }),
        }
    }

    pub fn identity(&self) -> &MessageIdentity {
        match self {
            MessageRecord::WithOrientation(msg) => &msg.identity,
            MessageRecord::WithoutOrientation(msg) => &msg.identity,
        }
    }

    pub fn signals(&self) -> &[SignalRecord] {
        match self {
            MessageRecord::WithOrientation(msg) => &msg.signals,
            MessageRecord::WithoutOrientation(msg) => &msg.signals,
        }
    }

    pub fn msg_max_frequency(&self) -> f64 {
        match self {
            MessageRecord::WithOrientation(msg) => msg.msg_max_frequency,
            MessageRecord::WithoutOrientation(msg) => msg.msg_max_frequency,
        }
    }

    pub fn orientation(&self) -> Option<Orientation> {
        match self {
            MessageRecord::WithOrientation(msg) => Some(Orientation {
                byte_frame_is_big_endian: msg.byte_frame_is_big_endian,
                bit_position_reversed: msg.bit_position_reversed,
            }),
            MessageRecord::WithoutOrientation(_) => None,
        }
    }
}

/// The `data` object of the document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanData {
    #[serde(rename = "canEncodeMode")]
    pub can_encode_mode: u8,
    #[serde(rename = "canItems")]
    pub can_items: Vec<MessageRecord>,
}

impl CanData {
    pub fn new(can_items: Vec<MessageRecord>) -> Self {
        Self {
            can_encode_mode: CAN_ENCODE_MODE,
            can_items,
        }
    }
}

/// Transmission frequency in Hz derived from a cycle time in milliseconds
///
/// Absent or non-positive cycle times give `0.0`.
pub fn max_frequency(cycle_time_ms: Option<f64>) -> f64 {
    match cycle_time_ms {
        Some(ms) if ms > 0.0 => 1000.0 / ms,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn identity() -> MessageIdentity {
        MessageIdentity {
            can_id: 0x123,
            channel_id: CHANNEL_ID,
            name: "EngineData".to_string(),
            bus: "hs".to_string(),
            length: 8,
            is_fd: false,
            is_j1939: false,
            is_writable: false,
            is_extended: false,
        }
    }

    fn keys(value: &Value) -> Vec<&str> {
        value.as_object().unwrap().keys().map(String::as_str).collect()
    }

    #[test]
    fn test_max_frequency() {
        assert_eq!(max_frequency(Some(100.0)), 10.0);
        assert_eq!(max_frequency(Some(1000.0)), 1.0);
        assert_eq!(max_frequency(Some(0.0)), 0.0);
        assert_eq!(max_frequency(Some(-5.0)), 0.0);
        assert_eq!(max_frequency(None), 0.0);
    }

    #[test]
    fn test_plain_message_key_order() {
        let record = MessageRecord::new(identity(), None, 10.0, Vec::new());
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(
            keys(&value),
            vec![
                "canId",
                "channelId",
                "name",
                "bus",
                "length",
                "is_fd",
                "is_j1939",
                "is_writable",
                "is_extended",
                "msg_max_frequency",
                "signals",
            ]
        );
        assert_eq!(record.orientation(), None);
    }

    #[test]
    fn test_oriented_message_key_order() {
        let orientation = Orientation {
            byte_frame_is_big_endian: true,
            bit_position_reversed: false,
        };
        let record = MessageRecord::new(identity(), Some(orientation), 0.0, Vec::new());
        let value = serde_json::to_value(&record).unwrap();

        let keys = keys(&value);
        assert_eq!(keys[9], "byte_frame_is_big_endian");
        assert_eq!(keys[10], "bit_position_reversed");
        assert_eq!(keys[11], "msg_max_frequency");
        assert_eq!(value["byte_frame_is_big_endian"], Value::Bool(true));
        assert_eq!(value["bit_position_reversed"], Value::Bool(false));
        assert_eq!(record.orientation(), Some(orientation));
    }

    #[test]
    fn test_can_data_keys() {
        let value = serde_json::to_value(CanData::new(Vec::new())).unwrap();
        assert_eq!(keys(&value), vec!["canEncodeMode", "canItems"]);
        assert_eq!(value["canEncodeMode"], 1);
    }
}
