//! DBC file loader
//!
//! Parses Vector DBC files with the `can-dbc` crate and converts them into the
//! in-memory [`Database`] consumed by the converter.

use crate::signals::database::{
    ByteOrder, Database, MessageDefinition, SignalDefinition, ValueTable,
};
use crate::types::{ConverterError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Message attribute carrying the cycle time in milliseconds
const CYCLE_TIME_ATTRIBUTE: &str = "GenMsgCycleTime";

/// Flag bit marking an extended frame id in DBC files
const EXTENDED_FRAME_FLAG: u32 = 0x8000_0000;

/// Pseudo message holding signals that belong to no frame
const INDEPENDENT_SIGNALS_ID: u32 = 0xC000_0000;

/// Parser errors echo the unparsed input; keep the message readable
const MAX_ERROR_DETAIL: usize = 240;

/// Text encoding of a DBC file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextEncoding {
    #[default]
    #[serde(rename = "utf-8")]
    Utf8,
    #[serde(rename = "latin-1")]
    Latin1,
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextEncoding::Utf8 => write!(f, "utf-8"),
            TextEncoding::Latin1 => write!(f, "latin-1"),
        }
    }
}

impl FromStr for TextEncoding {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "utf-8" | "utf8" => Ok(TextEncoding::Utf8),
            "latin-1" | "latin1" | "iso-8859-1" => Ok(TextEncoding::Latin1),
            other => Err(format!("unsupported encoding: {}", other)),
        }
    }
}

/// Parse a DBC file into a database
pub fn parse_dbc_file(path: &Path, encoding: TextEncoding) -> Result<Database> {
    log::info!("Parsing DBC file: {:?} ({})", path, encoding);

    let bytes = std::fs::read(path).map_err(|e| {
        ConverterError::DbcParseError(format!("Failed to read file {:?}: {}", path, e))
    })?;

    let database = parse_dbc_bytes(&bytes, encoding).map_err(|e| match e {
        ConverterError::DbcParseError(msg) => {
            ConverterError::DbcParseError(format!("{:?}: {}", path, msg))
        }
        other => other,
    })?;

    log::info!(
        "Parsed {} messages from {:?}",
        database.messages().len(),
        path
    );

    Ok(database)
}

/// Parse DBC content held in memory
pub fn parse_dbc_bytes(bytes: &[u8], encoding: TextEncoding) -> Result<Database> {
    let dbc_content = decode_text(bytes, encoding);

    let dbc = can_dbc::DBC::try_from(dbc_content.as_str()).map_err(|e| {
        let detail: String = format!("{:?}", e).chars().take(MAX_ERROR_DETAIL).collect();
        ConverterError::DbcParseError(format!("Failed to parse DBC content: {}", detail))
    })?;

    let default_cycle_time = dbc
        .attribute_defaults()
        .iter()
        .find(|def| def.attribute_name() == CYCLE_TIME_ATTRIBUTE)
        .and_then(|def| attribute_as_f64(def.attribute_value()));

    let mut database = Database::new();

    for dbc_msg in dbc.messages() {
        if dbc_msg.message_id().0 == INDEPENDENT_SIGNALS_ID {
            log::debug!("Skipping {}", dbc_msg.message_name());
            continue;
        }
        database.add_message(convert_message(&dbc, dbc_msg, default_cycle_time));
    }

    Ok(database)
}

/// Decode raw bytes as text
///
/// UTF-8 input that fails to decode falls back to Latin-1, which maps every
/// byte to a character and never fails.
fn decode_text(bytes: &[u8], encoding: TextEncoding) -> String {
    match encoding {
        TextEncoding::Utf8 => match std::str::from_utf8(bytes) {
            Ok(text) => text.to_string(),
            Err(_) => {
                log::warn!("DBC file is not UTF-8, trying Latin-1 encoding");
                latin1_to_string(bytes)
            }
        },
        TextEncoding::Latin1 => latin1_to_string(bytes),
    }
}

fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Convert a can-dbc message to our MessageDefinition
fn convert_message(
    dbc: &can_dbc::DBC,
    dbc_msg: &can_dbc::Message,
    default_cycle_time: Option<f64>,
) -> MessageDefinition {
    let raw_id = dbc_msg.message_id().0;

    let cycle_time_ms = message_cycle_time(dbc, raw_id)
        .or(default_cycle_time)
        .filter(|ms| *ms > 0.0);

    let signals = dbc_msg
        .signals()
        .iter()
        .map(|dbc_sig| {
            let value_table = dbc
                .value_descriptions_for_signal(can_dbc::MessageId(raw_id), dbc_sig.name())
                .map(|descriptions| {
                    descriptions
                        .iter()
                        .map(|desc| (*desc.a() as i64, desc.b().to_string()))
                        .collect::<ValueTable>()
                });
            let extended_ids = extended_multiplexer_ids(dbc, raw_id, dbc_sig.name());
            convert_signal(dbc_sig, value_table, extended_ids)
        })
        .collect();

    log::debug!(
        "Loaded message {} (0x{:X}), cycle time {:?}",
        dbc_msg.message_name(),
        raw_id & !EXTENDED_FRAME_FLAG,
        cycle_time_ms
    );

    MessageDefinition {
        id: raw_id & !EXTENDED_FRAME_FLAG,
        name: dbc_msg.message_name().to_string(),
        size: *dbc_msg.message_size(),
        is_extended: raw_id & EXTENDED_FRAME_FLAG != 0,
        cycle_time_ms,
        signals,
    }
}

/// Convert a can-dbc signal to our SignalDefinition
///
/// `extended_ids` come from `SG_MUL_VAL_` lines and replace the single `mN`
/// switch value when present.
fn convert_signal(
    dbc_sig: &can_dbc::Signal,
    value_table: Option<ValueTable>,
    extended_ids: Option<Vec<u64>>,
) -> SignalDefinition {
    let byte_order = match *dbc_sig.byte_order() {
        can_dbc::ByteOrder::LittleEndian => ByteOrder::LittleEndian,
        can_dbc::ByteOrder::BigEndian => ByteOrder::BigEndian,
    };

    let (is_multiplexer, multiplexer_ids) = match *dbc_sig.multiplexer_indicator() {
        can_dbc::MultiplexIndicator::Multiplexor => (true, Vec::new()),
        can_dbc::MultiplexIndicator::MultiplexedSignal(switch_value) => {
            (false, vec![switch_value])
        }
        can_dbc::MultiplexIndicator::MultiplexorAndMultiplexedSignal(switch_value) => {
            (true, vec![switch_value])
        }
        can_dbc::MultiplexIndicator::Plain => (false, Vec::new()),
    };
    let multiplexer_ids = extended_ids.unwrap_or(multiplexer_ids);

    // A [0|0] range is how DBC files spell "no range"
    let (min, max) = if *dbc_sig.min() == 0.0 && *dbc_sig.max() == 0.0 {
        (None, None)
    } else {
        (Some(*dbc_sig.min()), Some(*dbc_sig.max()))
    };

    SignalDefinition {
        name: dbc_sig.name().to_string(),
        start_bit: *dbc_sig.start_bit(),
        length: *dbc_sig.signal_size(),
        byte_order,
        factor: *dbc_sig.factor(),
        offset: *dbc_sig.offset(),
        min,
        max,
        unit: if dbc_sig.unit().is_empty() {
            None
        } else {
            Some(dbc_sig.unit().to_string())
        },
        is_multiplexer,
        multiplexer_ids,
        value_table,
    }
}

/// Multiplexer values of a signal listed in `SG_MUL_VAL_` lines
///
/// Every `min-max` range is expanded in file order. `None` when the signal has
/// no such line.
fn extended_multiplexer_ids(dbc: &can_dbc::DBC, raw_id: u32, signal_name: &str) -> Option<Vec<u64>> {
    let mut entries = dbc
        .extended_multiplex()
        .iter()
        .filter(|ext| ext.message_id().0 == raw_id && ext.signal_name() == signal_name)
        .peekable();

    entries.peek()?;

    Some(
        entries
            .flat_map(|ext| ext.mappings().iter())
            .flat_map(|mapping| *mapping.min_value()..=*mapping.max_value())
            .collect(),
    )
}

/// Look up the `GenMsgCycleTime` attribute of one message
fn message_cycle_time(dbc: &can_dbc::DBC, raw_id: u32) -> Option<f64> {
    dbc.attribute_values()
        .iter()
        .filter(|attr| attr.attribute_name() == CYCLE_TIME_ATTRIBUTE)
        .find_map(|attr| match attr.attribute_value() {
            can_dbc::AttributeValuedForObjectType::MessageDefinitionAttributeValue(
                id,
                Some(value),
            ) if id.0 == raw_id => attribute_as_f64(value),
            _ => None,
        })
}

fn attribute_as_f64(value: &can_dbc::AttributeValue) -> Option<f64> {
    match value {
        can_dbc::AttributeValue::AttributeValueU64(v) => Some(*v as f64),
        can_dbc::AttributeValue::AttributeValueI64(v) => Some(*v as f64),
        can_dbc::AttributeValue::AttributeValueF64(v) => Some(*v),
        can_dbc::AttributeValue::AttributeValueCharString(s) => s.trim().parse().ok(),
    }
}
