//! Message and signal projection
//!
//! Turns database definitions into output records. The running signal index
//! and the accumulated message records live in a [`Projection`] value that is
//! passed through each step, so every step can be exercised on its own.

use crate::config::ConvertConfig;
use crate::schema::{
    extract_enums, infer_value_type, max_frequency, MessageIdentity, MessageRecord,
    SignalRecord, CHANNEL_ID, NO_UNIT,
};
use crate::signals::{Database, MessageDefinition, SignalDefinition};

/// Accumulator threaded through the projection of a database
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    /// Index the next projected signal receives
    next_signal_index: u32,
    /// Message records produced so far, in source order
    items: Vec<MessageRecord>,
}

impl Projection {
    /// Start a projection; the first signal gets index 1
    pub fn new() -> Self {
        Self {
            next_signal_index: 1,
            items: Vec::new(),
        }
    }

    /// Project one message and append its record
    pub fn project_message(self, message: &MessageDefinition, config: &ConvertConfig) -> Self {
        let frequency = max_frequency(message.cycle_time_ms);
        let (signals, next_signal_index) =
            project_signals(&message.signals, self.next_signal_index, frequency);

        log::debug!(
            "Projected message {} (0x{:X}) with {} signals",
            message.name,
            message.id,
            signals.len()
        );

        let identity = MessageIdentity {
            can_id: message.id,
            channel_id: CHANNEL_ID,
            name: message.name.clone(),
            bus: config.bus.clone(),
            length: message.size,
            is_fd: config.fd,
            is_j1939: config.j1939,
            is_writable: config.writable,
            is_extended: message.is_extended,
        };

        let mut items = self.items;
        items.push(MessageRecord::new(
            identity,
            config.orientation(),
            frequency,
            signals,
        ));

        Self {
            next_signal_index,
            items,
        }
    }

    /// Index the next projected signal would receive
    pub fn next_signal_index(&self) -> u32 {
        self.next_signal_index
    }

    /// Message records produced so far
    pub fn items(&self) -> &[MessageRecord] {
        &self.items
    }

    pub fn into_items(self) -> Vec<MessageRecord> {
        self.items
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::new()
    }
}

/// Project every message of a database, in source order
pub fn project_messages(database: &Database, config: &ConvertConfig) -> Vec<MessageRecord> {
    database
        .messages()
        .iter()
        .fold(Projection::new(), |projection, message| {
            projection.project_message(message, config)
        })
        .into_items()
}

/// Project the signals of one message
///
/// Returns the records and the index following the last one assigned.
pub fn project_signals(
    signals: &[SignalDefinition],
    first_index: u32,
    frequency: f64,
) -> (Vec<SignalRecord>, u32) {
    let mut next_index = first_index;
    let records = signals
        .iter()
        .map(|signal| {
            let record = project_signal(signal, next_index, frequency);
            next_index += 1;
            record
        })
        .collect();
    (records, next_index)
}

/// Project one signal
pub fn project_signal(signal: &SignalDefinition, index: u32, frequency: f64) -> SignalRecord {
    SignalRecord {
        name: signal.name.clone(),
        index,
        start_bit: signal.start_bit,
        length: signal.length,
        factor: signal.factor,
        offset: signal.offset,
        byte_order: signal.byte_order,
        max_frequency: frequency,
        unit: signal
            .unit
            .clone()
            .unwrap_or_else(|| NO_UNIT.to_string()),
        min: signal.min.unwrap_or(0.0),
        max: signal.max.unwrap_or(0.0),
        multiplexer: signal.is_multiplexer,
        multiplexer_ids: signal.multiplexer_ids.clone(),
        value_type: infer_value_type(
            Some(signal.factor),
            Some(signal.offset),
            signal.min,
            signal.max,
        ),
        enums: extract_enums(signal.value_table.as_ref()),
    }
}
