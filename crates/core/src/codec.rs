//! JSON batch decoding for both representations.
//!
//! A batch on the wire is either a single message object or an array of
//! them; decoding always yields a `Vec`.

use crate::error::Result;
use crate::external::ExternalMessage;
use crate::internal::InternalMessage;
use serde_json::Value;
use tracing::debug;

/// Decode external messages from JSON text.
pub fn decode_external(json: &str) -> Result<Vec<ExternalMessage>> {
    let value: Value = serde_json::from_str(json)?;
    let messages = into_items(value)
        .into_iter()
        .map(ExternalMessage::from_value)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    debug!(count = messages.len(), "Decoded external messages");
    Ok(messages)
}

/// Decode internal messages from JSON text.
pub fn decode_internal(json: &str) -> Result<Vec<InternalMessage>> {
    let value: Value = serde_json::from_str(json)?;
    let messages = into_items(value)
        .into_iter()
        .map(serde_json::from_value)
        .collect::<std::result::Result<Vec<InternalMessage>, _>>()?;
    debug!(count = messages.len(), "Decoded internal messages");
    Ok(messages)
}

fn into_items(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        single => vec![single],
    }
}
