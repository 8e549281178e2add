//! Canonical JSON encoding for snapshot files.
//!
//! Snapshots are JSON arrays, pretty-printed, with object keys sorted at
//! every nesting level so two snapshots of the same state are byte-identical
//! and diff cleanly.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::CodecError;

/// Encode records as a pretty-printed JSON array with sorted keys.
///
/// # Errors
///
/// Returns [`CodecError::Encode`] when a record cannot be represented as
/// JSON, for example a map keyed by a non-string type.
///
/// # Example
///
/// ```
/// use cocktail_snapshots::{BarItemRecord, encode};
///
/// let items = vec![BarItemRecord {
///     name: "Campari".to_owned(),
///     category: "Bitter".to_owned(),
/// }];
/// let bytes = encode(&items).expect("bar items encode");
/// let text = String::from_utf8(bytes).expect("utf-8 output");
///
/// assert!(text.find("\"category\"") < text.find("\"name\""));
/// ```
pub fn encode<T: Serialize>(records: &[T]) -> Result<Vec<u8>, CodecError> {
    let value = serde_json::to_value(records).map_err(|err| CodecError::encode(err.to_string()))?;
    let mut bytes = serde_json::to_vec_pretty(&canonicalise(value))
        .map_err(|err| CodecError::encode(err.to_string()))?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Decode a JSON array of records.
///
/// Unknown object keys are ignored.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] when the input is not JSON, is not an
/// array, or an element is missing a required field.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<Vec<T>, CodecError> {
    serde_json::from_slice(bytes).map_err(|err| CodecError::decode(err.to_string()))
}

// Rebuilds every object with its keys inserted in ascending order, which is
// sorted output whether or not `serde_json` preserves insertion order.
fn canonicalise(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|(left, _), (right, _)| left.cmp(right));
            let sorted: Map<String, Value> = entries
                .into_iter()
                .map(|(key, nested)| (key, canonicalise(nested)))
                .collect();
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalise).collect()),
        other => other,
    }
}
