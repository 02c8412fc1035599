//! Telemetry records and the payload decoder
//!
//! A frame payload is a JSON object. Publishers put plenty besides telemetry
//! into that object (log message, level, timestamps), so only numeric members
//! are kept. Anything that is not a JSON object is not a record.

use std::collections::HashMap;

use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::bus::RawFrame;

/// Why a frame produced no record
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Frame had no parts at all
    #[error("frame has no payload")]
    EmptyFrame,

    /// Payload is not valid JSON
    #[error("payload is not JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Payload is JSON but not an object
    #[error("payload is not a JSON object")]
    NotAnObject,
}

/// Decoded telemetry record: field name to numeric value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: HashMap<String, Number>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an integer or exact numeric field
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Number>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Add a float field; non-finite values have no JSON form and are skipped
    pub fn with_float(mut self, name: impl Into<String>, value: f64) -> Self {
        if let Some(number) = Number::from_f64(value) {
            self.fields.insert(name.into(), number);
        }
        self
    }

    /// Value of a field, if present
    pub fn get(&self, name: &str) -> Option<&Number> {
        self.fields.get(name)
    }

    /// Number of numeric fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Encode as a JSON object
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .fields
            .iter()
            .map(|(name, value)| (name.clone(), Value::Number(value.clone())))
            .collect();
        Value::Object(map)
    }
}

impl FromIterator<(String, Number)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Number)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Decode a raw frame into a record
///
/// Reads the payload part (the last part of a multi-part frame).
pub fn decode(frame: &RawFrame) -> Result<Record, DecodeError> {
    let payload = frame.payload().ok_or(DecodeError::EmptyFrame)?;

    let value: Value = serde_json::from_slice(payload)?;
    match value {
        Value::Object(map) => Ok(map
            .into_iter()
            .filter_map(|(name, value)| match value {
                Value::Number(number) => Some((name, number)),
                _ => None,
            })
            .collect()),
        _ => Err(DecodeError::NotAnObject),
    }
}
