//! Stored row representation
//!
//! Records are stored as JSON objects. [`Row`] is a newtype around
//! `serde_json::Value` that converts to and from typed records, and
//! [`Versioned`] pairs a row with the commit that wrote it.

use crate::error::{NiagaError, NiagaResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

/// A stored record body
///
/// Access to the underlying `serde_json::Value` is available through
/// `Deref`, so a row can be inspected (`row.get("name")`) without decoding
/// it into its record type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(serde_json::Value);

impl Row {
    /// Encode a typed record.
    pub fn from_record<T: Serialize>(record: &T) -> NiagaResult<Self> {
        Ok(Row(serde_json::to_value(record)?))
    }

    /// Decode into a typed record.
    pub fn to_record<T: DeserializeOwned>(&self) -> NiagaResult<T> {
        serde_json::from_value(self.0.clone()).map_err(|e| {
            NiagaError::serialization(format!(
                "cannot decode {}: {}",
                std::any::type_name::<T>(),
                e
            ))
        })
    }

    /// Wrap a raw JSON value
    pub fn from_value(value: serde_json::Value) -> Self {
        Row(value)
    }

    /// Underlying JSON value
    pub fn into_inner(self) -> serde_json::Value {
        self.0
    }

    /// Approximate encoded size, in bytes
    pub fn size_bytes(&self) -> usize {
        serde_json::to_vec(&self.0).map(|v| v.len()).unwrap_or(0)
    }
}

impl Deref for Row {
    type Target = serde_json::Value;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<serde_json::Value> for Row {
    fn from(v: serde_json::Value) -> Self {
        Row(v)
    }
}

/// A row together with the commit that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Versioned {
    /// Row body
    pub row: Row,
    /// Commit version that wrote the row
    pub version: u64,
    /// Commit time, milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl Versioned {
    /// Pair a row with its commit version.
    pub fn new(row: Row, version: u64, timestamp: i64) -> Self {
        Self {
            row,
            version,
            timestamp,
        }
    }

    /// Decode the row into a typed record.
    pub fn decode<T: DeserializeOwned>(&self) -> NiagaResult<T> {
        self.row.to_record()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Pair {
        name: String,
        count: i64,
    }

    #[test]
    fn test_record_roundtrip() {
        let pair = Pair {
            name: "kopi".into(),
            count: 3,
        };
        let row = Row::from_record(&pair).unwrap();
        assert_eq!(row.get("name"), Some(&json!("kopi")));
        assert_eq!(row.to_record::<Pair>().unwrap(), pair);
    }

    #[test]
    fn test_decode_wrong_shape_is_serialization_error() {
        let row = Row::from_value(json!({"name": 5}));
        let err = row.to_record::<Pair>().unwrap_err();
        assert!(matches!(err, NiagaError::Serialization { .. }));
    }

    #[test]
    fn test_size_bytes() {
        let row = Row::from_value(json!({"a": 1}));
        assert_eq!(row.size_bytes(), r#"{"a":1}"#.len());
    }
}
