//! Typed records
//!
//! A [`Record`] is a serde struct stored in exactly one [`Table`]. The
//! record knows its own id, so callers never build keys by hand.

use crate::error::NiagaResult;
use crate::row::Row;
use crate::types::{Key, RecordId, Table};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A business record stored in one table.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Table the record is stored in
    const TABLE: Table;

    /// Id of this record within [`Self::TABLE`]
    fn record_id(&self) -> RecordId;

    /// Storage key of this record
    fn key(&self) -> Key {
        Key::new(Self::TABLE, self.record_id())
    }

    /// Encode as a row.
    fn to_row(&self) -> NiagaResult<Row> {
        Row::from_record(self)
    }

    /// Decode from a row.
    fn from_row(row: &Row) -> NiagaResult<Self> {
        row.to_record()
    }
}
