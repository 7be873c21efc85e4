//! Business identity printed on every document

use crate::record::Record;
use crate::types::{RecordId, Table};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Id of the single settings row.
pub const SETTINGS_ID: &str = "business";

/// Name, address and footer text shown on receipts and reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessSettings {
    /// Business name (document header)
    pub business_name: String,
    /// Street address
    pub address: String,
    /// Contact phone
    pub phone: String,
    /// Website
    pub website: String,
    /// Footer copyright line
    pub copyright_text: String,
    /// Last change
    pub updated_at: Option<NaiveDateTime>,
    /// User who made the last change
    pub updated_by: Option<u64>,
}

impl Default for BusinessSettings {
    fn default() -> Self {
        Self {
            business_name: "Business App by fajarmandiri.store".into(),
            address: "Jl. Contoh No. 123, Jakarta".into(),
            phone: "0812-3456-7890".into(),
            website: "fajarmandiri.store".into(),
            copyright_text: "© 2025 Fajar Julyana - fajarmandiri.store".into(),
            updated_at: None,
            updated_by: None,
        }
    }
}

impl Record for BusinessSettings {
    const TABLE: Table = Table::Settings;

    fn record_id(&self) -> RecordId {
        RecordId::from(SETTINGS_ID)
    }
}
