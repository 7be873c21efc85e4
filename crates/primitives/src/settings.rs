//! Business settings primitive
//!
//! A single row holding the name, address and footer printed on every
//! document. Reads fall back to the defaults until the row is written.

use crate::validate::required;
use niaga_core::model::settings::SETTINGS_ID;
use niaga_core::model::BusinessSettings;
use niaga_core::NiagaResult;
use niaga_engine::Database;
use std::sync::Arc;
use tracing::info;

/// Settings primitive
#[derive(Clone)]
pub struct Settings {
    db: Arc<Database>,
}

impl Settings {
    /// Create a new settings facade
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Stored settings, or the defaults
    pub fn get(&self) -> NiagaResult<BusinessSettings> {
        self.db.read(|txn| {
            Ok(txn
                .get_record::<BusinessSettings>(SETTINGS_ID)?
                .unwrap_or_default())
        })
    }

    /// Replace the settings
    ///
    /// The business name is required; other fields are stored trimmed.
    pub fn update(&self, settings: &BusinessSettings, by: u64) -> NiagaResult<BusinessSettings> {
        let business_name = required("business name", &settings.business_name)?;
        let saved = self.db.transaction(|txn| {
            let saved = BusinessSettings {
                business_name: business_name.clone(),
                address: settings.address.trim().to_string(),
                phone: settings.phone.trim().to_string(),
                website: settings.website.trim().to_string(),
                copyright_text: settings.copyright_text.trim().to_string(),
                updated_at: Some(txn.now()),
                updated_by: Some(by),
            };
            txn.put_record(&saved)?;
            Ok(saved)
        })?;
        info!(by, "business settings updated");
        Ok(saved)
    }

    /// Store the defaults if no settings row exists
    ///
    /// Returns true when the row was created.
    pub fn ensure_defaults(&self) -> NiagaResult<bool> {
        self.db.transaction(|txn| {
            if txn.get_record::<BusinessSettings>(SETTINGS_ID)?.is_some() {
                return Ok(false);
            }
            txn.put_record(&BusinessSettings::default())?;
            Ok(true)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{at, setup_db};

    #[test]
    fn test_defaults_until_written() {
        let (db, _) = setup_db();
        let settings = Settings::new(db);
        let current = settings.get().unwrap();
        assert_eq!(current.business_name, "Business App by fajarmandiri.store");
        assert!(current.updated_at.is_none());

        assert!(settings.ensure_defaults().unwrap());
        assert!(!settings.ensure_defaults().unwrap());
    }

    #[test]
    fn test_update_stamps_time_and_user() {
        let (db, _) = setup_db();
        let settings = Settings::new(db);
        let mut changed = settings.get().unwrap();
        changed.business_name = "  Toko Makmur ".into();
        changed.phone = "021-555".into();

        let saved = settings.update(&changed, 1).unwrap();
        assert_eq!(saved.business_name, "Toko Makmur");
        assert_eq!(saved.updated_by, Some(1));
        assert_eq!(saved.updated_at, Some(at(2025, 8, 3, 10)));
        assert_eq!(settings.get().unwrap(), saved);

        // ensure_defaults keeps what is stored
        assert!(!settings.ensure_defaults().unwrap());
        assert_eq!(settings.get().unwrap().business_name, "Toko Makmur");
    }

    #[test]
    fn test_blank_name_rejected() {
        let (db, _) = setup_db();
        let settings = Settings::new(db);
        let mut changed = settings.get().unwrap();
        changed.business_name = " ".into();
        assert!(settings.update(&changed, 1).is_err());
    }
}
