use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::{debug, info};

use crate::error::QuoteError;
use crate::pricing::{Filament, PricingConfig};

/// Fixed key the configuration record is stored under.
const CONFIG_KEY: &str = "config";
/// Fixed key the filament catalog is stored under.
const FILAMENTS_KEY: &str = "filaments";

/// SQLite-backed key-value store for the configuration + catalog pair.
/// All operations are synchronous (rusqlite is blocking).
#[derive(Debug)]
pub struct SettingsStore {
    conn: Connection,
}

impl SettingsStore {
    /// Open or create the settings database at the given path.
    /// Creates the parent directory and the `settings` table if missing.
    pub fn open(db_path: &Path) -> Result<Self, QuoteError> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                QuoteError::Storage(format!("Failed to create data dir {:?}: {}", parent, e))
            })?;
        }

        let conn = Connection::open(db_path).map_err(|e| {
            QuoteError::Storage(format!("Failed to open settings database at {:?}: {}", db_path, e))
        })?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value_json TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );",
        )
        .map_err(|e| QuoteError::Storage(format!("Failed to create settings table: {}", e)))?;

        info!("Opened settings database at {:?}", db_path);
        Ok(Self { conn })
    }

    /// Load both records if previously persisted.
    ///
    /// Returns `None` when either key is missing (first run). A record that
    /// is present but no longer parses is a hard storage error, not a silent
    /// re-bootstrap.
    pub fn try_load(&self) -> Result<Option<(PricingConfig, Vec<Filament>)>, QuoteError> {
        let config_json = self.get_raw(CONFIG_KEY)?;
        let filaments_json = self.get_raw(FILAMENTS_KEY)?;

        match (config_json, filaments_json) {
            (Some(config_json), Some(filaments_json)) => {
                let config: PricingConfig = serde_json::from_str(&config_json).map_err(|e| {
                    QuoteError::Storage(format!("Malformed persisted configuration: {}", e))
                })?;
                let filaments: Vec<Filament> =
                    serde_json::from_str(&filaments_json).map_err(|e| {
                        QuoteError::Storage(format!("Malformed persisted catalog: {}", e))
                    })?;
                debug!("Loaded persisted configuration and {} filaments", filaments.len());
                Ok(Some((config, filaments)))
            }
            _ => Ok(None),
        }
    }

    /// Persist both records, overwriting whatever was stored before.
    /// The two writes happen in one transaction; failures propagate.
    pub fn save(
        &mut self,
        config: &PricingConfig,
        filaments: &[Filament],
    ) -> Result<(), QuoteError> {
        let config_json = serde_json::to_string(config)
            .map_err(|e| QuoteError::Storage(format!("Failed to serialize configuration: {}", e)))?;
        let filaments_json = serde_json::to_string(filaments)
            .map_err(|e| QuoteError::Storage(format!("Failed to serialize catalog: {}", e)))?;
        let now = Utc::now().to_rfc3339();

        let tx = self
            .conn
            .transaction()
            .map_err(|e| QuoteError::Storage(format!("Failed to start transaction: {}", e)))?;
        for (key, value) in [(CONFIG_KEY, &config_json), (FILAMENTS_KEY, &filaments_json)] {
            tx.execute(
                "INSERT OR REPLACE INTO settings (key, value_json, updated_at)
                 VALUES (?1, ?2, ?3)",
                params![key, value, now],
            )
            .map_err(|e| QuoteError::Storage(format!("Failed to store '{}': {}", key, e)))?;
        }
        tx.commit()
            .map_err(|e| QuoteError::Storage(format!("Failed to commit save: {}", e)))?;

        debug!("Saved configuration and {} filaments", filaments.len());
        Ok(())
    }

    fn get_raw(&self, key: &str) -> Result<Option<String>, QuoteError> {
        let mut stmt = self
            .conn
            .prepare("SELECT value_json FROM settings WHERE key = ?1")
            .map_err(|e| QuoteError::Storage(format!("Failed to prepare settings query: {}", e)))?;

        match stmt.query_row(params![key], |row| row.get::<_, String>(0)) {
            Ok(json) => Ok(Some(json)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(QuoteError::Storage(format!("Settings lookup failed: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::bootstrap::default_document;
    use tempfile::TempDir;

    #[test]
    fn test_try_load_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::open(&dir.path().join("settings.db")).unwrap();
        assert!(store.try_load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.db");
        let doc = default_document();

        {
            let mut store = SettingsStore::open(&path).unwrap();
            store.save(&doc.config, &doc.filaments).unwrap();
        }

        // Reopen: persisted state survives the connection
        let store = SettingsStore::open(&path).unwrap();
        let (config, filaments) = store.try_load().unwrap().expect("records were persisted");
        assert_eq!(config, doc.config);
        assert_eq!(filaments, doc.filaments);
    }

    #[test]
    fn test_save_is_full_overwrite() {
        let dir = TempDir::new().unwrap();
        let mut store = SettingsStore::open(&dir.path().join("settings.db")).unwrap();
        let doc = default_document();

        store.save(&doc.config, &doc.filaments).unwrap();
        store.save(&doc.config, &[]).unwrap();

        let (_, filaments) = store.try_load().unwrap().unwrap();
        assert!(filaments.is_empty());
    }
}
