//! Bootstrap document loading.
//!
//! The bootstrap document is the initial configuration + catalog pair used
//! to seed an empty settings store. A default document is embedded in the
//! binary; a custom one can be supplied as a JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::QuoteError;
use crate::pricing::{Filament, PricingConfig};

/// Default document embedded in the binary at compile time.
const DEFAULT_DATA: &str = include_str!("../../assets/default_data.json");

/// Shape of the bootstrap document: `{ config: ..., filaments: [...] }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapDocument {
    pub config: PricingConfig,
    pub filaments: Vec<Filament>,
}

impl BootstrapDocument {
    /// Validate the configuration and every filament entry.
    pub fn validate(&self) -> Result<(), QuoteError> {
        self.config.validate()?;
        for filament in &self.filaments {
            filament.validate()?;
        }
        Ok(())
    }
}

/// Get the default document embedded in the binary.
///
/// # Panics
/// Panics if the embedded JSON is invalid (this would be a compile-time bug).
pub fn default_document() -> BootstrapDocument {
    serde_json::from_str(DEFAULT_DATA).expect("embedded default_data.json must be valid JSON")
}

/// Load a bootstrap document from a JSON file.
///
/// # Returns
/// * `Ok(BootstrapDocument)` - Parsed and validated document
/// * `Err(QuoteError::Bootstrap)` - If the file cannot be read, is not valid
///   JSON, or carries invalid values
pub fn load_document(path: &Path) -> Result<BootstrapDocument, QuoteError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        QuoteError::Bootstrap(format!("Failed to read bootstrap document {:?}: {}", path, e))
    })?;
    let document: BootstrapDocument = serde_json::from_str(&content).map_err(|e| {
        QuoteError::Bootstrap(format!("Malformed bootstrap document {:?}: {}", path, e))
    })?;
    document
        .validate()
        .map_err(|e| QuoteError::Bootstrap(e.to_string()))?;
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_document_is_valid() {
        let doc = default_document();
        doc.validate().expect("embedded defaults must validate");
        assert!(!doc.filaments.is_empty(), "defaults should ship a starter catalog");
        assert!(doc.config.usd_to_uy > 0.0);
    }

    #[test]
    fn test_default_document_uses_wire_field_names() {
        // Persisted records and the bootstrap document share one JSON shape
        let json = serde_json::to_value(default_document()).unwrap();
        let config = &json["config"];
        assert!(config.get("kwhPrice").is_some());
        assert!(config.get("useAutoUSD").is_some());
        assert!(json["filaments"][0].get("type").is_some());
    }

    #[test]
    fn test_load_document_rejects_missing_file() {
        let err = load_document(Path::new("/nonexistent/bootstrap.json")).unwrap_err();
        assert!(matches!(err, QuoteError::Bootstrap(_)));
    }
}
