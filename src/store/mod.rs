//! Persistence for the configuration + catalog pair.
//!
//! Two JSON-serialized records live under fixed keys in a small SQLite
//! key-value table. On first run the store is seeded from a bootstrap
//! document (embedded defaults, or a user-supplied JSON file); after that,
//! every mutation writes both records back in full.

use std::path::Path;

use tracing::info;

use crate::error::QuoteError;
use crate::pricing::{Filament, PricingConfig};

pub(crate) mod bootstrap;
mod store;

pub use bootstrap::{default_document, load_document, BootstrapDocument};
pub use store::SettingsStore;

/// Load the configuration and catalog, seeding the store on first run.
///
/// Previously persisted records win; the bootstrap document (custom `seed`
/// file when given, embedded defaults otherwise) is only consulted when the
/// store is empty, and is persisted once before being returned.
pub fn load(
    store: &mut SettingsStore,
    seed: Option<&Path>,
) -> Result<(PricingConfig, Vec<Filament>), QuoteError> {
    if let Some(state) = store.try_load()? {
        return Ok(state);
    }

    let document = match seed {
        Some(path) => load_document(path)?,
        None => {
            let document = default_document();
            document
                .validate()
                .map_err(|e| QuoteError::Bootstrap(e.to_string()))?;
            document
        }
    };

    store.save(&document.config, &document.filaments)?;
    info!(
        "Seeded settings store from bootstrap document ({} filaments)",
        document.filaments.len()
    );
    Ok((document.config, document.filaments))
}
