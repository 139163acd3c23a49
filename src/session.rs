//! The application session: owner of the mutable configuration + catalog
//! pair.
//!
//! All mutation goes through the entry points here, and every mutation is
//! followed by a full persistence write, so the store never lags the
//! in-memory state. Quoting itself never mutates anything.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::currency;
use crate::error::QuoteError;
use crate::pricing::{compute_quote, Filament, JobInputs, PriceBreakdown, PricingConfig};
use crate::store::{self, SettingsStore};

#[derive(Debug)]
pub struct PricingSession {
    store: SettingsStore,
    config: PricingConfig,
    filaments: Vec<Filament>,
}

impl PricingSession {
    /// Open the settings store and load (or bootstrap) the session state.
    pub fn open(db_path: &Path) -> Result<Self, QuoteError> {
        Self::open_with_seed(db_path, None)
    }

    /// Like [`open`](Self::open), but seeding an empty store from a custom
    /// bootstrap document instead of the embedded defaults.
    pub fn open_with_seed(db_path: &Path, seed: Option<&Path>) -> Result<Self, QuoteError> {
        let mut store = SettingsStore::open(db_path)?;
        let (config, filaments) = store::load(&mut store, seed)?;
        Ok(Self {
            store,
            config,
            filaments,
        })
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    pub fn filaments(&self) -> &[Filament] {
        &self.filaments
    }

    /// Replace the configuration. Validated before anything is persisted.
    pub fn update_config(&mut self, config: PricingConfig) -> Result<(), QuoteError> {
        config.validate()?;
        self.config = config;
        self.persist()
    }

    /// Append a filament to the catalog. Returns its position.
    pub fn add_filament(&mut self, filament: Filament) -> Result<usize, QuoteError> {
        filament.validate()?;
        info!("Adding filament '{}' ({})", filament.name, filament.material);
        self.filaments.push(filament);
        self.persist()?;
        Ok(self.filaments.len() - 1)
    }

    /// Remove the filament at `position`, shifting later entries down by
    /// one. Job inputs still referring to shifted positions go stale; the
    /// engine prices those slots as zero.
    pub fn remove_filament(&mut self, position: usize) -> Result<Filament, QuoteError> {
        if position >= self.filaments.len() {
            return Err(QuoteError::OutOfRange(position));
        }
        let removed = self.filaments.remove(position);
        info!("Removed filament '{}' at position {}", removed.name, position);
        self.persist()?;
        Ok(removed)
    }

    /// Overwrite the USD exchange rate and persist.
    pub fn apply_exchange_rate(&mut self, rate: f64) -> Result<(), QuoteError> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(QuoteError::Config(format!(
                "Exchange rate must be a positive number, got {}",
                rate
            )));
        }
        self.config.usd_to_uy = rate;
        self.persist()
    }

    /// Refresh the exchange rate from the quote service, honoring the
    /// `useAutoUSD` flag.
    ///
    /// Returns `Ok(None)` without touching the network when auto-refresh is
    /// disabled. On fetch failure the stored rate is left untouched and the
    /// error propagates; callers report it and carry on with the last-known
    /// rate.
    pub async fn refresh_exchange_rate(
        &mut self,
        client: &reqwest::Client,
        url: &str,
    ) -> Result<Option<f64>, QuoteError> {
        if !self.config.use_auto_usd {
            debug!("useAutoUSD is off, keeping stored rate {}", self.config.usd_to_uy);
            return Ok(None);
        }
        let rate = currency::fetch_rate(client, url).await?;
        self.apply_exchange_rate(rate)?;
        Ok(Some(rate))
    }

    /// Compute the price breakdown for one job against the current state.
    pub fn quote(&self, job: &JobInputs) -> PriceBreakdown {
        compute_quote(&self.config, &self.filaments, job)
    }

    fn persist(&mut self) -> Result<(), QuoteError> {
        self.store.save(&self.config, &self.filaments).map_err(|e| {
            warn!("Failed to persist session state: {}", e);
            e
        })
    }
}
