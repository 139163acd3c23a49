//! printquote: a pricing calculator for 3D-printing services.
//!
//! The crate keeps two persistent records, a cost [`PricingConfig`] and an
//! ordered [`Filament`] catalog, and evaluates one pure pricing formula over
//! them for each print job. A small currency resolver can refresh the USD
//! exchange rate from a public quote service.
//!
//! Module map:
//! - [`pricing`]: domain types and the pure quote computation
//! - [`store`]: SQLite-backed persistence plus bootstrap seeding
//! - [`currency`]: exchange-rate fetch
//! - [`session`]: the mutable application context tying the above together

pub mod currency;
pub mod error;
pub mod pricing;
pub mod session;
pub mod store;

pub use error::QuoteError;
pub use pricing::{
    compute_quote, Filament, FilamentSlot, JobInputs, PriceBreakdown, PricingConfig,
    FILAMENT_SLOTS,
};
pub use session::PricingSession;
