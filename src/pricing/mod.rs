//! Pricing engine for 3D-print jobs.
//!
//! One pure computation turns three records into an itemized sale price:
//!
//! - **Configuration**: tunable business parameters (rates, overhead, margins)
//! - **Catalog**: ordered list of purchasable filaments, referenced by position
//! - **Job inputs**: hours, flat costs, profit margin and filament usage
//!
//! # Example
//!
//! ```ignore
//! use printquote::pricing::{compute_quote, JobInputs};
//! use printquote::store;
//!
//! let doc = store::default_document();
//! let mut job = JobInputs::default();
//! job.printing = 8.0;
//! job.profit = 25.0;
//! job.set_slot(0, 0, 150.0);
//!
//! let breakdown = compute_quote(&doc.config, &doc.filaments, &job);
//! println!("{:.2} USD", breakdown.final_price_usd);
//! ```

mod engine;
mod types;

pub use engine::compute_quote;
pub use types::*;
