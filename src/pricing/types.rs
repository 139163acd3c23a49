//! Type definitions for the pricing engine.
//!
//! `PricingConfig` and `Filament` round-trip through JSON in camelCase so
//! that persisted records and the bootstrap document share one shape.

use serde::{Deserialize, Serialize};

use crate::error::QuoteError;

/// Number of filament slots a single print job can draw from.
pub const FILAMENT_SLOTS: usize = 5;

/// Tunable business parameters for the pricing formula.
///
/// All monetary values are USD unless stated otherwise. Percent fields
/// (`error_margin`) are expressed as whole percentages, e.g. `10.0` = 10%.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingConfig {
    /// Electricity price per kWh
    pub kwh_price: f64,
    /// Printer power draw in kW
    pub printer_consumption: f64,
    /// Hourly rate charged for design work
    pub design_cost_per_hour: f64,
    /// Hourly rate charged for manual labor
    pub labor_cost_per_hour: f64,
    /// Hourly rate charged for printer time
    pub print_cost_per_hour: f64,
    /// Hourly share of printer amortization
    pub amortization_cost_per_hour: f64,
    /// Monthly maintenance budget, amortized over printing hours
    pub maintenance_monthly: f64,
    /// Other monthly overhead, amortized the same way
    pub parallel_expenses: f64,
    /// Percentage buffer applied to variable costs
    pub error_margin: f64,
    /// USD to Uruguayan peso exchange rate
    pub usd_to_uy: f64,
    /// When true, the exchange rate is refreshed from the quote service
    #[serde(rename = "useAutoUSD", default)]
    pub use_auto_usd: bool,
}

impl PricingConfig {
    /// Check that every numeric parameter is finite and non-negative, and
    /// that the exchange rate is positive.
    pub fn validate(&self) -> Result<(), QuoteError> {
        let fields = [
            ("kwhPrice", self.kwh_price),
            ("printerConsumption", self.printer_consumption),
            ("designCostPerHour", self.design_cost_per_hour),
            ("laborCostPerHour", self.labor_cost_per_hour),
            ("printCostPerHour", self.print_cost_per_hour),
            ("amortizationCostPerHour", self.amortization_cost_per_hour),
            ("maintenanceMonthly", self.maintenance_monthly),
            ("parallelExpenses", self.parallel_expenses),
            ("errorMargin", self.error_margin),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(QuoteError::Config(format!(
                    "{} must be a finite non-negative number, got {}",
                    name, value
                )));
            }
        }
        if !self.usd_to_uy.is_finite() || self.usd_to_uy <= 0.0 {
            return Err(QuoteError::Config(format!(
                "usdToUy must be a positive number, got {}",
                self.usd_to_uy
            )));
        }
        Ok(())
    }
}

/// One purchasable material in the catalog.
///
/// The catalog is an ordered sequence; a filament's position in it is the
/// identity key job inputs refer to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filament {
    pub name: String,
    /// Material category (PLA, PETG, ...)
    #[serde(rename = "type")]
    pub material: String,
    /// Display color
    pub color: String,
    /// Cost per kilogram in USD
    pub price: f64,
}

impl Filament {
    pub fn validate(&self) -> Result<(), QuoteError> {
        if self.name.trim().is_empty() {
            return Err(QuoteError::Config("Filament name must not be empty".to_string()));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(QuoteError::Config(format!(
                "Filament price must be a finite non-negative number, got {}",
                self.price
            )));
        }
        Ok(())
    }
}

/// One of the up-to-five filament selections on a print job.
///
/// `filament` is a position into the catalog at computation time; `None`
/// means the slot is unused.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilamentSlot {
    #[serde(default)]
    pub filament: Option<usize>,
    #[serde(default)]
    pub weight_grams: f64,
}

/// Inputs for a single quote computation.
///
/// Every field defaults to zero/empty, so a partially filled job is never an
/// error: the breakdown simply prices the missing parts at zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobInputs {
    /// Design hours
    pub design: f64,
    /// Manual labor hours
    pub labor: f64,
    /// Printing hours
    pub printing: f64,
    /// Flat packaging cost, USD
    pub packaging: f64,
    /// Other flat costs, USD
    pub extra: f64,
    /// Profit margin percentage
    pub profit: f64,
    pub filaments: [FilamentSlot; FILAMENT_SLOTS],
}

impl JobInputs {
    /// Set one filament slot. Positions >= `FILAMENT_SLOTS` are ignored.
    pub fn set_slot(&mut self, slot: usize, filament: usize, weight_grams: f64) {
        if let Some(s) = self.filaments.get_mut(slot) {
            s.filament = Some(filament);
            s.weight_grams = weight_grams;
        }
    }
}

/// Itemized result of one quote computation.
///
/// All values are full precision; rounding to 2 decimals is the display
/// layer's job. Everything except `final_price_local` is USD.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub filament_cost: f64,
    pub electricity: f64,
    pub maintenance: f64,
    pub parallel_expenses: f64,
    pub design_cost: f64,
    pub labor_cost: f64,
    pub print_cost: f64,
    pub amortization_cost: f64,
    pub packaging: f64,
    pub extra: f64,
    /// Costs that scale with material/time usage
    pub variable_cost: f64,
    /// Flat job-level charges
    pub fixed_cost: f64,
    pub total_before_margin: f64,
    /// Variable cost buffered by the error margin, plus fixed cost
    pub total_with_error_margin: f64,
    pub final_price_usd: f64,
    /// Final price converted at `usdToUy`
    pub final_price_local: f64,
}
