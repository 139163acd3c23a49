//! The pricing formula itself.
//!
//! `compute_quote` is a pure function over the configuration, the filament
//! catalog and one job's inputs. It performs no I/O and no rounding, and is
//! cheap enough to re-run on every input change.

use super::types::{Filament, FilamentSlot, JobInputs, PriceBreakdown, PricingConfig};

/// Days per month used to amortize monthly overhead to an hourly rate.
const DAYS_PER_MONTH: f64 = 30.0;
const HOURS_PER_DAY: f64 = 24.0;

/// Compute the full price breakdown for one print job.
///
/// The error margin buffers variable costs only (materials and usage carry
/// estimation risk; flat charges are assumed known exactly). The profit
/// margin then applies to the error-adjusted total. That ordering is not
/// commutative and must be preserved.
///
/// A slot whose filament reference no longer points inside the catalog
/// contributes zero instead of failing: references are positional and go
/// stale when an earlier filament is removed, and the breakdown should keep
/// updating live regardless.
pub fn compute_quote(
    config: &PricingConfig,
    catalog: &[Filament],
    job: &JobInputs,
) -> PriceBreakdown {
    let filament_cost: f64 = job
        .filaments
        .iter()
        .map(|slot| slot_cost(catalog, slot))
        .sum();

    let electricity = config.kwh_price * config.printer_consumption * job.printing;
    let maintenance = job.printing * hourly_share(config.maintenance_monthly);
    let parallel_expenses = job.printing * hourly_share(config.parallel_expenses);
    let variable_cost = filament_cost + electricity + maintenance + parallel_expenses;

    let design_cost = job.design * config.design_cost_per_hour;
    let labor_cost = job.labor * config.labor_cost_per_hour;
    let print_cost = job.printing * config.print_cost_per_hour;
    let amortization_cost = job.printing * config.amortization_cost_per_hour;
    let fixed_cost =
        design_cost + labor_cost + print_cost + amortization_cost + job.packaging + job.extra;

    let total_before_margin = variable_cost + fixed_cost;
    let total_with_error_margin =
        variable_cost * (1.0 + config.error_margin / 100.0) + fixed_cost;
    let final_price_usd = total_with_error_margin * (1.0 + job.profit / 100.0);
    let final_price_local = final_price_usd * config.usd_to_uy;

    PriceBreakdown {
        filament_cost,
        electricity,
        maintenance,
        parallel_expenses,
        design_cost,
        labor_cost,
        print_cost,
        amortization_cost,
        packaging: job.packaging,
        extra: job.extra,
        variable_cost,
        fixed_cost,
        total_before_margin,
        total_with_error_margin,
        final_price_usd,
        final_price_local,
    }
}

/// Amortize a monthly amount to an hourly rate (30-day months, 24-hour days).
fn hourly_share(monthly: f64) -> f64 {
    monthly / DAYS_PER_MONTH / HOURS_PER_DAY
}

/// Cost contributed by one filament slot.
///
/// Catalog prices are per kilogram; job weights are grams. An empty or
/// out-of-range reference contributes nothing.
fn slot_cost(catalog: &[Filament], slot: &FilamentSlot) -> f64 {
    match slot.filament.and_then(|position| catalog.get(position)) {
        Some(filament) => (filament.price / 1000.0) * slot.weight_grams,
        None => 0.0,
    }
}
