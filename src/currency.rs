//! USD exchange-rate resolution.
//!
//! Queries a public USD/UYU quote service and resolves the working rate as
//! the arithmetic mean of the buy (`compra`) and sell (`venta`) quotes.
//! Best effort: any failure is reported to the caller and leaves the
//! last-known rate in place.

use std::time::Duration;

use tracing::info;

use crate::error::QuoteError;

/// Public USD/UYU quote endpoint. Response is JSON with numeric
/// `compra`/`venta` fields; extra fields are ignored.
pub const DEFAULT_QUOTE_URL: &str = "https://uy.dolarapi.com/v1/cotizaciones/usd";

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetch the current USD exchange rate from the quote service at `url`.
///
/// # Returns
/// * `Ok(rate)` - Mean of the buy and sell quotes
/// * `Err(QuoteError::RateFetchFailed)` - Transport failure or non-JSON body
/// * `Err(QuoteError::RateUnavailable)` - Valid JSON missing either quote
pub async fn fetch_rate(client: &reqwest::Client, url: &str) -> Result<f64, QuoteError> {
    info!("Fetching USD exchange rate from {}", url);

    let response = client
        .get(url)
        .timeout(FETCH_TIMEOUT)
        .send()
        .await
        .map_err(|e| QuoteError::RateFetchFailed(format!("Request to {} failed: {}", url, e)))?;

    let response = response.error_for_status().map_err(|e| {
        QuoteError::RateFetchFailed(format!("Quote service returned an error: {}", e))
    })?;

    let body: serde_json::Value = response
        .json()
        .await
        .map_err(|e| QuoteError::RateFetchFailed(format!("Malformed quote response: {}", e)))?;

    let rate = resolve_rate(&body)?;
    info!("Resolved USD exchange rate: {}", rate);
    Ok(rate)
}

/// Resolve the working rate from a quote response body.
fn resolve_rate(body: &serde_json::Value) -> Result<f64, QuoteError> {
    let buy = quote_field(body, "compra")?;
    let sell = quote_field(body, "venta")?;
    Ok((buy + sell) / 2.0)
}

fn quote_field(body: &serde_json::Value, field: &str) -> Result<f64, QuoteError> {
    body.get(field).and_then(serde_json::Value::as_f64).ok_or_else(|| {
        QuoteError::RateUnavailable(format!("Quote response has no numeric '{}' field", field))
    })
}
