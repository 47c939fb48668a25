//! Currency conversion for extracted market caps.
//!
//! Derived columns are always computed from the USD column, so running
//! the conversion again over the same extracted data yields the same
//! result. Rounding is half-to-even at 2 decimal places.

use crate::core::bank::{BankRecord, ExtractedBank};
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct RateRow {
    #[serde(rename = "Currency")]
    currency: String,
    #[serde(rename = "Rate")]
    rate: f64,
}

/// Exchange rates keyed by currency code, relative to USD.
#[derive(Debug, Clone)]
pub struct ExchangeRates {
    rates: HashMap<String, f64>,
}

impl ExchangeRates {
    /// Loads rates from a CSV file with a `Currency,Rate` header. Rows
    /// beyond the required codes are kept and ignored by the converter.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("Failed to read exchange rate file: {}", path.display()))?;

        let mut rates = HashMap::new();
        for row in reader.deserialize() {
            let row: RateRow = row.with_context(|| {
                format!("Malformed row in exchange rate file: {}", path.display())
            })?;
            rates.insert(row.currency, row.rate);
        }
        debug!("Loaded {} exchange rates from {}", rates.len(), path.display());

        Ok(ExchangeRates { rates })
    }

    pub fn from_pairs<I: IntoIterator<Item = (String, f64)>>(pairs: I) -> Self {
        ExchangeRates {
            rates: pairs.into_iter().collect(),
        }
    }

    pub fn rate(&self, code: &str) -> Result<f64> {
        self.rates
            .get(code)
            .copied()
            .with_context(|| format!("No exchange rate found for currency: {code}"))
    }
}

/// Converts extracted records into full records with GBP, EUR and INR
/// columns. Fails before converting anything if a required rate is
/// missing.
pub fn convert(banks: &[ExtractedBank], rates: &ExchangeRates) -> Result<Vec<BankRecord>> {
    let gbp = rates.rate("GBP")?;
    let eur = rates.rate("EUR")?;
    let inr = rates.rate("INR")?;

    banks
        .iter()
        .map(|bank| {
            Ok(BankRecord {
                name: bank.name.clone(),
                mc_usd_billion: bank.mc_usd_billion,
                mc_gbp_billion: apply_rate(bank.mc_usd_billion, gbp)?,
                mc_eur_billion: apply_rate(bank.mc_usd_billion, eur)?,
                mc_inr_billion: apply_rate(bank.mc_usd_billion, inr)?,
            })
        })
        .collect()
}

/// `round(usd * rate, 2)` in decimal arithmetic, half-to-even.
fn apply_rate(usd: f64, rate: f64) -> Result<f64> {
    let usd = Decimal::from_f64(usd)
        .with_context(|| format!("Market cap value is not a finite number: {usd}"))?;
    let rate = Decimal::from_f64(rate)
        .with_context(|| format!("Exchange rate is not a finite number: {rate}"))?;

    (usd * rate)
        .round_dp(2)
        .to_f64()
        .context("Converted market cap does not fit in an f64")
}
