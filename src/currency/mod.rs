use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, TripError};

/// TWD paid for one JPY until a fresh quote arrives.
pub const FALLBACK_TWD_PER_JPY: f64 = 0.215;

/// The two currencies an expense can be recorded in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Currency {
    #[default]
    #[serde(rename = "JPY")]
    Jpy,
    #[serde(rename = "TWD")]
    Twd,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Jpy => "JPY",
            Currency::Twd => "TWD",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Jpy => "¥",
            Currency::Twd => "NT$",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = TripError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "JPY" | "YEN" => Ok(Currency::Jpy),
            "TWD" | "NTD" => Ok(Currency::Twd),
            other => Err(TripError::Validation(format!(
                "unsupported currency `{other}` (expected JPY or TWD)"
            ))),
        }
    }
}

/// TWD-per-JPY conversion factor, so `twd = jpy * rate`.
///
/// Always strictly positive and finite; computations receive it by value
/// instead of reading shared state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ExchangeRate(f64);

impl ExchangeRate {
    pub fn new(twd_per_jpy: f64) -> Result<Self> {
        if twd_per_jpy.is_finite() && twd_per_jpy > 0.0 {
            Ok(Self(twd_per_jpy))
        } else {
            Err(TripError::InvalidRate(twd_per_jpy))
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn jpy_to_twd(&self, jpy: f64) -> f64 {
        jpy * self.0
    }

    pub fn twd_to_jpy(&self, twd: f64) -> f64 {
        twd / self.0
    }
}

impl Default for ExchangeRate {
    fn default() -> Self {
        Self(FALLBACK_TWD_PER_JPY)
    }
}

impl fmt::Display for ExchangeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "1 JPY = {} TWD", self.0)
    }
}

/// Supplies a fresh JPY→TWD quote. Callers keep their previous rate on error.
pub trait RateProvider: Send + Sync {
    fn fetch_rate(&self) -> Result<ExchangeRate>;
}

/// Rate source that always answers with one configured value.
#[derive(Debug, Clone, Copy)]
pub struct FixedRateProvider(pub ExchangeRate);

impl RateProvider for FixedRateProvider {
    fn fetch_rate(&self) -> Result<ExchangeRate> {
        Ok(self.0)
    }
}

/// Formats a whole amount with thousands grouping and the currency symbol, e.g. `¥12,345`.
pub fn format_amount(amount: i64, currency: Currency) -> String {
    let digits = group_digits(&amount.unsigned_abs().to_string(), ',');
    if amount < 0 {
        format!("-{}{}", currency.symbol(), digits)
    } else {
        format!("{}{}", currency.symbol(), digits)
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}
