//! Type-safe price representation using decimal arithmetic.
//!
//! The Storefront API returns money as a `MoneyV2` object: a decimal string
//! plus an ISO 4217 currency code. [`Price`] parses that pair and formats it
//! the way the storefront displays prices (`$19.99`, `€5.00`, `19.99 CHF`).

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when parsing a price.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    /// The amount is not a decimal number.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}

/// A price with currency information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Parse a price from the Storefront API's `amount` and `currencyCode`.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::InvalidAmount` if `amount` is not a decimal.
    pub fn parse(amount: &str, currency_code: &str) -> Result<Self, PriceError> {
        let amount = Decimal::from_str(amount.trim())
            .map_err(|_| PriceError::InvalidAmount(amount.to_string()))?;
        Ok(Self::new(amount, CurrencyCode::parse(currency_code)))
    }

    /// Whether the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dp = self.currency_code.minor_units();
        let rounded = self
            .amount
            .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        let abs = rounded.abs();
        let precision = dp as usize;

        match self.currency_code.symbol() {
            Some(symbol) => write!(f, "{sign}{symbol}{abs:.precision$}"),
            None => write!(f, "{sign}{abs:.precision$} {}", self.currency_code.code()),
        }
    }
}

/// ISO 4217 currency codes.
///
/// The storefront only sells in a handful of currencies; anything else is
/// carried through as [`CurrencyCode::Other`] and rendered with its code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
    JPY,
    Other(String),
}

impl CurrencyCode {
    /// Parse a currency code. Unknown codes are kept verbatim (uppercased).
    #[must_use]
    pub fn parse(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "USD" => Self::USD,
            "EUR" => Self::EUR,
            "GBP" => Self::GBP,
            "CAD" => Self::CAD,
            "AUD" => Self::AUD,
            "JPY" => Self::JPY,
            other => Self::Other(other.to_string()),
        }
    }

    /// The display symbol, if this currency has one.
    #[must_use]
    pub const fn symbol(&self) -> Option<&'static str> {
        match self {
            Self::USD | Self::CAD | Self::AUD => Some("$"),
            Self::EUR => Some("€"),
            Self::GBP => Some("£"),
            Self::JPY => Some("¥"),
            Self::Other(_) => None,
        }
    }

    /// The three-letter code.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
            Self::JPY => "JPY",
            Self::Other(code) => code,
        }
    }

    /// Number of decimal places used when displaying amounts.
    #[must_use]
    pub const fn minor_units(&self) -> u32 {
        match self {
            Self::JPY => 0,
            _ => 2,
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
