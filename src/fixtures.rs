//! Fixtures
//!
//! Order sheets in YAML: who is buying, in which currency, what they are buying and, optionally,
//! the discount tiers to apply.
//!
//! ```yaml
//! owner: Andi
//! currency: IDR
//! discounts:
//!   - above: "200000 IDR"
//!     percentage: "5%"
//! items:
//!   - ["Ayam Goreng", 2, 20000]
//!   - ["Pasta Gigi", 3, 15000]
//! ```

use std::{fs, path::Path};

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, IDR, USD},
};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::{
    cart::{Cart, CartError},
    discounts::{DiscountSchedule, DiscountTier},
    entries::RawEntry,
};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between a discount tier and the order
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// The entries could not be added to the cart
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Order sheet
#[derive(Debug, Deserialize)]
pub struct OrderFixture {
    /// Name of the cart's owner
    pub owner: String,

    /// ISO currency code (e.g. "IDR"); defaults to Rupiah
    #[serde(default)]
    pub currency: Option<String>,

    /// Discount tiers replacing the standard schedule
    #[serde(default)]
    pub discounts: Option<Vec<DiscountTierFixture>>,

    /// `(name, quantity, price)` entries
    #[serde(default)]
    pub items: Vec<RawEntry>,
}

/// Discount Tier Fixture
#[derive(Debug, Deserialize)]
pub struct DiscountTierFixture {
    /// Totals strictly above this price earn the discount (e.g., "200000 IDR")
    pub above: String,

    /// Discount percentage (e.g., "5%" or "0.05")
    pub percentage: String,
}

impl OrderFixture {
    /// Load an order sheet from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;

        debug!(path = %path.display(), "loading order sheet");

        Self::from_yaml(&contents)
    }

    /// Parse an order sheet from a YAML string
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML cannot be parsed.
    pub fn from_yaml(contents: &str) -> Result<Self, FixtureError> {
        Ok(serde_norway::from_str(contents)?)
    }

    /// Build a cart holding the sheet's items
    ///
    /// # Errors
    ///
    /// Returns an error if the currency is unknown, a discount tier is invalid, or an entry
    /// cannot be added to the cart.
    pub fn cart(&self) -> Result<Cart<'static>, FixtureError> {
        let currency = match self.currency.as_deref() {
            Some(code) => parse_currency(code)?,
            None => IDR,
        };

        let mut cart = Cart::with_currency(self.owner.clone(), currency);

        if let Some(tiers) = &self.discounts {
            let tiers = tiers
                .iter()
                .map(|tier| tier.to_tier(currency))
                .collect::<Result<Vec<_>, _>>()?;

            cart = cart.with_discounts(DiscountSchedule::new(tiers));
        }

        cart.add_entries(&self.items)?;

        Ok(cart)
    }
}

impl DiscountTierFixture {
    fn to_tier(&self, currency: &'static Currency) -> Result<DiscountTier<'static>, FixtureError> {
        let (minor_units, tier_currency) = parse_price(&self.above)?;

        if tier_currency != currency {
            return Err(FixtureError::CurrencyMismatch(
                currency.iso_alpha_code.to_string(),
                tier_currency.iso_alpha_code.to_string(),
            ));
        }

        Ok(DiscountTier::new(
            Money::from_minor(minor_units, currency),
            parse_percentage(&self.percentage)?,
        ))
    }
}

/// Look up a supported ISO currency code
///
/// # Errors
///
/// Returns [`FixtureError::UnknownCurrency`] for codes other than IDR, GBP, USD and EUR.
pub fn parse_currency(code: &str) -> Result<&'static Currency, FixtureError> {
    match code.trim() {
        "IDR" => Ok(IDR),
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        other => Err(FixtureError::UnknownCurrency(other.to_string())),
    }
}

/// Parse price string (e.g., "200000 IDR") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = parse_currency(currency_code)?;

    let minor_units = amount
        .checked_mul(Decimal::from(10_i64.pow(currency.exponent)))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    Ok((minor_units, currency))
}

/// Parse percentage string (e.g., "5%" or "0.05") into a `Percentage`
///
/// # Errors
///
/// Returns an error if the string cannot be parsed, or if the value lies outside 0% to 100%.
pub fn parse_percentage(s: &str) -> Result<Percentage, FixtureError> {
    let trimmed = s.trim();

    let fraction = if let Some(percent_str) = trimmed.strip_suffix('%') {
        let value = percent_str
            .trim()
            .parse::<Decimal>()
            .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

        value / Decimal::ONE_HUNDRED
    } else {
        trimmed
            .parse::<Decimal>()
            .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?
    };

    // 0 to 1 inclusive
    if fraction < Decimal::ZERO || fraction > Decimal::ONE {
        return Err(FixtureError::InvalidPercentage(s.to_string()));
    }

    Ok(Percentage::from(fraction))
}
