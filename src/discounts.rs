//! Discounts
//!
//! A cart earns a single percentage discount chosen by the bracket its grand total falls into.
//! Brackets are described as [`DiscountTier`]s: a tier applies once the grand total is strictly
//! greater than its threshold, and the highest applicable tier wins.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

/// Errors specific to discount calculations.
#[derive(Debug, Error)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// A total was compared against a tier in another currency (total currency, tier currency).
    #[error("total has currency {0}, but discount tier has currency {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// Wrapped money arithmetic error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// A single bracket: totals above `threshold` earn `percentage` off.
#[derive(Debug, Clone, Copy)]
pub struct DiscountTier<'a> {
    threshold: Money<'a, Currency>,
    percentage: Percentage,
}

impl<'a> DiscountTier<'a> {
    /// Create a new tier.
    ///
    /// `percentage` is a fraction of the total between 0 and 1; order sheets reject anything else.
    pub fn new(threshold: Money<'a, Currency>, percentage: Percentage) -> Self {
        Self {
            threshold,
            percentage,
        }
    }

    /// Return the exclusive lower bound of the bracket.
    pub fn threshold(&self) -> &Money<'a, Currency> {
        &self.threshold
    }

    /// Return the discount percentage.
    pub fn percentage(&self) -> Percentage {
        self.percentage
    }

    /// Discount percentage expressed in percent points (e.g. `5` for 5%).
    pub fn percent_points(&self) -> Decimal {
        percent_points(self.percentage)
    }

    /// Whether a grand total falls inside this bracket or above it.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::CurrencyMismatch`] if the total is in a different currency to the
    /// threshold.
    pub fn qualifies(&self, total: &Money<'a, Currency>) -> Result<bool, DiscountError> {
        if total.currency() != self.threshold.currency() {
            return Err(DiscountError::CurrencyMismatch(
                total.currency().iso_alpha_code,
                self.threshold.currency().iso_alpha_code,
            ));
        }

        Ok(total.to_minor_units() > self.threshold.to_minor_units())
    }
}

/// An ordered set of discount tiers.
#[derive(Debug, Clone, Default)]
pub struct DiscountSchedule<'a> {
    tiers: Vec<DiscountTier<'a>>,
}

impl<'a> DiscountSchedule<'a> {
    /// Create a schedule from tiers in any order.
    pub fn new(tiers: impl Into<Vec<DiscountTier<'a>>>) -> Self {
        let mut tiers = tiers.into();

        tiers.sort_by_key(|tier| tier.threshold.to_minor_units());

        Self { tiers }
    }

    /// The standard bracket table: above 200,000 earns 5%, above 300,000 earns 8% and above
    /// 500,000 earns 10%, all in major units of `currency`.
    pub fn standard(currency: &'a Currency) -> Self {
        Self::new([
            DiscountTier::new(
                Money::from_major(200_000, currency),
                Percentage::from(Decimal::new(5, 2)),
            ),
            DiscountTier::new(
                Money::from_major(300_000, currency),
                Percentage::from(Decimal::new(8, 2)),
            ),
            DiscountTier::new(
                Money::from_major(500_000, currency),
                Percentage::from(Decimal::new(10, 2)),
            ),
        ])
    }

    /// Return the tiers ordered by ascending threshold.
    pub fn tiers(&self) -> &[DiscountTier<'a>] {
        &self.tiers
    }

    /// Find the tier a grand total falls into, if any.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::CurrencyMismatch`] if a threshold is in a different currency to
    /// the total.
    pub fn tier_for(
        &self,
        total: &Money<'a, Currency>,
    ) -> Result<Option<&DiscountTier<'a>>, DiscountError> {
        let mut selected = None;

        for tier in &self.tiers {
            if tier.qualifies(total)? {
                selected = Some(tier);
            }
        }

        Ok(selected)
    }
}

/// Calculate the discount amount taken off a price for a percentage.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the result cannot be represented in minor units.
pub fn discount_on<'a>(
    price: &Money<'a, Currency>,
    percent: &Percentage,
) -> Result<Money<'a, Currency>, DiscountError> {
    let discount_minor = percent_of_minor(percent, price.to_minor_units())?;

    Ok(Money::from_minor(discount_minor, price.currency()))
}

/// Calculate the discount amount in minor units based on a percentage and a minor unit amount.
///
/// Half-way results round away from zero.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the calculation overflows.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, DiscountError> {
    let minor = Decimal::from_i64(minor).ok_or(DiscountError::PercentConversion)?;

    ((*percent) * Decimal::ONE) // decimal_percentage doesn't expose the underlying Decimal
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}

/// Converts a fractional percentage to percent points for display.
pub(crate) fn percent_points(percentage: Percentage) -> Decimal {
    ((percentage * Decimal::ONE) * Decimal::ONE_HUNDRED).round_dp(2)
}
