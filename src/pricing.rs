//! Prices

use rusty_money::{Money, MoneyError, iso};
use thiserror::Error;

use crate::items::LineItem;

/// Errors that can occur while calculating total price.
#[derive(Debug, Error, PartialEq)]
pub enum TotalPriceError {
    /// No items were provided, so currency could not be determined.
    #[error("no items provided; cannot determine currency")]
    NoItems,

    /// A line total or the running sum does not fit in minor units.
    #[error("total overflowed the range of minor units")]
    Overflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Calculates the grand total of a list of line items: the sum of every line total.
///
/// # Errors
///
/// - [`TotalPriceError::NoItems`]: No items were provided, so currency could not be determined.
/// - [`TotalPriceError::Overflow`]: A line total did not fit in minor units.
/// - [`TotalPriceError::Money`]: Wrapped money arithmetic or currency mismatch error.
pub fn total_price<'a>(
    items: &[LineItem<'a>],
) -> Result<Money<'a, iso::Currency>, TotalPriceError> {
    let first = items.first().ok_or(TotalPriceError::NoItems)?;

    let total = items.iter().try_fold(
        Money::from_minor(0, first.unit_price().currency()),
        |acc, item| -> Result<_, TotalPriceError> {
            let line_total = item.line_total()?;

            acc.to_minor_units()
                .checked_add(line_total.to_minor_units())
                .ok_or(TotalPriceError::Overflow)?;

            Ok(acc.add(line_total)?)
        },
    )?;

    Ok(total)
}
